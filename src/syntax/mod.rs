//! Syntax highlighting
//!
//! The engine is split in three: an immutable compiled rule graph
//! (shared per language), a pure per-line scanner, and a per-buffer
//! cache of line start states that makes rehighlighting after an edit
//! proportional to the size of the edit instead of the file.

mod builtin;
mod cache;
mod graph;
mod registry;
mod scanner;
mod style;

pub use cache::{HighlightCache, TextSource};
pub use graph::{Action, ByteSet, ColorId, Condition, GraphBuilder, RuleGraph, StateId};
pub use registry::SyntaxRegistry;
pub use scanner::scan_line;
pub use style::{Color, Style};
