//! Built-in syntax definitions
//!
//! Compiled rule graphs for common languages, constructed with
//! [`GraphBuilder`](crate::syntax::graph::GraphBuilder).

mod c;
mod rust;
mod sh;

use super::registry::SyntaxRegistry;

/// Register every built-in graph
pub fn register_all(registry: &mut SyntaxRegistry) {
    registry.register(c::graph(), &["c", "h"]);
    registry.register(rust::graph(), &["rs"]);
    registry.register(sh::graph(), &["sh", "bash"]);
}
