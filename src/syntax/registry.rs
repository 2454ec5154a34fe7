//! Syntax registry
//!
//! Holds the compiled rule graphs and maps file extensions to them.
//! Graphs are shared read-only (`Arc`) between every buffer using the
//! same language; each buffer keeps its own highlight cache.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::builtin;
use super::graph::RuleGraph;

pub struct SyntaxRegistry {
    graphs: Vec<Arc<RuleGraph>>,
    /// lowercased extension -> index into `graphs`
    extensions: HashMap<String, usize>,
    /// Whether syntax highlighting is enabled at all
    pub enabled: bool,
}

impl SyntaxRegistry {
    /// Registry with the built-in languages loaded
    pub fn new() -> Self {
        let mut registry = Self {
            graphs: Vec::new(),
            extensions: HashMap::new(),
            enabled: true,
        };
        builtin::register_all(&mut registry);
        registry
    }

    /// Register a compiled graph for a set of file extensions
    pub fn register(&mut self, graph: RuleGraph, extensions: &[&str]) {
        let idx = self.graphs.len();
        self.graphs.push(Arc::new(graph));
        for ext in extensions {
            self.extensions.insert(ext.to_lowercase(), idx);
        }
    }

    /// Find a graph for a file path by extension
    pub fn for_path(&self, path: &Path) -> Option<Arc<RuleGraph>> {
        if !self.enabled {
            return None;
        }
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.extensions.get(&ext).map(|&i| Arc::clone(&self.graphs[i]))
    }

    /// Find a graph by language name
    pub fn by_name(&self, name: &str) -> Option<Arc<RuleGraph>> {
        self.graphs.iter().find(|g| g.name() == name).map(Arc::clone)
    }

    /// Sorted language names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.graphs.iter().map(|g| g.name()).collect();
        names.sort_unstable();
        names
    }

    /// Recompile every built-in graph, producing fresh shared handles;
    /// buffers must be reassigned afterwards to pick them up
    pub fn reload(&mut self) {
        self.graphs.clear();
        self.extensions.clear();
        builtin::register_all(self);
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}

impl Default for SyntaxRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        let registry = SyntaxRegistry::new();
        assert!(registry.for_path(Path::new("main.c")).is_some());
        assert!(registry.for_path(Path::new("lib.rs")).is_some());
        assert!(registry.for_path(Path::new("build.sh")).is_some());
        assert!(registry.for_path(Path::new("notes.txt")).is_none());
        assert!(registry.for_path(Path::new("no_extension")).is_none());
    }

    #[test]
    fn test_extension_case_folding() {
        let registry = SyntaxRegistry::new();
        assert!(registry.for_path(Path::new("MAIN.C")).is_some());
    }

    #[test]
    fn test_disabled_registry_detects_nothing() {
        let mut registry = SyntaxRegistry::new();
        registry.toggle();
        assert!(!registry.enabled);
        assert!(registry.for_path(Path::new("main.c")).is_none());
    }

    #[test]
    fn test_reload_produces_fresh_handles() {
        let mut registry = SyntaxRegistry::new();
        let before = registry.for_path(Path::new("main.c")).unwrap();
        registry.reload();
        let after = registry.for_path(Path::new("main.c")).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.name(), after.name());
    }

    #[test]
    fn test_by_name() {
        let registry = SyntaxRegistry::new();
        assert!(registry.by_name("c").is_some());
        assert!(registry.by_name("klingon").is_none());
        assert!(!registry.names().is_empty());
    }
}
