//! Configuration file support
//!
//! Loads settings from ~/.ochre.toml (or %USERPROFILE%\.ochre.toml on
//! Windows). Unknown keys are ignored; a missing or malformed file
//! falls back to the defaults.
//!
//! Example:
//! ```text
//! # ochre configuration
//! line-numbers = true
//! tab-width = 4
//! syntax = true
//! ```

use std::fs;
use std::path::PathBuf;

use toml::Table;

/// Configuration settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    /// Tab width for display
    pub tab_width: usize,
    /// Whether syntax highlighting starts enabled
    pub syntax: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_line_numbers: false,
            tab_width: 8,
            syntax: true,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        let home = std::env::var("USERPROFILE").ok()?;

        #[cfg(not(windows))]
        let home = std::env::var("HOME").ok()?;

        Some(PathBuf::from(home).join(".ochre.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Self {
        let mut config = Config::default();
        if let Some(path) = Self::config_path() {
            if let Ok(contents) = fs::read_to_string(&path) {
                config.apply_str(&contents);
            }
        }
        config
    }

    /// Apply TOML-formatted settings on top of the current values
    fn apply_str(&mut self, contents: &str) {
        let Ok(table) = contents.parse::<Table>() else {
            return;
        };
        if let Some(v) = table.get("line-numbers").and_then(|v| v.as_bool()) {
            self.show_line_numbers = v;
        }
        if let Some(v) = table.get("tab-width").and_then(|v| v.as_integer()) {
            if (1..=16).contains(&v) {
                self.tab_width = v as usize;
            }
        }
        if let Some(v) = table.get("syntax").and_then(|v| v.as_bool()) {
            self.syntax = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.show_line_numbers);
        assert_eq!(config.tab_width, 8);
        assert!(config.syntax);
    }

    #[test]
    fn test_apply() {
        let mut config = Config::default();
        config.apply_str("line-numbers = true\ntab-width = 4\nsyntax = false\n");
        assert!(config.show_line_numbers);
        assert_eq!(config.tab_width, 4);
        assert!(!config.syntax);
    }

    #[test]
    fn test_malformed_file_keeps_defaults() {
        let mut config = Config::default();
        config.apply_str("line-numbers = [not toml");
        assert!(!config.show_line_numbers);
        assert_eq!(config.tab_width, 8);
    }

    #[test]
    fn test_out_of_range_tab_width_ignored() {
        let mut config = Config::default();
        config.apply_str("tab-width = 0");
        assert_eq!(config.tab_width, 8);
        config.apply_str("tab-width = 99");
        assert_eq!(config.tab_width, 8);
    }
}
