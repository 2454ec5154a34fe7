//! Command dispatch system
//!
//! Key bindings map to command functions; commands are organized into
//! submodules by category.

mod editing;
mod files;
mod misc;
mod navigation;

use std::collections::HashMap;

use crate::editor::EditorState;
use crate::error::Result;
use crate::input::{special, Key};

/// Command result status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    Abort,
}

/// Command function signature
pub type CommandFn = fn(&mut EditorState) -> Result<CommandStatus>;

struct BindingEntry {
    function: CommandFn,
    name: &'static str,
}

/// Key binding table
pub struct KeyTable {
    bindings: HashMap<u32, BindingEntry>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Key table with the default bindings installed
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.setup_defaults();
        table
    }

    /// Add a key binding
    pub fn bind(&mut self, key: Key, function: CommandFn, name: &'static str) {
        self.bindings.insert(key.code(), BindingEntry { function, name });
    }

    /// Remove a key binding
    pub fn unbind(&mut self, key: Key) {
        self.bindings.remove(&key.code());
    }

    /// Look up the command bound to a key
    pub fn lookup(&self, key: Key) -> Option<CommandFn> {
        self.bindings.get(&key.code()).map(|e| e.function)
    }

    /// Name of the command bound to a key
    pub fn command_name(&self, key: Key) -> Option<&'static str> {
        self.bindings.get(&key.code()).map(|e| e.name)
    }

    fn setup_defaults(&mut self) {
        // cursor movement
        self.bind(Key::ctrl('f'), navigation::forward_char, "forward-char");
        self.bind(Key::special(special::RIGHT), navigation::forward_char, "forward-char");
        self.bind(Key::ctrl('b'), navigation::backward_char, "backward-char");
        self.bind(Key::special(special::LEFT), navigation::backward_char, "backward-char");
        self.bind(Key::ctrl('n'), navigation::next_line, "next-line");
        self.bind(Key::special(special::DOWN), navigation::next_line, "next-line");
        self.bind(Key::ctrl('p'), navigation::previous_line, "previous-line");
        self.bind(Key::special(special::UP), navigation::previous_line, "previous-line");
        self.bind(Key::ctrl('a'), navigation::beginning_of_line, "beginning-of-line");
        self.bind(Key::special(special::HOME), navigation::beginning_of_line, "beginning-of-line");
        self.bind(Key::ctrl('e'), navigation::end_of_line, "end-of-line");
        self.bind(Key::special(special::END), navigation::end_of_line, "end-of-line");
        self.bind(Key::ctrl('v'), navigation::page_down, "page-down");
        self.bind(Key::special(special::PAGE_DOWN), navigation::page_down, "page-down");
        self.bind(Key::meta('v'), navigation::page_up, "page-up");
        self.bind(Key::special(special::PAGE_UP), navigation::page_up, "page-up");
        self.bind(Key::meta('<'), navigation::buffer_start, "beginning-of-buffer");
        self.bind(Key::meta('>'), navigation::buffer_end, "end-of-buffer");
        self.bind(Key::meta('g'), navigation::goto_line, "goto-line");

        // editing
        self.bind(Key::ctrl('m'), editing::newline, "newline");
        self.bind(Key::ctrl('i'), editing::insert_tab, "insert-tab");
        self.bind(Key(0x7f), editing::delete_backward, "delete-backward");
        self.bind(Key::ctrl('d'), editing::delete_forward, "delete-forward");
        self.bind(Key::special(special::DELETE), editing::delete_forward, "delete-forward");
        self.bind(Key::ctrl('k'), editing::kill_line, "kill-line");
        self.bind(Key::ctrl('y'), editing::yank, "yank");
        self.bind(Key::ctrl('@'), editing::set_mark, "set-mark");
        self.bind(Key::ctrl(' '), editing::set_mark, "set-mark");
        self.bind(Key::ctrl('w'), editing::kill_region, "kill-region");

        // search
        self.bind(Key::ctrl('s'), misc::search_forward, "search-forward");

        // files
        self.bind(Key::ctlx_ctrl('s'), files::save_buffer, "save-buffer");
        self.bind(Key::ctlx_ctrl('w'), files::save_buffer_as, "save-buffer-as");
        self.bind(Key::ctlx_ctrl('c'), files::quit, "quit");

        // misc
        self.bind(Key::ctrl('l'), misc::redraw, "redraw");
        self.bind(Key::ctrl('g'), misc::abort, "abort");
        self.bind(Key::ctlx('l'), misc::toggle_line_numbers, "toggle-line-numbers");
        self.bind(Key::ctlx('h'), misc::toggle_syntax, "toggle-syntax");
        self.bind(Key::ctlx('r'), misc::reload_syntax, "reload-syntax");
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_present() {
        let table = KeyTable::with_defaults();
        assert!(table.lookup(Key::ctrl('f')).is_some());
        assert!(table.lookup(Key::ctlx_ctrl('s')).is_some());
        assert_eq!(table.command_name(Key::ctrl('k')), Some("kill-line"));
        assert!(table.lookup(Key::ctrl('z')).is_none());
    }

    #[test]
    fn test_bind_and_unbind() {
        let mut table = KeyTable::new();
        assert!(table.lookup(Key::ctrl('q')).is_none());
        table.bind(Key::ctrl('q'), misc::redraw, "redraw");
        assert!(table.lookup(Key::ctrl('q')).is_some());
        table.unbind(Key::ctrl('q'));
        assert!(table.lookup(Key::ctrl('q')).is_none());
    }

    #[test]
    fn test_arrow_and_ctrl_share_commands() {
        let table = KeyTable::with_defaults();
        assert_eq!(
            table.command_name(Key::ctrl('f')),
            table.command_name(Key::special(special::RIGHT))
        );
    }
}
