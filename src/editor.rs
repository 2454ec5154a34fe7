//! Editor state and main loop

use std::path::{Path, PathBuf};

use crate::buffer::Buffer;
use crate::command::{CommandStatus, KeyTable};
use crate::config::Config;
use crate::display::Display;
use crate::error::Result;
use crate::input::{InputState, Key};
use crate::syntax::SyntaxRegistry;
use crate::terminal::Terminal;
use crate::window::Window;

/// What to do when the minibuffer prompt completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    None,
    GotoLine,
    SearchForward,
    SaveAs,
    QuitConfirm,
}

/// Minibuffer prompt state
pub struct PromptState {
    pub active: bool,
    pub prompt: String,
    pub input: String,
    pub action: PromptAction,
    pub default: Option<String>,
}

impl Default for PromptState {
    fn default() -> Self {
        Self {
            active: false,
            prompt: String::new(),
            input: String::new(),
            action: PromptAction::None,
            default: None,
        }
    }
}

/// Main editor state
pub struct EditorState {
    pub buffer: Buffer,
    pub window: Window,
    pub terminal: Terminal,
    pub display: Display,
    pub input: InputState,
    pub keytab: KeyTable,
    pub syntaxes: SyntaxRegistry,
    pub running: bool,
    /// Most recent kill, yanked back with C-y
    pub kill_buffer: String,
    /// Consecutive kills append to the kill buffer
    pub last_was_kill: bool,
    pub prompt: PromptState,
    /// Last search pattern, offered as the prompt default
    pub last_search: String,
}

impl EditorState {
    pub fn new(terminal: Terminal, config: Config) -> Self {
        let height = terminal.rows().saturating_sub(2);
        let mut syntaxes = SyntaxRegistry::new();
        syntaxes.enabled = config.syntax;

        Self {
            buffer: Buffer::new("*scratch*"),
            window: Window::new(height),
            display: Display::new(config.show_line_numbers, config.tab_width),
            terminal,
            input: InputState::new(),
            keytab: KeyTable::with_defaults(),
            syntaxes,
            running: true,
            kill_buffer: String::new(),
            last_was_kill: false,
            prompt: PromptState::default(),
            last_search: String::new(),
        }
    }

    /// Open a file, or start an empty buffer under that name if it
    /// does not exist yet
    pub fn open_file(&mut self, path: &Path) {
        match Buffer::from_file(path) {
            Ok(buffer) => {
                self.buffer = buffer;
            }
            Err(_) => {
                let name = path
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let mut buffer = Buffer::new(name.clone());
                buffer.set_filename(path.to_path_buf());
                self.buffer = buffer;
                self.display.set_message(format!("(New file) {}", name));
            }
        }
        self.window.reset();
        self.assign_syntax();
        self.display.force_redraw();
    }

    /// (Re)detect and install the buffer's syntax from its file name
    pub fn assign_syntax(&mut self) {
        let graph = self
            .buffer
            .filename()
            .and_then(|path| self.syntaxes.for_path(path));
        self.buffer.assign_syntax(graph);
    }

    /// Run the main editor loop
    pub fn run(&mut self) -> Result<()> {
        self.display.force_redraw();
        while self.running {
            self.window.set_height(self.terminal.rows().saturating_sub(2));
            if self.window.ensure_cursor_visible() {
                self.display.force_redraw();
            }
            self.display
                .render(&mut self.terminal, &self.window, &mut self.buffer)?;

            let key_event = self.terminal.read_key()?;
            if let Some(key) = self.input.translate_key(key_event) {
                self.handle_key(key)?;
            } else if self.input.is_pending() {
                if self.input.is_ctlx_pending() {
                    self.display.set_message("C-x -");
                } else {
                    self.display.set_message("ESC -");
                }
            }
        }
        Ok(())
    }

    /// Handle a translated key press
    fn handle_key(&mut self, key: Key) -> Result<()> {
        if self.prompt.active {
            return self.handle_prompt_key(key);
        }

        self.display.clear_message();

        if let Some(cmd) = self.keytab.lookup(key) {
            match cmd(self)? {
                CommandStatus::Success => {}
                CommandStatus::Failure => {
                    self.terminal.beep()?;
                }
                CommandStatus::Abort => {
                    self.display.set_message("Quit");
                }
            }
        } else if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.insert_char(ch);
            }
            self.last_was_kill = false;
        } else {
            self.terminal.beep()?;
            self.display
                .set_message(format!("{} is not bound", key.display_name()));
        }
        Ok(())
    }

    /// Insert a character at the cursor
    pub fn insert_char(&mut self, ch: char) {
        let line = self.window.cursor_line();
        let col = self.window.cursor_col();
        self.buffer.insert_char(line, col, ch);
        self.window.set_cursor(line, col + ch.len_utf8());
        self.update_goal_col();
    }

    /// Insert a newline at the cursor
    pub fn insert_newline(&mut self) {
        let line = self.window.cursor_line();
        let col = self.window.cursor_col();
        self.buffer.insert_newline(line, col);
        self.window.set_cursor(line + 1, 0);
        self.update_goal_col();
    }

    pub fn move_cursor_left(&mut self) -> bool {
        let line = self.window.cursor_line();
        let col = self.window.cursor_col();
        if col > 0 {
            let new_col = self
                .buffer
                .line(line)
                .map(|l| l.prev_char_boundary(col))
                .unwrap_or(0);
            self.window.set_cursor(line, new_col);
            true
        } else if line > 0 {
            let eol = self.buffer.line(line - 1).map(|l| l.len()).unwrap_or(0);
            self.window.set_cursor(line - 1, eol);
            true
        } else {
            false
        }
    }

    pub fn move_cursor_right(&mut self) -> bool {
        let line = self.window.cursor_line();
        let col = self.window.cursor_col();
        let Some(l) = self.buffer.line(line) else {
            return false;
        };
        if col < l.len() {
            let new_col = l.next_char_boundary(col);
            self.window.set_cursor(line, new_col);
            true
        } else if line + 1 < self.buffer.line_count() {
            self.window.set_cursor(line + 1, 0);
            true
        } else {
            false
        }
    }

    /// Vertical movement keeping the goal column
    pub fn move_cursor_vertical(&mut self, down: bool) -> bool {
        let line = self.window.cursor_line();
        let target = if down {
            if line + 1 >= self.buffer.line_count() {
                return false;
            }
            line + 1
        } else {
            if line == 0 {
                return false;
            }
            line - 1
        };
        let goal = self.window.goal_col();
        let col = self
            .buffer
            .line(target)
            .map(|l| l.col_to_byte(goal))
            .unwrap_or(0);
        self.window.set_cursor(target, col);
        true
    }

    /// Remember the display column for subsequent vertical moves
    pub fn update_goal_col(&mut self) {
        let line = self.window.cursor_line();
        let col = self.window.cursor_col();
        let goal = self
            .buffer
            .line(line)
            .map(|l| l.byte_to_col(col))
            .unwrap_or(0);
        self.window.set_goal_col(goal);
    }

    /// Search forward from just after the cursor; wraps at the end
    pub fn search_forward(&mut self, pattern: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }
        let start_line = self.window.cursor_line();
        let start_col = self.window.cursor_col();
        let count = self.buffer.line_count();

        for step in 0..=count {
            let line_idx = (start_line + step) % count;
            let Some(line) = self.buffer.line(line_idx) else {
                continue;
            };
            let from = if step == 0 {
                // just past the cursor so repeated searches advance
                line.next_char_boundary(start_col).min(line.len())
            } else {
                0
            };
            if from > line.len() {
                continue;
            }
            if let Some(pos) = line.text()[from..].find(pattern) {
                self.window.set_cursor(line_idx, from + pos);
                self.update_goal_col();
                return true;
            }
        }
        false
    }

    /// Start a minibuffer prompt
    pub fn start_prompt(&mut self, prompt: &str, action: PromptAction, default: Option<String>) {
        self.prompt.active = true;
        self.prompt.prompt = prompt.to_string();
        self.prompt.input.clear();
        self.prompt.action = action;
        self.prompt.default = default;
        self.update_prompt_display();
    }

    fn update_prompt_display(&mut self) {
        let hint = match &self.prompt.default {
            Some(d) if !d.is_empty() => format!("(default {}) ", d),
            _ => String::new(),
        };
        self.display
            .set_message(format!("{}{}{}", self.prompt.prompt, hint, self.prompt.input));
    }

    fn cancel_prompt(&mut self) {
        self.prompt.active = false;
        self.prompt.action = PromptAction::None;
        self.display.set_message("Quit");
    }

    fn handle_prompt_key(&mut self, key: Key) -> Result<()> {
        // yes/no prompts take a single key
        if self.prompt.action == PromptAction::QuitConfirm {
            match key.base_char() {
                Some('y') | Some('Y') => {
                    self.running = false;
                }
                _ => self.cancel_prompt(),
            }
            self.prompt.active = false;
            return Ok(());
        }

        if key == Key::ctrl('g') {
            self.cancel_prompt();
            return Ok(());
        }
        if key == Key::ctrl('m') {
            let action = self.prompt.action;
            let mut input = std::mem::take(&mut self.prompt.input);
            if input.is_empty() {
                if let Some(default) = self.prompt.default.take() {
                    input = default;
                }
            }
            self.prompt.active = false;
            self.prompt.action = PromptAction::None;
            self.display.clear_message();
            return self.complete_prompt(action, input);
        }
        if key == Key(0x7f) {
            self.prompt.input.pop();
            self.update_prompt_display();
            return Ok(());
        }
        if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.prompt.input.push(ch);
            }
            self.update_prompt_display();
        }
        Ok(())
    }

    fn complete_prompt(&mut self, action: PromptAction, input: String) -> Result<()> {
        match action {
            PromptAction::GotoLine => match input.trim().parse::<usize>() {
                Ok(n) if n >= 1 => {
                    let line = (n - 1).min(self.buffer.line_count() - 1);
                    self.window.set_cursor(line, 0);
                    self.update_goal_col();
                }
                _ => self.display.set_message("Not a line number"),
            },
            PromptAction::SearchForward => {
                if !input.is_empty() {
                    self.last_search = input.clone();
                }
                let pattern = self.last_search.clone();
                if pattern.is_empty() {
                    self.display.set_message("No search pattern");
                } else if self.search_forward(&pattern) {
                    self.display.set_message(format!("Found: {}", pattern));
                } else {
                    self.terminal.beep()?;
                    self.display.set_message(format!("Not found: {}", pattern));
                }
            }
            PromptAction::SaveAs => {
                if input.is_empty() {
                    self.display.set_message("No file name");
                } else {
                    self.buffer.set_filename(PathBuf::from(input));
                    match self.buffer.save() {
                        Ok(()) => {
                            // the new extension may select a different syntax
                            self.assign_syntax();
                            self.display.set_message("Wrote file");
                            self.display.force_redraw();
                        }
                        Err(e) => self.display.set_message(format!("Save failed: {}", e)),
                    }
                }
            }
            PromptAction::QuitConfirm | PromptAction::None => {}
        }
        Ok(())
    }
}
