//! Line representation and text operations

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A single line of text in a buffer, stored without its newline
#[derive(Debug, Clone, Default)]
pub struct Line {
    text: String,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw bytes, as seen by the syntax scanner
    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Display width in terminal columns
    pub fn display_width(&self) -> usize {
        self.text.width()
    }

    /// Insert a character at a byte position
    pub fn insert_char(&mut self, byte_pos: usize, ch: char) {
        self.text.insert(byte_pos, ch);
    }

    /// Insert a string at a byte position
    pub fn insert_str(&mut self, byte_pos: usize, s: &str) {
        self.text.insert_str(byte_pos, s);
    }

    /// Delete a byte range, returning the removed text
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        let deleted = self.text[start..end].to_string();
        self.text.replace_range(start..end, "");
        deleted
    }

    /// Split at a byte position, returning the tail as a new line
    pub fn split_off(&mut self, byte_pos: usize) -> Line {
        Line {
            text: self.text.split_off(byte_pos),
        }
    }

    /// Append another line's content
    pub fn append(&mut self, other: Line) {
        self.text.push_str(&other.text);
    }

    /// Byte position of the character after the one at `byte_pos`
    pub fn next_char_boundary(&self, byte_pos: usize) -> usize {
        if byte_pos >= self.text.len() {
            return self.text.len();
        }
        self.text[byte_pos..]
            .chars()
            .next()
            .map(|ch| byte_pos + ch.len_utf8())
            .unwrap_or(self.text.len())
    }

    /// Byte position of the character before `byte_pos`
    pub fn prev_char_boundary(&self, byte_pos: usize) -> usize {
        let pos = byte_pos.min(self.text.len());
        self.text[..pos]
            .chars()
            .next_back()
            .map(|ch| pos - ch.len_utf8())
            .unwrap_or(0)
    }

    /// Display column of a byte position
    pub fn byte_to_col(&self, byte_pos: usize) -> usize {
        self.text[..byte_pos.min(self.text.len())].width()
    }

    /// Byte position for a display column, clamped to the line end
    pub fn col_to_byte(&self, col: usize) -> usize {
        let mut current = 0;
        for (byte_idx, ch) in self.text.char_indices() {
            if current >= col {
                return byte_idx;
            }
            current += ch.width().unwrap_or(1);
        }
        self.text.len()
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self { text: s.to_string() }
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Self { text }
    }
}
