//! Buffer representation - lines of text plus metadata and the
//! per-buffer highlight state
//!
//! Every mutating operation notifies the highlight cache before
//! returning, so a render can never observe a line layout the cache
//! was not told about.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::line::Line;
use crate::syntax::{ColorId, HighlightCache, RuleGraph, TextSource};

/// Line-indexed view of the buffer text for the highlight cache
struct LineSlice<'a>(&'a [Line]);

impl TextSource for LineSlice<'_> {
    fn line_count(&self) -> usize {
        self.0.len()
    }

    fn line_bytes(&self, index: usize) -> &[u8] {
        self.0[index].bytes()
    }
}

/// A buffer containing text and metadata
pub struct Buffer {
    /// Lines of text; never empty
    lines: Vec<Line>,
    /// Buffer name (e.g., "main.c", "*scratch*")
    name: String,
    /// Associated file path (None for unnamed buffers)
    filename: Option<PathBuf>,
    /// Whether buffer has unsaved changes
    modified: bool,
    /// Highlight cache, present while a syntax is assigned
    highlight: Option<HighlightCache>,
}

impl Buffer {
    /// Create a new empty buffer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            lines: vec![Line::new()],
            name: name.into(),
            filename: None,
            modified: false,
            highlight: None,
        }
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        let mut lines: Vec<Line> = content.lines().map(Line::from).collect();
        if lines.is_empty() {
            lines.push(Line::new());
        }

        Ok(Self {
            lines,
            name,
            filename: Some(path.to_path_buf()),
            modified: false,
            highlight: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> Option<&PathBuf> {
        self.filename.as_ref()
    }

    pub fn set_filename(&mut self, path: PathBuf) {
        self.filename = Some(path);
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Install a rule graph with a fresh highlight cache, or remove
    /// highlighting entirely
    pub fn assign_syntax(&mut self, graph: Option<Arc<RuleGraph>>) {
        self.highlight = graph.map(HighlightCache::new);
    }

    /// The assigned rule graph, if any
    pub fn syntax(&self) -> Option<&Arc<RuleGraph>> {
        self.highlight.as_ref().map(|h| h.graph())
    }

    /// Per-byte colors for one line plus the "next line's start state
    /// changed" flag; None when no syntax is assigned
    pub fn line_colors(&mut self, line: usize) -> Option<(Vec<ColorId>, bool)> {
        let src = LineSlice(&self.lines);
        self.highlight.as_mut().map(|h| h.line_colors(&src, line))
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_char(byte_pos, ch);
            self.modified = true;
            if let Some(h) = &mut self.highlight {
                h.on_line_modified(line_idx);
            }
        }
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            let tail = line.split_off(byte_pos);
            self.lines.insert(line_idx + 1, tail);
            self.modified = true;
            if let Some(h) = &mut self.highlight {
                h.on_lines_inserted(line_idx, 1);
            }
        }
    }

    /// Insert text that may contain newlines; returns the cursor
    /// position after the inserted text
    pub fn insert_text(&mut self, line_idx: usize, byte_pos: usize, text: &str) -> (usize, usize) {
        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or("");
        let rest: Vec<&str> = segments.collect();

        if rest.is_empty() {
            if let Some(line) = self.lines.get_mut(line_idx) {
                line.insert_str(byte_pos, first);
                self.modified = true;
                if let Some(h) = &mut self.highlight {
                    h.on_line_modified(line_idx);
                }
            }
            return (line_idx, byte_pos + first.len());
        }

        let Some(line) = self.lines.get_mut(line_idx) else {
            return (line_idx, byte_pos);
        };
        let tail = line.split_off(byte_pos);
        line.insert_str(byte_pos, first);
        let mut insert_at = line_idx + 1;
        for segment in &rest[..rest.len() - 1] {
            self.lines.insert(insert_at, Line::from(*segment));
            insert_at += 1;
        }
        let last_len = rest[rest.len() - 1].len();
        let mut last = Line::from(rest[rest.len() - 1]);
        last.append(tail);
        self.lines.insert(insert_at, last);
        self.modified = true;
        if let Some(h) = &mut self.highlight {
            h.on_lines_inserted(line_idx, rest.len());
        }
        (insert_at, last_len)
    }

    /// Delete the character at position, returning it
    pub fn delete_char(&mut self, line_idx: usize, byte_pos: usize) -> Option<char> {
        let line = self.lines.get_mut(line_idx)?;
        if byte_pos >= line.len() {
            return None;
        }
        let ch = line.text()[byte_pos..].chars().next()?;
        line.delete_range(byte_pos, byte_pos + ch.len_utf8());
        self.modified = true;
        if let Some(h) = &mut self.highlight {
            h.on_line_modified(line_idx);
        }
        Some(ch)
    }

    /// Delete the character before position; returns it and the new
    /// cursor position
    pub fn delete_backward(&mut self, line_idx: usize, byte_pos: usize) -> Option<(char, usize)> {
        if byte_pos == 0 {
            return None;
        }
        let line = self.lines.get_mut(line_idx)?;
        let ch = line.text()[..byte_pos].chars().next_back()?;
        let new_pos = byte_pos - ch.len_utf8();
        line.delete_range(new_pos, byte_pos);
        self.modified = true;
        if let Some(h) = &mut self.highlight {
            h.on_line_modified(line_idx);
        }
        Some((ch, new_pos))
    }

    /// Join a line with the one after it
    pub fn join_line(&mut self, line_idx: usize) -> bool {
        if line_idx + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(line_idx + 1);
        self.lines[line_idx].append(next);
        self.modified = true;
        if let Some(h) = &mut self.highlight {
            h.on_lines_deleted(line_idx, 1);
        }
        true
    }

    /// Join with the previous line; returns the join position
    pub fn join_with_previous(&mut self, line_idx: usize) -> Option<usize> {
        if line_idx == 0 || line_idx >= self.lines.len() {
            return None;
        }
        let current = self.lines.remove(line_idx);
        let prev = &mut self.lines[line_idx - 1];
        let join_pos = prev.len();
        prev.append(current);
        self.modified = true;
        if let Some(h) = &mut self.highlight {
            h.on_lines_deleted(line_idx - 1, 1);
        }
        Some(join_pos)
    }

    /// Kill from position to end of line; at the end of a line kills
    /// the newline instead. Returns the killed text.
    pub fn kill_to_eol(&mut self, line_idx: usize, byte_pos: usize) -> Option<String> {
        let line = self.lines.get_mut(line_idx)?;
        if byte_pos < line.len() {
            let len = line.len();
            let killed = line.delete_range(byte_pos, len);
            self.modified = true;
            if let Some(h) = &mut self.highlight {
                h.on_line_modified(line_idx);
            }
            Some(killed)
        } else if line_idx + 1 < self.lines.len() {
            self.join_line(line_idx);
            Some("\n".to_string())
        } else {
            None
        }
    }

    /// Delete the region between two positions (start must not be
    /// after end); returns the deleted text
    pub fn delete_region(
        &mut self,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> String {
        if start_line == end_line {
            let Some(line) = self.lines.get_mut(start_line) else {
                return String::new();
            };
            let deleted = line.delete_range(start_col, end_col);
            self.modified = true;
            if let Some(h) = &mut self.highlight {
                h.on_line_modified(start_line);
            }
            return deleted;
        }

        let mut deleted = String::new();
        let first_len = self.lines[start_line].len();
        deleted.push_str(&self.lines[start_line].delete_range(start_col, first_len));
        for line in &self.lines[start_line + 1..end_line] {
            deleted.push('\n');
            deleted.push_str(line.text());
        }
        deleted.push('\n');
        deleted.push_str(&self.lines[end_line].delete_range(0, end_col));

        let tail = self.lines.remove(end_line);
        self.lines.drain(start_line + 1..end_line);
        self.lines[start_line].append(tail);
        self.modified = true;
        if let Some(h) = &mut self.highlight {
            h.on_lines_deleted(start_line, end_line - start_line);
        }
        deleted
    }

    /// Write buffer to its file
    pub fn save(&mut self) -> std::io::Result<()> {
        let path = self
            .filename
            .clone()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no file name"))?;
        self.write_to(&path)?;
        self.modified = false;
        Ok(())
    }

    /// Write buffer to a specific path
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;
        let mut file = std::fs::File::create(path)?;
        for (i, line) in self.lines.iter().enumerate() {
            write!(file, "{}", line.text())?;
            if i + 1 < self.lines.len() {
                writeln!(file)?;
            }
        }
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new("*scratch*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ByteSet, GraphBuilder, Style};

    /// Quote-string graph shared across the edit tests
    fn graph() -> Arc<RuleGraph> {
        let mut b = GraphBuilder::new("strings");
        let normal = b.state("normal");
        let string = b.state("string");
        let str_c = b.color(Style::fg(crate::syntax::Color::Green));
        b.on_char(normal, ByteSet::of("\""), Some(str_c), string);
        b.eat(normal, None, normal);
        b.on_char(string, ByteSet::of("\""), Some(str_c), normal);
        b.eat(string, Some(str_c), string);
        Arc::new(b.build())
    }

    fn buffer_with(lines: &[&str]) -> Buffer {
        let mut buf = Buffer::new("test");
        buf.lines = lines.iter().map(|s| Line::from(*s)).collect();
        buf.assign_syntax(Some(graph()));
        buf
    }

    /// The edited buffer must highlight identically to a fresh buffer
    /// holding the same final text
    fn assert_highlight_consistent(buf: &mut Buffer) {
        let lines: Vec<String> = (0..buf.line_count())
            .map(|i| buf.line(i).unwrap().text().to_string())
            .collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let mut fresh = buffer_with(&refs);
        for i in 0..buf.line_count() {
            let (got, _) = buf.line_colors(i).unwrap();
            let (want, _) = fresh.line_colors(i).unwrap();
            assert_eq!(got, want, "line {} diverges after edits", i);
        }
    }

    #[test]
    fn test_insert_char_keeps_highlight_in_sync() {
        let mut buf = buffer_with(&["he said hi", "tail"]);
        for i in 0..2 {
            buf.line_colors(i);
        }
        buf.insert_char(0, 8, '"');
        assert_highlight_consistent(&mut buf);
    }

    #[test]
    fn test_newline_split_and_join_round_trip() {
        let mut buf = buffer_with(&["a \"string\" b", "rest"]);
        for i in 0..2 {
            buf.line_colors(i);
        }

        buf.insert_newline(0, 5);
        assert_eq!(buf.line_count(), 3);
        assert_highlight_consistent(&mut buf);

        buf.join_line(0);
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line(0).unwrap().text(), "a \"string\" b");
        assert_highlight_consistent(&mut buf);
    }

    #[test]
    fn test_insert_text_multiline() {
        let mut buf = buffer_with(&["abcd"]);
        buf.line_colors(0);
        let (line, col) = buf.insert_text(0, 2, "1\n2\n3");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line(0).unwrap().text(), "ab1");
        assert_eq!(buf.line(1).unwrap().text(), "2");
        assert_eq!(buf.line(2).unwrap().text(), "3cd");
        assert_eq!((line, col), (2, 1));
        assert_highlight_consistent(&mut buf);
    }

    #[test]
    fn test_insert_text_single_segment() {
        let mut buf = buffer_with(&["abcd"]);
        let (line, col) = buf.insert_text(0, 2, "xy");
        assert_eq!(buf.line(0).unwrap().text(), "abxycd");
        assert_eq!((line, col), (0, 4));
    }

    #[test]
    fn test_delete_region_multiline() {
        let mut buf = buffer_with(&["one two", "\"inside", "still\"", "four"]);
        for i in 0..4 {
            buf.line_colors(i);
        }
        let deleted = buf.delete_region(0, 4, 2, 5);
        assert_eq!(deleted, "two\n\"inside\nstill");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line(0).unwrap().text(), "one \"");
        assert_eq!(buf.line(1).unwrap().text(), "four");
        assert_highlight_consistent(&mut buf);
    }

    #[test]
    fn test_delete_region_same_line() {
        let mut buf = buffer_with(&["hello world"]);
        let deleted = buf.delete_region(0, 5, 0, 11);
        assert_eq!(deleted, " world");
        assert_eq!(buf.line(0).unwrap().text(), "hello");
    }

    #[test]
    fn test_kill_to_eol_then_newline() {
        let mut buf = buffer_with(&["hello world", "next"]);
        let killed = buf.kill_to_eol(0, 5).unwrap();
        assert_eq!(killed, " world");
        let killed = buf.kill_to_eol(0, 5).unwrap();
        assert_eq!(killed, "\n");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0).unwrap().text(), "hellonext");
        assert_highlight_consistent(&mut buf);
    }

    #[test]
    fn test_delete_backward_joins_nothing() {
        let mut buf = buffer_with(&["ab"]);
        assert!(buf.delete_backward(0, 0).is_none());
        let (ch, pos) = buf.delete_backward(0, 2).unwrap();
        assert_eq!((ch, pos), ('b', 1));
    }

    #[test]
    fn test_no_syntax_no_colors() {
        let mut buf = Buffer::new("plain");
        assert!(buf.line_colors(0).is_none());
        assert!(buf.syntax().is_none());
    }

    #[test]
    fn test_assign_syntax_resets_cache() {
        let mut buf = buffer_with(&["\"a\"", "b"]);
        buf.line_colors(0);
        buf.line_colors(1);
        buf.assign_syntax(Some(graph()));
        // fresh cache still produces correct colors from scratch
        assert_highlight_consistent(&mut buf);
    }
}
