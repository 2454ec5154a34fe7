//! Display rendering
//!
//! Draws the visible window each frame: text with syntax colors and
//! region highlighting, the mode line, and the minibuffer. Per-byte
//! colors from the highlight cache are grouped into runs so each run
//! costs one style change on the terminal.

use unicode_width::UnicodeWidthChar;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::syntax::{ColorId, RuleGraph, Style};
use crate::terminal::Terminal;
use crate::window::Window;

/// Region bounds (normalized so start <= end)
#[derive(Debug, Clone, Copy)]
struct Region {
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
}

impl Region {
    /// Create a region from mark and cursor, normalizing the order
    fn from_mark_and_cursor(
        mark_line: usize,
        mark_col: usize,
        cursor_line: usize,
        cursor_col: usize,
    ) -> Self {
        if mark_line < cursor_line || (mark_line == cursor_line && mark_col <= cursor_col) {
            Self {
                start_line: mark_line,
                start_col: mark_col,
                end_line: cursor_line,
                end_col: cursor_col,
            }
        } else {
            Self {
                start_line: cursor_line,
                start_col: cursor_col,
                end_line: mark_line,
                end_col: mark_col,
            }
        }
    }

    /// Byte range of a line covered by the region, if any
    fn line_intersection(&self, line_idx: usize, line_len: usize) -> Option<(usize, usize)> {
        if line_idx < self.start_line || line_idx > self.end_line {
            return None;
        }
        let start = if line_idx == self.start_line {
            self.start_col
        } else {
            0
        };
        let end = if line_idx == self.end_line {
            self.end_col
        } else {
            line_len
        };
        if start >= end {
            return None;
        }
        Some((start, end))
    }
}

/// Display column of a byte position, expanding tabs
fn display_col(text: &str, byte_pos: usize, tab_width: usize) -> usize {
    let mut col = 0;
    for (idx, ch) in text.char_indices() {
        if idx >= byte_pos {
            break;
        }
        if ch == '\t' {
            col += tab_width - (col % tab_width);
        } else {
            col += ch.width().unwrap_or(1);
        }
    }
    col
}

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Message to show in the minibuffer
    message: Option<String>,
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    /// Tab width in columns
    pub tab_width: usize,
}

impl Display {
    pub fn new(show_line_numbers: bool, tab_width: usize) -> Self {
        Self {
            needs_redraw: true,
            message: None,
            show_line_numbers,
            tab_width,
        }
    }

    pub fn toggle_line_numbers(&mut self) {
        self.show_line_numbers = !self.show_line_numbers;
        self.needs_redraw = true;
    }

    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Width reserved for line numbers (including separator)
    fn line_number_width(&self, line_count: usize) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        let mut digits = 1;
        let mut n = line_count.max(1);
        while n >= 10 {
            digits += 1;
            n /= 10;
        }
        digits.max(3) + 1
    }

    /// Render one frame
    pub fn render(&mut self, terminal: &mut Terminal, window: &Window, buffer: &mut Buffer) -> Result<()> {
        let cols = terminal.cols() as usize;
        let rows = terminal.rows();

        if self.needs_redraw {
            terminal.clear_screen()?;
        }

        let lnum_width = self.line_number_width(buffer.line_count());
        let text_cols = cols.saturating_sub(lnum_width);
        let height = window.height() as usize;
        let top_line = window.top_line();

        let region = window.mark().map(|(ml, mc)| {
            Region::from_mark_and_cursor(ml, mc, window.cursor_line(), window.cursor_col())
        });

        for row in 0..height {
            let line_idx = top_line + row;
            terminal.move_cursor(row as u16, 0)?;

            if line_idx < buffer.line_count() {
                if self.show_line_numbers {
                    terminal.set_dim(true)?;
                    terminal.write_str(&format!("{:>width$} ", line_idx + 1, width = lnum_width - 1))?;
                    terminal.set_dim(false)?;
                }
                let colors = buffer.line_colors(line_idx).map(|(c, _)| c);
                let graph = buffer.syntax().cloned();
                let line = buffer.line(line_idx).expect("visible line exists");
                let selected = region.and_then(|r| r.line_intersection(line_idx, line.len()));
                self.render_line(
                    terminal,
                    line.text(),
                    graph.as_deref(),
                    colors.as_deref(),
                    selected,
                    text_cols,
                )?;
            } else {
                if self.show_line_numbers {
                    terminal.write_str(&" ".repeat(lnum_width))?;
                }
                terminal.set_dim(true)?;
                terminal.write_str("~")?;
                terminal.set_dim(false)?;
            }
            terminal.clear_to_eol()?;
        }

        self.render_mode_line(terminal, buffer, window, height as u16, cols)?;
        self.render_minibuffer(terminal, rows.saturating_sub(1), cols)?;
        self.position_cursor(terminal, window, buffer, lnum_width)?;

        terminal.set_cursor_visible(true)?;
        terminal.flush()?;
        self.needs_redraw = false;
        Ok(())
    }

    /// Render one line of text, merging syntax colors with the region
    /// overlay, grouping equal-styled chars into single writes
    fn render_line(
        &self,
        terminal: &mut Terminal,
        text: &str,
        graph: Option<&RuleGraph>,
        colors: Option<&[ColorId]>,
        selected: Option<(usize, usize)>,
        max_cols: usize,
    ) -> Result<()> {
        let mut col = 0;
        let mut current: Option<Style> = None;
        let mut pending = String::new();

        for (byte_idx, ch) in text.char_indices() {
            if col >= max_cols {
                break;
            }
            let mut style = match (graph, colors) {
                (Some(g), Some(cs)) => cs.get(byte_idx).map(|&c| g.style(c)).unwrap_or_default(),
                _ => Style::default(),
            };
            if let Some((start, end)) = selected {
                if byte_idx >= start && byte_idx < end {
                    style.reverse = true;
                }
            }

            if current != Some(style) {
                if !pending.is_empty() {
                    terminal.write_str(&pending)?;
                    pending.clear();
                }
                terminal.apply_style(&style)?;
                current = Some(style);
            }

            if ch == '\t' {
                let spaces = self.tab_width - (col % self.tab_width);
                let spaces = spaces.min(max_cols - col);
                pending.extend(std::iter::repeat(' ').take(spaces));
                col += spaces;
            } else {
                let width = ch.width().unwrap_or(1);
                if col + width > max_cols {
                    break;
                }
                pending.push(ch);
                col += width;
            }
        }

        if !pending.is_empty() {
            terminal.write_str(&pending)?;
        }
        if current.is_some() {
            terminal.reset_attributes()?;
        }
        Ok(())
    }

    /// Render the mode line
    fn render_mode_line(
        &self,
        terminal: &mut Terminal,
        buffer: &Buffer,
        window: &Window,
        row: u16,
        cols: usize,
    ) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        terminal.set_reverse(true)?;

        let modified = if buffer.is_modified() { "**" } else { "--" };
        let syntax = buffer
            .syntax()
            .map(|g| format!(" [{}]", g.name()))
            .unwrap_or_default();
        let line_count = buffer.line_count();
        let cursor_line = window.cursor_line() + 1;
        let percent = if cursor_line == 1 {
            "Top".to_string()
        } else if cursor_line >= line_count {
            "Bot".to_string()
        } else {
            format!("{}%", cursor_line * 100 / line_count)
        };
        let mode_line = format!(
            "{} ochre: {}{} L{} {} ",
            modified,
            buffer.name(),
            syntax,
            cursor_line,
            percent
        );

        let padded = if mode_line.len() < cols {
            format!("{}{}", mode_line, "-".repeat(cols - mode_line.len()))
        } else {
            mode_line.chars().take(cols).collect()
        };
        terminal.write_str(&padded)?;
        terminal.set_reverse(false)?;
        Ok(())
    }

    /// Render the minibuffer (message area)
    fn render_minibuffer(&self, terminal: &mut Terminal, row: u16, cols: usize) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        if let Some(ref msg) = self.message {
            let truncated: String = msg.chars().take(cols).collect();
            terminal.write_str(&truncated)?;
        }
        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Put the hardware cursor where the logical cursor is
    fn position_cursor(
        &self,
        terminal: &mut Terminal,
        window: &Window,
        buffer: &Buffer,
        lnum_width: usize,
    ) -> Result<()> {
        let cursor_line = window.cursor_line();
        let col = buffer
            .line(cursor_line)
            .map(|l| display_col(l.text(), window.cursor_col(), self.tab_width))
            .unwrap_or(0);
        let row = cursor_line.saturating_sub(window.top_line()) as u16;
        let screen_col = (lnum_width + col).min(terminal.cols().saturating_sub(1) as usize) as u16;
        terminal.move_cursor(row, screen_col)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_normalizes_order() {
        let r = Region::from_mark_and_cursor(5, 3, 2, 7);
        assert_eq!(r.start_line, 2);
        assert_eq!(r.start_col, 7);
        assert_eq!(r.end_line, 5);
        assert_eq!(r.end_col, 3);
    }

    #[test]
    fn test_region_line_intersection() {
        let r = Region::from_mark_and_cursor(1, 2, 3, 4);
        assert_eq!(r.line_intersection(0, 10), None);
        assert_eq!(r.line_intersection(1, 10), Some((2, 10)));
        assert_eq!(r.line_intersection(2, 10), Some((0, 10)));
        assert_eq!(r.line_intersection(3, 10), Some((0, 4)));
        assert_eq!(r.line_intersection(4, 10), None);
    }

    #[test]
    fn test_region_empty_intersection() {
        let r = Region::from_mark_and_cursor(1, 5, 1, 5);
        assert_eq!(r.line_intersection(1, 10), None);
    }

    #[test]
    fn test_display_col_tabs() {
        assert_eq!(display_col("\tx", 1, 8), 8);
        assert_eq!(display_col("\tx", 2, 8), 9);
        assert_eq!(display_col("ab\tc", 3, 8), 8);
        assert_eq!(display_col("abc", 3, 4), 3);
    }

    #[test]
    fn test_display_col_wide_chars() {
        assert_eq!(display_col("你a", 3, 8), 2);
        assert_eq!(display_col("你a", 4, 8), 3);
    }
}
