//! Per-buffer highlight cache
//!
//! Stores one scanner start state per line boundary so that after an
//! edit only the lines whose highlighting actually changed get
//! rescanned. `first_hole` is the boundary between entries that are
//! guaranteed to match a from-scratch recomputation and entries that
//! must not be trusted. Entries before the hole are always valid; the
//! entry at slot 0 is the graph's start state and is never invalidated.
//!
//! The cache itself never returns errors: an out-of-range line index or
//! an inconsistent hole cursor means the editing layer and the cache
//! have gotten out of sync, which is a bug, so those are fatal
//! assertions. Edit notifications must arrive in the order the edits
//! happened, before the next render touches the new line layout.

use std::sync::Arc;

use super::graph::{ColorId, RuleGraph, StateId};
use super::scanner::scan_line;

/// Line-indexed byte access the cache scans from
pub trait TextSource {
    fn line_count(&self) -> usize;
    /// Raw bytes of one line, without its newline
    fn line_bytes(&self, index: usize) -> &[u8];
}

/// Cached line start states for one buffer
pub struct HighlightCache {
    graph: Arc<RuleGraph>,
    /// One slot per known line boundary; `None` is a hole
    states: Vec<Option<StateId>>,
    /// Smallest index whose entry is not guaranteed valid
    first_hole: usize,
    scratch: Vec<ColorId>,
}

impl HighlightCache {
    /// Fresh cache for a newly assigned syntax
    pub fn new(graph: Arc<RuleGraph>) -> Self {
        let start = graph.start();
        Self {
            graph,
            states: vec![Some(start)],
            first_hole: 1,
            scratch: Vec::new(),
        }
    }

    pub fn graph(&self) -> &Arc<RuleGraph> {
        &self.graph
    }

    /// Number of line boundaries with a cache slot
    pub fn cached_lines(&self) -> usize {
        self.states.len()
    }

    pub fn first_hole(&self) -> usize {
        self.first_hole
    }

    fn check(&self) {
        assert!(self.first_hole >= 1, "slot 0 cannot be a hole");
        assert!(
            self.first_hole <= self.states.len(),
            "hole cursor {} past cache end {}",
            self.first_hole,
            self.states.len()
        );
    }

    /// First hole at or after `pos`
    fn find_hole(&self, mut pos: usize) -> usize {
        while pos < self.states.len() && self.states[pos].is_some() {
            pos += 1;
        }
        pos
    }

    fn truncate(&mut self, keep: usize) {
        self.check();
        self.states.truncate(keep);
        if self.first_hole > self.states.len() {
            self.first_hole = self.states.len();
        }
    }

    /// Mark `idx` as the position of a new hole
    fn new_hole(&mut self, idx: usize) {
        if idx == self.first_hole {
            return;
        }
        if idx > self.first_hole {
            // a hole past the cursor can only be marked in place
            if idx < self.states.len() {
                self.states[idx] = None;
            }
            return;
        }
        // the old cursor position may hold a non-hole entry
        if self.first_hole < self.states.len() {
            let old = self.first_hole;
            self.states[old] = None;
        }
        self.first_hole = idx;
    }

    fn rescan(&mut self, text: &dyn TextSource, idx: usize, start: StateId) -> StateId {
        let is_final = idx + 1 == text.line_count();
        scan_line(&self.graph, start, text.line_bytes(idx), is_final, &mut self.scratch)
    }

    /// Make every start state up to and including `line` valid,
    /// rescanning forward from the line before the first hole. Stops
    /// early when a recomputed state matches the stale entry already
    /// stored: same state plus unchanged line content means everything
    /// up to the next marked hole is still valid.
    pub fn ensure_valid_through(&mut self, text: &dyn TextSource, line: usize) {
        assert!(
            line < text.line_count(),
            "line {} out of range for {}-line buffer",
            line,
            text.line_count()
        );
        loop {
            self.check();
            if self.first_hole > line {
                return;
            }
            let idx = self.first_hole - 1;
            let start = self.states[idx].expect("entry before hole cursor must be valid");
            let end = self.rescan(text, idx, start);

            let next = idx + 1;
            if next == self.states.len() {
                self.states.push(Some(end));
                self.first_hole = self.states.len();
            } else if self.states[next].is_none() {
                self.states[next] = Some(end);
                self.first_hole = next + 1;
            } else if self.states[next] == Some(end) {
                // hole closed; skip ahead to the next marked one
                self.first_hole = self.find_hole(next + 1);
            } else {
                self.states[next] = Some(end);
                self.first_hole = next + 1;
            }
        }
    }

    /// Colors for one line, plus whether the start state of the line
    /// after it changed (the renderer keeps redrawing subsequent lines
    /// while this is true)
    pub fn line_colors(&mut self, text: &dyn TextSource, line: usize) -> (Vec<ColorId>, bool) {
        self.ensure_valid_through(text, line);
        let start = self.states[line].expect("start state valid after fill");
        let is_final = line + 1 == text.line_count();
        let mut colors = Vec::new();
        let end = scan_line(&self.graph, start, text.line_bytes(line), is_final, &mut colors);

        let next = line + 1;
        let mut next_changed = false;
        if next == self.states.len() {
            self.states.push(Some(end));
            self.first_hole = self.states.len();
            next_changed = true;
        } else if self.states[next].is_none() {
            self.states[next] = Some(end);
            // the cursor may now sit on a non-hole entry; the fill loop
            // re-checks before trusting it
            self.first_hole = next + 1;
            next_changed = true;
        } else if next == self.first_hole {
            if self.states[next] == Some(end) {
                self.first_hole = self.find_hole(next + 1);
            } else {
                self.states[next] = Some(end);
                self.first_hole = next + 1;
                next_changed = true;
            }
        } else {
            // inside the valid prefix a rescan cannot disagree
            assert_eq!(
                self.states[next],
                Some(end),
                "cache out of sync with buffer at line {}",
                line
            );
        }
        (colors, next_changed)
    }

    /// Called after `count` lines were spliced in starting at `first`
    /// (the first line whose content changed). `count == 0` means the
    /// line was edited in place.
    pub fn on_lines_inserted(&mut self, first: usize, count: usize) {
        let len = self.states.len();
        if first >= len {
            // nothing cached that far down
            return;
        }
        let last = first + count;
        if last + 1 >= len {
            // the invalidated suffix reaches the cache end; preserving
            // it would cost more than recomputing
            self.truncate(first + 1);
            return;
        }
        if count > 0 {
            // open a gap after the edit point; the shifted suffix keeps
            // its entries for the reuse check
            self.states
                .splice(first + 1..first + 1, std::iter::repeat(None).take(count));
            // the slot right after the gap described the old layout
            self.states[last + 1] = None;
        }
        self.new_hole(first + 1);
    }

    /// Called after `count` lines were removed starting at `first`
    pub fn on_lines_deleted(&mut self, first: usize, count: usize) {
        let len = self.states.len();
        if len == 1 || first >= len {
            return;
        }
        let last = first + count;
        if last + 1 >= len {
            self.truncate(len.saturating_sub(count).max(1));
            return;
        }
        if count > 0 {
            self.states.drain(first + 1..last + 1);
        }
        self.new_hole(first + 1);
    }

    /// Called after an edit that changed a line's bytes without
    /// changing the line count
    pub fn on_line_modified(&mut self, line: usize) {
        self.on_lines_inserted(line, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::graph::{ByteSet, GraphBuilder};
    use crate::syntax::style::{Color, Style};
    use std::cell::Cell;

    /// Plain text plus double-quoted strings that may span lines
    fn string_graph() -> Arc<RuleGraph> {
        let mut b = GraphBuilder::new("strings");
        let normal = b.state("normal");
        let string = b.state("string");
        let str_c = b.color(Style::fg(Color::Green));
        b.on_char(normal, ByteSet::of("\""), Some(str_c), string);
        b.eat(normal, None, normal);
        b.on_char(string, ByteSet::of("\""), Some(str_c), normal);
        b.eat(string, Some(str_c), string);
        Arc::new(b.build())
    }

    /// Test text with a counter for how many lines were actually read
    struct Text {
        lines: Vec<String>,
        reads: Cell<usize>,
    }

    impl Text {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                reads: Cell::new(0),
            }
        }

        fn take_reads(&self) -> usize {
            self.reads.replace(0)
        }
    }

    impl TextSource for Text {
        fn line_count(&self) -> usize {
            self.lines.len()
        }

        fn line_bytes(&self, index: usize) -> &[u8] {
            self.reads.set(self.reads.get() + 1);
            self.lines[index].as_bytes()
        }
    }

    /// What a from-scratch scan of the whole buffer produces
    fn recompute(graph: &RuleGraph, text: &Text) -> Vec<Vec<ColorId>> {
        let mut state = graph.start();
        let mut out = Vec::new();
        for i in 0..text.line_count() {
            let mut colors = Vec::new();
            state = scan_line(
                graph,
                state,
                text.lines[i].as_bytes(),
                i + 1 == text.line_count(),
                &mut colors,
            );
            out.push(colors);
        }
        out
    }

    fn assert_matches_recompute(cache: &mut HighlightCache, text: &Text) {
        let expected = recompute(cache.graph().as_ref(), text);
        for (i, want) in expected.iter().enumerate() {
            let (got, _) = cache.line_colors(text, i);
            assert_eq!(&got, want, "line {} colors diverge from full recompute", i);
        }
    }

    #[test]
    fn test_new_cache_is_lazy() {
        let cache = HighlightCache::new(string_graph());
        assert_eq!(cache.cached_lines(), 1);
        assert_eq!(cache.first_hole(), 1);
    }

    #[test]
    fn test_grows_on_demand() {
        let text = Text::new(&["a", "b", "c", "d"]);
        let mut cache = HighlightCache::new(string_graph());
        cache.ensure_valid_through(&text, 2);
        assert_eq!(cache.cached_lines(), 3);
        assert_eq!(cache.first_hole(), 3);
    }

    #[test]
    fn test_single_line_edit_changes_only_that_line() {
        let text = Text::new(&["he said hi", "next line"]);
        let mut cache = HighlightCache::new(string_graph());
        let (before, _) = cache.line_colors(&text, 0);
        let (next_before, _) = cache.line_colors(&text, 1);

        // balanced quotes: the line still ends back in the start state
        let text = Text::new(&["he said \"hi\"", "next line"]);
        cache.on_line_modified(0);
        let (after, next_changed) = cache.line_colors(&text, 0);
        assert_ne!(before, after);
        assert!(!next_changed);
        let (next_after, _) = cache.line_colors(&text, 1);
        assert_eq!(next_before, next_after);
    }

    #[test]
    fn test_unbalanced_edit_propagates_to_next_line() {
        let text = Text::new(&["plain", "more"]);
        let mut cache = HighlightCache::new(string_graph());
        cache.line_colors(&text, 0);
        cache.line_colors(&text, 1);

        let text = Text::new(&["\"plain", "more"]);
        cache.on_line_modified(0);
        let (_, next_changed) = cache.line_colors(&text, 0);
        assert!(next_changed);
        // line 1 is now inside the string
        let (colors, _) = cache.line_colors(&text, 1);
        let plain = cache.graph().plain();
        assert!(colors.iter().all(|&c| c != plain));
    }

    #[test]
    fn test_insert_marks_hole_after_edit() {
        let lines: Vec<String> = (0..10).map(|i| format!("line {}", i)).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let text = Text::new(&refs);
        let mut cache = HighlightCache::new(string_graph());
        cache.ensure_valid_through(&text, 9);
        assert_eq!(cache.cached_lines(), 10);

        // three blank lines spliced in at index 5
        cache.on_lines_inserted(5, 3);
        assert_eq!(cache.first_hole(), 6);
        assert_eq!(cache.cached_lines(), 13);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_fill_past_buffer_end_is_fatal() {
        let text = Text::new(&["one", "two"]);
        let mut cache = HighlightCache::new(string_graph());
        cache.ensure_valid_through(&text, 20);
    }

    #[test]
    fn test_delete_reuse_closes_hole_without_rescanning_tail() {
        let lines: Vec<String> = (0..11).map(|i| format!("line {}", i)).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let text = Text::new(&refs);
        let mut cache = HighlightCache::new(string_graph());
        cache.ensure_valid_through(&text, 10);
        text.take_reads();

        // drop lines 2..=4; every start state here is the start state,
        // so the recomputed state at the seam matches the stale entry
        let kept: Vec<&str> = refs[..2].iter().chain(refs[5..].iter()).copied().collect();
        let text = Text::new(&kept);
        cache.on_lines_deleted(2, 3);
        cache.ensure_valid_through(&text, 7);
        // only the seam line was rescanned
        assert_eq!(text.take_reads(), 1);
        assert_eq!(cache.first_hole(), cache.cached_lines());
    }

    #[test]
    fn test_insert_then_fill_reads_no_stale_entries() {
        // line 1 opens a string that line 4 closes; inserting plain
        // lines inside the string must repaint the shifted suffix
        let text = Text::new(&["top", "\"open", "in str", "in str", "close\"", "tail"]);
        let mut cache = HighlightCache::new(string_graph());
        for i in 0..6 {
            cache.line_colors(&text, i);
        }

        let text = Text::new(&["top", "\"open", "NEW", "in str", "in str", "close\"", "tail"]);
        cache.on_lines_inserted(2, 1);
        assert_matches_recompute(&mut cache, &text);
    }

    #[test]
    fn test_delete_shifts_suffix_correctly() {
        let text = Text::new(&["a", "\"open", "close\"", "b", "c", "d"]);
        let mut cache = HighlightCache::new(string_graph());
        for i in 0..6 {
            cache.line_colors(&text, i);
        }

        // deleting the line that closed the string drags the string
        // state over the suffix
        let text = Text::new(&["a", "\"open", "b", "c", "d"]);
        cache.on_lines_deleted(2, 1);
        assert_matches_recompute(&mut cache, &text);
    }

    #[test]
    fn test_edit_sequence_matches_recompute() {
        let text = Text::new(&["fn main() {", "    \"s\";", "}"]);
        let mut cache = HighlightCache::new(string_graph());
        assert_matches_recompute(&mut cache, &text);

        // append two lines at the end
        let text = Text::new(&["fn main() {", "    \"s\";", "}", "// x", "y"]);
        cache.on_lines_inserted(2, 2);
        assert_matches_recompute(&mut cache, &text);

        // edit the middle line in place
        let text = Text::new(&["fn main() {", "    \"unterminated;", "}", "// x", "y"]);
        cache.on_line_modified(1);
        assert_matches_recompute(&mut cache, &text);

        // delete the first two lines
        let text = Text::new(&["}", "// x", "y"]);
        cache.on_lines_deleted(0, 2);
        assert_matches_recompute(&mut cache, &text);
    }

    #[test]
    fn test_insert_at_cache_end_truncates() {
        let text = Text::new(&["a", "b", "c"]);
        let mut cache = HighlightCache::new(string_graph());
        cache.ensure_valid_through(&text, 2);

        // the invalidated range reaches the cache end: stale entries
        // are thrown away rather than shifted
        let text = Text::new(&["a", "b", "x", "y", "c"]);
        cache.on_lines_inserted(2, 2);
        assert!(cache.cached_lines() <= 3);
        assert_matches_recompute(&mut cache, &text);
    }

    #[test]
    fn test_delete_everything_keeps_slot_zero() {
        let text = Text::new(&["a", "b", "c", "d"]);
        let mut cache = HighlightCache::new(string_graph());
        cache.ensure_valid_through(&text, 3);

        let text = Text::new(&["a"]);
        cache.on_lines_deleted(0, 3);
        assert!(cache.cached_lines() >= 1);
        assert_eq!(cache.first_hole().min(1), 1);
        assert_matches_recompute(&mut cache, &text);
    }

    #[test]
    fn test_reuse_soundness_after_neutral_edit() {
        let text = Text::new(&["aaa", "\"bbb\"", "ccc", "ddd"]);
        let mut cache = HighlightCache::new(string_graph());
        let mut before = Vec::new();
        for i in 0..4 {
            before.push(cache.line_colors(&text, i).0);
        }

        // the edited line still ends in the start state, so the
        // following lines must render byte-identically
        let text = Text::new(&["aaa", "\"zz\" q", "ccc", "ddd"]);
        cache.on_line_modified(1);
        let (_, next_changed) = cache.line_colors(&text, 1);
        assert!(!next_changed);
        for i in 2..4 {
            let (colors, _) = cache.line_colors(&text, i);
            assert_eq!(colors, before[i], "line {} changed after neutral edit", i);
        }
    }
}
