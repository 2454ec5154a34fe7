//! Line scanner
//!
//! Runs a compiled rule graph over one line of raw bytes, producing a
//! color for every byte and the state the next line starts in. The scan
//! is a pure function of `(start state, line bytes)`; the highlight
//! cache depends on that to reuse results across edits.
//!
//! Positions are raw byte offsets. Multi-byte UTF-8 sequences are
//! scanned byte by byte; whether they are classified sensibly is up to
//! the byte classes of the graph. Every line except the buffer's final
//! one is scanned with its terminating newline present, so end-of-line
//! constructs (line comments, unterminated strings) transition on the
//! `\n` byte like on any other.

use super::graph::{ColorId, Condition, RuleGraph, StateId};

/// Scan one line starting in `start`, filling `colors` with one entry
/// per scanned byte (including the implied newline when `is_final_line`
/// is false) and returning the end state.
pub fn scan_line(
    graph: &RuleGraph,
    start: StateId,
    line: &[u8],
    is_final_line: bool,
    colors: &mut Vec<ColorId>,
) -> StateId {
    let len = line.len() + usize::from(!is_final_line);
    colors.clear();
    colors.resize(len, graph.plain());

    // byte accessor covering the implied trailing newline
    let at = |idx: usize| -> u8 {
        if idx < line.len() {
            line[idx]
        } else {
            b'\n'
        }
    };

    let mut state = start;
    let mut i = 0usize;
    // start of the pending span, if one is open
    let mut span_start: Option<usize> = None;
    // consecutive steps that did not advance `i`; a pure-transition
    // chain longer than the state count must revisit a state, which is
    // a defect in the rule graph
    let mut stalled = 0usize;
    let stall_cap = graph.state_count() + 2;

    'scan: while i < len {
        assert!(
            stalled <= stall_cap,
            "non-consuming cycle in syntax '{}' at state '{}'",
            graph.name(),
            graph.state(state).name()
        );
        let ch = at(i);
        let st = graph.state(state);

        for cond in &st.conditions {
            match cond {
                Condition::ByteClassConsume { class, action } => {
                    if class.contains(ch) {
                        if span_start.is_none() {
                            span_start = Some(i);
                        }
                        if let Some(c) = action.color {
                            colors[i] = c;
                        }
                        i += 1;
                        stalled = 0;
                        state = action.dest;
                        continue 'scan;
                    }
                }
                Condition::ByteClass { class, action } => {
                    if class.contains(ch) {
                        if let Some(c) = action.color {
                            colors[i] = c;
                        }
                        i += 1;
                        stalled = 0;
                        span_start = None;
                        state = action.dest;
                        continue 'scan;
                    }
                }
                Condition::BufferExact { word, icase, action } => {
                    if let Some(s) = span_start {
                        let span = &line[s..i];
                        let hit = word.len() == span.len()
                            && if *icase {
                                word.eq_ignore_ascii_case(span)
                            } else {
                                **word == *span
                            };
                        if hit {
                            if let Some(c) = action.color {
                                colors[s..i].fill(c);
                            }
                            stalled += 1;
                            span_start = None;
                            state = action.dest;
                            continue 'scan;
                        }
                    }
                }
                Condition::InListLinear { list, action } | Condition::InListHashed { list, action } => {
                    if let Some(s) = span_start {
                        if graph.list(*list).contains(&line[s..i]) {
                            if let Some(c) = action.color {
                                colors[s..i].fill(c);
                            }
                            stalled += 1;
                            span_start = None;
                            state = action.dest;
                            continue 'scan;
                        }
                    }
                }
                Condition::Literal { text, action } => {
                    let end = i + text.len();
                    if end <= len && text.iter().enumerate().all(|(k, &b)| at(i + k) == b) {
                        if let Some(c) = action.color {
                            colors[i..end].fill(c);
                        }
                        i = end;
                        stalled = 0;
                        span_start = None;
                        state = action.dest;
                        continue 'scan;
                    }
                }
                Condition::LiteralIgnoreCase { text, action } => {
                    let end = i + text.len();
                    if end <= len
                        && text
                            .iter()
                            .enumerate()
                            .all(|(k, &b)| at(i + k).eq_ignore_ascii_case(&b))
                    {
                        if let Some(c) = action.color {
                            colors[i..end].fill(c);
                        }
                        i = end;
                        stalled = 0;
                        span_start = None;
                        state = action.dest;
                        continue 'scan;
                    }
                }
                Condition::LiteralPair { pair, action } => {
                    if ch == pair[0] && i + 1 < len && at(i + 1) == pair[1] {
                        if let Some(c) = action.color {
                            colors[i] = c;
                            colors[i + 1] = c;
                        }
                        i += 2;
                        stalled = 0;
                        span_start = None;
                        state = action.dest;
                        continue 'scan;
                    }
                }
                Condition::RecolorTail { count, color } => {
                    // fires in place and falls through to the next condition
                    let from = i.saturating_sub(*count);
                    colors[from..i].fill(*color);
                }
                Condition::RecolorPendingSpan { color } => {
                    if let Some(s) = span_start.take() {
                        colors[s..i].fill(*color);
                    }
                }
            }
        }

        // no condition matched: the state's default action
        let action = st.default_action;
        if st.eats_byte {
            if let Some(c) = action.color {
                colors[i] = c;
            }
            i += 1;
            stalled = 0;
        } else {
            stalled += 1;
        }
        span_start = None;
        state = action.dest;
    }

    state
}
