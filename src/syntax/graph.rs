//! Compiled syntax-highlighting rule graphs
//!
//! A [`RuleGraph`] is an immutable state machine: named states, each with
//! an ordered list of match conditions and one default action. Graphs are
//! built once with [`GraphBuilder`] and shared read-only between every
//! buffer using the same language. States and colors are referred to by
//! small copyable handles into the graph's tables; handle equality is
//! state identity.

use std::collections::HashMap;

use super::style::Style;

/// Number of buckets in a hashed word list
const HASH_BUCKETS: usize = 64;

/// Word lists at or above this size get the hashed representation
const HASH_THRESHOLD: usize = 8;

/// Handle to a state in a [`RuleGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateId(pub(crate) u32);

/// Opaque handle to a palette entry in a [`RuleGraph`]
///
/// The scanner and cache only store and compare these; the renderer
/// resolves them through [`RuleGraph::style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorId(pub(crate) u16);

/// Handle to a shared word list in a [`RuleGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListId(pub(crate) u16);

/// A 256-entry byte membership set
#[derive(Debug, Clone, Default)]
pub struct ByteSet {
    bits: [u64; 4],
}

impl ByteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set containing every byte of `bytes`
    pub fn of(bytes: &str) -> Self {
        let mut set = Self::new();
        for &b in bytes.as_bytes() {
            set.add(b);
        }
        set
    }

    pub fn add(&mut self, byte: u8) {
        self.bits[(byte >> 6) as usize] |= 1 << (byte & 63);
    }

    /// Add every byte in `lo..=hi`
    pub fn add_range(&mut self, lo: u8, hi: u8) {
        for b in lo..=hi {
            self.add(b);
        }
    }

    /// Builder: add a range and return self
    pub fn with_range(mut self, lo: u8, hi: u8) -> Self {
        self.add_range(lo, hi);
        self
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.bits[(byte >> 6) as usize] & (1 << (byte & 63)) != 0
    }
}

/// Hash for word-list bucketing; folds ASCII case so case-insensitive
/// lists hash consistently with their lookups
fn word_hash(word: &[u8]) -> u32 {
    word.iter().fold(0u32, |h, &b| {
        h.wrapping_mul(31).wrapping_add(b.to_ascii_lowercase() as u32)
    })
}

#[derive(Debug)]
enum ListRepr {
    Linear(Vec<Box<[u8]>>),
    Hashed(Vec<Vec<Box<[u8]>>>),
}

/// A set of words a pending span can be tested against
#[derive(Debug)]
pub struct StringList {
    icase: bool,
    repr: ListRepr,
}

impl StringList {
    fn new(words: &[&str], icase: bool) -> Self {
        let repr = if words.len() >= HASH_THRESHOLD {
            let mut buckets: Vec<Vec<Box<[u8]>>> = (0..HASH_BUCKETS).map(|_| Vec::new()).collect();
            for w in words {
                let bytes = w.as_bytes();
                buckets[word_hash(bytes) as usize % HASH_BUCKETS].push(bytes.into());
            }
            ListRepr::Hashed(buckets)
        } else {
            ListRepr::Linear(words.iter().map(|w| w.as_bytes().into()).collect())
        };
        Self { icase, repr }
    }

    /// Whether the list uses the hashed representation
    pub fn is_hashed(&self) -> bool {
        matches!(self.repr, ListRepr::Hashed(_))
    }

    /// Exact-length membership test for a span
    pub fn contains(&self, span: &[u8]) -> bool {
        match &self.repr {
            ListRepr::Linear(words) => words.iter().any(|w| self.word_eq(w, span)),
            ListRepr::Hashed(buckets) => buckets[word_hash(span) as usize % HASH_BUCKETS]
                .iter()
                .any(|w| self.word_eq(w, span)),
        }
    }

    fn word_eq(&self, word: &[u8], span: &[u8]) -> bool {
        if word.len() != span.len() {
            return false;
        }
        if self.icase {
            word.eq_ignore_ascii_case(span)
        } else {
            word == span
        }
    }
}

/// What happens when a condition matches: color for the consumed bytes
/// (`None` keeps whatever color they already have) and the next state
#[derive(Debug, Clone, Copy)]
pub struct Action {
    pub color: Option<ColorId>,
    pub dest: StateId,
}

/// A single match condition, tried in list order within its state
#[derive(Debug)]
pub enum Condition {
    /// Consume one byte from the class into the pending span
    ByteClassConsume { class: ByteSet, action: Action },
    /// Consume one byte from the class, dropping any pending span
    ByteClass { class: ByteSet, action: Action },
    /// Test the pending span against one fixed word
    BufferExact {
        word: Box<[u8]>,
        icase: bool,
        action: Action,
    },
    /// Test the pending span against a small word list
    InListLinear { list: ListId, action: Action },
    /// Test the pending span against a bucketed word list
    InListHashed { list: ListId, action: Action },
    /// Match a literal at the current position, consuming it whole
    Literal { text: Box<[u8]>, action: Action },
    /// Case-insensitive literal match
    LiteralIgnoreCase { text: Box<[u8]>, action: Action },
    /// Two-byte case-sensitive literal fast path
    LiteralPair { pair: [u8; 2], action: Action },
    /// Overwrite the color of the last `count` emitted bytes, clamped to
    /// the line start; falls through to the next condition
    RecolorTail { count: usize, color: ColorId },
    /// Overwrite the color of the pending span and clear it; falls
    /// through to the next condition
    RecolorPendingSpan { color: ColorId },
}

/// One node of the rule graph
#[derive(Debug)]
pub struct State {
    pub(crate) name: String,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) default_action: Action,
    /// Whether the default action consumes a byte; a non-consuming
    /// default is a pure state transition
    pub(crate) eats_byte: bool,
}

impl State {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An immutable, compiled syntax definition
#[derive(Debug)]
pub struct RuleGraph {
    name: String,
    states: Vec<State>,
    lists: Vec<StringList>,
    palette: Vec<Style>,
}

impl RuleGraph {
    /// Language name, as shown in the mode line
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The designated start state (the first one declared)
    pub fn start(&self) -> StateId {
        StateId(0)
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0 as usize]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn list(&self, id: ListId) -> &StringList {
        &self.lists[id.0 as usize]
    }

    /// The palette entry for unhighlighted text
    pub fn plain(&self) -> ColorId {
        ColorId(0)
    }

    /// Resolve a color handle to its terminal style
    pub fn style(&self, color: ColorId) -> Style {
        self.palette[color.0 as usize]
    }
}

struct DraftState {
    name: String,
    conditions: Vec<Condition>,
    default: Option<(Action, bool)>,
}

/// Builder producing immutable [`RuleGraph`]s
///
/// States are declared by name and may be referenced before they are
/// given conditions or a default action; `build` checks that every
/// state ended up complete. Misuse is a programming error in the
/// definition, not a runtime condition, so the builder asserts.
pub struct GraphBuilder {
    name: String,
    states: Vec<DraftState>,
    by_name: HashMap<String, StateId>,
    lists: Vec<StringList>,
    palette: Vec<Style>,
}

impl GraphBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            states: Vec::new(),
            by_name: HashMap::new(),
            lists: Vec::new(),
            // entry 0 is always "plain"
            palette: vec![Style::default()],
        }
    }

    /// Register a palette entry
    pub fn color(&mut self, style: Style) -> ColorId {
        assert!(self.palette.len() < u16::MAX as usize);
        self.palette.push(style);
        ColorId((self.palette.len() - 1) as u16)
    }

    /// The always-present plain palette entry
    pub fn plain(&self) -> ColorId {
        ColorId(0)
    }

    /// Declare or look up a state by name; the first state declared
    /// becomes the graph's start state
    pub fn state(&mut self, name: &str) -> StateId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        assert!(self.states.len() < u32::MAX as usize);
        let id = StateId(self.states.len() as u32);
        self.states.push(DraftState {
            name: name.to_string(),
            conditions: Vec::new(),
            default: None,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Register a shared word list; large lists are bucketed by hash
    pub fn words(&mut self, words: &[&str], icase: bool) -> ListId {
        assert!(self.lists.len() < u16::MAX as usize);
        self.lists.push(StringList::new(words, icase));
        ListId((self.lists.len() - 1) as u16)
    }

    fn draft(&mut self, state: StateId) -> &mut DraftState {
        &mut self.states[state.0 as usize]
    }

    /// Condition: consume one byte of `class` into the pending span
    pub fn accumulate(&mut self, state: StateId, class: ByteSet, color: Option<ColorId>, dest: StateId) {
        let action = Action { color, dest };
        self.draft(state)
            .conditions
            .push(Condition::ByteClassConsume { class, action });
    }

    /// Condition: consume one byte of `class`
    pub fn on_char(&mut self, state: StateId, class: ByteSet, color: Option<ColorId>, dest: StateId) {
        let action = Action { color, dest };
        self.draft(state).conditions.push(Condition::ByteClass { class, action });
    }

    /// Condition: the pending span equals `word`
    pub fn on_buffer(&mut self, state: StateId, word: &str, icase: bool, color: Option<ColorId>, dest: StateId) {
        assert!(!word.is_empty(), "empty buffer word in state machine {}", self.name);
        let action = Action { color, dest };
        self.draft(state).conditions.push(Condition::BufferExact {
            word: word.as_bytes().into(),
            icase,
            action,
        });
    }

    /// Condition: the pending span is in a registered word list
    pub fn on_words(&mut self, state: StateId, list: ListId, color: Option<ColorId>, dest: StateId) {
        let action = Action { color, dest };
        let cond = if self.lists[list.0 as usize].is_hashed() {
            Condition::InListHashed { list, action }
        } else {
            Condition::InListLinear { list, action }
        };
        self.draft(state).conditions.push(cond);
    }

    /// Condition: literal string at the current position
    pub fn on_str(&mut self, state: StateId, text: &str, color: Option<ColorId>, dest: StateId) {
        assert!(!text.is_empty(), "empty literal in state machine {}", self.name);
        let action = Action { color, dest };
        let bytes = text.as_bytes();
        let cond = if bytes.len() == 2 {
            Condition::LiteralPair {
                pair: [bytes[0], bytes[1]],
                action,
            }
        } else {
            Condition::Literal {
                text: bytes.into(),
                action,
            }
        };
        self.draft(state).conditions.push(cond);
    }

    /// Condition: case-insensitive literal at the current position
    pub fn on_str_icase(&mut self, state: StateId, text: &str, color: Option<ColorId>, dest: StateId) {
        assert!(!text.is_empty(), "empty literal in state machine {}", self.name);
        let action = Action { color, dest };
        self.draft(state).conditions.push(Condition::LiteralIgnoreCase {
            text: text.as_bytes().into(),
            action,
        });
    }

    /// Condition: recolor the last `count` emitted bytes
    pub fn recolor(&mut self, state: StateId, count: usize, color: ColorId) {
        self.draft(state).conditions.push(Condition::RecolorTail { count, color });
    }

    /// Condition: recolor the pending span and clear it
    pub fn recolor_span(&mut self, state: StateId, color: ColorId) {
        self.draft(state).conditions.push(Condition::RecolorPendingSpan { color });
    }

    /// Default action: consume one byte and transition
    pub fn eat(&mut self, state: StateId, color: Option<ColorId>, dest: StateId) {
        self.draft(state).default = Some((Action { color, dest }, true));
    }

    /// Default action: pure transition, no byte consumed
    pub fn noeat(&mut self, state: StateId, dest: StateId) {
        self.draft(state).default = Some((Action { color: None, dest }, false));
    }

    /// Finish the graph; panics if any declared state never got a
    /// default action
    pub fn build(self) -> RuleGraph {
        assert!(!self.states.is_empty(), "state machine {} has no states", self.name);
        let states = self
            .states
            .into_iter()
            .map(|draft| {
                let (default_action, eats_byte) = draft
                    .default
                    .unwrap_or_else(|| panic!("state {} has no default action", draft.name));
                State {
                    name: draft.name,
                    conditions: draft.conditions,
                    default_action,
                    eats_byte,
                }
            })
            .collect();
        RuleGraph {
            name: self.name,
            states,
            lists: self.lists,
            palette: self.palette,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::style::Color;

    #[test]
    fn test_byte_set() {
        let mut set = ByteSet::of("abc");
        set.add_range(b'0', b'9');
        assert!(set.contains(b'a'));
        assert!(set.contains(b'5'));
        assert!(!set.contains(b'd'));
        assert!(!set.contains(0));
        assert!(!set.contains(255));
    }

    #[test]
    fn test_byte_set_high_bytes() {
        let mut set = ByteSet::new();
        set.add_range(0x80, 0xff);
        assert!(set.contains(0x80));
        assert!(set.contains(0xff));
        assert!(!set.contains(0x7f));
    }

    #[test]
    fn test_linear_list() {
        let list = StringList::new(&["if", "else"], false);
        assert!(!list.is_hashed());
        assert!(list.contains(b"if"));
        assert!(!list.contains(b"IF"));
        assert!(!list.contains(b"i"));
        assert!(!list.contains(b"iff"));
    }

    #[test]
    fn test_hashed_list() {
        let words = ["fn", "let", "mut", "pub", "use", "mod", "impl", "trait", "enum"];
        let list = StringList::new(&words, false);
        assert!(list.is_hashed());
        for w in words {
            assert!(list.contains(w.as_bytes()));
        }
        assert!(!list.contains(b"letx"));
        assert!(!list.contains(b""));
    }

    #[test]
    fn test_icase_list() {
        let list = StringList::new(&["select", "from", "where", "order", "group", "having", "join", "union"], true);
        assert!(list.is_hashed());
        assert!(list.contains(b"SELECT"));
        assert!(list.contains(b"Select"));
        assert!(!list.contains(b"selects"));
    }

    #[test]
    fn test_builder_forward_reference() {
        let mut b = GraphBuilder::new("test");
        let start = b.state("start");
        let other = b.state("other");
        assert_eq!(b.state("start"), start);
        b.eat(start, None, other);
        b.eat(other, None, start);
        let graph = b.build();
        assert_eq!(graph.start(), start);
        assert_eq!(graph.state_count(), 2);
        assert_eq!(graph.state(start).name(), "start");
    }

    #[test]
    fn test_builder_palette() {
        let mut b = GraphBuilder::new("test");
        let start = b.state("start");
        let red = b.color(Style::fg(Color::Red));
        b.eat(start, Some(red), start);
        let graph = b.build();
        assert_eq!(graph.style(red), Style::fg(Color::Red));
        assert_eq!(graph.style(graph.plain()), Style::default());
        assert_ne!(red, graph.plain());
    }

    #[test]
    #[should_panic]
    fn test_builder_missing_default() {
        let mut b = GraphBuilder::new("test");
        b.state("start");
        b.build();
    }

    #[test]
    fn test_two_byte_literal_uses_fast_path() {
        let mut b = GraphBuilder::new("test");
        let start = b.state("start");
        b.on_str(start, "//", None, start);
        b.on_str(start, "/*!", None, start);
        b.eat(start, None, start);
        let graph = b.build();
        let conds = &graph.state(start).conditions;
        assert!(matches!(conds[0], Condition::LiteralPair { .. }));
        assert!(matches!(conds[1], Condition::Literal { .. }));
    }
}
