//! Input handling - key reading and translation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key modifier flags, packed into the high bits of a key code
pub mod key_flags {
    pub const CONTROL: u32 = 0x1000_0000;
    pub const META: u32 = 0x2000_0000;
    pub const CTLX: u32 = 0x4000_0000;
    pub const SPEC: u32 = 0x8000_0000;
}

/// Codes for non-character keys (arrow keys, paging, etc.)
pub mod special {
    pub const UP: u32 = 0x01;
    pub const DOWN: u32 = 0x02;
    pub const LEFT: u32 = 0x03;
    pub const RIGHT: u32 = 0x04;
    pub const HOME: u32 = 0x05;
    pub const END: u32 = 0x06;
    pub const PAGE_UP: u32 = 0x07;
    pub const PAGE_DOWN: u32 = 0x08;
    pub const DELETE: u32 = 0x09;
}

/// A key input with modifiers encoded in one code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(pub u32);

impl Key {
    /// Plain character key
    pub fn char(ch: char) -> Self {
        Key(ch as u32)
    }

    /// Control key (C-x)
    pub fn ctrl(ch: char) -> Self {
        Key(key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// Meta key (M-x or ESC x)
    pub fn meta(ch: char) -> Self {
        Key(key_flags::META | ch.to_ascii_lowercase() as u32)
    }

    /// C-x prefixed key (C-x x)
    pub fn ctlx(ch: char) -> Self {
        Key(key_flags::CTLX | ch.to_ascii_lowercase() as u32)
    }

    /// C-x C-x prefixed key (C-x C-x)
    pub fn ctlx_ctrl(ch: char) -> Self {
        Key(key_flags::CTLX | key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// Special (non-character) key
    pub fn special(code: u32) -> Self {
        Key(key_flags::SPEC | code)
    }

    pub fn code(&self) -> u32 {
        self.0
    }

    /// The base character, without modifier flags
    pub fn base_char(&self) -> Option<char> {
        char::from_u32(self.0 & 0x00FF_FFFF)
    }

    /// Whether this key inserts itself into the buffer
    pub fn is_self_insert(&self) -> bool {
        if self.0 & 0xF000_0000 != 0 {
            return false;
        }
        match char::from_u32(self.0) {
            Some(ch) => ch >= ' ' && ch != '\x7f',
            None => false,
        }
    }

    /// Human-readable name (e.g., "C-f", "M-x", "C-x C-s")
    pub fn display_name(&self) -> String {
        let mut result = String::new();
        if self.0 & key_flags::CTLX != 0 {
            result.push_str("C-x ");
        }
        if self.0 & key_flags::META != 0 {
            result.push_str("M-");
        }
        if self.0 & key_flags::CONTROL != 0 {
            result.push_str("C-");
        }
        if self.0 & key_flags::SPEC != 0 {
            let name = match self.0 & 0xFF {
                special::UP => "Up",
                special::DOWN => "Down",
                special::LEFT => "Left",
                special::RIGHT => "Right",
                special::HOME => "Home",
                special::END => "End",
                special::PAGE_UP => "PageUp",
                special::PAGE_DOWN => "PageDown",
                special::DELETE => "Delete",
                _ => "?",
            };
            result.push_str(name);
            return result;
        }
        match self.0 & 0x00FF_FFFF {
            0x7f => result.push_str("Backspace"),
            0x20 => result.push_str("SPC"),
            base => match char::from_u32(base) {
                Some(ch) => result.push(ch),
                None => result.push('?'),
            },
        }
        result
    }
}

/// Input state for multi-key sequences (ESC- and C-x-prefixed)
#[derive(Default)]
pub struct InputState {
    ctlx_pending: bool,
    meta_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.ctlx_pending = false;
        self.meta_pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.ctlx_pending || self.meta_pending
    }

    pub fn is_ctlx_pending(&self) -> bool {
        self.ctlx_pending
    }

    /// Translate a crossterm event to a key, or None while a prefix
    /// sequence is still incomplete
    pub fn translate_key(&mut self, event: KeyEvent) -> Option<Key> {
        let KeyEvent {
            code, modifiers, kind, ..
        } = event;

        // ignore release/repeat events (Windows reports all kinds)
        if kind != KeyEventKind::Press {
            return None;
        }

        if self.meta_pending {
            self.meta_pending = false;
            return translate(code, modifiers).map(|k| Key(k.0 | key_flags::META));
        }

        if self.ctlx_pending {
            self.ctlx_pending = false;
            return translate(code, modifiers).map(|k| Key(k.0 | key_flags::CTLX));
        }

        if code == KeyCode::Esc {
            self.meta_pending = true;
            return None;
        }
        if code == KeyCode::Char('x') && modifiers.contains(KeyModifiers::CONTROL) {
            self.ctlx_pending = true;
            return None;
        }

        translate(code, modifiers)
    }
}

/// Translate a single (non-prefix) key event
fn translate(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    match code {
        KeyCode::Char(ch) => {
            let mut key = if ctrl { Key::ctrl(ch) } else { Key::char(ch) };
            if alt {
                key = Key(key.0 | key_flags::META);
            }
            Some(key)
        }
        KeyCode::Enter => Some(Key::ctrl('m')),
        KeyCode::Tab => Some(Key::ctrl('i')),
        KeyCode::Backspace => Some(Key(0x7f)),
        KeyCode::Delete => Some(Key::special(special::DELETE)),
        KeyCode::Home => Some(Key::special(special::HOME)),
        KeyCode::End => Some(Key::special(special::END)),
        KeyCode::PageUp => Some(Key::special(special::PAGE_UP)),
        KeyCode::PageDown => Some(Key::special(special::PAGE_DOWN)),
        KeyCode::Up => Some(Key::special(special::UP)),
        KeyCode::Down => Some(Key::special(special::DOWN)),
        KeyCode::Left => Some(Key::special(special::LEFT)),
        KeyCode::Right => Some(Key::special(special::RIGHT)),
        KeyCode::Esc => Some(Key::ctrl('[')),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_and_ctrl_chars() {
        let mut input = InputState::new();
        assert_eq!(
            input.translate_key(press(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(Key::char('a'))
        );
        assert_eq!(
            input.translate_key(press(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            Some(Key::ctrl('f'))
        );
    }

    #[test]
    fn test_ctlx_sequence() {
        let mut input = InputState::new();
        assert_eq!(
            input.translate_key(press(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
        assert!(input.is_ctlx_pending());
        assert_eq!(
            input.translate_key(press(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Key::ctlx_ctrl('s'))
        );
        assert!(!input.is_pending());
    }

    #[test]
    fn test_esc_meta_sequence() {
        let mut input = InputState::new();
        assert_eq!(input.translate_key(press(KeyCode::Esc, KeyModifiers::NONE)), None);
        assert!(input.is_pending());
        assert_eq!(
            input.translate_key(press(KeyCode::Char('v'), KeyModifiers::NONE)),
            Some(Key::meta('v'))
        );
    }

    #[test]
    fn test_self_insert() {
        assert!(Key::char('a').is_self_insert());
        assert!(Key::char(' ').is_self_insert());
        assert!(!Key::ctrl('a').is_self_insert());
        assert!(!Key(0x7f).is_self_insert());
        assert!(!Key::special(special::UP).is_self_insert());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Key::ctrl('f').display_name(), "C-f");
        assert_eq!(Key::ctlx_ctrl('s').display_name(), "C-x C-s");
        assert_eq!(Key::meta('v').display_name(), "M-v");
        assert_eq!(Key::special(special::UP).display_name(), "Up");
        assert_eq!(Key(0x7f).display_name(), "Backspace");
    }
}
