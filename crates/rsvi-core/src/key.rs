/// A single keystroke as delivered by the keyboard.
///
/// Printable input arrives as raw bytes; control chords and named keys
/// have their own variants so dispatch can match on them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A plain byte (letters, digits, punctuation, space).
    Char(u8),
    /// A `Ctrl-<letter>` chord, stored lowercase.
    Ctrl(u8),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// The key that unconditionally ends the main loop.
pub const INTERRUPT: Key = Key::Ctrl(b'c');

impl Key {
    /// The byte carried by a printable key, if any.
    ///
    /// Only `0x20..=0x7e` counts as printable; everything else is either a
    /// named key or a control byte the editor does not insert.
    pub fn printable(self) -> Option<u8> {
        match self {
            Key::Char(c) if (0x20..=0x7e).contains(&c) => Some(c),
            _ => None,
        }
    }

    /// The value of a decimal digit key.
    pub fn digit(self) -> Option<usize> {
        match self {
            Key::Char(c @ b'0'..=b'9') => Some((c - b'0') as usize),
            _ => None,
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        if c.is_ascii() {
            Key::Char(c as u8)
        } else {
            // Non-ASCII input is not representable as a single byte.
            Key::Char(0)
        }
    }
}
