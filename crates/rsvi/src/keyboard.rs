use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use rsvi_core::{Key, Keyboard};

/// Reads keys from the terminal via crossterm.
pub struct CrosstermKeyboard;

impl Keyboard for CrosstermKeyboard {
    fn next_key(&mut self) -> anyhow::Result<Key> {
        loop {
            // Resizes are picked up through Display::text_area before each key.
            if let Event::Key(ev) = event::read()? {
                if ev.kind == KeyEventKind::Release {
                    continue;
                }
                if let Some(key) = translate(ev) {
                    return Ok(key);
                }
                log::debug!("ignoring {:?}", ev.code);
            }
        }
    }
}

/// Map a crossterm key event onto the editor's key set.
pub fn translate(ev: KeyEvent) -> Option<Key> {
    let key = match ev.code {
        KeyCode::Char(c) if ev.modifiers.contains(KeyModifiers::CONTROL) => {
            if !c.is_ascii() {
                return None;
            }
            Key::Ctrl(c.to_ascii_lowercase() as u8)
        }
        KeyCode::Char(c) => Key::from(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(translate(ev(KeyCode::Char('x'))), Some(Key::Char(b'x')));
        assert_eq!(translate(ev(KeyCode::Char('P'))), Some(Key::Char(b'P')));
        assert_eq!(translate(ev(KeyCode::Esc)), Some(Key::Escape));
        assert_eq!(translate(ev(KeyCode::Backspace)), Some(Key::Backspace));
        assert_eq!(translate(ev(KeyCode::F(1))), None);
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate(ev), Some(rsvi_core::key::INTERRUPT));
        let ev = KeyEvent::new(KeyCode::Char('C'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(translate(ev), Some(rsvi_core::key::INTERRUPT));
    }

    #[test]
    fn test_non_ascii_is_not_printable() {
        let key = translate(ev(KeyCode::Char('é'))).unwrap();
        assert_eq!(key.printable(), None);
    }
}
