use crate::buffer::TextBuffer;
use crate::cursor::CursorPosition;
use crate::key::Key;
use crate::mode::{CommandLine, Mode};
use crate::viewport::{ScreenPoint, ScreenSize, Viewport};

/// Source of keystrokes. Blocks until a key is available.
pub trait Keyboard {
    fn next_key(&mut self) -> anyhow::Result<Key>;
}

/// Something that can show the editor.
pub trait Display {
    /// Current size of the text area, excluding gutter and status line.
    fn text_area(&mut self) -> anyhow::Result<ScreenSize>;

    fn draw(&mut self, view: &EditorView<'_>) -> anyhow::Result<()>;
}

/// A read-only snapshot of everything a display needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct EditorView<'a> {
    pub buffer: &'a TextBuffer,
    pub viewport: &'a Viewport,
    pub cursor: CursorPosition,
    pub mode: Mode,
    pub command_line: Option<&'a CommandLine>,
    pub message: Option<&'a str>,
    pub pending_count: Option<usize>,
    pub size: ScreenSize,
}

impl EditorView<'_> {
    /// Cursor cell inside the text area.
    pub fn screen_cursor(&self) -> ScreenPoint {
        self.viewport
            .screen_position(self.buffer, self.cursor, self.size)
    }

    /// The lines visible in the text area, with the row each one starts on.
    ///
    /// Wrapped lines may run past the bottom; the display clips them.
    pub fn visible_lines(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let height = self.size.height;
        (self.viewport.top_line..self.buffer.num_lines())
            .scan(0usize, move |row, line| {
                if *row >= height {
                    return None;
                }
                let start = *row;
                *row += self.viewport.line_height(self.buffer.line(line), self.size);
                Some((line, start))
            })
    }
}

/// Render a byte line for the terminal. Non-printable bytes show as `?`.
pub fn printable_text(line: &[u8]) -> String {
    line.iter()
        .map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '?'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_text() {
        assert_eq!(printable_text(b"a\tb\x7f~"), "a?b?~");
    }

    #[test]
    fn test_visible_lines_stop_at_height() {
        let buffer = TextBuffer::from_lines(["a".repeat(15), "b".into(), "c".into(), "d".into()]);
        let viewport = Viewport::new(true, 20);
        let view = EditorView {
            buffer: &buffer,
            viewport: &viewport,
            cursor: CursorPosition::default(),
            mode: Mode::Normal,
            command_line: None,
            message: None,
            pending_count: None,
            size: ScreenSize {
                width: 10,
                height: 3,
            },
        };
        let rows: Vec<_> = view.visible_lines().collect();
        assert_eq!(rows, vec![(0, 0), (1, 2)]);
    }
}
