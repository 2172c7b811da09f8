use crate::buffer::TextBuffer;
use crate::mode::Mode;

/// A (line, column) position in the buffer. Columns are byte offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct CursorPosition {
    pub line: usize,
    pub col: usize,
}

impl CursorPosition {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Clamp this position to the buffer extent and the column rule of `mode`.
    ///
    /// An empty buffer only admits the origin.
    pub fn clamped(self, buffer: &TextBuffer, mode: Mode) -> Self {
        if buffer.is_empty() {
            return Self::default();
        }
        let line = self.line.min(buffer.num_lines() - 1);
        let col = self.col.min(last_valid_col(buffer, line, mode));
        Self { line, col }
    }
}

/// The rightmost column the cursor may occupy on `line`.
///
/// Insert mode may sit one past the last character (an append point);
/// Normal mode must rest on a character. An empty line always allows 0.
pub fn last_valid_col(buffer: &TextBuffer, line: usize, mode: Mode) -> usize {
    let len = buffer.line_length(line);
    if len == 0 {
        return 0;
    }
    match mode {
        Mode::Insert => len,
        Mode::Normal | Mode::Command => len - 1,
    }
}
