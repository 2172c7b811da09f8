use crate::buffer::TextBuffer;
use crate::cursor::CursorPosition;

/// Size of the text area in screen cells (gutter and status line excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: usize,
    pub height: usize,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 76,
            height: 23,
        }
    }
}

/// A cell position relative to the top-left of the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub row: usize,
    pub col: usize,
}

/// Which part of the buffer is visible.
///
/// `top_line` is the first buffer line drawn. `left_col` is the first
/// column drawn when lines are not wrapped; with wrapping it stays 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub top_line: usize,
    pub left_col: usize,
    pub wrap: bool,
    scroll_step: usize,
}

impl Viewport {
    pub fn new(wrap: bool, scroll_step: usize) -> Self {
        assert!(scroll_step > 0, "horizontal scroll step must be positive");
        Self {
            top_line: 0,
            left_col: 0,
            wrap,
            scroll_step,
        }
    }

    /// Number of screen rows a line occupies.
    ///
    /// A wrapped line reserves room for the append position one past its
    /// last character.
    pub fn line_height(&self, line: &[u8], size: ScreenSize) -> usize {
        if !self.wrap {
            return 1;
        }
        (line.len() + 1) / size.width.max(1) + 1
    }

    /// Where the cursor lands on screen given the current scroll state.
    pub fn screen_position(
        &self,
        buffer: &TextBuffer,
        cursor: CursorPosition,
        size: ScreenSize,
    ) -> ScreenPoint {
        let mut row = (self.top_line..cursor.line)
            .map(|i| self.line_height(buffer.line(i), size))
            .sum::<usize>();
        let col = if self.wrap {
            let width = size.width.max(1);
            row += cursor.col / width;
            cursor.col % width
        } else {
            cursor.col.saturating_sub(self.left_col)
        };
        ScreenPoint { row, col }
    }

    /// Scroll so the cursor is visible.
    ///
    /// Vertically the view moves one line at a time and never starts below
    /// the cursor line. Horizontally (without wrapping) it moves in fixed
    /// steps of `scroll_step` columns.
    pub fn adjust(&mut self, buffer: &TextBuffer, cursor: CursorPosition, size: ScreenSize) {
        if self.top_line > cursor.line {
            self.top_line = cursor.line;
        }
        if size.width == 0 || size.height == 0 {
            log::debug!("skipping viewport adjust for degenerate size {size:?}");
            return;
        }
        while self.top_line < cursor.line
            && self.screen_position(buffer, cursor, size).row >= size.height
        {
            self.top_line += 1;
        }
        if self.wrap {
            self.left_col = 0;
            return;
        }
        while cursor.col >= self.left_col + size.width {
            self.left_col += self.scroll_step;
        }
        while self.left_col > cursor.col {
            self.left_col = self.left_col.saturating_sub(self.scroll_step);
        }
    }

    /// The last buffer line whose first row is on screen.
    pub fn bottom_line(&self, buffer: &TextBuffer, size: ScreenSize) -> usize {
        if buffer.is_empty() {
            return 0;
        }
        let mut last = self.top_line.min(buffer.num_lines() - 1);
        let mut row = 0;
        for i in self.top_line..buffer.num_lines() {
            if row >= size.height {
                break;
            }
            last = i;
            row += self.line_height(buffer.line(i), size);
        }
        last
    }
}
