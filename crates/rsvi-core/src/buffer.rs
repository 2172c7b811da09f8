use std::io;
use std::path::Path;

use crate::cursor::CursorPosition;
use crate::fs::Filesystem;
use crate::register::Register;

/// One line of text, without its trailing newline.
pub type Line = Vec<u8>;

/// An ordered sequence of byte lines.
///
/// The buffer may hold zero lines, which is different from holding a single
/// empty line. Operations that create content (`insert`, `insert_line`,
/// `break_line`, `put_from`) materialize the first line on demand, but only
/// when called at the origin; anything else against an empty buffer is a
/// caller bug and panics.
///
/// Columns are byte offsets. Callers are responsible for passing positions
/// that exist; the buffer asserts rather than clamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<Line>,
}

impl TextBuffer {
    /// Create an empty (zero-line) buffer.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Create a buffer from a list of lines.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Line>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// The full text joined with newlines, decoded lossily.
    pub fn text(&self) -> String {
        let joined = self.lines.join(&b'\n');
        String::from_utf8_lossy(&joined).into_owned()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Length in bytes of line `idx`. An empty buffer reports 0 for any index.
    pub fn line_length(&self, idx: usize) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.lines[idx].len()
    }

    pub fn line(&self, idx: usize) -> &[u8] {
        &self.lines[idx]
    }

    fn materialize_at_origin(&mut self, line: usize, col: usize) {
        if self.is_empty() {
            assert!(
                line == 0 && col == 0,
                "edit at ({line}, {col}) on an empty buffer"
            );
            self.lines.push(Line::new());
        }
    }

    // ── Character edits ──────────────────────────────────────────────

    /// Remove `count` bytes starting at `pos`.
    pub fn erase(&mut self, pos: CursorPosition, count: usize) {
        assert!(count > 0, "erase of zero characters");
        let line = &mut self.lines[pos.line];
        assert!(
            pos.col + count <= line.len(),
            "erase of {count} at column {} overruns line of {}",
            pos.col,
            line.len()
        );
        line.drain(pos.col..pos.col + count);
    }

    /// Insert `ch` repeated `count` times at `pos`.
    pub fn insert(&mut self, pos: CursorPosition, ch: u8, count: usize) {
        assert!(count > 0, "insert of zero characters");
        self.materialize_at_origin(pos.line, pos.col);
        let line = &mut self.lines[pos.line];
        line.splice(pos.col..pos.col, std::iter::repeat_n(ch, count));
    }

    // ── Line edits ───────────────────────────────────────────────────

    /// Insert an empty line right after `line`.
    pub fn insert_line(&mut self, line: usize) {
        self.materialize_at_origin(line, 0);
        self.lines.insert(line + 1, Line::new());
    }

    /// Split the line at `pos`; the tail (possibly empty) becomes the next line.
    pub fn break_line(&mut self, pos: CursorPosition) {
        self.materialize_at_origin(pos.line, pos.col);
        let tail = self.lines[pos.line].split_off(pos.col);
        self.lines.insert(pos.line + 1, tail);
    }

    /// Concatenate `count` consecutive lines starting at `line` into one.
    pub fn join_lines(&mut self, line: usize, count: usize) {
        if count <= 1 {
            return;
        }
        let joined: Line = self.lines.drain(line + 1..line + count).flatten().collect();
        self.lines[line].extend(joined);
    }

    /// Remove up to `count` lines starting at `line`.
    pub fn delete_lines(&mut self, line: usize, count: usize) {
        if count < 1 {
            return;
        }
        let count = count.min(self.num_lines().saturating_sub(line));
        self.lines.drain(line..line + count);
    }

    // ── Register transfer ────────────────────────────────────────────

    /// Copy up to `count` lines starting at `line` into `register`,
    /// replacing whatever it held. Returns the number of lines copied.
    pub fn yank_to(&self, register: &mut Register, line: usize, count: usize) -> usize {
        let count = count.min(self.num_lines().saturating_sub(line));
        register.replace(self.lines[line..line + count].to_vec());
        count
    }

    /// Insert the register's lines right after `line`.
    pub fn put_from(&mut self, register: &Register, line: usize) {
        self.materialize_at_origin(line, 0);
        self.splice_lines(line + 1, register.lines().iter().cloned());
    }

    /// Insert the register's lines right before `line`.
    ///
    /// On an empty buffer the register simply becomes the content.
    pub fn put_before(&mut self, register: &Register, line: usize) {
        if self.is_empty() {
            assert!(line == 0, "put before line {line} on an empty buffer");
        }
        self.splice_lines(line, register.lines().iter().cloned());
    }

    fn splice_lines<I: IntoIterator<Item = Line>>(&mut self, at: usize, lines: I) {
        self.lines.splice(at..at, lines);
    }

    // ── File I/O ─────────────────────────────────────────────────────

    /// Replace the whole content with the lines of `path`.
    pub fn read(&mut self, fs: &dyn Filesystem, path: &Path) -> io::Result<()> {
        self.lines = fs.read_lines(path)?;
        Ok(())
    }

    /// Insert the lines of `path` after `line`, keeping existing content.
    /// An empty buffer receives them at the top. Returns the number of lines read.
    pub fn read_after(&mut self, fs: &dyn Filesystem, path: &Path, line: usize) -> io::Result<usize> {
        let incoming = fs.read_lines(path)?;
        let count = incoming.len();
        let at = if self.is_empty() { 0 } else { line + 1 };
        self.splice_lines(at, incoming);
        Ok(count)
    }

    /// Write every line to `path`, one per record.
    pub fn write(&self, fs: &dyn Filesystem, path: &Path) -> io::Result<()> {
        fs.write_lines(path, &self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, col: usize) -> CursorPosition {
        CursorPosition { line, col }
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.num_lines(), 0);
        assert_eq!(buf.line_length(0), 0);
    }

    #[test]
    fn test_empty_differs_from_one_empty_line() {
        let empty = TextBuffer::new();
        let one = TextBuffer::from_lines([""]);
        assert_ne!(empty, one);
        assert_eq!(one.num_lines(), 1);
        assert!(!one.is_empty());
    }

    #[test]
    fn test_erase() {
        let mut buf = TextBuffer::from_lines(["hello"]);
        buf.erase(pos(0, 1), 3);
        assert_eq!(buf.line(0), b"ho");
    }

    #[test]
    #[should_panic]
    fn test_erase_past_end_panics() {
        let mut buf = TextBuffer::from_lines(["abc"]);
        buf.erase(pos(0, 2), 2);
    }

    #[test]
    fn test_insert_repeated() {
        let mut buf = TextBuffer::from_lines(["ad"]);
        buf.insert(pos(0, 1), b'x', 3);
        assert_eq!(buf.line(0), b"axxxd");
    }

    #[test]
    fn test_insert_into_empty_buffer_creates_line() {
        let mut buf = TextBuffer::new();
        buf.insert(pos(0, 0), b'a', 1);
        assert_eq!(buf.num_lines(), 1);
        assert_eq!(buf.line(0), b"a");
    }

    #[test]
    #[should_panic]
    fn test_insert_off_origin_on_empty_buffer_panics() {
        let mut buf = TextBuffer::new();
        buf.insert(pos(0, 1), b'a', 1);
    }

    #[test]
    fn test_insert_line() {
        let mut buf = TextBuffer::from_lines(["a", "b"]);
        buf.insert_line(0);
        assert_eq!(buf.text(), "a\n\nb");

        let mut empty = TextBuffer::new();
        empty.insert_line(0);
        assert_eq!(empty.num_lines(), 2);
    }

    #[test]
    fn test_break_line_middle() {
        let mut buf = TextBuffer::from_lines(["hello world"]);
        buf.break_line(pos(0, 5));
        assert_eq!(buf.line(0), b"hello");
        assert_eq!(buf.line(1), b" world");
    }

    #[test]
    fn test_break_line_at_end() {
        let mut buf = TextBuffer::from_lines(["abc", "def"]);
        buf.break_line(pos(0, 3));
        assert_eq!(buf.text(), "abc\n\ndef");
    }

    #[test]
    fn test_break_then_join_restores_line() {
        let original = "the quick brown fox";
        for col in 0..=original.len() {
            let mut buf = TextBuffer::from_lines(["before", original, "after"]);
            buf.break_line(pos(1, col));
            buf.join_lines(1, 2);
            assert_eq!(buf.line(1), original.as_bytes(), "split at {col}");
            assert_eq!(buf.num_lines(), 3);
        }
    }

    #[test]
    fn test_join_lines() {
        let mut buf = TextBuffer::from_lines(["a", "b", "c", "d"]);
        buf.join_lines(1, 3);
        assert_eq!(buf.text(), "a\nbcd");
        buf.join_lines(0, 1);
        assert_eq!(buf.text(), "a\nbcd");
    }

    #[test]
    fn test_delete_lines_clamped() {
        let mut buf = TextBuffer::from_lines(["a", "b", "c"]);
        buf.delete_lines(1, 10);
        assert_eq!(buf.text(), "a");
        buf.delete_lines(0, 0);
        assert_eq!(buf.num_lines(), 1);
        buf.delete_lines(0, 1);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_yank_replaces_register() {
        let buf = TextBuffer::from_lines(["a", "b", "c"]);
        let mut reg = Register::new();
        assert_eq!(buf.yank_to(&mut reg, 0, 2), 2);
        assert_eq!(reg.lines(), &[b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(buf.yank_to(&mut reg, 2, 5), 1);
        assert_eq!(reg.lines(), &[b"c".to_vec()]);
    }

    #[test]
    fn test_yank_then_put_adds_lines_in_order() {
        let mut buf = TextBuffer::from_lines(["one", "two", "three", "four"]);
        let mut reg = Register::new();
        let n = buf.yank_to(&mut reg, 1, 2);
        buf.put_from(&reg, 1);
        assert_eq!(buf.num_lines(), 4 + n);
        assert_eq!(buf.text(), "one\ntwo\ntwo\nthree\nthree\nfour");
    }

    #[test]
    fn test_put_before() {
        let mut buf = TextBuffer::from_lines(["x", "y"]);
        let mut reg = Register::new();
        buf.yank_to(&mut reg, 1, 1);
        buf.put_before(&reg, 0);
        assert_eq!(buf.text(), "y\nx\ny");
    }

    #[test]
    fn test_put_into_empty_buffer() {
        let reg = Register::from_lines(vec![b"z".to_vec()]);
        let mut after = TextBuffer::new();
        after.put_from(&reg, 0);
        assert_eq!(after.text(), "\nz");

        let mut before = TextBuffer::new();
        before.put_before(&reg, 0);
        assert_eq!(before.text(), "z");
    }
}
