use crate::buffer::Line;

/// The single unnamed register holding the last yanked or cut lines.
///
/// Every yank overwrites the whole content; nothing is ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    lines: Vec<Line>,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn replace(&mut self, lines: Vec<Line>) {
        self.lines = lines;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_overwrites() {
        let mut reg = Register::from_lines(vec![b"a".to_vec(), b"b".to_vec()]);
        reg.replace(vec![b"c".to_vec()]);
        assert_eq!(reg.lines().len(), 1);
        assert_eq!(reg.lines()[0], b"c");
    }
}
