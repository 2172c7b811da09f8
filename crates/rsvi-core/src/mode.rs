use crate::key::Key;

// ── Modes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Motions and operators. Unmapped keys are ignored.
    #[default]
    Normal,
    /// Text entry. Unmapped printable keys are inserted at the cursor.
    Insert,
    /// Command-line entry (`:` commands or `/` search).
    Command,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
        }
    }
}

// ── Command line ─────────────────────────────────────────────────────

/// What the command line will do when submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// An ex command introduced by `:` (or `;`).
    Ex,
    /// A forward literal search introduced by `/`.
    Search,
}

impl CommandKind {
    pub fn prefix(&self) -> char {
        match self {
            Self::Ex => ':',
            Self::Search => '/',
        }
    }
}

/// The in-progress command line, including its prefix character.
///
/// The edit cursor is a byte index into `text` and never sits before the
/// prefix (index 1 is the leftmost editable position).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    kind: CommandKind,
    text: String,
    cursor: usize,
}

impl CommandLine {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            text: kind.prefix().to_string(),
            cursor: 1,
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Full text including the prefix.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text after the prefix.
    pub fn body(&self) -> &str {
        &self.text[1..]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert a printable byte at the edit cursor.
    pub fn insert(&mut self, ch: u8) {
        self.text.insert(self.cursor, ch as char);
        self.cursor += 1;
    }

    /// Delete the byte before the edit cursor.
    ///
    /// Returns `false` when the cursor is right after the prefix, meaning
    /// the caller should abandon the command line.
    pub fn backspace(&mut self) -> bool {
        if self.cursor <= 1 {
            return false;
        }
        self.cursor -= 1;
        self.text.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        if self.cursor > 1 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 1;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }
}

/// What a key does while the command line is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandLineKey {
    Abort,
    Execute,
    DeleteBack,
    Left,
    Right,
    Home,
    End,
    Insert(u8),
}

impl CommandLineKey {
    pub fn from_key(key: Key) -> Option<Self> {
        let action = match key {
            Key::Escape => Self::Abort,
            Key::Enter => Self::Execute,
            Key::Backspace => Self::DeleteBack,
            Key::Left => Self::Left,
            Key::Right => Self::Right,
            Key::Home => Self::Home,
            Key::End => Self::End,
            _ => Self::Insert(key.printable()?),
        };
        Some(action)
    }
}

// ── State machine ────────────────────────────────────────────────────

/// Tracks the active mode and, while in Command mode, the line being typed.
///
/// The active mode also selects the dispatch table: the editor asks
/// [`ModeMachine::mode`] before resolving every key.
#[derive(Debug, Clone, Default)]
pub struct ModeMachine {
    mode: Mode,
    command_line: Option<CommandLine>,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn command_line(&self) -> Option<&CommandLine> {
        self.command_line.as_ref()
    }

    pub fn command_line_mut(&mut self) -> Option<&mut CommandLine> {
        self.command_line.as_mut()
    }

    /// Switch to Normal or Insert. Any in-progress command line is discarded.
    pub fn enter(&mut self, mode: Mode) {
        debug_assert!(mode != Mode::Command, "use enter_command for Command mode");
        log::debug!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.command_line = None;
    }

    /// Switch to Command mode with a fresh command line.
    pub fn enter_command(&mut self, kind: CommandKind) {
        log::debug!("mode {:?} -> Command ({:?})", self.mode, kind);
        self.mode = Mode::Command;
        self.command_line = Some(CommandLine::new(kind));
    }

    /// Leave Command mode for Normal, handing back the finished line.
    pub fn finish_command(&mut self) -> Option<CommandLine> {
        self.mode = Mode::Normal;
        self.command_line.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_starts_after_prefix() {
        let line = CommandLine::new(CommandKind::Ex);
        assert_eq!(line.text(), ":");
        assert_eq!(line.body(), "");
        assert_eq!(line.cursor(), 1);

        let search = CommandLine::new(CommandKind::Search);
        assert_eq!(search.text(), "/");
    }

    #[test]
    fn test_command_line_editing() {
        let mut line = CommandLine::new(CommandKind::Ex);
        for &c in b"wq" {
            line.insert(c);
        }
        assert_eq!(line.text(), ":wq");
        line.move_left();
        line.insert(b'!');
        assert_eq!(line.text(), ":w!q");
        assert_eq!(line.cursor(), 3);
        assert!(line.backspace());
        assert_eq!(line.text(), ":wq");
        line.move_home();
        assert_eq!(line.cursor(), 1);
        assert!(!line.backspace());
        line.move_end();
        assert_eq!(line.cursor(), 3);
        line.move_right();
        assert_eq!(line.cursor(), 3);
    }

    #[test]
    fn test_command_line_keys() {
        assert_eq!(CommandLineKey::from_key(Key::Escape), Some(CommandLineKey::Abort));
        assert_eq!(
            CommandLineKey::from_key(Key::Char(b'q')),
            Some(CommandLineKey::Insert(b'q'))
        );
        assert_eq!(CommandLineKey::from_key(Key::Tab), None);
        assert_eq!(CommandLineKey::from_key(Key::Up), None);
    }

    #[test]
    fn test_transitions() {
        let mut machine = ModeMachine::new();
        assert_eq!(machine.mode(), Mode::Normal);
        machine.enter_command(CommandKind::Search);
        assert_eq!(machine.mode(), Mode::Command);
        assert_eq!(machine.command_line().map(|l| l.text()), Some("/"));
        let line = machine.finish_command();
        assert!(line.is_some());
        assert_eq!(machine.mode(), Mode::Normal);
        assert!(machine.command_line().is_none());

        machine.enter(Mode::Insert);
        assert_eq!(machine.mode(), Mode::Insert);
        assert_eq!(machine.mode().label(), "INSERT");
    }
}
