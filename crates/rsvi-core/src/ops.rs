//! Key dispatch for Normal and Insert mode.
//!
//! Each mode resolves a [`Key`] into a closed command enumeration. A command
//! is then run against an [`OperatorArgs`] snapshot and produces an
//! [`OperatorResult`] describing what the editor should apply: where the
//! cursor goes, whether the buffer changed, which mode comes next and what
//! pending operator/count survives into the next key. The buffer and
//! register are the only state mutated in place.

use crate::buffer::TextBuffer;
use crate::cursor::{CursorPosition, last_valid_col};
use crate::key::Key;
use crate::mode::{CommandKind, Mode};
use crate::register::Register;
use crate::viewport::{ScreenSize, Viewport};

// ── Commands ─────────────────────────────────────────────────────────

/// Cursor motions shared by Normal and Insert mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// `Space` / `Right`: forward N columns, wrapping onto following lines.
    Right,
    /// `Backspace` / `Left`: back N columns, wrapping onto previous lines.
    Left,
    /// `$` / `End`: last valid column of the line.
    LineEnd,
    /// `g`: line N, or the last line without a count.
    GotoLine,
    /// `h`: first visible line.
    ViewTop,
    /// `l`: last visible line.
    ViewBottom,
    /// `b`: first line.
    BufferTop,
    /// `Down`: N lines down.
    Down,
    /// `Up`: N lines up.
    Up,
    /// `Enter`: start of the line N below.
    NextLineStart,
    /// `-`: start of the line N above.
    PrevLineStart,
    /// `0` / `Home`: column 0.
    LineStart,
}

/// Line operators that wait for a second key (`dd`, `yy`, `dy`, `yd`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Delete,
    Yank,
}

/// Where `p`/`P` put the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    After,
    Before,
}

/// How Insert mode is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEntry {
    /// `i`: at the cursor.
    AtCursor,
    /// `a`: one column right.
    Append,
    /// `o`: on a new empty line below.
    OpenBelow,
}

/// Everything Normal mode knows how to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalCommand {
    Digit(usize),
    Motion(Motion),
    DeleteChar,
    ReplaceChar,
    Operator(Operator),
    Put(Placement),
    Insert(InsertEntry),
    CommandLine(CommandKind),
    Redraw,
}

impl NormalCommand {
    /// Resolve a key against the Normal-mode table.
    pub fn from_key(key: Key) -> Option<Self> {
        use NormalCommand as N;

        if let Some(d) = key.digit() {
            return Some(N::Digit(d));
        }
        let command = match key {
            Key::Char(b' ') | Key::Right => N::Motion(Motion::Right),
            Key::Backspace | Key::Left => N::Motion(Motion::Left),
            Key::Char(b'$') | Key::End => N::Motion(Motion::LineEnd),
            Key::Char(b'g') => N::Motion(Motion::GotoLine),
            Key::Char(b'h') => N::Motion(Motion::ViewTop),
            Key::Char(b'l') => N::Motion(Motion::ViewBottom),
            Key::Char(b'b') => N::Motion(Motion::BufferTop),
            Key::Down => N::Motion(Motion::Down),
            Key::Up => N::Motion(Motion::Up),
            Key::Enter => N::Motion(Motion::NextLineStart),
            Key::Char(b'-') => N::Motion(Motion::PrevLineStart),
            Key::Home => N::Motion(Motion::LineStart),
            Key::Char(b'x') => N::DeleteChar,
            Key::Char(b'r') => N::ReplaceChar,
            Key::Char(b'd') => N::Operator(Operator::Delete),
            Key::Char(b'y') => N::Operator(Operator::Yank),
            Key::Char(b'p') => N::Put(Placement::After),
            Key::Char(b'P') => N::Put(Placement::Before),
            Key::Char(b'i') => N::Insert(InsertEntry::AtCursor),
            Key::Char(b'a') => N::Insert(InsertEntry::Append),
            Key::Char(b'o') => N::Insert(InsertEntry::OpenBelow),
            Key::Char(b':') | Key::Char(b';') => N::CommandLine(CommandKind::Ex),
            Key::Char(b'/') => N::CommandLine(CommandKind::Search),
            Key::Char(b'z') => N::Redraw,
            _ => return None,
        };
        Some(command)
    }
}

/// Everything Insert mode does besides inserting literal characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertCommand {
    Motion(Motion),
    LeaveInsert,
    DeleteBack,
    BreakLine,
}

impl InsertCommand {
    /// Resolve a key against the Insert-mode table.
    pub fn from_key(key: Key) -> Option<Self> {
        let command = match key {
            Key::Right => Self::Motion(Motion::Right),
            Key::Left => Self::Motion(Motion::Left),
            Key::End => Self::Motion(Motion::LineEnd),
            Key::Down => Self::Motion(Motion::Down),
            Key::Up => Self::Motion(Motion::Up),
            Key::Home => Self::Motion(Motion::LineStart),
            Key::Escape => Self::LeaveInsert,
            Key::Backspace => Self::DeleteBack,
            Key::Enter => Self::BreakLine,
            _ => return None,
        };
        Some(command)
    }
}

// ── Pending state ────────────────────────────────────────────────────

/// A first key held while waiting for the key that completes the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOperator {
    /// `d` or `y`, waiting for `d` or `y`.
    Operator(Operator),
    /// `r`, waiting for the replacement character.
    ReplaceChar,
}

// ── Arguments and results ────────────────────────────────────────────

/// Mode requested by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Normal,
    Insert,
    Command(CommandKind),
}

/// The state an operator runs against.
pub struct OperatorArgs<'a> {
    pub key: Key,
    pub buffer: &'a mut TextBuffer,
    pub register: &'a mut Register,
    pub cursor: CursorPosition,
    pub viewport: &'a Viewport,
    pub screen: ScreenSize,
    pub mode: Mode,
    pub pending: Option<PendingOperator>,
    pub count: Option<usize>,
}

/// What an operator asks the editor to apply.
///
/// `pending` and `count` describe the state carried into the next key;
/// leaving them `None` ends any compound command in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorResult {
    pub cursor: Option<CursorPosition>,
    pub buffer_changed: bool,
    pub mode: Option<ModeChange>,
    pub message: Option<String>,
    pub pending: Option<PendingOperator>,
    pub count: Option<usize>,
    pub redraw: bool,
}

impl OperatorResult {
    fn moved(cursor: CursorPosition) -> Self {
        Self {
            cursor: Some(cursor),
            ..Self::default()
        }
    }

    fn changed(cursor: Option<CursorPosition>) -> Self {
        Self {
            cursor,
            buffer_changed: true,
            ..Self::default()
        }
    }
}

// ── Entry points ─────────────────────────────────────────────────────

/// Handle one key in Normal mode.
///
/// A pending `d`/`y` survives digits (which extend the count) and the
/// resolving `d`/`y`. Any other key cancels it together with the count and
/// is then handled as a fresh command. A pending `r` consumes the next key
/// whatever it is. Unmapped keys are ignored.
pub fn handle_normal(mut args: OperatorArgs<'_>) -> OperatorResult {
    if args.pending == Some(PendingOperator::ReplaceChar) {
        return replace_chars(args);
    }

    let command = NormalCommand::from_key(args.key);
    if let Some(pending) = args.pending {
        let continues = match command {
            Some(NormalCommand::Operator(_)) => true,
            Some(NormalCommand::Digit(d)) => d != 0 || args.count.is_some(),
            _ => false,
        };
        if !continues {
            log::debug!("dropping pending {pending:?} on {:?}", args.key);
            args.pending = None;
            args.count = None;
        }
    }

    match command {
        Some(command) => run_normal(command, args),
        None => OperatorResult::default(),
    }
}

/// Handle one key in Insert mode. Unmapped printable keys are inserted.
pub fn handle_insert(args: OperatorArgs<'_>) -> OperatorResult {
    match InsertCommand::from_key(args.key) {
        Some(InsertCommand::Motion(motion)) => move_cursor(args, motion),
        Some(InsertCommand::LeaveInsert) => start_normal(args),
        Some(InsertCommand::DeleteBack) => delete_back(args),
        Some(InsertCommand::BreakLine) => break_line(args),
        None => insert_literal(args),
    }
}

fn run_normal(command: NormalCommand, args: OperatorArgs<'_>) -> OperatorResult {
    match command {
        NormalCommand::Digit(d) => handle_digit(args, d),
        NormalCommand::Motion(motion) => move_cursor(args, motion),
        NormalCommand::DeleteChar => delete_chars(args),
        NormalCommand::ReplaceChar => OperatorResult {
            pending: Some(PendingOperator::ReplaceChar),
            count: args.count,
            ..OperatorResult::default()
        },
        NormalCommand::Operator(op) => do_pending_operator(args, op),
        NormalCommand::Put(placement) => put_lines(args, placement),
        NormalCommand::Insert(entry) => start_insert(args, entry),
        NormalCommand::CommandLine(kind) => OperatorResult {
            mode: Some(ModeChange::Command(kind)),
            ..OperatorResult::default()
        },
        NormalCommand::Redraw => OperatorResult {
            redraw: true,
            ..OperatorResult::default()
        },
    }
}

// ── Counts and compound commands ─────────────────────────────────────

fn handle_digit(args: OperatorArgs<'_>, digit: usize) -> OperatorResult {
    if digit == 0 && args.count.is_none() {
        return move_cursor(args, Motion::LineStart);
    }
    OperatorResult {
        pending: args.pending,
        count: Some(args.count.unwrap_or(0).saturating_mul(10).saturating_add(digit)),
        ..OperatorResult::default()
    }
}

fn do_pending_operator(args: OperatorArgs<'_>, second: Operator) -> OperatorResult {
    let Some(PendingOperator::Operator(first)) = args.pending else {
        return OperatorResult {
            pending: Some(PendingOperator::Operator(second)),
            count: args.count,
            ..OperatorResult::default()
        };
    };

    match (first, second) {
        (Operator::Delete, Operator::Delete) => delete_lines(args, false),
        // `dy` and `yd` both cut.
        (Operator::Delete, Operator::Yank) | (Operator::Yank, Operator::Delete) => {
            delete_lines(args, true)
        }
        (Operator::Yank, Operator::Yank) => yank_lines(args),
    }
}

fn delete_lines(args: OperatorArgs<'_>, cut: bool) -> OperatorResult {
    if args.buffer.is_empty() {
        return OperatorResult::default();
    }

    let line = args.cursor.line;
    let count = args.count.unwrap_or(1);
    if cut {
        args.buffer.yank_to(args.register, line, count);
    }
    let removed = count.min(args.buffer.num_lines() - line);
    args.buffer.delete_lines(line, count);

    let mut cursor = args.cursor;
    if args.buffer.is_empty() {
        cursor = CursorPosition::default();
    } else {
        cursor.line = cursor.line.min(args.buffer.num_lines() - 1);
        let len = args.buffer.line_length(cursor.line);
        if cursor.col >= len {
            cursor.col = len.saturating_sub(1);
        }
    }

    OperatorResult {
        message: Some(format!("{removed} fewer lines")),
        ..OperatorResult::changed(Some(cursor))
    }
}

fn yank_lines(args: OperatorArgs<'_>) -> OperatorResult {
    if args.buffer.is_empty() {
        return OperatorResult::default();
    }
    let count = args.count.unwrap_or(1);
    let yanked = args.buffer.yank_to(args.register, args.cursor.line, count);
    OperatorResult {
        message: Some(format!("{yanked} lines yanked")),
        ..OperatorResult::default()
    }
}

// ── Motions ──────────────────────────────────────────────────────────

fn move_cursor(args: OperatorArgs<'_>, motion: Motion) -> OperatorResult {
    if args.buffer.is_empty() {
        return OperatorResult::default();
    }
    let target = match motion {
        Motion::Right | Motion::Left | Motion::LineEnd => column_motion(&args, motion),
        Motion::GotoLine
        | Motion::ViewTop
        | Motion::ViewBottom
        | Motion::BufferTop
        | Motion::Down
        | Motion::Up => line_jump(&args, motion),
        Motion::NextLineStart | Motion::PrevLineStart | Motion::LineStart => {
            line_start(&args, motion)
        }
    };
    OperatorResult::moved(target)
}

fn column_motion(args: &OperatorArgs<'_>, motion: Motion) -> CursorPosition {
    let buffer = &*args.buffer;
    let last_valid = |line| last_valid_col(buffer, line, args.mode);
    let mut cursor = args.cursor;
    let mut to_move = args.count.unwrap_or(1);

    match motion {
        Motion::Right => {
            while to_move > 0 {
                let last = last_valid(cursor.line);
                if cursor.col <= last && to_move <= last - cursor.col {
                    cursor.col += to_move;
                    break;
                } else if cursor.line + 1 < buffer.num_lines() {
                    to_move -= (last + 1).saturating_sub(cursor.col).min(to_move);
                    cursor.col = 0;
                    cursor.line += 1;
                } else {
                    cursor.col = last;
                    break;
                }
            }
        }
        Motion::Left => {
            while to_move > 0 {
                if cursor.col >= to_move {
                    cursor.col -= to_move;
                    break;
                } else if cursor.line > 0 {
                    to_move -= cursor.col + 1;
                    cursor.line -= 1;
                    cursor.col = last_valid(cursor.line);
                } else {
                    cursor.col = 0;
                    break;
                }
            }
        }
        _ => cursor.col = last_valid(cursor.line),
    }
    cursor
}

fn line_jump(args: &OperatorArgs<'_>, motion: Motion) -> CursorPosition {
    let buffer = &*args.buffer;
    let last_line = buffer.num_lines() - 1;
    let n = args.count.unwrap_or(1);
    let mut cursor = args.cursor;

    cursor.line = match motion {
        Motion::GotoLine => args
            .count
            .map_or(last_line, |n| n.saturating_sub(1))
            .min(last_line),
        Motion::ViewTop => args.viewport.top_line.min(last_line),
        Motion::ViewBottom => args.viewport.bottom_line(buffer, args.screen),
        Motion::BufferTop => 0,
        Motion::Down => cursor.line.saturating_add(n).min(last_line),
        _ => cursor.line.saturating_sub(n),
    };
    cursor.col = cursor.col.min(last_valid_col(buffer, cursor.line, args.mode));
    cursor
}

fn line_start(args: &OperatorArgs<'_>, motion: Motion) -> CursorPosition {
    let last_line = args.buffer.num_lines() - 1;
    let n = args.count.unwrap_or(1);
    let line = match motion {
        Motion::NextLineStart => args.cursor.line.saturating_add(n).min(last_line),
        Motion::PrevLineStart => args.cursor.line.saturating_sub(n),
        _ => args.cursor.line,
    };
    CursorPosition::new(line, 0)
}

// ── Character edits ──────────────────────────────────────────────────

fn delete_chars(args: OperatorArgs<'_>) -> OperatorResult {
    if args.buffer.is_empty() {
        return OperatorResult::default();
    }
    let cursor = args.cursor;
    let len = args.buffer.line_length(cursor.line);
    if len == 0 || cursor.col >= len {
        return OperatorResult::default();
    }

    let count = args.count.unwrap_or(1).min(len - cursor.col);
    args.buffer.erase(cursor, count);

    let new_len = args.buffer.line_length(cursor.line);
    let target = if new_len == 0 {
        CursorPosition::new(cursor.line, 0)
    } else if cursor.col >= new_len {
        CursorPosition::new(cursor.line, new_len - 1)
    } else {
        cursor
    };
    OperatorResult::changed(Some(target))
}

fn replace_chars(args: OperatorArgs<'_>) -> OperatorResult {
    let Some(ch) = args.key.printable() else {
        return OperatorResult::default();
    };
    if args.buffer.is_empty() {
        return OperatorResult::default();
    }
    let cursor = args.cursor;
    let len = args.buffer.line_length(cursor.line);
    if cursor.col >= len {
        return OperatorResult::default();
    }

    let count = args.count.unwrap_or(1).min(len - cursor.col);
    args.buffer.erase(cursor, count);
    args.buffer.insert(cursor, ch, count);
    OperatorResult::changed(None)
}

fn delete_back(args: OperatorArgs<'_>) -> OperatorResult {
    let cursor = args.cursor;
    if args.buffer.is_empty() {
        return OperatorResult::default();
    }
    if cursor.col > 0 {
        let target = CursorPosition::new(cursor.line, cursor.col - 1);
        args.buffer.erase(target, 1);
        OperatorResult::changed(Some(target))
    } else if cursor.line > 0 {
        let prev = cursor.line - 1;
        let target = CursorPosition::new(prev, args.buffer.line_length(prev));
        args.buffer.join_lines(prev, 2);
        OperatorResult::changed(Some(target))
    } else {
        OperatorResult::default()
    }
}

fn break_line(args: OperatorArgs<'_>) -> OperatorResult {
    args.buffer.break_line(args.cursor);
    OperatorResult::changed(Some(CursorPosition::new(args.cursor.line + 1, 0)))
}

fn insert_literal(args: OperatorArgs<'_>) -> OperatorResult {
    let Some(ch) = args.key.printable() else {
        return OperatorResult::default();
    };
    args.buffer.insert(args.cursor, ch, 1);
    OperatorResult::changed(Some(CursorPosition::new(
        args.cursor.line,
        args.cursor.col + 1,
    )))
}

// ── Register ─────────────────────────────────────────────────────────

fn put_lines(args: OperatorArgs<'_>, placement: Placement) -> OperatorResult {
    if args.register.is_empty() {
        return OperatorResult::default();
    }
    let line = args.cursor.line;
    let target = match placement {
        Placement::After => {
            args.buffer.put_from(args.register, line);
            CursorPosition::new(line + 1, 0)
        }
        Placement::Before => {
            args.buffer.put_before(args.register, line);
            CursorPosition::new(line, 0)
        }
    };
    OperatorResult::changed(Some(target))
}

// ── Mode changes ─────────────────────────────────────────────────────

fn start_insert(args: OperatorArgs<'_>, entry: InsertEntry) -> OperatorResult {
    let mut result = OperatorResult {
        mode: Some(ModeChange::Insert),
        ..OperatorResult::default()
    };

    match entry {
        InsertEntry::AtCursor => {}
        InsertEntry::Append => {
            // A non-empty line always has a valid append point right of the cursor.
            if args.buffer.line_length(args.cursor.line) > 0 {
                result.cursor = Some(CursorPosition::new(args.cursor.line, args.cursor.col + 1));
            }
        }
        InsertEntry::OpenBelow => {
            args.buffer.insert_line(args.cursor.line);
            result.buffer_changed = true;
            result.cursor = Some(CursorPosition::new(args.cursor.line + 1, 0));
        }
    }
    result
}

fn start_normal(args: OperatorArgs<'_>) -> OperatorResult {
    OperatorResult {
        cursor: Some(CursorPosition::new(
            args.cursor.line,
            args.cursor.col.saturating_sub(1),
        )),
        mode: Some(ModeChange::Normal),
        ..OperatorResult::default()
    }
}
