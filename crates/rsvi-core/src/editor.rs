use std::path::{Path, PathBuf};

use crate::buffer::TextBuffer;
use crate::command::{self, ExCommand, Verb};
use crate::config::Settings;
use crate::cursor::CursorPosition;
use crate::display::{Display, EditorView, Keyboard};
use crate::error::EditorError;
use crate::fs::Filesystem;
use crate::key::{INTERRUPT, Key};
use crate::mode::{CommandKind, CommandLine, CommandLineKey, Mode, ModeMachine};
use crate::ops::{self, ModeChange, OperatorArgs, OperatorResult, PendingOperator};
use crate::register::Register;
use crate::viewport::{ScreenSize, Viewport};

/// Outcome of a command-line action: an optional status message or an error.
type CommandOutcome = Result<Option<String>, EditorError>;

/// The editor: sole owner of the buffer, register, cursor, viewport and mode.
pub struct Editor {
    buffer: TextBuffer,
    register: Register,
    cursor: CursorPosition,
    viewport: Viewport,
    screen: ScreenSize,
    modes: ModeMachine,
    pending: Option<PendingOperator>,
    count: Option<usize>,
    file: Option<PathBuf>,
    modified: bool,
    quit: bool,
    message: Option<String>,
    fs: Box<dyn Filesystem>,
}

/// The parts of editor state that show up on screen.
#[derive(PartialEq)]
struct Frame {
    cursor: CursorPosition,
    top_line: usize,
    left_col: usize,
    mode: Mode,
    command_line: Option<CommandLine>,
    message: Option<String>,
    count: Option<usize>,
    modified: bool,
}

impl Editor {
    pub fn new(settings: &Settings, fs: Box<dyn Filesystem>) -> Self {
        Self {
            buffer: TextBuffer::new(),
            register: Register::new(),
            cursor: CursorPosition::default(),
            viewport: Viewport::new(settings.view.wrap, settings.view.horizontal_scroll),
            screen: ScreenSize::default(),
            modes: ModeMachine::new(),
            pending: None,
            count: None,
            file: None,
            modified: false,
            quit: false,
            message: None,
            fs,
        }
    }

    /// Start from the given content instead of an empty buffer.
    pub fn with_buffer(mut self, buffer: TextBuffer) -> Self {
        self.buffer = buffer;
        self.settle_cursor();
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn register(&self) -> &Register {
        &self.register
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn command_line(&self) -> Option<&CommandLine> {
        self.modes.command_line()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn pending_count(&self) -> Option<usize> {
        self.count
    }

    pub fn view(&self) -> EditorView<'_> {
        EditorView {
            buffer: &self.buffer,
            viewport: &self.viewport,
            cursor: self.cursor,
            mode: self.modes.mode(),
            command_line: self.modes.command_line(),
            message: self.message.as_deref(),
            pending_count: self.count,
            size: self.screen,
        }
    }

    fn frame(&self) -> Frame {
        Frame {
            cursor: self.cursor,
            top_line: self.viewport.top_line,
            left_col: self.viewport.left_col,
            mode: self.modes.mode(),
            command_line: self.modes.command_line().cloned(),
            message: self.message.clone(),
            count: self.count,
            modified: self.modified,
        }
    }

    // ── Main loop ────────────────────────────────────────────────────

    /// Read keys and repaint until `:q` or the interrupt key.
    pub fn run<K, D>(&mut self, keyboard: &mut K, display: &mut D) -> anyhow::Result<()>
    where
        K: Keyboard,
        D: Display,
    {
        self.resize(display.text_area()?);
        display.draw(&self.view())?;

        while !self.quit {
            let key = keyboard.next_key()?;
            if key == INTERRUPT {
                log::info!("interrupted");
                break;
            }
            let resized = self.resize(display.text_area()?);
            if self.handle_key(key) || resized {
                display.draw(&self.view())?;
            }
        }
        Ok(())
    }

    /// Record a new text-area size. Returns whether it changed.
    pub fn resize(&mut self, size: ScreenSize) -> bool {
        if size == self.screen {
            return false;
        }
        log::debug!("text area resized to {}x{}", size.width, size.height);
        self.screen = size;
        self.viewport.adjust(&self.buffer, self.cursor, self.screen);
        true
    }

    /// Process one key. Returns whether the screen needs repainting.
    pub fn handle_key(&mut self, key: Key) -> bool {
        let before = self.frame();
        self.message = None;

        let forced = match self.modes.mode() {
            Mode::Command => {
                self.handle_command_line_key(key);
                false
            }
            mode => {
                let args = OperatorArgs {
                    key,
                    buffer: &mut self.buffer,
                    register: &mut self.register,
                    cursor: self.cursor,
                    viewport: &self.viewport,
                    screen: self.screen,
                    mode,
                    pending: self.pending,
                    count: self.count,
                };
                let result = match mode {
                    Mode::Insert => ops::handle_insert(args),
                    _ => ops::handle_normal(args),
                };
                self.apply(result)
            }
        };

        forced || self.frame() != before
    }

    fn apply(&mut self, result: OperatorResult) -> bool {
        if result.buffer_changed {
            self.modified = true;
        }
        self.pending = result.pending;
        self.count = result.count;

        if let Some(change) = result.mode {
            self.pending = None;
            self.count = None;
            match change {
                ModeChange::Normal => self.modes.enter(Mode::Normal),
                ModeChange::Insert => self.modes.enter(Mode::Insert),
                ModeChange::Command(kind) => self.modes.enter_command(kind),
            }
        }
        if let Some(cursor) = result.cursor {
            self.cursor = cursor;
        }
        self.settle_cursor();

        if result.message.is_some() {
            self.message = result.message;
        }
        result.buffer_changed || result.redraw
    }

    /// Re-clamp the cursor to the current mode and scroll it into view.
    fn settle_cursor(&mut self) {
        self.cursor = self.cursor.clamped(&self.buffer, self.modes.mode());
        self.viewport.adjust(&self.buffer, self.cursor, self.screen);
    }

    // ── Command line ─────────────────────────────────────────────────

    fn handle_command_line_key(&mut self, key: Key) {
        let Some(action) = CommandLineKey::from_key(key) else {
            return;
        };
        let Some(line) = self.modes.command_line_mut() else {
            self.modes.enter(Mode::Normal);
            return;
        };

        match action {
            CommandLineKey::Abort => self.modes.enter(Mode::Normal),
            CommandLineKey::Execute => self.submit_command_line(),
            CommandLineKey::DeleteBack => {
                if !line.backspace() {
                    self.modes.enter(Mode::Normal);
                }
            }
            CommandLineKey::Left => line.move_left(),
            CommandLineKey::Right => line.move_right(),
            CommandLineKey::Home => line.move_home(),
            CommandLineKey::End => line.move_end(),
            CommandLineKey::Insert(ch) => line.insert(ch),
        }
    }

    fn submit_command_line(&mut self) {
        let Some(line) = self.modes.finish_command() else {
            return;
        };
        let outcome = match line.kind() {
            CommandKind::Ex => self.execute_command(line.body()),
            CommandKind::Search => self.search(line.body()),
        };
        self.report(outcome);
        self.settle_cursor();
    }

    fn report(&mut self, outcome: CommandOutcome) {
        match outcome {
            Ok(Some(message)) => self.message = Some(message),
            Ok(None) => {}
            Err(err) => {
                log::debug!("command failed: {err}");
                self.message = Some(err.status_message());
            }
        }
    }

    /// Run the text typed after `:`.
    pub fn execute_command(&mut self, text: &str) -> CommandOutcome {
        let Some(ExCommand { verb, force, arg }) = command::parse(text)? else {
            return Ok(None);
        };
        let arg = arg.as_deref();

        match verb {
            Verb::File => Ok(Some(self.file_info())),
            Verb::Quit => {
                if self.modified && !force {
                    return Err(EditorError::NoWriteSinceLastChange);
                }
                self.quit = true;
                Ok(None)
            }
            Verb::Edit => self.edit(arg, force),
            Verb::Write => self.write(arg, force),
            Verb::Read => self.read(arg),
        }
    }

    /// Jump to the next literal match of `pattern`. An empty pattern does nothing.
    pub fn search(&mut self, pattern: &str) -> CommandOutcome {
        if pattern.is_empty() {
            return Ok(None);
        }
        let hit = command::search(&self.buffer, self.cursor, pattern)?;
        self.cursor = hit.position;
        self.settle_cursor();
        Ok(hit.wrapped.then(|| command::WRAP_MESSAGE.to_string()))
    }

    fn file_info(&self) -> String {
        let name = self
            .file
            .as_ref()
            .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string());
        let modified = if self.modified { "[Modified] " } else { "" };
        let stats = match self.buffer.num_lines() {
            0 => "--No lines in buffer--".to_string(),
            n => format!("{n} lines --{}%--", (self.cursor.line + 1) * 100 / n),
        };
        format!("\"{name}\" {modified}{stats}")
    }

    // ── Files ────────────────────────────────────────────────────────

    /// Open a path given on the command line at startup.
    pub fn open_initial(&mut self, path: &str) {
        let outcome = self.edit(Some(path), false);
        self.report(outcome);
    }

    /// Resolve the argument (or the current file) to (as-typed, expanded).
    fn target(&self, arg: Option<&str>) -> Result<(PathBuf, PathBuf), EditorError> {
        match (arg, &self.file) {
            (Some(arg), _) => Ok((PathBuf::from(arg), self.fs.expand(arg))),
            (None, Some(file)) => Ok((file.clone(), file.clone())),
            (None, None) => Err(EditorError::NoFileName),
        }
    }

    fn check_readable(&self, shown: &Path, resolved: &Path) -> Result<(), EditorError> {
        if !self.fs.exists(resolved) {
            return Err(EditorError::FileDoesNotExist(shown.to_path_buf()));
        }
        if !self.fs.is_regular_file(resolved) {
            return Err(EditorError::NotARegularFile(shown.to_path_buf()));
        }
        Ok(())
    }

    fn edit(&mut self, arg: Option<&str>, force: bool) -> CommandOutcome {
        let (shown, resolved) = self.target(arg)?;
        self.check_readable(&shown, &resolved)?;
        if self.modified && !force {
            return Err(EditorError::NoWriteSinceLastChange);
        }

        self.buffer
            .read(self.fs.as_ref(), &resolved)
            .map_err(|e| EditorError::io(&shown, e))?;
        log::info!(
            "opened {} ({} lines)",
            resolved.display(),
            self.buffer.num_lines()
        );
        self.file = Some(resolved);
        self.modified = false;
        self.settle_cursor();
        Ok(None)
    }

    fn read(&mut self, arg: Option<&str>) -> CommandOutcome {
        let (shown, resolved) = self.target(arg)?;
        self.check_readable(&shown, &resolved)?;

        let count = self
            .buffer
            .read_after(self.fs.as_ref(), &resolved, self.cursor.line)
            .map_err(|e| EditorError::io(&shown, e))?;
        log::info!("read {count} lines from {}", resolved.display());
        self.modified = true;
        Ok(Some(format!("\"{}\" {count} lines read", resolved.display())))
    }

    fn write(&mut self, arg: Option<&str>, force: bool) -> CommandOutcome {
        let (shown, resolved) = self.target(arg)?;
        if self.fs.exists(&resolved) && self.file.as_deref() != Some(resolved.as_path()) {
            if !force {
                return Err(EditorError::FileExists);
            }
            if !self.fs.is_regular_file(&resolved) {
                return Err(EditorError::NotWritable(shown));
            }
        }

        self.buffer
            .write(self.fs.as_ref(), &resolved)
            .map_err(|e| EditorError::io(&shown, e))?;
        let count = self.buffer.num_lines();
        log::info!("wrote {count} lines to {}", resolved.display());
        self.modified = false;
        Ok(Some(format!(
            "\"{}\" {count} lines written",
            resolved.display()
        )))
    }
}
