mod keyboard;
mod terminal;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use directories::ProjectDirs;
use ratatui::{Terminal, backend::CrosstermBackend};

use rsvi_core::fs::OsFilesystem;
use rsvi_core::{Editor, Settings};

use keyboard::CrosstermKeyboard;
use terminal::TerminalDisplay;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args.next();
    if args.next().is_some() {
        bail!("usage: rsvi [file]");
    }

    if let Err(err) = init_logging() {
        // The terminal is about to go raw; logging stays off.
        eprintln!("Logging disabled: {err:#}");
    }

    let settings = Settings::load_or_default();
    let mut editor = Editor::new(&settings, Box::new(OsFilesystem));
    if let Some(path) = &path {
        editor.open_initial(path);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    let mut display = TerminalDisplay::new(terminal, &settings.view);

    let result = editor.run(&mut CrosstermKeyboard, &mut display);

    // Restore terminal
    disable_raw_mode()?;
    let terminal = display.terminal_mut();
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("editor stopped: {err:?}");
        eprintln!("Error: {err:?}");
    }
    log::info!("exiting");

    Ok(())
}

/// Returns the log file path.
/// Location: `~/.local/share/rsvi/rsvi.log` (XDG-compliant)
fn log_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "rsvi").context("Could not determine data directory")?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("rsvi.log"))
}

/// Send `log` output to a file; the terminal belongs to the editor.
fn init_logging() -> Result<()> {
    let path = log_path()?;
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create log file at {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("logging to {}", path.display());
    Ok(())
}
