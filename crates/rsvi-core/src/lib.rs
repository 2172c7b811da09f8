pub mod buffer;
pub mod command;
pub mod config;
pub mod cursor;
pub mod display;
pub mod editor;
pub mod error;
pub mod fs;
pub mod key;
pub mod mode;
pub mod ops;
pub mod register;
pub mod viewport;

pub use buffer::TextBuffer;
pub use config::Settings;
pub use cursor::CursorPosition;
pub use display::{Display, EditorView, Keyboard};
pub use editor::Editor;
pub use error::EditorError;
pub use key::Key;
pub use mode::Mode;
pub use viewport::ScreenSize;
