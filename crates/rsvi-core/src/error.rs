use std::path::PathBuf;

/// Failures reported to the user on the status line.
///
/// The `Display` text is the bare message; the editor adds the `ERR: `
/// prefix when showing it.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Trailing characters")]
    TrailingCharacters,

    #[error("Not an editor command: {0}")]
    NotAnEditorCommand(String),

    #[error("No write since last change (add ! to override)")]
    NoWriteSinceLastChange,

    #[error("No file name")]
    NoFileName,

    #[error("No ! allowed")]
    NoBangAllowed,

    #[error("Could not open `{}': file does not exist", .0.display())]
    FileDoesNotExist(PathBuf),

    #[error("Could not open `{}': not a regular file", .0.display())]
    NotARegularFile(PathBuf),

    #[error("Could not open `{}' for writing: not a regular file", .0.display())]
    NotWritable(PathBuf),

    #[error("File exists (add ! to override)")]
    FileExists,

    #[error("Search string not found: {0}")]
    SearchNotFound(String),

    #[error("`{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The status-line rendering of this error.
    pub fn status_message(&self) -> String {
        format!("ERR: {self}")
    }
}
