use std::io;
use std::path::{Path, PathBuf};

use crate::buffer::Line;

/// Filesystem access used by the editor.
///
/// Kept behind a trait so the editor core never touches `std::fs` directly.
pub trait Filesystem {
    /// Expand `~` and environment variables in a user-supplied path.
    fn expand(&self, path: &str) -> PathBuf;

    fn exists(&self, path: &Path) -> bool;

    fn is_regular_file(&self, path: &Path) -> bool;

    /// Read a file as newline-separated lines.
    fn read_lines(&self, path: &Path) -> io::Result<Vec<Line>>;

    /// Write `lines`, each followed by a newline, replacing the file.
    fn write_lines(&self, path: &Path, lines: &[Line]) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn expand(&self, path: &str) -> PathBuf {
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        expand_with(path, home.as_deref(), |name| std::env::var(name).ok())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_regular_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_lines(&self, path: &Path) -> io::Result<Vec<Line>> {
        let bytes = std::fs::read(path)?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        Ok(split_lines(&bytes))
    }

    fn write_lines(&self, path: &Path, lines: &[Line]) -> io::Result<()> {
        let mut bytes = Vec::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            bytes.extend_from_slice(line);
            bytes.push(b'\n');
        }
        std::fs::write(path, &bytes)?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Split file content into lines.
///
/// A trailing newline terminates the last line rather than starting a new
/// one, so `"a\n"` is one line and an empty file has none.
pub fn split_lines(bytes: &[u8]) -> Vec<Line> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<Line> = bytes.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect();
    if bytes.ends_with(b"\n") {
        lines.pop();
    }
    lines
}

/// Expand a leading `~` and any `$NAME` / `${NAME}` references.
///
/// Unknown variables expand to nothing. A `$` not followed by a name is
/// kept as is.
pub fn expand_with<F>(path: &str, home: Option<&Path>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    if let Some(home) = home {
        if rest == "~" || rest.starts_with("~/") {
            out.push_str(&home.to_string_lossy());
            rest = &rest[1..];
        }
    }

    // Byte offset into `rest`; names may hold multi-byte characters.
    let mut i = 0;
    while let Some(c) = rest[i..].chars().next() {
        i += c.len_utf8();
        if c != '$' {
            out.push(c);
            continue;
        }

        let after = &rest[i..];
        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        if name.is_empty() {
            out.push('$');
            continue;
        }
        if let Some(value) = lookup(name) {
            out.push_str(&value);
        }
        i += consumed;
    }

    PathBuf::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "PROJ" => Some("rsvi".to_string()),
            "DIR" => Some("/srv".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_split_lines() {
        assert!(split_lines(b"").is_empty());
        assert_eq!(split_lines(b"a\n"), vec![b"a".to_vec()]);
        assert_eq!(split_lines(b"a\nb"), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(split_lines(b"a\n\n"), vec![b"a".to_vec(), Vec::new()]);
        assert_eq!(split_lines(b"\n"), vec![Vec::new()]);
    }

    #[test]
    fn test_expand_home() {
        let home = Path::new("/home/me");
        assert_eq!(expand_with("~", Some(home), env), PathBuf::from("/home/me"));
        assert_eq!(
            expand_with("~/notes.txt", Some(home), env),
            PathBuf::from("/home/me/notes.txt")
        );
        assert_eq!(expand_with("~x", Some(home), env), PathBuf::from("~x"));
        assert_eq!(expand_with("~/a", None, env), PathBuf::from("~/a"));
    }

    #[test]
    fn test_expand_variables() {
        assert_eq!(
            expand_with("$DIR/$PROJ.txt", None, env),
            PathBuf::from("/srv/rsvi.txt")
        );
        assert_eq!(
            expand_with("${PROJ}_old", None, env),
            PathBuf::from("rsvi_old")
        );
        assert_eq!(expand_with("a$MISSING/b", None, env), PathBuf::from("a/b"));
        assert_eq!(expand_with("cost$", None, env), PathBuf::from("cost$"));
        assert_eq!(expand_with("${open", None, env), PathBuf::from("${open"));
    }

    #[test]
    fn test_expand_multibyte_names() {
        assert_eq!(expand_with("${ÜBER}x", None, env), PathBuf::from("x"));
        assert_eq!(expand_with("${ÜBER}/é$DIR", None, env), PathBuf::from("/é/srv"));
        assert_eq!(expand_with("$Über", None, env), PathBuf::from("$Über"));
    }

    #[test]
    fn test_os_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        let fs = OsFilesystem;
        let lines = vec![b"one".to_vec(), Vec::new(), b"three".to_vec()];
        fs.write_lines(&path, &lines).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"one\n\nthree\n");
        assert_eq!(fs.read_lines(&path).unwrap(), lines);
        assert!(fs.is_regular_file(&path));
        assert!(fs.exists(dir.path()));
        assert!(!fs.is_regular_file(dir.path()));
    }
}
