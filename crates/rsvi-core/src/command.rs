//! Ex command parsing and forward search.

use crate::buffer::TextBuffer;
use crate::cursor::CursorPosition;
use crate::error::EditorError;

// ── Ex commands ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    File,
    Quit,
    Edit,
    Write,
    Read,
}

impl Verb {
    /// (verb, shortest accepted abbreviation, full name)
    const TABLE: [(Verb, &'static str, &'static str); 5] = [
        (Verb::File, "f", "file"),
        (Verb::Quit, "q", "quit"),
        (Verb::Edit, "e", "edit"),
        (Verb::Write, "w", "write"),
        (Verb::Read, "r", "read"),
    ];

    fn lookup(token: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, required, full)| command_matches(token, required, full))
            .map(|(verb, _, _)| *verb)
    }
}

/// A parsed ex command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExCommand {
    pub verb: Verb,
    pub force: bool,
    pub arg: Option<String>,
}

/// Whether `token` abbreviates `full`, given at least `required` is typed.
pub fn command_matches(token: &str, required: &str, full: &str) -> bool {
    token.starts_with(required) && full.starts_with(token)
}

/// Parse the text typed after `:`.
///
/// Returns `Ok(None)` for a blank line.
pub fn parse(text: &str) -> Result<Option<ExCommand>, EditorError> {
    let text = text.trim_start();
    if text.is_empty() {
        return Ok(None);
    }

    let (token, rest) = text.split_once(' ').unwrap_or((text, ""));
    let (name, force) = match token.strip_suffix('!') {
        Some(name) => (name, true),
        None => (token, false),
    };
    let verb =
        Verb::lookup(name).ok_or_else(|| EditorError::NotAnEditorCommand(token.to_string()))?;

    let mut args = rest.split_whitespace();
    let arg = args.next().map(str::to_string);
    if args.next().is_some() {
        return Err(EditorError::TrailingCharacters);
    }

    match verb {
        Verb::File if force || arg.is_some() => return Err(EditorError::TrailingCharacters),
        Verb::Quit if arg.is_some() => return Err(EditorError::TrailingCharacters),
        Verb::Read if force => return Err(EditorError::NoBangAllowed),
        _ => {}
    }

    log::debug!("parsed {verb:?} force={force} arg={arg:?}");
    Ok(Some(ExCommand { verb, force, arg }))
}

// ── Search ───────────────────────────────────────────────────────────

/// Where a search landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub position: CursorPosition,
    /// The match was found only after wrapping to the top.
    pub wrapped: bool,
}

pub const WRAP_MESSAGE: &str = "search hit BOTTOM, continuing at TOP";

/// Forward literal search starting just after `from`.
///
/// Scans to the end of the buffer, then wraps to line 0 and scans up to
/// and including the cursor line.
pub fn search(
    buffer: &TextBuffer,
    from: CursorPosition,
    pattern: &str,
) -> Result<SearchHit, EditorError> {
    let needle = pattern.as_bytes();
    let not_found = || EditorError::SearchNotFound(pattern.to_string());
    if buffer.is_empty() || needle.is_empty() {
        return Err(not_found());
    }

    let first = from.line.min(buffer.num_lines() - 1);
    if let Some(col) = find_bytes(buffer.line(first), needle, from.col + 1) {
        return Ok(SearchHit {
            position: CursorPosition::new(first, col),
            wrapped: false,
        });
    }
    for line in first + 1..buffer.num_lines() {
        if let Some(col) = find_bytes(buffer.line(line), needle, 0) {
            return Ok(SearchHit {
                position: CursorPosition::new(line, col),
                wrapped: false,
            });
        }
    }
    for line in 0..=first {
        if let Some(col) = find_bytes(buffer.line(line), needle, 0) {
            return Ok(SearchHit {
                position: CursorPosition::new(line, col),
                wrapped: true,
            });
        }
    }
    Err(not_found())
}

fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(verb: Verb, force: bool, arg: Option<&str>) -> Option<ExCommand> {
        Some(ExCommand {
            verb,
            force,
            arg: arg.map(str::to_string),
        })
    }

    #[test]
    fn test_abbreviations() {
        for token in ["w", "wr", "wri", "writ", "write"] {
            assert_eq!(parse(token).unwrap(), cmd(Verb::Write, false, None), "{token}");
        }
        assert_eq!(parse("q").unwrap(), cmd(Verb::Quit, false, None));
        assert_eq!(parse("fi").unwrap(), cmd(Verb::File, false, None));
        assert!(matches!(
            parse("x"),
            Err(EditorError::NotAnEditorCommand(v)) if v == "x"
        ));
        assert!(matches!(
            parse("writes"),
            Err(EditorError::NotAnEditorCommand(_))
        ));
    }

    #[test]
    fn test_command_matches() {
        assert!(command_matches("w", "w", "write"));
        assert!(command_matches("write", "w", "write"));
        assert!(!command_matches("wx", "w", "write"));
        assert!(!command_matches("", "w", "write"));
    }

    #[test]
    fn test_force_and_argument() {
        assert_eq!(
            parse("w! out.txt").unwrap(),
            cmd(Verb::Write, true, Some("out.txt"))
        );
        assert_eq!(
            parse("  e   other.txt  ").unwrap(),
            cmd(Verb::Edit, false, Some("other.txt"))
        );
        assert_eq!(parse("q!").unwrap(), cmd(Verb::Quit, true, None));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_trailing_characters() {
        assert!(matches!(
            parse("w a b"),
            Err(EditorError::TrailingCharacters)
        ));
        assert!(matches!(parse("f name"), Err(EditorError::TrailingCharacters)));
        assert!(matches!(parse("f!"), Err(EditorError::TrailingCharacters)));
        assert!(matches!(parse("q now"), Err(EditorError::TrailingCharacters)));
    }

    #[test]
    fn test_read_rejects_force() {
        assert!(matches!(parse("r! x"), Err(EditorError::NoBangAllowed)));
        assert_eq!(parse("r x").unwrap(), cmd(Verb::Read, false, Some("x")));
    }

    #[test]
    fn test_search_forward() {
        let buf = TextBuffer::from_lines(["foo bar", "baz foo"]);
        let hit = search(&buf, CursorPosition::new(0, 0), "foo").unwrap();
        assert_eq!(hit.position, CursorPosition::new(1, 4));
        assert!(!hit.wrapped);

        let hit = search(&buf, CursorPosition::new(0, 0), "bar").unwrap();
        assert_eq!(hit.position, CursorPosition::new(0, 4));
    }

    #[test]
    fn test_search_later_line_is_not_a_wrap() {
        let buf = TextBuffer::from_lines(["foo", "bar", "foo"]);
        let hit = search(&buf, CursorPosition::new(0, 0), "foo").unwrap();
        assert_eq!(hit.position, CursorPosition::new(2, 0));
        assert!(!hit.wrapped);
    }

    #[test]
    fn test_search_wraps() {
        let buf = TextBuffer::from_lines(["foo", "x", "y"]);
        let hit = search(&buf, CursorPosition::new(1, 0), "foo").unwrap();
        assert_eq!(hit.position, CursorPosition::new(0, 0));
        assert!(hit.wrapped);
    }

    #[test]
    fn test_search_finds_only_match_under_cursor_after_wrap() {
        let buf = TextBuffer::from_lines(["abc"]);
        let hit = search(&buf, CursorPosition::new(0, 0), "abc").unwrap();
        assert_eq!(hit.position, CursorPosition::new(0, 0));
        assert!(hit.wrapped);
    }

    #[test]
    fn test_search_not_found() {
        let buf = TextBuffer::from_lines(["abc"]);
        assert!(matches!(
            search(&buf, CursorPosition::new(0, 0), "zzz"),
            Err(EditorError::SearchNotFound(p)) if p == "zzz"
        ));
        assert!(search(&TextBuffer::new(), CursorPosition::default(), "a").is_err());
    }

    #[test]
    fn test_find_bytes_bounds() {
        assert_eq!(find_bytes(b"abc", b"c", 2), Some(2));
        assert_eq!(find_bytes(b"abc", b"c", 3), None);
        assert_eq!(find_bytes(b"abc", b"c", 4), None);
        assert_eq!(find_bytes(b"ab", b"abc", 0), None);
    }
}
