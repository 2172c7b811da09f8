use std::io::Stdout;

use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use rsvi_core::config::ViewSettings;
use rsvi_core::display::printable_text;
use rsvi_core::{Display, EditorView, Mode, ScreenSize};

/// Draws the editor into the alternate screen with ratatui.
pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    gutter_width: u16,
}

impl TerminalDisplay {
    pub fn new(terminal: Terminal<CrosstermBackend<Stdout>>, view: &ViewSettings) -> Self {
        let gutter_width = if view.line_numbers { view.gutter_width } else { 0 };
        Self {
            terminal,
            gutter_width,
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Display for TerminalDisplay {
    fn text_area(&mut self) -> anyhow::Result<ScreenSize> {
        let size = self.terminal.size()?;
        let areas = Areas::split(Rect::new(0, 0, size.width, size.height), self.gutter_width);
        Ok(ScreenSize {
            width: areas.text.width as usize,
            height: areas.text.height as usize,
        })
    }

    fn draw(&mut self, view: &EditorView<'_>) -> anyhow::Result<()> {
        let gutter_width = self.gutter_width;
        self.terminal.draw(|frame| render(frame, view, gutter_width))?;
        Ok(())
    }
}

// ── Layout ───────────────────────────────────────────────────────────

/// The screen split into line-number gutter, text and status line.
struct Areas {
    gutter: Rect,
    text: Rect,
    status: Rect,
}

impl Areas {
    fn split(area: Rect, gutter_width: u16) -> Self {
        let body_height = area.height.saturating_sub(1);
        let gutter_width = gutter_width.min(area.width);
        Self {
            gutter: Rect {
                width: gutter_width,
                height: body_height,
                ..area
            },
            text: Rect {
                x: area.x + gutter_width,
                width: area.width - gutter_width,
                height: body_height,
                ..area
            },
            status: Rect {
                y: area.y + body_height,
                height: area.height.min(1),
                ..area
            },
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────────

fn render(frame: &mut Frame, view: &EditorView<'_>, gutter_width: u16) {
    let areas = Areas::split(frame.area(), gutter_width);
    let height = areas.text.height as usize;
    let width = (areas.text.width as usize).max(1);

    let mut gutter_lines: Vec<Line> = Vec::with_capacity(height);
    let mut text_lines: Vec<Line> = Vec::with_capacity(height);
    let number_width = (gutter_width as usize).saturating_sub(1);

    for (idx, start) in view.visible_lines() {
        let line = view.buffer.line(idx);
        let text = printable_text(line);
        let rows: Vec<String> = if view.viewport.wrap {
            let wrap_width = view.size.width.max(1);
            wrap_rows(&text, wrap_width, view.viewport.line_height(line, view.size))
        } else {
            vec![text.chars().skip(view.viewport.left_col).take(width).collect()]
        };

        // Rows must line up with the editor's cursor math.
        while text_lines.len() < start.min(height) {
            gutter_lines.push(Line::from(" ".repeat(gutter_width as usize)));
            text_lines.push(Line::from(""));
        }
        for (k, row) in rows.into_iter().enumerate() {
            if text_lines.len() >= height {
                break;
            }
            let number = if k == 0 {
                format!("{:>number_width$} ", idx + 1)
            } else {
                " ".repeat(gutter_width as usize)
            };
            gutter_lines.push(Line::from(Span::styled(
                number,
                Style::default().fg(Color::DarkGray),
            )));
            text_lines.push(Line::from(row));
        }
    }

    // Fill remaining lines with ~ (like vim)
    while text_lines.len() < height {
        if gutter_width > 0 {
            gutter_lines.push(Line::from(Span::styled(
                format!("{:>number_width$} ", "~"),
                Style::default().fg(Color::DarkGray),
            )));
            text_lines.push(Line::from(""));
        } else {
            text_lines.push(Line::from(Span::styled("~", Style::default().fg(Color::DarkGray))));
        }
    }

    frame.render_widget(Paragraph::new(gutter_lines), areas.gutter);
    frame.render_widget(Paragraph::new(text_lines), areas.text);
    frame.render_widget(Paragraph::new(status_line(view, areas.status.width)), areas.status);

    if let Some(pos) = cursor_position(view, &areas) {
        frame.set_cursor_position(pos);
    }
}

/// Split `text` into rows of `width`, padded with blank rows up to `height`.
///
/// A wrapped line reserves a row for its append position, so `height` can
/// exceed the number of chunks.
fn wrap_rows(text: &str, width: usize, height: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut rows: Vec<String> = chars.chunks(width).map(|c| c.iter().collect()).collect();
    while rows.len() < height.max(1) {
        rows.push(String::new());
    }
    rows
}

/// Command line, message or mode indicator on the left; pending count on the right.
fn status_line(view: &EditorView<'_>, width: u16) -> Line<'static> {
    let width = width as usize;
    let (left, style) = if let Some(line) = view.command_line {
        (line.text().to_string(), Style::default())
    } else if let Some(message) = view.message {
        let style = if message.starts_with("ERR:") {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        (message.to_string(), style)
    } else if view.mode == Mode::Insert {
        (format!("-- {} --", view.mode.label()), Style::default().fg(Color::Yellow))
    } else {
        (String::new(), Style::default())
    };

    let left = truncate_to_width(&left, width);
    let mut spans = vec![Span::styled(left.clone(), style)];

    if let Some(count) = view.pending_count {
        let count = count.to_string();
        let used = left.width() + count.width();
        if used < width {
            spans.push(Span::raw(" ".repeat(width - used)));
            spans.push(Span::styled(count, Style::default().fg(Color::DarkGray)));
        }
    }
    Line::from(spans)
}

fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

fn cursor_position(view: &EditorView<'_>, areas: &Areas) -> Option<Position> {
    let (x, y, area) = match (view.mode, view.command_line) {
        (Mode::Command, Some(line)) => {
            let typed = &line.text()[..line.cursor()];
            (typed.width(), 0, areas.status)
        }
        _ => {
            let point = view.screen_cursor();
            (point.col, point.row, areas.text)
        }
    };
    let (x, y) = (u16::try_from(x).ok()?, u16::try_from(y).ok()?);
    if x < area.width && y < area.height {
        Some(Position::new(area.x + x, area.y + y))
    } else {
        None
    }
}
