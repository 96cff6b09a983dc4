use fieldfit_engine::{LineCursor, TextControl, label_visible};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::App;

/// Rows of error text the status line can hold before it is cut off.
const STATUS_HEIGHT: u16 = 2;

pub fn draw(f: &mut Frame, app: &App) {
    // Margin and border take two columns each side
    let inner_width = usize::from(f.area().width.saturating_sub(4)).max(1);
    let content_rows = screen_rows(app, inner_width)
        .len()
        .max(app.buffer.rows())
        .max(1);
    let textarea_height = u16::try_from(content_rows)
        .unwrap_or(u16::MAX)
        .saturating_add(2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(textarea_height),
                Constraint::Length(STATUS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    draw_textarea(f, app, chunks[0]);
    draw_status(f, app, chunks[1]);
    draw_fields(f, app, chunks[2]);

    let help = Line::from(vec![
        Span::raw("Esc: Quit | "),
        Span::raw("Tab: Focus | "),
        Span::raw("F2/F3: Chars per line -/+ | "),
        Span::raw("F4/F5: Lines -/+ | "),
        Span::raw("Ctrl+S: Save limits"),
    ]);
    f.render_widget(Paragraph::new(vec![help]), chunks[3]);
}

fn draw_textarea(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.field.is_focused();
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let constraints = app.field.constraints();
    let title = if label_visible(app.buffer.value()) {
        format!(
            "Text ({} lines × {} chars)",
            constraints.max_lines, constraints.max_chars_per_line
        )
    } else {
        String::new()
    };

    let inner_width = usize::from(area.width.saturating_sub(2)).max(1);
    let inner_height = usize::from(area.height.saturating_sub(2)).max(1);
    let (row, col) = visual_position(app, inner_width);
    // Scroll so the caret row stays inside the border
    let scroll = row.saturating_sub(inner_height - 1);

    let lines: Vec<Line> = screen_rows(app, inner_width)
        .into_iter()
        .map(Line::from)
        .collect();
    let textarea = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(textarea, area);

    if focused {
        let x = (area.x + 1).saturating_add(u16::try_from(col).unwrap_or(u16::MAX));
        let y = (area.y + 1).saturating_add(u16::try_from(row - scroll).unwrap_or(u16::MAX));
        if x < area.right() && y < area.bottom() {
            f.set_cursor_position((x, y));
        }
    }
}

/// Hard-wraps one line every `width` chars. A line whose length is a
/// multiple of `width` ends with an empty row to hold the caret.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut rows: Vec<String> = chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect();
    if chars.len() % width == 0 {
        rows.push(String::new());
    }
    rows
}

/// Every line of the buffer, wrapped to the textarea width.
fn screen_rows(app: &App, width: usize) -> Vec<String> {
    app.buffer
        .lines()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

/// Caret position on screen once long lines wrap at `width` columns.
fn visual_position(app: &App, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let LineCursor { row, col } = app.buffer.cursor();
    let rows_above: usize = app
        .buffer
        .lines()
        .take(row)
        .map(|line| line.chars().count() / width + 1)
        .sum();
    (rows_above + col / width, col % width)
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let status = match app.buffer.status() {
        Some(status) if status.is_error() => Span::styled(
            status.to_string(),
            Style::default().fg(Color::Red),
        ),
        Some(status) => {
            let lines = app.last_result.as_ref().map_or(0, |r| r.line_count());
            Span::raw(format!(
                "{status} characters, {lines}/{} lines",
                app.field.constraints().max_lines
            ))
        }
        None => Span::raw(""),
    };
    f.render_widget(
        Paragraph::new(Line::from(status)).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_fields(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .field_rows()
        .iter()
        .map(|row| ListItem::new(Line::from(row.to_string())))
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Fields"));
    f.render_widget(list, area);
}
