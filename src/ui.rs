use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::controller::Screen;
use crate::editor::{LineInput, TextBuffer};
use crate::keys::HELP_LINE;
use crate::models::NoteSummary;

const COLOR_SAND: Color = Color::Rgb(0xEB, 0xDB, 0xB2);
const COLOR_OLIVE: Color = Color::Rgb(0x98, 0x97, 0x1A);
const COLOR_MOSS: Color = Color::Rgb(0x67, 0x67, 0x1C);
const COLOR_MUTED: Color = Color::Rgb(0x9E, 0x9E, 0x9E);
const PROMPT: &str = "⚡ ";

pub struct UiState<'a> {
    pub screen: Screen<'a>,
    pub status: Option<&'a str>,
}

pub fn draw(f: &mut Frame<'_>, state: &UiState<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    draw_banner(f, layout[0]);

    match &state.screen {
        Screen::Idle => draw_idle(f, layout[1]),
        Screen::Prompt(input) => draw_prompt(f, input),
        Screen::Editor { name, buffer } => draw_editor(f, layout[1], name, buffer),
        Screen::List {
            notes,
            selected,
            filter,
        } => draw_list(f, layout[1], notes, *selected, *filter),
    }

    let footer_line = match state.status {
        Some(status) => Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(COLOR_SAND).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            HELP_LINE,
            Style::default()
                .fg(COLOR_MUTED)
                .add_modifier(Modifier::ITALIC),
        )),
    };
    let footer = Paragraph::new(footer_line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, layout[2]);
}

fn draw_banner(f: &mut Frame<'_>, area: Rect) {
    let banner = Paragraph::new(Line::from(Span::styled(
        "  Totion  ",
        Style::default()
            .fg(Color::Rgb(0x1D, 0x21, 0x10))
            .bg(COLOR_SAND)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::NONE))
    .alignment(Alignment::Left);
    let inner = Rect::new(area.x + 2, area.y + 1, area.width.saturating_sub(2), 1);
    f.render_widget(banner, inner.intersection(area));
}

fn draw_idle(f: &mut Frame<'_>, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from("No note open."),
        Line::from("Ctrl+N creates a note, Ctrl+L lists the vault."),
    ];
    let idle = Paragraph::new(lines)
        .style(Style::default().fg(COLOR_MUTED))
        .alignment(Alignment::Center);
    f.render_widget(idle, area);
}

fn centered_overlay_area(frame_size: Rect, lines: &[String]) -> Rect {
    let maxw = lines.iter().map(|s| s.chars().count()).max().unwrap_or(0) as u16 + 4;
    let maxh = lines.len() as u16 + 2;
    Rect::new(
        (frame_size.width.saturating_sub(maxw)) / 2,
        (frame_size.height.saturating_sub(maxh)) / 2,
        maxw.min(frame_size.width),
        maxh.min(frame_size.height),
    )
}

fn render_overlay(f: &mut Frame<'_>, lines: &[String], title: &str) -> Rect {
    let area = centered_overlay_area(f.size(), lines);
    let bg = Color::Rgb(0x1A, 0x1D, 0x12);
    let paragraph = Paragraph::new(
        lines
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect::<Vec<Line>>(),
    )
    .style(Style::default().fg(COLOR_SAND).bg(bg))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                title,
                Style::default().fg(COLOR_SAND).add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(COLOR_OLIVE).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(bg)),
    );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
    area
}

fn draw_prompt(f: &mut Frame<'_>, input: &LineInput) {
    let field = format!("{PROMPT}{}", input.value());
    // Pad so the box does not resize on every keystroke.
    let width = field.chars().count().max(50);
    let lines = vec![
        "What would be the file name?".to_string(),
        String::new(),
        format!("{field:<width$}"),
        String::new(),
        "Enter creates . Esc cancels".to_string(),
    ];
    let area = render_overlay(f, &lines, "New note");
    let x = area.x + 1 + (PROMPT.chars().count() + input.cursor()) as u16;
    let y = area.y + 3;
    if x < area.right() && y < area.bottom() {
        f.set_cursor(x, y);
    }
}

fn draw_editor(f: &mut Frame<'_>, area: Rect, name: &str, buffer: &TextBuffer) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {name} "),
            Style::default().fg(COLOR_SAND).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_MOSS));
    let inner = block.inner(area);
    let (row, col) = buffer.cursor();
    let width = usize::from(inner.width).max(1);
    let height = usize::from(inner.height).max(1);
    let cursor_x = display_width(&buffer.lines()[row], col);
    let (top, left) = viewport_offset(row, cursor_x, width, height);

    let lines: Vec<Line> = if buffer.is_empty() {
        vec![Line::from(Span::styled(
            "Write your thoughts...",
            Style::default()
                .fg(COLOR_MUTED)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        buffer
            .lines()
            .iter()
            .skip(top)
            .take(height)
            .map(|l| {
                let visible: String = expand_tabs(l).chars().skip(left).take(width).collect();
                Line::from(visible)
            })
            .collect()
    };
    f.render_widget(Paragraph::new(lines).block(block), area);

    let x = u16::try_from(cursor_x - left)
        .ok()
        .and_then(|dx| inner.x.checked_add(dx));
    let y = u16::try_from(row - top)
        .ok()
        .and_then(|dy| inner.y.checked_add(dy));
    if let (Some(x), Some(y)) = (x, y) {
        if x < inner.right() && y < inner.bottom() {
            f.set_cursor(x, y);
        }
    }
}

fn expand_tabs(line: &str) -> String {
    line.replace('\t', "    ")
}

/// Columns taken by the first `col` chars of `line` once tabs are expanded.
fn display_width(line: &str, col: usize) -> usize {
    line.chars()
        .take(col)
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// First visible `(row, column)` keeping the cursor inside a `width` x `height` view.
fn viewport_offset(row: usize, column: usize, width: usize, height: usize) -> (usize, usize) {
    (
        row.saturating_sub(height.saturating_sub(1)),
        column.saturating_sub(width.saturating_sub(1)),
    )
}

fn draw_list(
    f: &mut Frame<'_>,
    area: Rect,
    notes: &[&NoteSummary],
    selected: Option<usize>,
    filter: Option<&str>,
) {
    let title = match filter {
        Some(query) => format!(" Your Notes . filter: {query}_ "),
        None => " Your Notes ".to_string(),
    };
    let items: Vec<ListItem> = if notes.is_empty() {
        vec![ListItem::new("No notes")]
    } else {
        notes
            .iter()
            .map(|n| {
                ListItem::new(vec![
                    Line::from(n.name.clone()),
                    Line::from(Span::styled(
                        n.modified_label(),
                        Style::default().fg(COLOR_MUTED),
                    )),
                ])
            })
            .collect()
    };
    let mut list_state = ListState::default();
    list_state.select(selected);
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(Color::White)
                        .bg(COLOR_MOSS)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL),
        )
        .highlight_symbol("▶ ")
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .bg(Color::Rgb(40, 40, 40))
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn draw_editor_on(buffer: &TextBuffer) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| {
                let state = UiState {
                    screen: Screen::Editor {
                        name: "long.md",
                        buffer,
                    },
                    status: None,
                };
                draw(f, &state);
            })
            .unwrap();
        terminal
    }

    #[test]
    fn viewport_follows_cursor() {
        assert_eq!(viewport_offset(0, 0, 78, 12), (0, 0));
        assert_eq!(viewport_offset(11, 77, 78, 12), (0, 0));
        assert_eq!(viewport_offset(12, 78, 78, 12), (1, 1));
        assert_eq!(viewport_offset(5, 70_000, 78, 12), (0, 69_923));
    }

    #[test]
    fn display_width_expands_tabs() {
        assert_eq!(display_width("a\tb", 3), 6);
        assert_eq!(display_width("a\tb", 1), 1);
    }

    #[test]
    fn very_long_lines_keep_cursor_on_screen() {
        // Editor inner area on 80x20: x 1..79, y 4..16.
        for len in [65_535, 70_000] {
            let mut buffer = TextBuffer::from_text(&"a".repeat(len));
            buffer.move_end();
            let mut terminal = draw_editor_on(&buffer);
            assert_eq!(terminal.get_cursor().unwrap(), (78, 4), "line length {len}");
        }
    }

    #[test]
    fn cursor_tracks_rows_past_the_view() {
        let text = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut buffer = TextBuffer::from_text(&text);
        for _ in 0..99 {
            buffer.move_down();
        }
        let mut terminal = draw_editor_on(&buffer);
        assert_eq!(terminal.get_cursor().unwrap(), (1, 15));
    }
}
