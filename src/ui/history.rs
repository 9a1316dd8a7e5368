use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use studytrack::{util::format_hms, HistoryStore};

use crate::App;

/// Days studied under half an hour are dimmed, over two hours highlighted
const LIGHT_DAY_SECS: u64 = 30 * 60;
const HEAVY_DAY_SECS: u64 = 2 * 3600;

fn day_color(seconds: u64) -> Color {
    if seconds < LIGHT_DAY_SECS {
        Color::Gray
    } else if seconds < HEAVY_DAY_SECS {
        Color::White
    } else {
        Color::Green
    }
}

/// Pure presenter for a single history row
pub fn present_row(day: &str, seconds: u64) -> Row<'static> {
    Row::new(vec![
        Cell::from(day.to_string()),
        Cell::from(format_hms(seconds)).style(Style::default().fg(day_color(seconds))),
    ])
}

pub fn render_history<S: HistoryStore>(app: &mut App<S>, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // History table
            Constraint::Length(2), // Instructions
        ])
        .split(area);

    let state = &mut app.history_state;

    let days = match state.rows.len() {
        1 => "1 day".to_string(),
        n => format!("{n} days"),
    };
    let title = Paragraph::new(format!("{days} · {} total", format_hms(state.total_seconds)))
    .block(Block::default().borders(Borders::ALL).title("History"))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if state.rows.is_empty() {
        let no_data = Paragraph::new("No study sessions recorded yet. Stop a session to save it.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        // Account for borders and header
        let table_height = chunks[1].height.saturating_sub(3) as usize;
        let max_scroll = state.rows.len().saturating_sub(table_height);
        if state.scroll_offset > max_scroll {
            state.scroll_offset = max_scroll;
        }

        let header = Row::new(vec![Cell::from("Date"), Cell::from("Time Studied")]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let visible_rows: Vec<Row> = state
            .rows
            .iter()
            .skip(state.scroll_offset)
            .take(table_height)
            .map(|(day, seconds)| present_row(day, *seconds))
            .collect();

        let widths = [Constraint::Length(12), Constraint::Min(12)];

        let table = Table::new(visible_rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Daily totals"))
            .column_spacing(2);

        f.render_widget(table, chunks[1]);
    }

    let instructions =
        Paragraph::new("(↑/↓) scroll  (PgUp/PgDn) page  (Home) top  (h/b) back  (q) quit")
            .alignment(Alignment::Center)
            .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}
