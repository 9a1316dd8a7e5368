pub mod history;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use studytrack::{util::format_hms, HistoryStore, Mode, Status};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

fn status_style(status: Status) -> Style {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    match status {
        Status::Running => bold_style.fg(Color::Green),
        Status::Paused => bold_style.fg(Color::Yellow),
        Status::Idle => bold_style.add_modifier(Modifier::DIM),
    }
}

impl<S: HistoryStore> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.tracker.session();
        let status = session.status();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Study Tracker · {} ", session.mode()));
        let inner = outer.inner(area);
        outer.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(0),    // padding
                Constraint::Length(1), // target
                Constraint::Length(1), // clock
                Constraint::Length(1), // status
                Constraint::Length(1), // progress
                Constraint::Min(0),    // padding
                Constraint::Length(1), // today
                Constraint::Length(1), // message
                Constraint::Length(2), // legend
            ])
            .split(inner);

        if session.mode() == Mode::Timer {
            let selected = session.target_minutes();
            // a loaded run keeps its own length until it is stopped
            let loaded = (session.target_seconds() / 60) as u32;
            let target = if loaded == 0 || loaded == selected {
                format!("Target: {selected} min")
            } else {
                format!("Target: {loaded} min (next: {selected} min)")
            };
            Paragraph::new(Span::styled(target, dim_style))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);
        }

        Paragraph::new(Span::styled(session.current_display(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(status.to_string(), status_style(status)))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        if let Some(ratio) = session.progress() {
            Gauge::default()
                .gauge_style(Style::default().fg(Color::Magenta))
                .ratio(ratio.clamp(0.0, 1.0))
                .label(format!("{:.0}%", ratio * 100.0))
                .render(chunks[4], buf);
        }

        Paragraph::new(Line::from(vec![
            Span::styled("Today: ", dim_style),
            Span::styled(format_hms(self.today_seconds), bold_style),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

        if let Some(message) = &self.message {
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[7], buf);
        }

        let legend = match session.mode() {
            Mode::Stopwatch => "(s)tart / (p)ause / (space) toggle / (x) stop / (m)ode / (h)istory / (q)uit",
            Mode::Timer => "(s)tart / (p)ause / (x) stop / (↑↓) ±1 min / (PgUp/PgDn) ±10 min / (m)ode / (h)istory / (q)uit",
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[8], buf);
    }
}
