//! Metric cards: cumulative totals and the last refresh time.

use netpulse::model::PresentationModel;
use netpulse::rate::time_label;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::util::human;

pub fn draw_cards(f: &mut ratatui::Frame<'_>, area: Rect, model: &PresentationModel) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let (received, sent, refreshed) = match &model.current {
        Some(snap) => (
            human(snap.bytes_received),
            human(snap.bytes_sent),
            time_label(snap.timestamp),
        ),
        None => ("--".into(), "--".into(), "--".into()),
    };

    card(f, cols[0], "Bytes Received", &received);
    card(f, cols[1], "Bytes Sent", &sent);
    card(f, cols[2], "Last Refresh", &refreshed);
}

fn card(f: &mut ratatui::Frame<'_>, area: Rect, title: &str, value: &str) {
    let p = Paragraph::new(value.to_string())
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(p, area);
}
