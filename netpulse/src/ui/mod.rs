//! UI module root: panel layout and drawing for the dashboard.

pub mod cards;
pub mod chart;
pub mod header;
pub mod util;

use netpulse::model::PresentationModel;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Color;

use crate::ui::chart::draw_rate_spark;

pub fn draw(f: &mut ratatui::Frame<'_>, model: &PresentationModel) {
    let area = f.area();

    // Rows: header, metric cards, one sparkline per channel
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(4), // cards
            Constraint::Min(4),    // inbound rate
            Constraint::Min(4),    // outbound rate
        ])
        .split(area);

    header::draw_header(f, rows[0], model);
    cards::draw_cards(f, rows[1], model);

    let colors = [Color::Green, Color::Blue];
    for (i, channel) in model.series.channels.iter().take(2).enumerate() {
        draw_rate_spark(f, rows[2 + i], channel, colors[i]);
    }
}
