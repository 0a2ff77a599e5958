//! Top header with interface name and current transfer rates.

use netpulse::model::PresentationModel;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, model: &PresentationModel) {
    let title = match &model.current {
        Some(snap) => format!(
            "netpulse — {} | in: {} | out: {}  (press 'q' to quit)",
            model.interface, snap.transfer_rate_in, snap.transfer_rate_out
        ),
        None => "netpulse — connecting... (press 'q' to quit)".to_string(),
    };
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
