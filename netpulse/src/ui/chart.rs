//! Per-channel rate sparklines.

use netpulse::window::ChannelSeries;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Sparkline},
};

pub fn draw_rate_spark(f: &mut ratatui::Frame<'_>, area: Rect, channel: &ChannelSeries, color: Color) {
    // Sparkline wants u64 buckets; clamp negatives from hostile payloads.
    let data: Vec<u64> = {
        let max_points = area.width.saturating_sub(2) as usize;
        let start = channel.values.len().saturating_sub(max_points);
        channel.values[start..]
            .iter()
            .map(|v| v.max(0.0).round() as u64)
            .collect()
    };

    let now = channel.values.last().copied().unwrap_or(0.0).max(0.0);
    let peak = channel.values.iter().copied().fold(0.0_f64, f64::max);
    let title = format!("{} — now: {:.2} | peak: {:.2}", channel.name, now, peak);

    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .style(Style::default().fg(color));
    f.render_widget(spark, area);
}
