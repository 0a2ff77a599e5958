//! Display formatting for transfer rates and chart labels.

use chrono::{DateTime, Local, Utc};

const STEP: f64 = 1024.0;
const UNITS: [&str; 4] = ["B/s", "KB/s", "MB/s", "GB/s"];

/// Human-readable rate with a B/KB/MB/GB ladder and two decimals.
///
/// Zero, negative, and non-finite input all render "0 KB/s" so the chart's
/// y-axis caption stays on the baseline unit.
pub fn format_rate(bytes_per_second: f64) -> String {
    if !bytes_per_second.is_finite() || bytes_per_second <= 0.0 {
        return "0 KB/s".to_string();
    }
    let mut value = bytes_per_second;
    let mut unit = 0;
    while value >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Numeric KB/s used for the plotting channels, independent of the label.
pub fn to_kilobytes(bytes_per_second: f64) -> f64 {
    if bytes_per_second.is_finite() {
        bytes_per_second / STEP
    } else {
        0.0
    }
}

/// Local wall-clock label for the chart x-axis.
pub fn time_label(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}
