//! Wire types pushed to dashboard clients.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One measurement of the monitored interface. Counters are cumulative since
/// the agent started; rates are derived from counter deltas.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub bytes_per_second_in: f64,
    pub bytes_per_second_out: f64,
    pub transfer_rate_in: String,
    pub transfer_rate_out: String,
}

/// Full payload: the latest snapshot plus a short recent history.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsState {
    pub interface: String,
    pub current: Snapshot,
    pub recent: Vec<Snapshot>,
}

const STEP: f64 = 1024.0;
const UNITS: [&str; 4] = ["B/s", "KB/s", "MB/s", "GB/s"];

/// Unit-scaled rate label; zero and junk input stay on the KB/s baseline so
/// the dashboard caption never flips units at rest.
pub fn transfer_label(bytes_per_second: f64) -> String {
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
