//! Decoded shapes of the agent's JSON payload.

use chrono::{DateTime, Utc};

/// One measurement of an interface: cumulative counters plus derived rates.
///
/// Counters are monotonically non-decreasing between accepted snapshots
/// unless the interface resets; consumers must tolerate a decrease.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub bytes_per_second_in: f64,
    pub bytes_per_second_out: f64,
    /// Unit-scaled display strings, e.g. "12.30 KB/s". Taken from the wire
    /// when present, otherwise derived locally.
    pub transfer_rate_in: String,
    pub transfer_rate_out: String,
}

/// One decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsFrame {
    pub interface: String,
    pub current: Snapshot,
}
