//! Rate derivation from cumulative interface counters.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::types::{transfer_label, MetricsState, Snapshot};

/// Snapshots kept in the `recent` section of the payload.
pub const RECENT_CAP: usize = 20;

/// Rolling per-interface analytics: remembers the previous totals so each
/// update turns counter deltas into instantaneous rates.
pub struct NetworkAnalytics {
    interface: String,
    last: Option<(u64, u64, Instant)>,
    current: Option<Snapshot>,
    recent: VecDeque<Snapshot>,
}

impl NetworkAnalytics {
    pub fn new(interface: String) -> Self {
        Self {
            interface,
            last: None,
            current: None,
            recent: VecDeque::with_capacity(RECENT_CAP),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Record freshly sampled cumulative totals.
    pub fn update_from_counters(&mut self, rx_total: u64, tx_total: u64) {
        let now = Instant::now();
        let elapsed = self
            .last
            .map(|(_, _, at)| now.duration_since(at).as_secs_f64())
            .unwrap_or(0.0);
        self.apply_totals(rx_total, tx_total, elapsed, Utc::now());
        self.last = Some((rx_total, tx_total, now));
    }

    // Split out so the delta math is testable with a fixed clock.
    fn apply_totals(&mut self, rx_total: u64, tx_total: u64, elapsed_secs: f64, at: DateTime<Utc>) {
        // saturating_sub keeps an interface reset (counters jumping back to
        // zero) from producing absurd rates or a panic.
        let (bps_in, bps_out) = match self.last {
            Some((prev_rx, prev_tx, _)) => {
                let dt = elapsed_secs.max(1e-6);
                (
                    rx_total.saturating_sub(prev_rx) as f64 / dt,
                    tx_total.saturating_sub(prev_tx) as f64 / dt,
                )
            }
            None => (0.0, 0.0),
        };

        let snap = Snapshot {
            timestamp: at,
            bytes_received: rx_total,
            bytes_sent: tx_total,
            bytes_per_second_in: bps_in,
            bytes_per_second_out: bps_out,
            transfer_rate_in: transfer_label(bps_in),
            transfer_rate_out: transfer_label(bps_out),
        };

        if self.recent.len() == RECENT_CAP {
            self.recent.pop_front();
        }
        self.recent.push_back(snap.clone());
        self.current = Some(snap);
    }

    /// Payload for one push; `None` until the first sample lands.
    pub fn metrics(&self) -> Option<MetricsState> {
        self.current.as_ref().map(|current| MetricsState {
            interface: self.interface.clone(),
            current: current.clone(),
            recent: self.recent.iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn analytics_with_first_sample(rx: u64, tx: u64) -> NetworkAnalytics {
        let mut a = NetworkAnalytics::new("eth0".into());
        a.apply_totals(rx, tx, 0.0, Utc::now());
        a.last = Some((rx, tx, Instant::now()));
        a
    }

    #[test]
    fn first_sample_has_zero_rates() {
        let a = analytics_with_first_sample(1000, 500);
        let m = a.metrics().unwrap();
        assert_eq!(m.current.bytes_received, 1000);
        assert_eq!(m.current.bytes_per_second_in, 0.0);
        assert_eq!(m.current.transfer_rate_in, "0 KB/s");
    }

    #[test]
    fn rates_come_from_deltas_over_elapsed_time() {
        let mut a = analytics_with_first_sample(1000, 500);
        a.apply_totals(1000 + 2048, 500 + 512, 2.0, Utc::now());
        let m = a.metrics().unwrap();
        assert_eq!(m.current.bytes_per_second_in, 1024.0);
        assert_eq!(m.current.bytes_per_second_out, 256.0);
        assert_eq!(m.current.transfer_rate_in, "1.00 KB/s");
    }

    #[test]
    fn counter_reset_yields_zero_rates_not_a_panic() {
        let mut a = analytics_with_first_sample(1_000_000, 1_000_000);
        a.apply_totals(10, 10, 1.0, Utc::now());
        let m = a.metrics().unwrap();
        assert_eq!(m.current.bytes_per_second_in, 0.0);
        assert_eq!(m.current.bytes_received, 10);
    }

    #[test]
    fn recent_history_is_bounded() {
        let mut a = NetworkAnalytics::new("eth0".into());
        for i in 0..(RECENT_CAP as u64 + 10) {
            a.apply_totals(i * 100, i * 50, 1.0, Utc::now());
            a.last = Some((i * 100, i * 50, Instant::now()));
        }
        let m = a.metrics().unwrap();
        assert_eq!(m.recent.len(), RECENT_CAP);
        assert_eq!(
            m.recent.last().unwrap().bytes_received,
            m.current.bytes_received
        );
    }

    #[test]
    fn update_from_counters_tracks_wall_clock() {
        let mut a = NetworkAnalytics::new("eth0".into());
        a.update_from_counters(100, 100);
        std::thread::sleep(Duration::from_millis(20));
        a.update_from_counters(1124, 100);
        let m = a.metrics().unwrap();
        assert!(m.current.bytes_per_second_in > 0.0);
        assert_eq!(m.current.bytes_per_second_out, 0.0);
    }
}
