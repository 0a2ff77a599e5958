//! Background sampler: refreshes the interface counters on a fixed period.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tracing::warn;

use crate::state::AppState;

pub fn spawn_sampler(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        loop {
            ticker.tick().await;

            let interface = state.analytics.read().await.interface().to_string();
            let totals = {
                let mut nets = state.nets.lock().await;
                nets.refresh();
                nets.iter()
                    .find(|(name, _)| name.as_str() == interface)
                    .map(|(_, data)| (data.total_received(), data.total_transmitted()))
            };

            match totals {
                Some((rx, tx)) => state.analytics.write().await.update_from_counters(rx, tx),
                // e.g. USB NIC unplugged; keep sampling, it may come back
                None => warn!(interface = %interface, "interface missing from refresh"),
            }
        }
    })
}
