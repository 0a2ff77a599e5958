//! Shared agent state: the sysinfo handle and rolling analytics.

use std::sync::Arc;

use sysinfo::Networks;
use tokio::sync::{Mutex, RwLock};

use crate::metrics::NetworkAnalytics;

pub type SharedNetworks = Arc<Mutex<Networks>>;
pub type SharedAnalytics = Arc<RwLock<NetworkAnalytics>>;

#[derive(Clone)]
pub struct AppState {
    // Persistent sysinfo handle so counter totals accumulate across refreshes
    pub nets: SharedNetworks,
    pub analytics: SharedAnalytics,
}
