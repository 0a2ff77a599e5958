//! Presentation model: the read side consumed by renderers.

use tokio::sync::watch;

use crate::types::Snapshot;
use crate::window::SeriesSnapshot;

/// Everything a renderer needs to draw one frame of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationModel {
    pub interface: String,
    pub current: Option<Snapshot>,
    pub series: SeriesSnapshot,
}

impl Default for PresentationModel {
    fn default() -> Self {
        Self {
            interface: "N/A".to_string(),
            current: None,
            series: SeriesSnapshot::default(),
        }
    }
}

/// Publisher half, owned by the session.
#[derive(Debug)]
pub(crate) struct ModelPublisher {
    tx: watch::Sender<PresentationModel>,
}

impl ModelPublisher {
    pub(crate) fn publish(&self, model: PresentationModel) {
        self.tx.send_replace(model);
    }

    pub(crate) fn subscribe(&self) -> ModelHandle {
        ModelHandle {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read handle for renderers. Cloning subscribes, dropping unsubscribes.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    rx: watch::Receiver<PresentationModel>,
}

impl ModelHandle {
    /// Latest published model.
    pub fn get(&self) -> PresentationModel {
        self.rx.borrow().clone()
    }

    /// Wait for the next update. Returns `false` once the session has torn
    /// down and no further notifications will ever fire.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

pub(crate) fn channel(initial: PresentationModel) -> (ModelPublisher, ModelHandle) {
    let (tx, rx) = watch::channel(initial);
    (ModelPublisher { tx }, ModelHandle { rx })
}
