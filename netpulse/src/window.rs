//! Fixed-capacity sliding series backing the chart.

use std::collections::VecDeque;

use crate::config::ConfigError;

fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// One plotted series inside the window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Owned copy of the window contents handed to renderers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSnapshot {
    pub labels: Vec<String>,
    pub channels: Vec<ChannelSeries>,
}

/// Insertion-ordered label + per-channel value buffer with FIFO eviction.
///
/// `labels[i]` lines up with `channels[c].values[i]` for every channel; an
/// append grows all of them together or not at all.
#[derive(Debug)]
pub struct WindowBuffer {
    cap: usize,
    labels: VecDeque<String>,
    channels: Vec<(String, VecDeque<f64>)>,
}

impl WindowBuffer {
    pub fn new(capacity: usize, channel_names: &[&str]) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity(capacity));
        }
        Ok(Self {
            cap: capacity,
            labels: VecDeque::with_capacity(capacity),
            channels: channel_names
                .iter()
                .map(|name| (name.to_string(), VecDeque::with_capacity(capacity)))
                .collect(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Append one label and one value per channel; evicts the oldest entry
    /// once over capacity. A slice with the wrong arity is dropped whole so
    /// label/value alignment can never skew.
    pub fn append(&mut self, label: String, values: &[f64]) {
        if values.len() != self.channels.len() {
            debug_assert_eq!(values.len(), self.channels.len(), "channel arity mismatch");
            return;
        }
        push_capped(&mut self.labels, label, self.cap);
        for ((_, series), v) in self.channels.iter_mut().zip(values) {
            push_capped(series, *v, self.cap);
        }
    }

    pub fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot {
            labels: self.labels.iter().cloned().collect(),
            channels: self
                .channels
                .iter()
                .map(|(name, values)| ChannelSeries {
                    name: name.clone(),
                    values: values.iter().copied().collect(),
                })
                .collect(),
        }
    }
}
