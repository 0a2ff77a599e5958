//! Session configuration and fail-fast validation.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default window size, matching the dashboard chart.
pub const DEFAULT_CAPACITY: usize = 20;

/// Default agent endpoint.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8000/ws";

/// Configuration problems detected before any connection attempt.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("window capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    #[error("invalid endpoint {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Bounded exponential backoff for reconnect attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given attempt (1-based): doubles per attempt, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exp)
            .min(self.max_backoff)
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket endpoint of the metrics source.
    pub endpoint: String,
    /// Window buffer capacity (chart points kept per channel).
    pub capacity: usize,
    /// Reconnect policy; `None` gives up on the first transport error.
    pub reconnect: Option<RetryPolicy>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            capacity: DEFAULT_CAPACITY,
            reconnect: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }
        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "ws" | "wss" => Ok(()),
            other => Err(ConfigError::InvalidEndpoint {
                url: self.endpoint.clone(),
                reason: format!("unsupported scheme {other:?}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let cfg = SessionConfig {
            capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn non_websocket_scheme_rejected() {
        let cfg = SessionConfig {
            endpoint: "http://127.0.0.1:8000/ws".into(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(4),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3), Duration::from_secs(2));
        assert_eq!(policy.delay_for(4), Duration::from_secs(4));
        assert_eq!(policy.delay_for(9), Duration::from_secs(4));
    }
}
