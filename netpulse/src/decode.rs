//! Structural decoding of inbound frames.
//!
//! Validation here is shape-only: a frame is rejected when it does not parse
//! or when a required field is absent. Semantic oddities (counter resets,
//! negative or NaN rates) pass through untouched; downstream formatting is
//! responsible for rendering them safely.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::rate::format_rate;
use crate::types::{MetricsFrame, Snapshot};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::MalformedPayload(e.to_string())
    }
}

// Raw mirrors with every field optional, so absence maps to MissingField
// rather than a generic parse error.

#[derive(Debug, Deserialize)]
struct RawFrame {
    interface: Option<String>,
    current: Option<RawSnapshot>,
    // `recent` is server-provided history; the window is built locally, so
    // it is not deserialized at all.
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    timestamp: Option<RawTimestamp>,
    bytes_received: Option<i64>,
    bytes_sent: Option<i64>,
    bytes_per_second_in: Option<f64>,
    bytes_per_second_out: Option<f64>,
    transfer_rate_in: Option<String>,
    transfer_rate_out: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Epoch(f64),
    Text(String),
}

fn resolve_timestamp(raw: RawTimestamp) -> Result<DateTime<Utc>, DecodeError> {
    match raw {
        RawTimestamp::Epoch(v) => {
            if !v.is_finite() {
                return Err(DecodeError::MalformedPayload(
                    "non-finite epoch timestamp".into(),
                ));
            }
            // epoch seconds, or milliseconds once past ~2001-09 in ms terms
            let millis = if v.abs() >= 1e12 { v } else { v * 1000.0 };
            DateTime::<Utc>::from_timestamp_millis(millis as i64)
                .ok_or_else(|| DecodeError::MalformedPayload("epoch timestamp out of range".into()))
        }
        RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| DecodeError::MalformedPayload(format!("bad timestamp {s:?}: {e}"))),
    }
}

/// Decode one textual transport message into a validated frame.
pub fn decode(raw: &str) -> Result<MetricsFrame, DecodeError> {
    let frame: RawFrame = serde_json::from_str(raw)?;
    let current = frame.current.ok_or(DecodeError::MissingField("current"))?;

    let timestamp = current
        .timestamp
        .ok_or(DecodeError::MissingField("current.timestamp"))
        .and_then(resolve_timestamp)?;
    let bytes_received = current
        .bytes_received
        .ok_or(DecodeError::MissingField("bytes_received"))?
        .max(0) as u64;
    let bytes_sent = current
        .bytes_sent
        .ok_or(DecodeError::MissingField("bytes_sent"))?
        .max(0) as u64;
    let bytes_per_second_in = current
        .bytes_per_second_in
        .ok_or(DecodeError::MissingField("bytes_per_second_in"))?;
    let bytes_per_second_out = current
        .bytes_per_second_out
        .ok_or(DecodeError::MissingField("bytes_per_second_out"))?;

    let transfer_rate_in = current
        .transfer_rate_in
        .unwrap_or_else(|| format_rate(bytes_per_second_in));
    let transfer_rate_out = current
        .transfer_rate_out
        .unwrap_or_else(|| format_rate(bytes_per_second_out));

    Ok(MetricsFrame {
        interface: frame.interface.unwrap_or_else(|| "N/A".to_string()),
        current: Snapshot {
            timestamp,
            bytes_received,
            bytes_sent,
            bytes_per_second_in,
            bytes_per_second_out,
            transfer_rate_in,
            transfer_rate_out,
        },
    })
}
