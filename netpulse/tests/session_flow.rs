//! Session behavior: window sliding, bad-frame handling, stop semantics, and
//! an end-to-end run against a local WebSocket server.

use futures_util::SinkExt;
use netpulse::config::{RetryPolicy, SessionConfig};
use netpulse::decode::DecodeError;
use netpulse::session::{SessionError, SessionState, StreamSession};
use serde_json::json;
use std::time::Duration;

fn config(endpoint: &str, capacity: usize) -> SessionConfig {
    SessionConfig {
        endpoint: endpoint.to_string(),
        capacity,
        reconnect: None,
    }
}

// Distinct second-resolution timestamps so chart labels are unique per frame.
fn frame(i: u64) -> String {
    json!({
        "interface": "eth0",
        "current": {
            "timestamp": 1_748_779_200 + i,
            "bytes_received": 1024 * i,
            "bytes_sent": 512 * i,
            "bytes_per_second_in": 1024.0 + i as f64,
            "bytes_per_second_out": 512.0,
            "transfer_rate_in": "1.00 KB/s",
            "transfer_rate_out": "512.00 B/s"
        }
    })
    .to_string()
}

#[test]
fn new_session_is_idle_with_an_empty_series() {
    let session = StreamSession::new(config("ws://127.0.0.1:8000/ws", 20)).unwrap();
    assert_eq!(session.state(), SessionState::Idle);
    let model = session.model().get();
    assert_eq!(model.interface, "N/A");
    assert!(model.current.is_none());
    assert!(model.series.labels.is_empty());
    assert_eq!(model.series.channels.len(), 2);
}

#[test]
fn invalid_capacity_fails_before_connecting() {
    assert!(StreamSession::new(config("ws://127.0.0.1:8000/ws", 0)).is_err());
}

#[test]
fn window_slides_and_malformed_frames_leave_no_gap() {
    let mut session = StreamSession::new(config("ws://127.0.0.1:8000/ws", 20)).unwrap();

    for i in 1..=25 {
        session.ingest(&frame(i)).unwrap();
    }
    let before = session.model().get().series;
    assert_eq!(before.labels.len(), 20);

    // One malformed frame: dropped, window untouched
    let err = session.ingest("{ nope").unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPayload(_)));
    assert_eq!(session.dropped_frames(), 0); // ingest reports, run-loop counts
    assert_eq!(session.model().get().series, before);

    // One more valid frame: window stays full, newest label is frame #26
    session.ingest(&frame(26)).unwrap();
    let after = session.model().get().series;
    assert_eq!(after.labels.len(), 20);
    assert_ne!(after, before);
    // frame #26 carries timestamp base+26; its label differs from #25's
    assert_ne!(after.labels.last().unwrap(), before.labels.last().unwrap());
    for ch in &after.channels {
        assert_eq!(ch.values.len(), after.labels.len());
    }
    assert_eq!(after.channels[0].values.last().copied(), Some((1024.0 + 26.0) / 1024.0));
}

#[test]
fn frame_missing_a_rate_field_leaves_the_window_unchanged() {
    let mut session = StreamSession::new(config("ws://127.0.0.1:8000/ws", 20)).unwrap();
    session.ingest(&frame(1)).unwrap();
    let before = session.model().get().series;

    let mut v: serde_json::Value = serde_json::from_str(&frame(2)).unwrap();
    v["current"].as_object_mut().unwrap().remove("bytes_per_second_in");
    let err = session.ingest(&v.to_string()).unwrap_err();
    assert!(matches!(err, DecodeError::MissingField("bytes_per_second_in")));
    assert_eq!(session.model().get().series, before);
}

#[test]
fn stop_is_idempotent() {
    let session = StreamSession::new(config("ws://127.0.0.1:8000/ws", 20)).unwrap();
    let handle = session.handle();
    handle.stop();
    handle.stop();
    session.stop();
}

#[tokio::test]
async fn subscriber_sees_each_accepted_frame() {
    let mut session = StreamSession::new(config("ws://127.0.0.1:8000/ws", 20)).unwrap();
    let mut model = session.model();
    session.ingest(&frame(1)).unwrap();
    assert!(model.changed().await);
    let snap = model.get();
    assert_eq!(snap.interface, "eth0");
    assert_eq!(snap.current.as_ref().unwrap().bytes_received, 1024);
}

#[tokio::test]
async fn run_after_stop_returns_without_connecting() {
    // Endpoint that would refuse anyway; stop() first means no attempt is made.
    let session = StreamSession::new(config("ws://127.0.0.1:1/ws", 20)).unwrap();
    session.stop();
    session.run().await.unwrap();
}

#[tokio::test]
async fn connection_refused_without_retry_is_a_transport_error() {
    let session = StreamSession::new(config("ws://127.0.0.1:1/ws", 20)).unwrap();
    let err = session.run().await.unwrap_err();
    assert!(matches!(err, SessionError::Transport(_)));
}

#[tokio::test]
async fn retry_policy_bounds_reconnect_attempts() {
    let cfg = SessionConfig {
        endpoint: "ws://127.0.0.1:1/ws".into(),
        capacity: 20,
        reconnect: Some(RetryPolicy {
            max_attempts: 2,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(20),
        }),
    };
    let session = StreamSession::new(cfg).unwrap();
    let err = session.run().await.unwrap_err();
    assert!(matches!(err, SessionError::Transport(_)));
}

#[tokio::test]
async fn end_to_end_fills_the_model_and_closes_cleanly() {
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Push three frames, then close like an agent shutting down.
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        for i in 1..=3 {
            ws.send(Message::Text(frame(i))).await.unwrap();
        }
        ws.close(None).await.unwrap();
    });

    let session = StreamSession::new(config(&format!("ws://{addr}/ws"), 20)).unwrap();
    let model = session.model();
    session.run().await.unwrap();
    server.await.unwrap();

    let snap = model.get();
    assert_eq!(snap.interface, "eth0");
    assert_eq!(snap.series.labels.len(), 3);
    assert_eq!(snap.current.as_ref().unwrap().bytes_sent, 512 * 3);
}
