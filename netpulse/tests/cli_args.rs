//! CLI arg handling for the netpulse binary.

use assert_cmd::Command;

fn run(args: &[&str]) -> (bool, String) {
    let mut cmd = Command::cargo_bin("netpulse").unwrap();
    let output = cmd.args(args).output().expect("run netpulse");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), text)
}

#[test]
fn help_mentions_short_and_long_flags() {
    let (ok, text) = run(&["--help"]);
    assert!(ok, "netpulse --help did not succeed");
    assert!(
        text.contains("--capacity")
            && text.contains("-c")
            && text.contains("--reconnect")
            && text.contains("-r"),
        "help text missing expected flags (--capacity/-c, --reconnect/-r)\n{text}"
    );
}

#[test]
fn non_numeric_capacity_reports_usage() {
    let (_ok, text) = run(&["--capacity", "plenty"]);
    assert!(text.contains("expects a number"), "{text}");
    assert!(text.contains("Usage:"), "{text}");
}

#[test]
fn zero_capacity_fails_before_any_connection() {
    let (ok, text) = run(&["--capacity", "0", "ws://127.0.0.1:1/ws"]);
    assert!(!ok, "zero capacity should fail fast");
    assert!(text.contains("capacity"), "{text}");
}

#[test]
fn non_websocket_endpoint_fails_before_any_connection() {
    let (ok, text) = run(&["http://127.0.0.1:8000/metrics"]);
    assert!(!ok, "http endpoint should be rejected");
    assert!(text.contains("invalid endpoint"), "{text}");
}
