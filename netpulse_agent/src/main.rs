//! Agent entry point: samples one network interface and serves snapshots
//! over REST and a push WebSocket.

mod metrics;
mod sampler;
mod state;
mod types;
mod ws;

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use axum::{extract::State, response::Json, routing::get, Router};
use sysinfo::Networks;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use metrics::NetworkAnalytics;
use state::AppState;
use types::MetricsState;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_INTERVAL_MS: u64 = 1000;

#[derive(Debug)]
struct ParsedArgs {
    port: u16,
    interface: Option<String>,
    interval_ms: u64,
}

fn usage(prog: &str) -> String {
    format!("Usage: {prog} [--port PORT|-p PORT] [--interface NAME|-i NAME] [--interval-ms MS]")
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "netpulse_agent".into());
    let mut port = DEFAULT_PORT;
    let mut interface: Option<String> = None;
    let mut interval_ms = DEFAULT_INTERVAL_MS;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Err(usage(&prog));
            }
            "--port" | "-p" => match it.next().map(|v| v.parse::<u16>()) {
                Some(Ok(v)) => port = v,
                _ => return Err(format!("--port expects a number. {}", usage(&prog))),
            },
            "--interface" | "-i" => {
                interface = it.next();
            }
            "--interval-ms" => match it.next().map(|v| v.parse::<u64>()) {
                Some(Ok(v)) if v > 0 => interval_ms = v,
                _ => return Err(format!("--interval-ms expects a positive number. {}", usage(&prog))),
            },
            _ if arg.starts_with("--port=") => {
                match arg.split_once('=').and_then(|(_, v)| v.parse::<u16>().ok()) {
                    Some(v) => port = v,
                    None => return Err(format!("--port expects a number. {}", usage(&prog))),
                }
            }
            _ if arg.starts_with("--interface=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        interface = Some(v.to_string());
                    }
                }
            }
            _ => {
                return Err(format!("Unexpected argument {arg:?}. {}", usage(&prog)));
            }
        }
    }
    Ok(ParsedArgs {
        port,
        interface,
        interval_ms,
    })
}

// Explicit interface must exist; otherwise pick the busiest non-loopback one.
fn pick_interface(nets: &Networks, requested: Option<&str>) -> anyhow::Result<String> {
    let available: Vec<String> = nets.iter().map(|(name, _)| name.clone()).collect();
    match requested {
        Some(name) => {
            if available.iter().any(|n| n == name) {
                Ok(name.to_string())
            } else {
                bail!(
                    "interface '{}' not found. Available interfaces: {}",
                    name,
                    available.join(", ")
                );
            }
        }
        None => nets
            .iter()
            .filter(|(name, _)| name.as_str() != "lo")
            .max_by_key(|(_, data)| data.total_received() + data.total_transmitted())
            .map(|(name, _)| name.clone())
            .or_else(|| available.first().cloned())
            .context("no network interfaces found"),
    }
}

async fn get_metrics(State(state): State<AppState>) -> Json<Option<MetricsState>> {
    Json(state.analytics.read().await.metrics())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let nets = Networks::new_with_refreshed_list();
    let interface = pick_interface(&nets, parsed.interface.as_deref())?;
    info!(interface = %interface, interval_ms = parsed.interval_ms, "monitoring network interface");

    let state = AppState {
        nets: Arc::new(Mutex::new(nets)),
        analytics: Arc::new(RwLock::new(NetworkAnalytics::new(interface))),
    };

    sampler::spawn_sampler(state.clone(), Duration::from_millis(parsed.interval_ms));

    let app = Router::new()
        .route("/metrics", get(get_metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], parsed.port));
    info!(%addr, "agent listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind listener")?;
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_args;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("netpulse_agent")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn port_long_short_and_assign() {
        assert_eq!(parse_args(args(&["--port", "9001"])).unwrap().port, 9001);
        assert_eq!(parse_args(args(&["-p", "9002"])).unwrap().port, 9002);
        assert_eq!(parse_args(args(&["--port=9003"])).unwrap().port, 9003);
        assert_eq!(parse_args(args(&[])).unwrap().port, super::DEFAULT_PORT);
    }

    #[test]
    fn interface_forms() {
        let parsed = parse_args(args(&["-i", "wlan0"])).unwrap();
        assert_eq!(parsed.interface.as_deref(), Some("wlan0"));
        let parsed = parse_args(args(&["--interface=eth1"])).unwrap();
        assert_eq!(parsed.interface.as_deref(), Some("eth1"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(parse_args(args(&["--interval-ms", "0"])).is_err());
    }

    #[test]
    fn help_returns_usage() {
        let err = parse_args(args(&["--help"])).unwrap_err();
        assert!(err.contains("Usage:"));
        assert!(err.contains("--interface"));
    }
}
