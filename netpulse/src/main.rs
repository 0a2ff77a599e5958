//! Entry point for the netpulse TUI. Parses args and runs the App.

mod app;
mod ui;

use std::env;

use app::App;
use netpulse::config::{RetryPolicy, SessionConfig, DEFAULT_CAPACITY, DEFAULT_ENDPOINT};
use netpulse::session::StreamSession;

#[derive(Debug)]
struct ParsedArgs {
    endpoint: Option<String>,
    capacity: Option<usize>,
    reconnect: bool,
}

fn usage(prog: &str) -> String {
    format!("Usage: {prog} [--capacity N|-c N] [--reconnect|-r] [ws://HOST:PORT/ws]")
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "netpulse".into());
    let mut endpoint: Option<String> = None;
    let mut capacity: Option<usize> = None;
    let mut reconnect = false;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Err(usage(&prog));
            }
            "--capacity" | "-c" => match it.next().map(|v| v.parse::<usize>()) {
                Some(Ok(v)) => capacity = Some(v),
                _ => return Err(format!("--capacity expects a number. {}", usage(&prog))),
            },
            "--reconnect" | "-r" => {
                reconnect = true;
            }
            _ if arg.starts_with("--capacity=") => {
                match arg.split_once('=').and_then(|(_, v)| v.parse::<usize>().ok()) {
                    Some(v) => capacity = Some(v),
                    None => return Err(format!("--capacity expects a number. {}", usage(&prog))),
                }
            }
            _ => {
                if endpoint.is_none() {
                    endpoint = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. {}", usage(&prog)));
                }
            }
        }
    }
    Ok(ParsedArgs {
        endpoint,
        capacity,
        reconnect,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    // Diagnostics go to stderr; redirect (2>netpulse.log) to keep the TUI clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig {
        endpoint: parsed
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        capacity: parsed.capacity.unwrap_or(DEFAULT_CAPACITY),
        reconnect: parsed.reconnect.then(RetryPolicy::default),
    };

    // Bad configuration fails here, before any connection attempt.
    let session = StreamSession::new(config)?;
    let app = App::new(&session);
    app.run(session).await
}
