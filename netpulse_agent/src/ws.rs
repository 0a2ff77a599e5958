//! WebSocket upgrade and per-connection push loop.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::stream::StreamExt;
use tokio::time::{interval, Duration};
use tracing::{debug, error};

use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

// Push one payload per second until the peer goes away.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut ticker = interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let payload = state.analytics.read().await.metrics();
                // Nothing to push until the sampler has landed a snapshot
                let Some(payload) = payload else { continue };
                match serde_json::to_string(&payload) {
                    Ok(json) => {
                        if socket.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => error!(error = %err, "serializing metrics payload"),
                }
            }
            msg = socket.next() => match msg {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // inbound frames are not part of the protocol
                Some(Err(_)) => break,
            }
        }
    }
    debug!("dashboard client disconnected");
}
