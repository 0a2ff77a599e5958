//! Minimal WebSocket client helper for the metrics stream.

use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Connect to the metrics source; the agent starts pushing on its own.
pub async fn connect(url: &str) -> Result<WsStream, tungstenite::Error> {
    let (ws, _) = connect_async(url).await?;
    Ok(ws)
}
