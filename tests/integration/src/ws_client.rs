//! WebSocket test client for protocol testing
//!
//! Provides both low-level `WsConnection` and high-level `RelayClient`.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Default wait for a message that is expected to arrive
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Window used to assert that nothing arrives
pub const QUIET_WINDOW: Duration = Duration::from_millis(200);

/// Low-level WebSocket connection
pub struct WsConnection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
}

impl WsConnection {
    /// Connect to the relay endpoint
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let url = format!("ws://{addr}/gateway");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .with_context(|| format!("Failed to connect to {url}"))?;
        let (sink, stream) = ws.split();
        Ok(Self { sink, stream })
    }

    /// Send raw text frame
    pub async fn send_raw(&mut self, msg: &str) -> Result<()> {
        self.sink.send(Message::Text(msg.to_string().into())).await?;
        Ok(())
    }

    /// Send a binary frame
    pub async fn send_binary(&mut self, data: Vec<u8>) -> Result<()> {
        self.sink.send(Message::Binary(data.into())).await?;
        Ok(())
    }

    /// Send JSON message
    pub async fn send_json(&mut self, msg: &Value) -> Result<()> {
        self.send_raw(&msg.to_string()).await
    }

    /// Receive the next text frame, or `None` once the server closes
    pub async fn recv_text(&mut self) -> Option<String> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.to_string()),
                Some(Ok(Message::Close(_)) | Err(_)) | None => return None,
                Some(Ok(_)) => {}
            }
        }
    }

    /// Receive with timeout
    ///
    /// Outer `None` means nothing arrived in time; inner `None` means the
    /// connection closed.
    pub async fn recv_timeout(&mut self, duration: Duration) -> Option<Option<String>> {
        tokio::time::timeout(duration, self.recv_text()).await.ok()
    }

    /// Send a close frame
    pub async fn close(&mut self) -> Result<()> {
        self.sink.send(Message::Close(None)).await?;
        Ok(())
    }
}

/// High-level test client speaking the relay protocol
pub struct RelayClient {
    pub conn: WsConnection,
    /// ID assigned by the relay in Hello
    pub id: String,
    /// Advertised heartbeat interval from Hello
    pub heartbeat_interval: u64,
    /// `d` of the SNAPSHOT received right after Hello
    pub snapshot: Value,
}

impl RelayClient {
    /// Connect to the relay (consumes Hello and the initial snapshot)
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let mut conn = WsConnection::connect(addr).await?;

        let hello = recv_frame(&mut conn).await?;
        anyhow::ensure!(hello["op"] == 10, "Expected Hello first, got: {hello}");
        let id = hello["d"]["session_id"]
            .as_str()
            .context("Hello without session_id")?
            .to_string();
        let heartbeat_interval = hello["d"]["heartbeat_interval"]
            .as_u64()
            .context("Hello without heartbeat_interval")?;

        let snapshot = recv_frame(&mut conn).await?;
        anyhow::ensure!(
            snapshot["op"] == 0 && snapshot["t"] == "SNAPSHOT",
            "Expected SNAPSHOT after Hello, got: {snapshot}"
        );

        Ok(Self {
            conn,
            id,
            heartbeat_interval,
            snapshot: snapshot["d"].clone(),
        })
    }

    /// Report a new position and facing
    pub async fn send_move(&mut self, x: f64, y: f64, z: f64, facing: f64) -> Result<()> {
        self.conn
            .send_json(&json!({
                "op": 2,
                "d": {"position": {"x": x, "y": y, "z": z}, "facing": facing}
            }))
            .await
    }

    /// Send a chat line
    pub async fn send_chat(&mut self, text: &str) -> Result<()> {
        self.conn
            .send_json(&json!({"op": 3, "d": {"text": text}}))
            .await
    }

    /// Send a heartbeat
    pub async fn send_heartbeat(&mut self) -> Result<()> {
        self.conn.send_json(&json!({"op": 1})).await
    }

    /// Receive the next frame as JSON
    pub async fn recv(&mut self) -> Result<Value> {
        recv_frame(&mut self.conn).await
    }

    /// Receive the next frame and check it is the given dispatch event
    ///
    /// Returns the event's `d`.
    pub async fn recv_event(&mut self, event: &str) -> Result<Value> {
        let frame = self.recv().await?;
        anyhow::ensure!(
            frame["op"] == 0 && frame["t"] == event,
            "Expected {event}, got: {frame}"
        );
        Ok(frame["d"].clone())
    }

    /// Assert no message arrives within the quiet window
    pub async fn expect_no_message(&mut self) {
        if let Some(Some(text)) = self.conn.recv_timeout(QUIET_WINDOW).await {
            panic!("Expected no message but received: {text}");
        }
    }

    /// Wait until the server closes the connection
    pub async fn expect_closed(&mut self, within: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + within;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match self.conn.recv_timeout(remaining).await {
                Some(None) => return Ok(()),
                Some(Some(_)) => {}
                None => anyhow::bail!("Connection still open after {within:?}"),
            }
        }
    }

    /// Close the connection from the client side
    pub async fn close(mut self) -> Result<()> {
        self.conn.close().await
    }
}

async fn recv_frame(conn: &mut WsConnection) -> Result<Value> {
    let text = conn
        .recv_timeout(RECV_TIMEOUT)
        .await
        .context("Timed out waiting for a message")?
        .context("Connection closed while waiting for a message")?;
    Ok(serde_json::from_str(&text)?)
}
