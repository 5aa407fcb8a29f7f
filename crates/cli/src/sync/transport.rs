// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket transport to the fq-remote relay.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use fq_core::protocol::{ClientMessage, ServerMessage};
use fq_core::{OperationRecord, RemoteTransport, TransportError, TransportFuture, TransportResult};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Internal WebSocket connection wrapper.
struct WebSocketConnection {
    sink: futures_util::stream::SplitSink<WsStream, Message>,
    stream: futures_util::stream::SplitStream<WsStream>,
}

/// Delivers records over a WebSocket, one submit at a time.
///
/// The connection is opened on first use and dropped after any failure
/// other than a rejection; the next send reconnects.
pub struct WebSocketTransport {
    url: String,
    ws: Mutex<Option<WebSocketConnection>>,
}

impl WebSocketTransport {
    pub fn new(url: impl Into<String>) -> Self {
        WebSocketTransport {
            url: url.into(),
            ws: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn is_connected(&self) -> bool {
        self.ws.lock().await.is_some()
    }

    /// Closes the connection if one is open.
    pub async fn close(&self) {
        if let Some(mut ws) = self.ws.lock().await.take() {
            // Peer may already be gone
            let _ = ws.sink.close().await;
        }
    }
}

async fn connect(url: &str) -> TransportResult<WebSocketConnection> {
    let (ws_stream, _) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
    let (sink, stream) = ws_stream.split();
    debug!(url, "connected to remote");
    Ok(WebSocketConnection { sink, stream })
}

/// Sends one submit and waits for the answer carrying the record's id.
async fn exchange(ws: &mut WebSocketConnection, record: &OperationRecord) -> TransportResult<()> {
    let json = ClientMessage::submit(record.clone())
        .to_json()
        .map_err(|e| TransportError::Serialization(e.to_string()))?;

    ws.sink
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| TransportError::SendFailed(e.to_string()))?;

    loop {
        match ws.stream.next().await {
            Some(Ok(Message::Text(text))) => {
                let msg = ServerMessage::from_json(&text)
                    .map_err(|e| TransportError::Serialization(e.to_string()))?;
                match msg {
                    ServerMessage::Ack { id, duplicate } if id == record.id => {
                        if duplicate {
                            debug!(%id, "remote already had operation");
                        }
                        return Ok(());
                    }
                    ServerMessage::Rejected { id, message } if id == record.id => {
                        return Err(TransportError::Rejected { id, message });
                    }
                    ServerMessage::Error { message } => {
                        return Err(TransportError::ReceiveFailed(format!(
                            "remote error: {message}"
                        )));
                    }
                    // Late answer to an abandoned request, or a pong
                    other => debug!(?other, "skipping unrelated message"),
                }
            }
            Some(Ok(Message::Close(_))) | None => return Err(TransportError::ConnectionClosed),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
        }
    }
}

impl RemoteTransport for WebSocketTransport {
    fn send<'a>(&'a self, record: &'a OperationRecord) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            let mut guard = self.ws.lock().await;
            if guard.is_none() {
                *guard = Some(connect(&self.url).await?);
            }
            let Some(ws) = guard.as_mut() else {
                return Err(TransportError::ConnectionClosed);
            };

            let result = exchange(ws, record).await;
            if let Err(e) = &result {
                if !matches!(e, TransportError::Rejected { .. }) {
                    // Connection state unknown, reconnect next time
                    *guard = None;
                }
            }
            result
        })
    }
}
