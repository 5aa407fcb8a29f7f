// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Each connection is served by its own task. Frames are answered in the
//! order they arrive: `submit` gets `ack` or `rejected` for the same id,
//! `ping` gets `pong`, anything unparseable gets `error`.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use fq_core::protocol::{ClientMessage, ServerMessage};

use crate::state::{Outcome, RelayState};

/// Run the WebSocket server on an already-bound listener.
pub async fn run(
    listener: TcpListener,
    state: RelayState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Listening on: {}", listener.local_addr()?);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: RelayState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = handle_client_message(&text, &state).await;
                ws_sink.send(Message::Text(response.to_json()?.into())).await?;
            }
            Ok(Message::Ping(data)) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Ok(_) => {
                // Binary, Pong and raw frames carry nothing for us
            }
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    info!(
        "Connection closed: {} ({} operations applied)",
        peer_addr,
        state.applied_count().await
    );
    Ok(())
}

/// Process one client frame and produce its answer.
pub(crate) async fn handle_client_message(text: &str, state: &RelayState) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            debug!("Malformed frame: {}", e);
            return ServerMessage::error(format!("malformed message: {}", e));
        }
    };

    match msg {
        ClientMessage::Submit { record } => match state.apply(&record).await {
            Ok(Outcome::Applied) => {
                debug!("Applied {} {}", record.operation, record.id);
                ServerMessage::ack(record.id, false)
            }
            Ok(Outcome::Duplicate) => {
                debug!("Duplicate {}, already applied", record.id);
                ServerMessage::ack(record.id, true)
            }
            Ok(Outcome::Rejected(message)) => {
                info!("Rejected {}: {}", record.id, message);
                ServerMessage::rejected(record.id, message)
            }
            Err(e) => {
                error!("Failed to apply {}: {}", record.id, e);
                ServerMessage::error(e.to_string())
            }
        },

        ClientMessage::Ping { id } => {
            debug!("Ping received: {}", id);
            ServerMessage::pong(id)
        }
    }
}
