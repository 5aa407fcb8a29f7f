// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the WebSocket transport against an in-process relay.

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use fq_core::protocol::{ClientMessage, ServerMessage};
use fq_core::{
    generate_op_id, OpId, OpKind, OperationRecord, RemoteTransport, TransportError,
};

use super::transport::WebSocketTransport;

fn record(sequence: u64) -> OperationRecord {
    let now = Utc::now();
    let kind = OpKind::CreatePatient;
    OperationRecord::new(
        generate_op_id(&kind, &now, sequence),
        kind,
        json!({"name": format!("patient {sequence}")}),
        now,
    )
}

/// Accepts one connection and answers each submit with `answer(record)`.
///
/// An empty answer closes the connection. Resolves to every client
/// message received.
async fn spawn_relay<F>(answer: F) -> (String, JoinHandle<Vec<ClientMessage>>)
where
    F: Fn(&OperationRecord) -> Vec<ServerMessage> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut received = Vec::new();
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        while let Some(Ok(Message::Text(text))) = ws.next().await {
            let msg = ClientMessage::from_json(&text).unwrap();
            let replies = match &msg {
                ClientMessage::Submit { record } => answer(record),
                ClientMessage::Ping { id } => vec![ServerMessage::pong(*id)],
            };
            received.push(msg);
            if replies.is_empty() {
                let _ = ws.close(None).await;
                break;
            }
            for reply in replies {
                ws.send(Message::Text(reply.to_json().unwrap().into()))
                    .await
                    .unwrap();
            }
        }
        received
    });

    (url, handle)
}

#[tokio::test]
async fn ack_completes_send_and_connection_is_reused() {
    let (url, relay) = spawn_relay(|r| vec![ServerMessage::ack(r.id.clone(), false)]).await;
    let transport = WebSocketTransport::new(url);
    assert!(!transport.is_connected().await);

    let first = record(1);
    let second = record(2);
    transport.send(&first).await.unwrap();
    transport.send(&second).await.unwrap();
    assert!(transport.is_connected().await);

    transport.close().await;
    let received = relay.await.unwrap();
    assert_eq!(
        received,
        vec![ClientMessage::submit(first), ClientMessage::submit(second)]
    );
}

#[tokio::test]
async fn rejection_is_reported_and_connection_kept() {
    let (url, relay) = spawn_relay(|r| {
        if r.payload["name"] == "patient 1" {
            vec![ServerMessage::rejected(r.id.clone(), "duplicate patient")]
        } else {
            vec![ServerMessage::ack(r.id.clone(), false)]
        }
    })
    .await;
    let transport = WebSocketTransport::new(url);

    let rejected = record(1);
    let err = transport.send(&rejected).await.unwrap_err();
    assert_eq!(
        err,
        TransportError::Rejected {
            id: rejected.id.clone(),
            message: "duplicate patient".into()
        }
    );
    assert!(transport.is_connected().await);

    transport.send(&record(2)).await.unwrap();
    transport.close().await;
    assert_eq!(relay.await.unwrap().len(), 2);
}

#[tokio::test]
async fn unrelated_answers_are_skipped() {
    let (url, _relay) = spawn_relay(|r| {
        vec![
            ServerMessage::ack(OpId::new("op-0-00000000"), false),
            ServerMessage::pong(7),
            ServerMessage::ack(r.id.clone(), true),
        ]
    })
    .await;
    let transport = WebSocketTransport::new(url);

    transport.send(&record(1)).await.unwrap();
}

#[tokio::test]
async fn remote_error_fails_the_send() {
    let (url, _relay) = spawn_relay(|_| vec![ServerMessage::error("unreadable frame")]).await;
    let transport = WebSocketTransport::new(url);

    let err = transport.send(&record(1)).await.unwrap_err();
    assert!(matches!(err, TransportError::ReceiveFailed(ref m) if m.contains("unreadable frame")));
    assert!(!transport.is_connected().await);
}

#[tokio::test]
async fn close_before_answer_is_connection_closed() {
    let (url, _relay) = spawn_relay(|_| Vec::new()).await;
    let transport = WebSocketTransport::new(url);

    let err = transport.send(&record(1)).await.unwrap_err();
    assert_eq!(err, TransportError::ConnectionClosed);
    assert!(!transport.is_connected().await);
}

#[tokio::test]
async fn unreachable_remote_is_connection_failed() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = WebSocketTransport::new(format!("ws://127.0.0.1:{port}"));

    let err = transport.send(&record(1)).await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectionFailed(_)));
}
