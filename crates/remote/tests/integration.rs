// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the fq-remote server binary.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Helper to spawn a server process and clean it up on drop.
struct ServerProcess {
    child: Child,
    port: u16,
    temp_dir: tempfile::TempDir,
}

impl ServerProcess {
    fn spawn(extra: &[&str]) -> Self {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let port = free_port();

        let child = Command::new(env!("CARGO_BIN_EXE_fq-remote"))
            .arg("--bind")
            .arg(format!("127.0.0.1:{}", port))
            .arg("--data")
            .arg(temp_dir.path())
            .args(extra)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn server process");

        ServerProcess {
            child,
            port,
            temp_dir,
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn send_text(server: &ServerProcess, frames: &[&str]) -> Vec<String> {
    // CI runners can be slow, so retry the connection a few times
    let mut ws_stream = None;
    for _ in 0..20 {
        if let Ok(Ok((stream, _))) =
            tokio::time::timeout(Duration::from_millis(500), connect_async(&server.ws_url())).await
        {
            ws_stream = Some(stream);
            break;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    let mut ws = ws_stream.expect("should connect to server within retries");

    let mut answers = Vec::new();
    for frame in frames {
        ws.send(Message::Text((*frame).into())).await.unwrap();
        match tokio::time::timeout(Duration::from_secs(5), ws.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => answers.push(text.as_str().to_owned()),
            other => panic!("Expected text answer, got {:?}", other),
        }
    }
    answers
}

const SUBMIT: &str = r#"{"type":"submit","record":{"id":"op-1-0a1b2c3d","operation":"create-patient","payload":{"name":"Amina"},"timestamp":"2026-03-14T09:30:00Z","status":"pending"}}"#;

#[tokio::test]
async fn server_acks_and_logs_submits() {
    let server = ServerProcess::spawn(&[]);

    let answers = send_text(&server, &[r#"{"type":"ping","id":7}"#, SUBMIT, SUBMIT]).await;

    assert_eq!(answers[0], r#"{"type":"pong","id":7}"#);
    assert!(answers[1].contains(r#""type":"ack""#));
    assert!(answers[1].contains(r#""duplicate":false"#));
    assert!(answers[2].contains(r#""duplicate":true"#));

    let log = std::fs::read_to_string(server.temp_dir.path().join("applied.jsonl")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("op-1-0a1b2c3d"));
}

#[tokio::test]
async fn server_rejects_configured_kinds() {
    let server = ServerProcess::spawn(&["--reject-kind", "create-patient"]);

    let answers = send_text(&server, &[SUBMIT]).await;

    assert!(answers[0].contains(r#""type":"rejected""#));
    assert!(!server.temp_dir.path().join("applied.jsonl").exists());
}
