// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use fq_core::{Connectivity, ConnectivityObserver};
use tokio::net::TcpListener;
use yare::parameterized;

use super::probe::{authority, Probe};

#[parameterized(
    explicit_port = { "ws://127.0.0.1:7890", Some("127.0.0.1:7890") },
    ws_default = { "ws://relay.example.org", Some("relay.example.org:80") },
    wss_default = { "wss://relay.example.org/sync", Some("relay.example.org:443") },
    no_host = { "not a url", None },
)]
fn authority_from_url(url: &str, expected: Option<&str>) {
    assert_eq!(authority(url).as_deref(), expected);
}

#[tokio::test]
async fn probe_reaches_listening_port() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let probe = Probe::new(format!("ws://127.0.0.1:{port}"), Duration::from_secs(2));
    let observer = ConnectivityObserver::new(Connectivity::Offline);
    assert!(probe.refresh(&observer).await);
    assert!(observer.is_online());
}

#[tokio::test]
async fn probe_fails_on_closed_port() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let probe = Probe::new(format!("ws://127.0.0.1:{port}"), Duration::from_secs(2));
    let observer = ConnectivityObserver::new(Connectivity::Online);
    assert!(!probe.refresh(&observer).await);
    assert!(!observer.is_online());
}
