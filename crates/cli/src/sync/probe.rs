// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity probe: can the relay's host and port be reached?

use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::http::Uri;
use tracing::debug;

use fq_core::ConnectivityObserver;

use crate::config::RemoteConfig;

/// `host:port` for a WebSocket URL, with the scheme's default port.
pub fn authority(url: &str) -> Option<String> {
    let uri: Uri = url.parse().ok()?;
    let host = uri.host()?;
    let default_port = match uri.scheme_str() {
        Some("wss") => 443,
        _ => 80,
    };
    let port = uri.port_u16().unwrap_or(default_port);
    Some(format!("{host}:{port}"))
}

/// Bounded TCP reachability check against the configured relay.
#[derive(Debug, Clone)]
pub struct Probe {
    url: String,
    timeout: Duration,
}

impl Probe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Probe {
            url: url.into(),
            timeout,
        }
    }

    pub fn from_config(remote: &RemoteConfig) -> Self {
        Probe::new(remote.url.clone(), remote.probe_timeout())
    }

    /// Returns true if a TCP connection to the relay succeeds in time.
    pub async fn check(&self) -> bool {
        let Some(addr) = authority(&self.url) else {
            debug!(url = %self.url, "cannot derive address from remote url");
            return false;
        };
        match tokio::time::timeout(self.timeout, TcpStream::connect(addr.as_str())).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!(%addr, error = %e, "remote unreachable");
                false
            }
            Err(_) => {
                debug!(%addr, "remote probe timed out");
                false
            }
        }
    }

    /// Probes and reports the result to `observer`. Returns the result.
    pub async fn refresh(&self, observer: &ConnectivityObserver) -> bool {
        let online = self.check().await;
        observer.set_online(online);
        online
    }
}
