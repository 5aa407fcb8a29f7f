// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Online/offline state shared between the engine and its feeders.

use std::fmt;

use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

/// Network reachability as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn from_online(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }

    pub fn is_online(self) -> bool {
        self == Connectivity::Online
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Online => write!(f, "online"),
            Connectivity::Offline => write!(f, "offline"),
        }
    }
}

/// Tracks connectivity and notifies subscribers of transitions.
///
/// Cloning yields a handle to the same state. Reports are taken at face
/// value; there is no debouncing.
#[derive(Debug, Clone)]
pub struct ConnectivityObserver {
    tx: watch::Sender<Connectivity>,
}

impl ConnectivityObserver {
    pub fn new(initial: Connectivity) -> Self {
        let (tx, _rx) = watch::channel(initial);
        ConnectivityObserver { tx }
    }

    pub fn current(&self) -> Connectivity {
        *self.tx.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.current().is_online()
    }

    /// Records a reachability report.
    ///
    /// Returns true if the state changed. Repeated reports of the same
    /// state do not wake subscribers.
    pub fn set_online(&self, online: bool) -> bool {
        let next = Connectivity::from_online(online);
        let changed = self.tx.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
        if changed {
            info!(state = %next, "connectivity changed");
        }
        changed
    }

    /// Receiver woken on every transition.
    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityObserver {
    fn default() -> Self {
        ConnectivityObserver::new(Connectivity::Online)
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
