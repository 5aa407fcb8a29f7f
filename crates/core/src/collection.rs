// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Named collections persisted by the local store.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::record::OpKind;

/// A fixed logical key in the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Patients,
    Visits,
    Workers,
    Alerts,
    SyncQueue,
    Settings,
}

impl Collection {
    /// Every collection, in storage-usage reporting order.
    pub const ALL: [Collection; 6] = [
        Collection::Patients,
        Collection::Visits,
        Collection::Workers,
        Collection::Alerts,
        Collection::SyncQueue,
        Collection::Settings,
    ];

    /// Collections that hold application entities.
    pub const ENTITIES: [Collection; 4] = [
        Collection::Patients,
        Collection::Visits,
        Collection::Workers,
        Collection::Alerts,
    ];

    /// Returns the storage key for this collection.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Patients => "patients",
            Collection::Visits => "visits",
            Collection::Workers => "workers",
            Collection::Alerts => "alerts",
            Collection::SyncQueue => "sync-queue",
            Collection::Settings => "settings",
        }
    }

    /// Returns true for entity collections (not the queue or settings).
    pub fn is_entity(self) -> bool {
        Collection::ENTITIES.contains(&self)
    }

    /// The operation enqueued when an entity is created in this collection.
    pub fn create_kind(self) -> Option<OpKind> {
        match self {
            Collection::Patients => Some(OpKind::CreatePatient),
            Collection::Visits => Some(OpKind::CreateVisit),
            Collection::Workers => Some(OpKind::CreateWorker),
            Collection::Alerts => Some(OpKind::CreateAlert),
            Collection::SyncQueue | Collection::Settings => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Collection {
    type Err = Error;

    /// Parses an entity collection name; singular forms are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patients" | "patient" => Ok(Collection::Patients),
            "visits" | "visit" => Ok(Collection::Visits),
            "workers" | "worker" => Ok(Collection::Workers),
            "alerts" | "alert" => Ok(Collection::Alerts),
            _ => Err(Error::UnknownCollection(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
