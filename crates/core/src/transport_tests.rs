// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use yare::parameterized;

use super::*;

#[parameterized(
    connection_failed = { TransportError::ConnectionFailed("refused".into()), "connection failed: refused" },
    closed = { TransportError::ConnectionClosed, "connection closed" },
    timeout = { TransportError::Timeout(1500), "request timed out after 1500ms" },
    rejected = {
        TransportError::Rejected { id: OpId::new("op-1-abcd1234"), message: "invalid payload".into() },
        "remote rejected op-1-abcd1234: invalid payload"
    },
)]
fn error_messages(error: TransportError, expected: &str) {
    assert_eq!(error.to_string(), expected);
}
