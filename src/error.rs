// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type shared by sinks, handles and the broadcaster.

use thiserror::Error;

/**
Errors surfaced by logging operations.

Filtering a record out (severity below the effective level) is never an error, and
neither is logging through a handle that has no sink.
*/
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LogError {
    /// The sink failed to write, flush or close.
    #[error("sink I/O failed: {0}")]
    SinkIo(#[from] std::io::Error),

    /// A level-setting call received a value that does not name a severity.
    #[error("invalid severity: {0:?}")]
    InvalidSeverity(String),

    /// A broadcast needs at least one member.
    #[error("a broadcast requires at least one member")]
    EmptyBroadcast,

    /// The sink was closed and no longer accepts records.
    #[error("sink is closed")]
    SinkClosed,
}

/*
Boilerplate notes.

Clone is not possible because io::Error is not Clone.
PartialEq would need to compare io::Error by kind only; tests use matches! instead.
*/
