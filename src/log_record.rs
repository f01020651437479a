// SPDX-License-Identifier: MIT OR Apache-2.0

//! The record handed from a logger to its sink.
//!
//! A [`LogRecord`] is built once per emitted line, after filtering and formatting have
//! happened.  Sinks receive it by reference; a broadcast builds a separate record for
//! each member, since every member formats with its own formatter and tags.

use crate::context::ContextId;
use crate::severity::Severity;
use std::fmt::Display;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static INITIAL_TIMESTAMP: OnceLock<Instant> = OnceLock::new();

/// The instant all record timestamps are measured from.
///
/// Fixed the first time anything asks for it.
pub fn initial_timestamp() -> Instant {
    *INITIAL_TIMESTAMP.get_or_init(Instant::now)
}

/// Time elapsed between the initial timestamp and `at`.
pub fn elapsed_since_start(at: Instant) -> Duration {
    at.saturating_duration_since(initial_timestamp())
}

/**
A formatted log line plus the metadata it was produced with.

`line` is the formatter's output, tag prefix included.  The remaining fields let a sink
route or colour lines without parsing them.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogRecord {
    severity: Severity,
    timestamp: Instant,
    context: ContextId,
    label: Option<String>,
    line: String,
}

impl LogRecord {
    pub fn new(
        severity: Severity,
        timestamp: Instant,
        context: ContextId,
        label: Option<String>,
        line: String,
    ) -> Self {
        // make sure the epoch predates the first record
        initial_timestamp();
        Self {
            severity,
            timestamp,
            context,
            label,
            line,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// The context that emitted the record.
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// The program name configured on the emitting logger, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The rendered line, without a trailing newline.
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn into_line(self) -> String {
        self.line
    }
}

impl Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.line)
    }
}
/*
Boilerplate notes for LogRecord:

- Clone: records are cheap to duplicate for sinks that queue them
- PartialEq/Eq/Hash: field-wise, handy in tests
- Default: no sensible timestamp or context to default to
- Ord: no meaningful ordering between records from different contexts
*/
