// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! This module provides an in-memory sink for testing and debugging purposes.
//! The `InMemorySink` captures formatted lines in memory rather than writing them to
//! stderr or a file, making it ideal for:
//!
//! - Unit testing code that logs
//! - Asserting on tag prefixes and level filtering
//! - Programmatically examining log output
//!
//! ## Architecture
//!
//! The sink stores lines in a `Mutex<Vec<String>>`.  The mutex guards only this sink's
//! buffer; it is the sink's own serialization, not a lock shared between loggers.

use crate::error::LogError;
use crate::log_record::LogRecord;
use crate::sink::{Destination, Sink};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static MEMORY_ID: AtomicU64 = AtomicU64::new(0);

/// A sink that stores every line in a `Vec<String>`.
///
/// # Example
///
/// ```rust
/// use scopelog::{InMemorySink, Logger, LoggerExt, SimpleFormatter};
/// use std::sync::Arc;
///
/// let sink = Arc::new(InMemorySink::new());
/// let logger = Logger::builder()
///     .sink(sink.clone())
///     .formatter(Arc::new(SimpleFormatter))
///     .build();
///
/// logger.tagged(["job"], |l| l.info("started")).unwrap();
/// logger.warn("careful").unwrap();
///
/// assert_eq!(sink.lines(), vec!["[job] started", "careful"]);
/// assert_eq!(sink.drain_logs(), "[job] started\ncareful");
/// assert_eq!(sink.drain_logs(), "");
/// ```
#[derive(Debug)]
pub struct InMemorySink {
    id: u64,
    logs: Mutex<Vec<String>>,
    closed: AtomicBool,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: Derived for diagnostic purposes and required by Sink trait
// - Default: Implemented with obvious zero-value (empty buffer)
// - Clone: NOT implemented - a clone would be a second destination with the same identity
// - PartialEq/Eq: NOT implemented - compare destination() instead
// - Send/Sync: Automatically implemented due to Mutex and atomics

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySink {
    /// Creates a new `InMemorySink` with an empty buffer and a fresh identity.
    pub fn new() -> Self {
        Self {
            id: MEMORY_ID.fetch_add(1, Ordering::Relaxed),
            logs: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn buffer(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // a panic while holding the lock leaves the Vec intact
        self.logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drains all lines into a single newline-joined string, clearing the buffer.
    pub fn drain_logs(&self) -> String {
        let mut logs = self.buffer();
        let result = logs.join("\n");
        logs.clear();
        result
    }

    /// A copy of the captured lines, leaving the buffer alone.
    pub fn lines(&self) -> Vec<String> {
        self.buffer().clone()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn push(&self, line: String) -> Result<(), LogError> {
        if self.is_closed() {
            return Err(LogError::SinkClosed);
        }
        self.buffer().push(line);
        Ok(())
    }
}

impl Sink for InMemorySink {
    fn write(&self, record: &LogRecord) -> Result<(), LogError> {
        self.push(record.line().to_string())
    }

    fn write_raw(&self, text: &str) -> Result<(), LogError> {
        self.push(text.to_string())
    }

    fn close(&self) -> Result<(), LogError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn destination(&self) -> Option<Destination> {
        Some(Destination::Memory(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextId;
    use crate::severity::Severity;
    use std::time::Instant;

    fn record(line: &str) -> LogRecord {
        LogRecord::new(
            Severity::Info,
            Instant::now(),
            ContextId::current(),
            None,
            line.to_string(),
        )
    }

    #[test]
    fn captures_and_drains() {
        let sink = InMemorySink::new();
        sink.write(&record("one")).unwrap();
        sink.write_raw("raw").unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.drain_logs(), "one\nraw");
        assert!(sink.is_empty());
    }

    #[test]
    fn rejects_writes_after_close() {
        let sink = InMemorySink::new();
        sink.close().unwrap();
        assert!(matches!(sink.write(&record("late")), Err(LogError::SinkClosed)));
        assert!(sink.is_empty());
    }

    #[test]
    fn identities_differ() {
        let a = InMemorySink::new();
        let b = InMemorySink::new();
        assert_ne!(a.destination(), b.destination());
        assert_eq!(a.destination(), a.destination());
    }
}
