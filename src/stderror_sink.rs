// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::error::LogError;
use crate::log_record::LogRecord;
use crate::sink::{Destination, Sink};
use std::io::Write;

/**
A reference sink that writes one line per record to stderr.
 */
#[derive(Debug, Clone)]
pub struct StdErrSink {}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// Design decisions for StdErrSink trait implementations:
//
// - Debug/Clone: Already derived - appropriate for zero-sized struct
// - Copy: Implemented - safe for zero-sized struct with no heap allocation
// - PartialEq/Eq: Implemented - every instance writes to the same stderr
// - Default: Implemented - provides convenient zero-argument constructor
// - Send/Sync: Automatically implemented - zero-sized struct is always thread-safe

impl Copy for StdErrSink {}

impl PartialEq for StdErrSink {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for StdErrSink {}

impl Default for StdErrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StdErrSink {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Sink for StdErrSink {
    fn write(&self, record: &LogRecord) -> Result<(), LogError> {
        // one lock per line keeps lines from different contexts whole
        let mut lock = std::io::stderr().lock();
        lock.write_all(record.line().as_bytes())?;
        lock.write_all(b"\n")?;
        Ok(())
    }

    fn write_raw(&self, text: &str) -> Result<(), LogError> {
        std::io::stderr().lock().write_all(text.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), LogError> {
        std::io::stderr().flush()?;
        Ok(())
    }

    fn destination(&self) -> Option<Destination> {
        Some(Destination::Stderr)
    }
}
