// SPDX-License-Identifier: MIT OR Apache-2.0

//! The diagnostic logger: where this crate reports its own problems.
//!
//! Loggers cannot always return their problems to the caller.  A tag scope that finds
//! its stack already popped while the thread is unwinding must not panic again, and a
//! broadcast returns only the *first* member failure.  Those reports go to a single
//! process-wide diagnostic handle instead.
//!
//! # Default Behavior
//!
//! Until replaced, diagnostics go to a [`Logger`] over [`StdErrSink`] at
//! [`Severity::Warn`], so they are visible without configuration.
//!
//! # Examples
//!
//! ```
//! use scopelog::global_logger::{diagnostic_logger, set_diagnostic_logger};
//! use scopelog::{InMemorySink, Logger, LoggerHandle, Sink};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let previous = set_diagnostic_logger(Arc::new(Logger::new(sink.clone())));
//! assert!(diagnostic_logger().outputs_to(&sink.destination().unwrap()));
//!
//! // put things back the way they were
//! set_diagnostic_logger(previous);
//! ```
//!
//! # Implementation Notes
//!
//! The handle lives in an [`ArcSwap`], so reading it on the logging path is a lock-free
//! load.  Replacing it never blocks readers; a report already in flight finishes on the
//! old handle, which stays alive until its last `Arc` is dropped.
//!
//! A report raised while a report is being written on the same thread (for example,
//! because the diagnostic logger is itself a failing broadcast) is dropped rather than
//! recursing.

use crate::handle::LoggerHandle;
use crate::logger::Logger;
use crate::severity::Severity;
use crate::sink::Sink;
use crate::stderror_sink::StdErrSink;
use arc_swap::ArcSwap;
use std::cell::Cell;
use std::sync::{Arc, OnceLock};

/// Static storage for the diagnostic handle.
static DIAGNOSTIC_LOGGER: OnceLock<ArcSwap<Arc<dyn LoggerHandle>>> = OnceLock::new();

thread_local! {
    static REPORTING: Cell<bool> = const { Cell::new(false) };
}

fn slot() -> &'static ArcSwap<Arc<dyn LoggerHandle>> {
    DIAGNOSTIC_LOGGER.get_or_init(|| {
        let sink: Arc<dyn Sink> = Arc::new(StdErrSink::new());
        let default: Arc<dyn LoggerHandle> = Arc::new(
            Logger::builder()
                .sink(sink)
                .level(Severity::Warn)
                .progname("scopelog")
                .build(),
        );
        ArcSwap::from_pointee(default)
    })
}

/// The current diagnostic handle.
pub fn diagnostic_logger() -> Arc<dyn LoggerHandle> {
    let current = slot().load();
    Arc::clone(&**current)
}

/// Replaces the diagnostic handle, returning the previous one.
pub fn set_diagnostic_logger(logger: Arc<dyn LoggerHandle>) -> Arc<dyn LoggerHandle> {
    let previous = slot().swap(Arc::new(logger));
    Arc::clone(&*previous)
}

/// Serializes tests that swap the diagnostic handle.
#[cfg(test)]
pub(crate) static TEST_DIAGNOSTIC_GUARD: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Clears the thread's reporting flag on drop, including when the handle panics.
struct ReportingGuard;

impl ReportingGuard {
    fn enter() -> Option<ReportingGuard> {
        let entered = REPORTING
            .try_with(|flag| !flag.replace(true))
            .unwrap_or(false);
        entered.then_some(ReportingGuard)
    }
}

impl Drop for ReportingGuard {
    fn drop(&mut self) {
        let _ = REPORTING.try_with(|flag| flag.set(false));
    }
}

/// Reports `message` to the diagnostic handle.  Failures to report are ignored.
pub(crate) fn diagnostic(severity: Severity, message: &str) {
    let Some(_reporting) = ReportingGuard::enter() else {
        return;
    };
    let logger = diagnostic_logger();
    let _ = logger.log(severity, None, message);
}
