// SPDX-License-Identifier: MIT OR Apache-2.0

//! Formatting macros.
//!
//! Each macro takes a handle (anything implementing [`LoggerHandle`](crate::LoggerHandle),
//! by value or reference) followed by `format!` arguments.  The message is only formatted
//! when the severity passes the current context's effective level, so expensive
//! arguments cost nothing while filtered out.
//!
//! Every macro evaluates to the handle's `Result<bool, LogError>`.
//!
//! ```rust
//! use scopelog::{InMemorySink, Logger, Severity, SimpleFormatter};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let logger = Logger::builder()
//!     .sink(sink.clone())
//!     .formatter(Arc::new(SimpleFormatter))
//!     .level(Severity::Info)
//!     .build();
//!
//! let user = "alice";
//! scopelog::info!(logger, "signed in: {user}").unwrap();
//! scopelog::debug!(logger, "never formatted: {}", expensive()).unwrap();
//! scopelog::log!(logger, Severity::Error, "code {}", 7).unwrap();
//! assert_eq!(sink.drain_logs(), "signed in: alice\ncode 7");
//!
//! fn expensive() -> String {
//!     unreachable!("filtered records are not formatted")
//! }
//! ```

/// Logs at an explicit [`Severity`](crate::Severity).
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {{
        use $crate::LoggerHandle as _;
        let logger = &$logger;
        let severity: $crate::Severity = $severity;
        if severity >= logger.level() {
            logger.log(severity, ::std::option::Option::None, &::std::format!($($arg)+))
        } else {
            ::std::result::Result::<bool, $crate::LogError>::Ok(false)
        }
    }};
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Fatal, $($arg)+)
    };
}

/// Logs at [`Severity::Unknown`](crate::Severity::Unknown), which passes every level.
#[macro_export]
macro_rules! unknown {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Unknown, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::formatter::SimpleFormatter;
    use crate::handle::{LoggerExt, LoggerHandle};
    use crate::inmemory_sink::InMemorySink;
    use crate::logger::Logger;
    use crate::severity::Severity;
    use std::cell::Cell;
    use std::sync::Arc;

    fn capture(level: Severity) -> (Logger, Arc<InMemorySink>) {
        let sink = Arc::new(InMemorySink::new());
        let logger = Logger::builder()
            .sink(sink.clone())
            .formatter(Arc::new(SimpleFormatter))
            .level(level)
            .build();
        (logger, sink)
    }

    #[test]
    fn filtered_arguments_are_not_evaluated() {
        let (logger, sink) = capture(Severity::Warn);
        let evaluated = Cell::new(0);
        let count = || {
            evaluated.set(evaluated.get() + 1);
            evaluated.get()
        };
        assert!(!crate::info!(logger, "{}", count()).unwrap());
        assert!(crate::warn!(logger, "{}", count()).unwrap());
        assert_eq!(evaluated.get(), 1);
        assert_eq!(sink.lines(), vec!["1"]);
    }

    #[test]
    fn every_severity_macro() {
        let (logger, sink) = capture(Severity::Debug);
        crate::debug!(logger, "d").unwrap();
        crate::info!(&logger, "i").unwrap();
        crate::warn!(logger, "w").unwrap();
        crate::error!(logger, "e").unwrap();
        crate::fatal!(logger, "f").unwrap();
        crate::unknown!(logger, "u").unwrap();
        assert_eq!(sink.drain_logs(), "d\ni\nw\ne\nf\nu");
    }

    #[test]
    fn works_through_dyn_handles_and_tags() {
        let (logger, sink) = capture(Severity::Debug);
        let handle: Arc<dyn LoggerHandle> = Arc::new(logger);
        handle.tagged(["m"], |h| crate::info!(h, "n={}", 3).unwrap());
        assert_eq!(sink.drain_logs(), "[m] n=3");
    }
}
