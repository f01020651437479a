// SPDX-License-Identifier: MIT OR Apache-2.0

//! The destination side of a logger.

use crate::error::LogError;
use crate::log_record::LogRecord;
use std::fmt::{Debug, Display};
use std::path::PathBuf;

/**
Identity of the place a sink writes to.

Used to answer "does this logger already write to X?", for example to avoid attaching
a second console sink to a broadcast that already has one.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Destination {
    Stdout,
    Stderr,
    Path(PathBuf),
    /// An in-process buffer, identified by a process-unique number.
    Memory(u64),
    /// Anything else, identified by name.
    Named(String),
}

impl Destination {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Destination::Path(path.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Destination::Named(name.into())
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => f.write_str("<stdout>"),
            Destination::Stderr => f.write_str("<stderr>"),
            Destination::Path(p) => write!(f, "{}", p.display()),
            Destination::Memory(id) => write!(f, "<memory #{id}>"),
            Destination::Named(n) => f.write_str(n),
        }
    }
}

pub trait Sink: Debug + Send + Sync {
    /**
    Writes one formatted record.

    The sink terminates the line itself; `record.line()` carries no newline.
    */
    fn write(&self, record: &LogRecord) -> Result<(), LogError>;

    /**
    Writes `text` exactly as given, bypassing formatting, tags and level filtering.
    */
    fn write_raw(&self, text: &str) -> Result<(), LogError>;

    /**
    Pushes buffered output to its destination.  Unbuffered sinks need not override this.
    */
    fn flush(&self) -> Result<(), LogError> {
        Ok(())
    }

    /**
    Releases the destination.  Writes after closing fail with [`LogError::SinkClosed`].
    */
    fn close(&self) -> Result<(), LogError> {
        Ok(())
    }

    /// Where this sink writes, if it can say.
    fn destination(&self) -> Option<Destination> {
        None
    }
}

/*
Boilerplate notes.

# Sink

Clone on a trait object makes no sense; share sinks with Arc.
PartialEq would raise the same provenance question as for loggers; destination()
answers the question people actually ask.
Send/Sync are required because a sink is written from every context at once.
*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_display() {
        assert_eq!(Destination::Stderr.to_string(), "<stderr>");
        assert_eq!(Destination::path("/var/log/app.log").to_string(), "/var/log/app.log");
        assert_eq!(Destination::Memory(4).to_string(), "<memory #4>");
        assert_eq!(Destination::named("syslog"), Destination::Named("syslog".into()));
    }
}
