// SPDX-License-Identifier: MIT OR Apache-2.0

//! A sink over any [`std::io::Write`].

use crate::error::LogError;
use crate::log_record::LogRecord;
use crate::sink::{Destination, Sink};
use std::fmt::Debug;
use std::io::Write;
use std::sync::Mutex;

/**
Writes one line per record to a wrapped writer: a file, a socket, a `Vec<u8>`...

The writer is behind this sink's own mutex so that concurrent lines do not interleave.
Closing flushes and drops the writer; later writes fail with [`LogError::SinkClosed`].

```rust
use scopelog::{Destination, Sink, WriterSink};

let sink = WriterSink::new(Vec::new()).with_destination(Destination::named("buffer"));
sink.write_raw("hello\n").unwrap();
assert_eq!(sink.destination(), Some(Destination::named("buffer")));
let bytes = sink.into_inner().unwrap();
assert_eq!(bytes, b"hello\n");
```
*/
pub struct WriterSink<W> {
    writer: Mutex<Option<W>>,
    destination: Option<Destination>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(Some(writer)),
            destination: None,
        }
    }

    /// Declares where the writer goes, for [`Sink::destination`].
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// The writer back, or `None` if the sink was closed.
    pub fn into_inner(self) -> Option<W> {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_writer(&self, f: impl FnOnce(&mut W) -> std::io::Result<()>) -> Result<(), LogError> {
        let mut guard = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_mut() {
            Some(writer) => Ok(f(writer)?),
            None => Err(LogError::SinkClosed),
        }
    }
}

impl<W> Debug for WriterSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterSink")
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&self, record: &LogRecord) -> Result<(), LogError> {
        self.with_writer(|w| {
            w.write_all(record.line().as_bytes())?;
            w.write_all(b"\n")
        })
    }

    fn write_raw(&self, text: &str) -> Result<(), LogError> {
        self.with_writer(|w| w.write_all(text.as_bytes()))
    }

    fn flush(&self) -> Result<(), LogError> {
        self.with_writer(|w| w.flush())
    }

    fn close(&self) -> Result<(), LogError> {
        let mut guard = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.take() {
            Some(mut writer) => Ok(writer.flush()?),
            // closing twice is harmless
            None => Ok(()),
        }
    }

    fn destination(&self) -> Option<Destination> {
        self.destination.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextId;
    use crate::severity::Severity;
    use std::time::Instant;

    #[test]
    fn writes_lines() {
        let sink = WriterSink::new(Vec::new());
        let record = LogRecord::new(
            Severity::Warn,
            Instant::now(),
            ContextId::current(),
            None,
            "line".to_string(),
        );
        sink.write(&record).unwrap();
        sink.write(&record).unwrap();
        assert_eq!(sink.into_inner().unwrap(), b"line\nline\n");
    }

    #[test]
    fn closed_sink_rejects_writes() {
        let sink = WriterSink::new(Vec::new());
        sink.close().unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.write_raw("x"), Err(LogError::SinkClosed)));
        assert!(sink.into_inner().is_none());
    }

    #[test]
    fn io_errors_surface() {
        #[derive(Debug)]
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let sink = WriterSink::new(Broken);
        assert!(matches!(sink.write_raw("x"), Err(LogError::SinkIo(_))));
    }
}
