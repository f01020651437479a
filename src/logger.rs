// SPDX-License-Identifier: MIT OR Apache-2.0

//! The simple handle: one sink, one severity filter, one tag stack.

use crate::context::ContextId;
use crate::error::LogError;
use crate::formatter::{DefaultFormatter, Formatter};
use crate::handle::LoggerHandle;
use crate::log_record::LogRecord;
use crate::severity::{IntoSeverity, Severity};
use crate::severity_filter::SeverityFilter;
use crate::silence::SilencerSwitch;
use crate::sink::{Destination, Sink};
use crate::tags::{TagStack, TaggedFormatter};
use arc_swap::{ArcSwap, ArcSwapOption};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

static SILENCER: SilencerSwitch = SilencerSwitch::new(true);

/**
A logger writing to a single [`Sink`].

Emitting checks the record's severity against the effective level of the current
context, renders the line through the formatter with the context's tags in front, and
hands the result to the sink.  A logger built without a sink accepts every call and
writes nothing.

# Examples

```rust
use scopelog::{InMemorySink, Logger, LoggerExt, Severity, SimpleFormatter};
use std::sync::Arc;

let sink = Arc::new(InMemorySink::new());
let logger = Logger::builder()
    .sink(sink.clone())
    .formatter(Arc::new(SimpleFormatter))
    .level(Severity::Warn)
    .build();

assert!(!logger.info("x").unwrap());
logger.set_local_level(Severity::Debug).unwrap();
assert!(logger.info("x").unwrap());
logger.clear_local_level();
assert!(!logger.info("x").unwrap());

assert_eq!(sink.drain_logs(), "x");
```
*/
pub struct Logger {
    sink: Option<Arc<dyn Sink>>,
    filter: Arc<SeverityFilter>,
    formatter: ArcSwap<TaggedFormatter>,
    progname: ArcSwapOption<String>,
}

impl Logger {
    /// A logger over `sink` with the default formatter at [`Severity::Debug`].
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self::builder().sink(sink).build()
    }

    /// A logger with nowhere to write.  Every emit returns `Ok(false)`.
    pub fn null() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Turns `silence` on or off for every [`Logger`] in the process.
    pub fn set_silencer(enabled: bool) {
        SILENCER.set(enabled);
    }

    pub fn silencer() -> bool {
        SILENCER.is_enabled()
    }

    pub fn sink(&self) -> Option<&Arc<dyn Sink>> {
        self.sink.as_ref()
    }

    pub fn filter(&self) -> &SeverityFilter {
        &self.filter
    }

    pub fn tags(&self) -> Arc<TagStack> {
        self.formatter.load().tags().clone()
    }

    /// The formatter as configured, without the tag decoration.
    pub fn formatter(&self) -> Arc<dyn Formatter> {
        self.formatter.load().inner().clone()
    }

    /**
    A logger that shares this one's sink, level and formatter, but whose lines always
    carry the current context's tags plus `tags`.

    The new logger has its own tag stack: tags pushed on it do not show up here and vice
    versa.

    ```rust
    use scopelog::{InMemorySink, Logger, LoggerExt, SimpleFormatter};
    use std::sync::Arc;

    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::builder().sink(sink.clone()).formatter(Arc::new(SimpleFormatter)).build();
    let billing = logger.with_tags(["billing"]);
    billing.info("charged").unwrap();
    logger.info("plain").unwrap();
    assert_eq!(sink.lines(), vec!["[billing] charged", "plain"]);
    ```
    */
    pub fn with_tags<I>(&self, tags: I) -> Logger
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let current = self.formatter.load();
        let mut base = current.tags().current(ContextId::current());
        base.extend(crate::tags::normalize_tags(tags));
        let stack = Arc::new(TagStack::with_base(base));
        Logger {
            sink: self.sink.clone(),
            filter: self.filter.clone(),
            formatter: ArcSwap::from_pointee(TaggedFormatter::new(
                current.inner().clone(),
                stack,
            )),
            progname: ArcSwapOption::new(self.progname.load_full()),
        }
    }
}

impl Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("sink", &self.sink)
            .field("level", &self.filter.level())
            .field("progname", &self.progname.load_full())
            .finish_non_exhaustive()
    }
}

/*
Boilerplate notes.

# Logger

Clone would be ambiguous: same tag stack or a fresh one?  with_tags answers that
explicitly, so no Clone.
PartialEq/Hash: provenance vs. configuration equality is unclear; outputs_to covers the
useful question.
Default: a null logger is a surprising default; Logger::null is explicit.
*/

impl LoggerHandle for Logger {
    fn log(
        &self,
        severity: Severity,
        label: Option<&str>,
        message: &str,
    ) -> Result<bool, LogError> {
        let Some(sink) = &self.sink else {
            return Ok(false);
        };
        let context = ContextId::current();
        if !self.filter.allows(context, severity) {
            return Ok(false);
        }
        let timestamp = Instant::now();
        let label = match label {
            Some(label) => Some(label.to_string()),
            None => self.progname.load_full().map(|p| (*p).clone()),
        };
        let line = self
            .formatter
            .load()
            .format(severity, timestamp, label.as_deref(), message);
        sink.write(&LogRecord::new(severity, timestamp, context, label, line))?;
        Ok(true)
    }

    fn write_raw(&self, text: &str) -> Result<(), LogError> {
        match &self.sink {
            Some(sink) => sink.write_raw(text),
            None => Ok(()),
        }
    }

    fn level(&self) -> Severity {
        self.filter.effective_level(ContextId::current())
    }

    fn static_level(&self) -> Severity {
        self.filter.level()
    }

    fn apply_level(&self, level: Severity) {
        self.filter.set_level(level);
    }

    fn local_level(&self) -> Option<Severity> {
        self.filter.override_for(ContextId::current())
    }

    fn apply_local_level(&self, level: Option<Severity>) {
        self.filter.set_override(ContextId::current(), level);
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.formatter
            .rcu(|current| current.rewrap(formatter.clone()));
    }

    fn progname(&self) -> Option<String> {
        self.progname.load_full().map(|p| (*p).clone())
    }

    fn set_progname(&self, progname: Option<String>) {
        self.progname.store(progname.map(Arc::new));
    }

    fn push_tag_list(&self, tags: &[String]) {
        self.formatter
            .load()
            .tags()
            .push_normalized(ContextId::current(), tags);
    }

    fn pop_tags(&self, count: usize) -> Vec<String> {
        self.formatter.load().tags().pop(ContextId::current(), count)
    }

    fn clear_tags(&self) {
        self.formatter.load().tags().clear(ContextId::current());
    }

    fn current_tags(&self) -> Vec<String> {
        self.formatter.load().tags().current(ContextId::current())
    }

    fn flush(&self) -> Result<(), LogError> {
        self.clear_tags();
        match &self.sink {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }

    fn close(&self) -> Result<(), LogError> {
        match &self.sink {
            Some(sink) => sink.close(),
            None => Ok(()),
        }
    }

    fn outputs_to(&self, destination: &Destination) -> bool {
        self.sink
            .as_ref()
            .and_then(|sink| sink.destination())
            .is_some_and(|d| &d == destination)
    }

    fn silencer_enabled(&self) -> bool {
        SILENCER.is_enabled()
    }
}

/**
Configures a [`Logger`].

```rust
use scopelog::{Logger, LoggerHandle, Severity, StdErrSink};
use std::sync::Arc;

let logger = Logger::builder()
    .sink(Arc::new(StdErrSink::new()))
    .try_level("warn")
    .unwrap()
    .progname("worker")
    .tags(["boot"])
    .build();
assert_eq!(logger.static_level(), Severity::Warn);
assert_eq!(logger.current_tags(), vec!["boot"]);
```
*/
#[derive(Debug)]
pub struct LoggerBuilder {
    sink: Option<Arc<dyn Sink>>,
    level: Severity,
    formatter: Arc<dyn Formatter>,
    progname: Option<String>,
    tags: Vec<String>,
}

impl LoggerBuilder {
    fn new() -> Self {
        Self {
            sink: None,
            level: Severity::Debug,
            formatter: Arc::new(DefaultFormatter),
            progname: None,
            tags: Vec::new(),
        }
    }

    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Like [`level`](Self::level), for levels read from strings or numbers.
    pub fn try_level<L: IntoSeverity>(mut self, level: L) -> Result<Self, LogError> {
        self.level = level.into_severity()?;
        Ok(self)
    }

    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn progname(mut self, progname: impl Into<String>) -> Self {
        self.progname = Some(progname.into());
        self
    }

    /// Base tags carried by every line of the built logger.
    pub fn tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.tags.extend(crate::tags::normalize_tags(tags));
        self
    }

    pub fn build(self) -> Logger {
        let stack = Arc::new(TagStack::with_base(self.tags));
        Logger {
            sink: self.sink,
            filter: Arc::new(SeverityFilter::new(self.level)),
            formatter: ArcSwap::from_pointee(TaggedFormatter::new(self.formatter, stack)),
            progname: ArcSwapOption::new(self.progname.map(Arc::new)),
        }
    }
}
