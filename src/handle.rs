// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logger capability shared by every handle.
//!
//! [`LoggerHandle`] is the object-safe core that [`Logger`](crate::Logger) and
//! [`Broadcast`](crate::Broadcast) implement, so either can sit behind an
//! `Arc<dyn LoggerHandle>`, including as a member of another broadcast.
//! [`LoggerExt`] layers the convenient generic API on top: severity helpers, level
//! parsing, and the scoped `tagged`/`silence`/`log_at` operations.

use crate::error::LogError;
use crate::formatter::Formatter;
use crate::severity::{IntoSeverity, Severity};
use crate::silence::LevelGuard;
use crate::sink::Destination;
use crate::tags::{TagScope, normalize_tags, render_prefix};
use std::fmt::Debug;
use std::sync::Arc;

/**
A saved per-context override, as captured by [`LoggerHandle::swap_local_level`].

A broadcast records one snapshot per member so that each member gets back exactly the
override it had, even when members disagreed before the swap.
*/
#[derive(Debug, Clone)]
pub enum LevelSnapshot {
    Local(Option<Severity>),
    Fanout {
        own: Option<Severity>,
        members: Vec<(Arc<dyn LoggerHandle>, LevelSnapshot)>,
    },
}

/**
A logger as seen by callers.

Every operation acts on the *current* context (see [`crate::context`]) where per-context
state is involved.  Implementations must be usable from many contexts at once.
*/
pub trait LoggerHandle: Debug + Send + Sync {
    /**
    Emits `message` at `severity`.

    Returns `Ok(false)` without writing when the severity is below the effective level or
    there is nowhere to write, `Ok(true)` when a sink accepted the line.  `label`
    overrides the handle's program name for this line.
    */
    fn log(&self, severity: Severity, label: Option<&str>, message: &str) -> Result<bool, LogError>;

    /// Writes `text` to the sink(s) verbatim: no filtering, formatting or tags.
    fn write_raw(&self, text: &str) -> Result<(), LogError>;

    /// The effective level for the current context.
    fn level(&self) -> Severity;

    /// The configured level, ignoring per-context overrides.
    fn static_level(&self) -> Severity;

    fn apply_level(&self, level: Severity);

    /// The current context's override, if any.
    fn local_level(&self) -> Option<Severity>;

    /// Sets (`Some`) or removes (`None`) the current context's override.
    fn apply_local_level(&self, level: Option<Severity>);

    /// Replaces the current context's override and returns what it replaced.
    fn swap_local_level(&self, level: Option<Severity>) -> LevelSnapshot {
        let prior = self.local_level();
        self.apply_local_level(level);
        LevelSnapshot::Local(prior)
    }

    /// Puts back an override saved by [`swap_local_level`](Self::swap_local_level).
    fn restore_local_level(&self, snapshot: LevelSnapshot) {
        match snapshot {
            LevelSnapshot::Local(level) => self.apply_local_level(level),
            LevelSnapshot::Fanout { own, .. } => self.apply_local_level(own),
        }
    }

    /// Replaces the formatter; active tags keep being rendered.
    fn set_formatter(&self, formatter: Arc<dyn Formatter>);

    fn progname(&self) -> Option<String>;

    fn set_progname(&self, progname: Option<String>);

    /// Pushes already-normalized tags onto the current context's stack.
    fn push_tag_list(&self, tags: &[String]);

    /// Pops up to `count` tags from the current context's stack, oldest first.
    fn pop_tags(&self, count: usize) -> Vec<String>;

    /// Empties the current context's tag stack.
    fn clear_tags(&self);

    fn current_tags(&self) -> Vec<String>;

    /// Ends a unit of work: clears the current context's tags and flushes the sink(s).
    fn flush(&self) -> Result<(), LogError>;

    fn close(&self) -> Result<(), LogError>;

    /// Whether any sink behind this handle writes to `destination`.
    fn outputs_to(&self, destination: &Destination) -> bool;

    /// Whether [`LoggerExt::silence`] changes the level for this handle type.
    fn silencer_enabled(&self) -> bool {
        true
    }
}

/// Convenience API for every [`LoggerHandle`], including `dyn LoggerHandle`.
pub trait LoggerExt: LoggerHandle {
    fn add(&self, severity: Severity, message: &str) -> Result<bool, LogError> {
        self.log(severity, None, message)
    }

    fn debug(&self, message: &str) -> Result<bool, LogError> {
        self.log(Severity::Debug, None, message)
    }

    fn info(&self, message: &str) -> Result<bool, LogError> {
        self.log(Severity::Info, None, message)
    }

    fn warn(&self, message: &str) -> Result<bool, LogError> {
        self.log(Severity::Warn, None, message)
    }

    fn error(&self, message: &str) -> Result<bool, LogError> {
        self.log(Severity::Error, None, message)
    }

    fn fatal(&self, message: &str) -> Result<bool, LogError> {
        self.log(Severity::Fatal, None, message)
    }

    fn unknown(&self, message: &str) -> Result<bool, LogError> {
        self.log(Severity::Unknown, None, message)
    }

    /// Whether a record at `severity` would pass the current context's effective level.
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level()
    }

    fn debug_enabled(&self) -> bool {
        self.enabled(Severity::Debug)
    }

    fn info_enabled(&self) -> bool {
        self.enabled(Severity::Info)
    }

    fn warn_enabled(&self) -> bool {
        self.enabled(Severity::Warn)
    }

    fn error_enabled(&self) -> bool {
        self.enabled(Severity::Error)
    }

    fn fatal_enabled(&self) -> bool {
        self.enabled(Severity::Fatal)
    }

    /// Sets the static level.  Invalid input is rejected before anything changes.
    fn set_level<L: IntoSeverity>(&self, level: L) -> Result<(), LogError> {
        let level = level.into_severity()?;
        self.apply_level(level);
        Ok(())
    }

    /// Sets the current context's override.  Invalid input is rejected before anything
    /// changes.
    fn set_local_level<L: IntoSeverity>(&self, level: L) -> Result<(), LogError> {
        let level = level.into_severity()?;
        self.apply_local_level(Some(level));
        Ok(())
    }

    fn clear_local_level(&self) {
        self.apply_local_level(None);
    }

    /// Pushes the non-blank `tags` and returns what was pushed.
    fn push_tags<I>(&self, tags: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let tags = normalize_tags(tags);
        if !tags.is_empty() {
            self.push_tag_list(&tags);
        }
        tags
    }

    /// The current tags rendered as a line prefix.
    fn tags_text(&self) -> String {
        render_prefix(&self.current_tags())
    }

    /**
    Runs `body` with `tags` pushed for the current context.

    Exactly as many tags as were pushed are popped when `body` returns or unwinds.

    ```rust
    use scopelog::{InMemorySink, Logger, LoggerExt, LoggerHandle, SimpleFormatter};
    use std::sync::Arc;

    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::builder().sink(sink.clone()).formatter(Arc::new(SimpleFormatter)).build();

    logger.tagged(["A"], |l| l.tagged(["B"], |l| l.info("hi"))).unwrap();
    assert_eq!(sink.drain_logs(), "[A] [B] hi");
    assert!(logger.current_tags().is_empty());
    ```
    */
    fn tagged<I, R>(&self, tags: I, body: impl FnOnce(&Self) -> R) -> R
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let _scope = self.tag_scope(tags);
        body(self)
    }

    /// Guard form of [`tagged`](Self::tagged): the tags are popped when the guard drops.
    fn tag_scope<I>(&self, tags: I) -> TagScope<'_, Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let pushed = self.push_tags(tags);
        TagScope::new(self, pushed.len())
    }

    /**
    Runs `body` with the current context's threshold raised to `threshold`, restoring the
    previous override afterwards, including on unwind.

    If the silencer is switched off for this handle type, `body` runs unchanged.
    */
    fn silence<R>(&self, threshold: Severity, body: impl FnOnce(&Self) -> R) -> R {
        let _guard = self.silence_scope(threshold);
        body(self)
    }

    /// Guard form of [`silence`](Self::silence).
    fn silence_scope(&self, threshold: Severity) -> LevelGuard<'_, Self> {
        if self.silencer_enabled() {
            LevelGuard::swap(self, threshold)
        } else {
            LevelGuard::inert(self)
        }
    }

    /// Like [`silence`](Self::silence), but always applies `level`, which may also be
    /// lower than the current one.
    fn log_at<R>(&self, level: Severity, body: impl FnOnce(&Self) -> R) -> R {
        let _guard = self.log_at_scope(level);
        body(self)
    }

    /// Guard form of [`log_at`](Self::log_at).
    fn log_at_scope(&self, level: Severity) -> LevelGuard<'_, Self> {
        LevelGuard::swap(self, level)
    }
}

impl<T: LoggerHandle + ?Sized> LoggerExt for T {}

/// Handles are usually shared; let the `Arc` stand in for the handle.
impl<T: LoggerHandle + ?Sized> LoggerHandle for Arc<T> {
    fn log(
        &self,
        severity: Severity,
        label: Option<&str>,
        message: &str,
    ) -> Result<bool, LogError> {
        (**self).log(severity, label, message)
    }

    fn write_raw(&self, text: &str) -> Result<(), LogError> {
        (**self).write_raw(text)
    }

    fn level(&self) -> Severity {
        (**self).level()
    }

    fn static_level(&self) -> Severity {
        (**self).static_level()
    }

    fn apply_level(&self, level: Severity) {
        (**self).apply_level(level)
    }

    fn local_level(&self) -> Option<Severity> {
        (**self).local_level()
    }

    fn apply_local_level(&self, level: Option<Severity>) {
        (**self).apply_local_level(level)
    }

    fn swap_local_level(&self, level: Option<Severity>) -> LevelSnapshot {
        (**self).swap_local_level(level)
    }

    fn restore_local_level(&self, snapshot: LevelSnapshot) {
        (**self).restore_local_level(snapshot)
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        (**self).set_formatter(formatter)
    }

    fn progname(&self) -> Option<String> {
        (**self).progname()
    }

    fn set_progname(&self, progname: Option<String>) {
        (**self).set_progname(progname)
    }

    fn push_tag_list(&self, tags: &[String]) {
        (**self).push_tag_list(tags)
    }

    fn pop_tags(&self, count: usize) -> Vec<String> {
        (**self).pop_tags(count)
    }

    fn clear_tags(&self) {
        (**self).clear_tags()
    }

    fn current_tags(&self) -> Vec<String> {
        (**self).current_tags()
    }

    fn flush(&self) -> Result<(), LogError> {
        (**self).flush()
    }

    fn close(&self) -> Result<(), LogError> {
        (**self).close()
    }

    fn outputs_to(&self, destination: &Destination) -> bool {
        (**self).outputs_to(destination)
    }

    fn silencer_enabled(&self) -> bool {
        (**self).silencer_enabled()
    }
}
