// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-context severity overrides layered on a static level.
//!
//! A [`SeverityFilter`] holds the level configured for a handle plus an optional
//! override per [`ContextId`].  The override of one context is invisible to every
//! other context, so a request that temporarily turns on `Debug` output does not flood
//! the log with debug lines from unrelated requests running alongside it.
//!
//! ```rust
//! use scopelog::context::{Context, ContextId};
//! use scopelog::{Severity, SeverityFilter};
//!
//! let filter = SeverityFilter::new(Severity::Warn);
//! let here = ContextId::current();
//! filter.set_override(here, Some(Severity::Debug));
//!
//! let elsewhere = Context::new("other").id();
//! assert_eq!(filter.effective_level(here), Severity::Debug);
//! assert_eq!(filter.effective_level(elsewhere), Severity::Warn);
//!
//! filter.set_override(here, None);
//! assert_eq!(filter.effective_level(here), Severity::Warn);
//! ```

use crate::context::ContextId;
use crate::context_map::ContextMap;
use crate::severity::Severity;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug)]
pub struct SeverityFilter {
    level: AtomicU8,
    overrides: ContextMap<Severity>,
}

impl SeverityFilter {
    pub fn new(level: Severity) -> Self {
        Self {
            level: AtomicU8::new(level.as_u8()),
            overrides: ContextMap::new(),
        }
    }

    /// The static level, ignoring overrides.
    pub fn level(&self) -> Severity {
        // only ever stored from a Severity
        Severity::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level.as_u8(), Ordering::Relaxed);
    }

    /// The override for `context`, if any.
    pub fn override_for(&self, context: ContextId) -> Option<Severity> {
        self.overrides.get(context)
    }

    /// Sets or clears the override for `context`, returning the previous one.
    ///
    /// Clearing removes the entry entirely.
    pub fn set_override(&self, context: ContextId, level: Option<Severity>) -> Option<Severity> {
        self.overrides.set(context, level)
    }

    /// The override for `context` if set, otherwise the static level.
    pub fn effective_level(&self, context: ContextId) -> Severity {
        self.override_for(context).unwrap_or_else(|| self.level())
    }

    /// Whether a record at `severity` passes for `context`.
    #[inline]
    pub fn allows(&self, context: ContextId, severity: Severity) -> bool {
        severity >= self.effective_level(context)
    }

    /// Number of contexts currently holding an override.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Default for SeverityFilter {
    fn default() -> Self {
        Self::new(Severity::Debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use std::sync::{Arc, Barrier};

    #[test]
    fn falls_back_to_static_level() {
        let filter = SeverityFilter::new(Severity::Info);
        let ctx = Context::new("fallback").id();
        assert_eq!(filter.effective_level(ctx), Severity::Info);
        filter.set_level(Severity::Error);
        assert_eq!(filter.effective_level(ctx), Severity::Error);
        assert!(!filter.allows(ctx, Severity::Warn));
        assert!(filter.allows(ctx, Severity::Fatal));
    }

    #[test]
    fn clearing_removes_entry() {
        let filter = SeverityFilter::new(Severity::Warn);
        let ctx = Context::new("clear").id();
        assert_eq!(filter.set_override(ctx, Some(Severity::Debug)), None);
        assert_eq!(filter.override_count(), 1);
        assert_eq!(filter.set_override(ctx, None), Some(Severity::Debug));
        assert_eq!(filter.override_count(), 0);
        assert_eq!(filter.set_override(ctx, None), None);
    }

    #[test]
    fn overrides_are_per_context_across_threads() {
        let filter = Arc::new(SeverityFilter::new(Severity::Warn));
        let barrier = Arc::new(Barrier::new(2));

        let spawn = |level: Severity| {
            let filter = filter.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                let me = ContextId::current();
                filter.set_override(me, Some(level));
                barrier.wait();
                // the other thread has set its own override by now
                let seen = filter.effective_level(me);
                barrier.wait();
                filter.set_override(me, None);
                seen
            })
        };
        let a = spawn(Severity::Debug);
        let b = spawn(Severity::Fatal);
        assert_eq!(a.join().unwrap(), Severity::Debug);
        assert_eq!(b.join().unwrap(), Severity::Fatal);
        assert_eq!(filter.override_count(), 0);
    }
}
