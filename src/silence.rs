// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped threshold changes.
//!
//! [`LoggerExt::silence`](crate::LoggerExt::silence) and
//! [`LoggerExt::log_at`](crate::LoggerExt::log_at) install a per-context override for the
//! duration of a block and then put back whatever override was there before (possibly
//! none).  Because the saved *value* is restored, nesting works:
//!
//! ```rust
//! use scopelog::{InMemorySink, Logger, LoggerExt, Severity, SimpleFormatter};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let logger = Logger::builder()
//!     .sink(sink.clone())
//!     .formatter(Arc::new(SimpleFormatter))
//!     .level(Severity::Debug)
//!     .build();
//!
//! logger.silence(Severity::Warn, |l| {
//!     l.info("dropped").unwrap();
//!     l.silence(Severity::Error, |l| l.warn("dropped too").unwrap());
//!     l.warn("kept").unwrap();
//! });
//! logger.debug("kept again").unwrap();
//! assert_eq!(sink.drain_logs(), "kept\nkept again");
//! ```
//!
//! Whether `silence` does anything is a per-handle-type switch, see
//! [`SilencerSwitch`].  `log_at` ignores the switch.

use crate::context::Context;
use crate::handle::{LevelSnapshot, LoggerHandle};
use crate::severity::Severity;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

/**
Process-wide on/off switch for silencing one handle type.

Each handle type owns one `static` switch ([`Logger::set_silencer`](crate::Logger::set_silencer),
[`Broadcast::set_silencer`](crate::Broadcast::set_silencer)).  Turning it off makes
`silence` blocks run at the normal level, which is useful when chasing a problem that
the silenced code would otherwise hide.
*/
#[derive(Debug)]
pub struct SilencerSwitch {
    enabled: AtomicBool,
}

impl SilencerSwitch {
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

/**
Restores the override saved by a `silence_scope` or `log_at_scope` call when dropped.

Restoration happens in the context that created the guard.
*/
#[derive(Debug)]
#[must_use = "the previous level is restored as soon as the guard is dropped"]
pub struct LevelGuard<'a, H: LoggerHandle + ?Sized> {
    handle: &'a H,
    context: Context,
    saved: Option<LevelSnapshot>,
    _not_send: PhantomData<*const ()>,
}

impl<'a, H: LoggerHandle + ?Sized> LevelGuard<'a, H> {
    pub(crate) fn swap(handle: &'a H, level: Severity) -> Self {
        let saved = handle.swap_local_level(Some(level));
        Self {
            handle,
            context: Context::current(),
            saved: Some(saved),
            _not_send: PhantomData,
        }
    }

    /// A guard that changed nothing and restores nothing.
    pub(crate) fn inert(handle: &'a H) -> Self {
        Self {
            handle,
            context: Context::current(),
            saved: None,
            _not_send: PhantomData,
        }
    }

    /// Whether this guard actually changed the level.
    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }
}

impl<H: LoggerHandle + ?Sized> Drop for LevelGuard<'_, H> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            let handle = self.handle;
            self.context.reenter(|| handle.restore_local_level(saved));
        }
    }
}
