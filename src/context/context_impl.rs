// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core Context implementation.

use std::cell::RefCell;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Id 0 is reserved for code running while thread-local storage is being torn down.
pub(crate) static CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a context.
///
/// Ids are never reused within a process, which makes them suitable as map keys for
/// per-context state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(pub(crate) u64);

impl ContextId {
    /// The id of the current context.
    ///
    /// Equivalent to `Context::current().id()` but does not clone the context.
    #[inline]
    pub fn current() -> ContextId {
        CONTEXT
            .try_with(|slot| {
                slot.borrow_mut()
                    .get_or_insert_with(Context::thread_root)
                    .id()
            })
            .unwrap_or(ContextId(0))
    }

    /// The raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub(crate) struct ContextInner {
    pub(crate) context_id: u64,
    pub(crate) label: String,
}

/// The currently executing unit of concurrency, as far as logging is concerned.
///
/// Contexts are cheap to clone (Arc-based) and can be moved between threads.  Which
/// context is *current* is tracked per thread; see [`Context::enter`],
/// [`Context::scope`] and [`ApplyContext`](super::ApplyContext) for changing it.
///
/// # Examples
///
/// ```rust
/// use scopelog::context::Context;
///
/// let worker = Context::new("worker");
/// assert_eq!(worker.label(), "worker");
///
/// let before = Context::current().id();
/// worker.scope(|| {
///     assert_eq!(Context::current().label(), "worker");
/// });
/// assert_eq!(Context::current().id(), before);
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    pub(crate) inner: Arc<ContextInner>,
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.inner.context_id == other.inner.context_id
    }
}

impl Eq for Context {}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.context_id.hash(state);
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id(), self.inner.label)
    }
}

thread_local! {
    pub(crate) static CONTEXT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

impl Context {
    /// Creates a new context with a fresh id.
    ///
    /// The context is not current anywhere until it is entered.
    pub fn new(label: impl Into<String>) -> Context {
        Context {
            inner: Arc::new(ContextInner {
                context_id: CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
                label: label.into(),
            }),
        }
    }

    fn thread_root() -> Context {
        let thread = std::thread::current();
        Context::new(thread.name().unwrap_or("thread"))
    }

    /// Returns the current context for this thread.
    ///
    /// Every thread starts with its own root context, labeled with the thread name.
    #[inline]
    pub fn current() -> Context {
        CONTEXT.with(|slot| {
            slot.borrow_mut()
                .get_or_insert_with(Context::thread_root)
                .clone()
        })
    }

    /// The unique id of this context.
    #[inline]
    pub fn id(&self) -> ContextId {
        ContextId(self.inner.context_id)
    }

    /// The human-readable label given at construction.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Makes this context current on this thread, returning the one it replaced.
    ///
    /// Prefer [`enter`](Context::enter) or [`scope`](Context::scope), which put the
    /// previous context back automatically.
    pub fn set_current(self) -> Context {
        CONTEXT.with(|slot| {
            slot.borrow_mut()
                .replace(self)
                .unwrap_or_else(Context::thread_root)
        })
    }

    /// Replaces this thread's context with a brand-new root context.
    ///
    /// Any per-context state keyed by the old id is no longer reachable from this
    /// thread, which is a cheap way to start a clean unit of work on a reused thread.
    pub fn reset(label: impl Into<String>) -> ContextId {
        let fresh = Context::new(label);
        let id = fresh.id();
        fresh.set_current();
        id
    }

    /// Makes this context current until the returned guard is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scopelog::context::Context;
    ///
    /// let ctx = Context::new("batch");
    /// {
    ///     let _guard = ctx.clone().enter();
    ///     assert_eq!(Context::current(), ctx);
    /// }
    /// assert_ne!(Context::current(), ctx);
    /// ```
    pub fn enter(self) -> ContextGuard {
        let prior = self.set_current();
        ContextGuard {
            prior: Some(prior),
            _not_send: PhantomData,
        }
    }

    /// Runs `f` with this context current, restoring the previous one afterwards,
    /// including when `f` panics.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.clone().enter();
        f()
    }

    /// Runs `f` in this context, entering it only if it is not already current.
    ///
    /// Scope guards use this to release state in the context that acquired it.
    pub(crate) fn reenter<R>(&self, f: impl FnOnce() -> R) -> R {
        if ContextId::current() == self.id() {
            f()
        } else {
            self.scope(f)
        }
    }
}

/// Restores the previously current context on drop.
///
/// Returned by [`Context::enter`].  The guard is bound to the thread that created it.
#[derive(Debug)]
#[must_use = "the previous context is restored as soon as the guard is dropped"]
pub struct ContextGuard {
    prior: Option<Context>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            // thread-local storage may already be gone during thread teardown
            let _ = CONTEXT.try_with(|slot| {
                slot.borrow_mut().replace(prior);
            });
        }
    }
}
