// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-context tag stacks and the formatter decorator that renders them.
//!
//! Tags are short strings ("request id", "job name", ...) prefixed to every line emitted
//! while they are active.  Each context has its own stack, so two threads tagging their
//! own work never see each other's tags:
//!
//! ```rust
//! use scopelog::TagStack;
//! use scopelog::context::ContextId;
//!
//! let tags = TagStack::new();
//! let here = ContextId::current();
//! tags.push(here, ["req-7", "", "billing"]);
//! assert_eq!(tags.prefix(here), "[req-7] [billing] ");
//!
//! let other = std::thread::spawn(|| ContextId::current()).join().unwrap();
//! assert_eq!(tags.prefix(other), "");
//!
//! tags.pop(here, 2);
//! assert!(tags.current(here).is_empty());
//! ```
//!
//! Blank tags are dropped on push, and pops are by count: the scoped helpers in
//! [`LoggerExt`](crate::LoggerExt) pop exactly as many tags as they pushed.

use crate::context::{Context, ContextId};
use crate::context_map::ContextMap;
use crate::formatter::Formatter;
use crate::global_logger::diagnostic;
use crate::handle::LoggerHandle;
use crate::severity::Severity;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

/// Drops blank entries and takes ownership of the rest.
pub(crate) fn normalize_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    tags.into_iter()
        .filter(|t| !t.as_ref().trim().is_empty())
        .map(|t| t.as_ref().to_string())
        .collect()
}

/// Renders tags as `"[a] [b] "`.
pub fn render_prefix<S: AsRef<str>>(tags: &[S]) -> String {
    let mut prefix = String::new();
    for tag in tags {
        prefix.push('[');
        prefix.push_str(tag.as_ref());
        prefix.push_str("] ");
    }
    prefix
}

/**
Ordered tags per context, oldest first.

A stack may also carry *base* tags that every context sees before its own.  Base tags
are fixed at construction (see [`TagStack::with_base`]) and are never popped or cleared.
*/
#[derive(Debug, Default)]
pub struct TagStack {
    base: Vec<String>,
    stacks: ContextMap<Vec<String>>,
}

impl TagStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack whose every context starts out with `base`.
    pub fn with_base<I>(base: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            base: normalize_tags(base),
            stacks: ContextMap::new(),
        }
    }

    /// Pushes the non-blank entries of `tags` and returns what was pushed.
    pub fn push<I>(&self, context: ContextId, tags: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let tags = normalize_tags(tags);
        self.push_normalized(context, &tags);
        tags
    }

    pub(crate) fn push_normalized(&self, context: ContextId, tags: &[String]) {
        if tags.is_empty() {
            return;
        }
        self.stacks.update(context, |slot| {
            slot.get_or_insert_with(Vec::new).extend_from_slice(tags);
        });
    }

    /**
    Pops up to `count` of the most recent tags, returning them oldest first.

    Fewer than `count` are returned if the stack is shallower.  A stack popped to empty
    is removed from the map.
    */
    pub fn pop(&self, context: ContextId, count: usize) -> Vec<String> {
        if count == 0 {
            return Vec::new();
        }
        self.stacks.update(context, |slot| {
            let Some(stack) = slot.as_mut() else {
                return Vec::new();
            };
            let keep = stack.len().saturating_sub(count);
            let popped = stack.split_off(keep);
            if stack.is_empty() {
                *slot = None;
            }
            popped
        })
    }

    /// Removes every tag pushed by `context`, returning them.
    pub fn clear(&self, context: ContextId) -> Vec<String> {
        self.stacks.remove(context).unwrap_or_default()
    }

    /// Base tags followed by the context's own tags.
    pub fn current(&self, context: ContextId) -> Vec<String> {
        self.stacks.read(context, |stack| {
            let mut all = self.base.clone();
            if let Some(stack) = stack {
                all.extend_from_slice(stack);
            }
            all
        })
    }

    /// Number of tags the context itself has pushed (base tags excluded).
    pub fn depth(&self, context: ContextId) -> usize {
        self.stacks.read(context, |stack| stack.map_or(0, Vec::len))
    }

    /// The rendered prefix; empty when there are no tags.
    pub fn prefix(&self, context: ContextId) -> String {
        self.stacks.read(context, |stack| {
            let mut prefix = render_prefix(&self.base);
            if let Some(stack) = stack {
                prefix.push_str(&render_prefix(stack));
            }
            prefix
        })
    }

    /// `message` with the context's prefix in front.
    pub fn render(&self, context: ContextId, message: &str) -> String {
        let mut line = self.prefix(context);
        line.push_str(message);
        line
    }

    pub fn base(&self) -> &[String] {
        &self.base
    }

    /// Number of contexts holding pushed tags.
    pub fn context_count(&self) -> usize {
        self.stacks.len()
    }
}

/**
A [`Formatter`] decorator that prefixes the emitting context's tags to the message before
delegating.

```rust
use scopelog::{Formatter, Severity, SimpleFormatter, TagStack, TaggedFormatter};
use scopelog::context::ContextId;
use std::sync::Arc;
use std::time::Instant;

let tags = Arc::new(TagStack::new());
let formatter = TaggedFormatter::new(Arc::new(SimpleFormatter), tags.clone());
tags.push(ContextId::current(), ["db"]);
let line = formatter.format(Severity::Info, Instant::now(), None, "connected");
assert_eq!(line, "[db] connected");
```
*/
#[derive(Debug, Clone)]
pub struct TaggedFormatter {
    inner: Arc<dyn Formatter>,
    tags: Arc<TagStack>,
}

impl TaggedFormatter {
    pub fn new(inner: Arc<dyn Formatter>, tags: Arc<TagStack>) -> Self {
        Self { inner, tags }
    }

    /// The decorated formatter.
    pub fn inner(&self) -> &Arc<dyn Formatter> {
        &self.inner
    }

    pub fn tags(&self) -> &Arc<TagStack> {
        &self.tags
    }

    /// Same tag stack, different inner formatter.
    pub fn rewrap(&self, inner: Arc<dyn Formatter>) -> Self {
        Self {
            inner,
            tags: self.tags.clone(),
        }
    }
}

impl Formatter for TaggedFormatter {
    fn format(
        &self,
        severity: Severity,
        timestamp: Instant,
        label: Option<&str>,
        message: &str,
    ) -> String {
        let message = self.tags.render(ContextId::current(), message);
        self.inner.format(severity, timestamp, label, &message)
    }
}

/**
Pops the tags pushed by [`LoggerExt::tag_scope`](crate::LoggerExt::tag_scope) when dropped.

Pops by count, in the context that pushed them.  Finding fewer tags than were pushed
means something inside the scope popped tags it did not own; that is a broken invariant
and panics (or, if the thread is already panicking, is reported to the
[diagnostic logger](crate::global_logger)).
*/
#[derive(Debug)]
#[must_use = "the tags are popped as soon as the scope is dropped"]
pub struct TagScope<'a, H: LoggerHandle + ?Sized> {
    handle: &'a H,
    count: usize,
    context: Context,
    _not_send: PhantomData<*const ()>,
}

impl<'a, H: LoggerHandle + ?Sized> TagScope<'a, H> {
    pub(crate) fn new(handle: &'a H, count: usize) -> Self {
        Self {
            handle,
            count,
            context: Context::current(),
            _not_send: PhantomData,
        }
    }

    /// How many tags this scope pushed.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<H: LoggerHandle + ?Sized> Drop for TagScope<'_, H> {
    fn drop(&mut self) {
        if self.count == 0 {
            return;
        }
        let popped = self.context.reenter(|| self.handle.pop_tags(self.count));
        if popped.len() != self.count {
            let message = format!(
                "unbalanced tag stack in context {}: pushed {} tag(s) but only {} remained to pop",
                self.context,
                self.count,
                popped.len()
            );
            if std::thread::panicking() {
                diagnostic(Severity::Fatal, &message);
            } else {
                panic!("{message}");
            }
        }
    }
}
