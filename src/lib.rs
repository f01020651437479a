//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# scopelog

scopelog is a logger for concurrent programs, where "the current request" is not the same
thing as "the current thread".

# Development status

scopelog is experimental and the API may change.

# The problem

A sequential logger has one level and one output.  In a server, that is rarely what you
want:

* You are chasing a bug in one request.  Turning the level down to `Debug` for the whole
  process buries you in output from every other request.
* A noisy dependency call should be quiet, but only while *this* code is calling it.
* You want the request id on every line of the request, without threading it through
  every call.
* You want the same lines on stderr and in a file, and you want the two to behave as one
  logger.

# What scopelog adds

Three capabilities, each of which composes with the others:

| Capability | API | Scope |
|------------|-----|-------|
| Per-context level override | [`LoggerExt::set_local_level`], [`LoggerExt::silence`], [`LoggerExt::log_at`] | current context only |
| Nested tags | [`LoggerExt::tagged`], [`LoggerExt::push_tags`], [`Logger::with_tags`] | current context only |
| Fan-out | [`Broadcast`] | every member, in order |

A *context* is the unit of concurrency that per-context state is keyed by.  Every thread
starts out with its own; async code carries one explicitly with
[`ApplyContext`](context::ApplyContext).  See [`context`].

# The API

```rust
use scopelog::{InMemorySink, Logger, LoggerExt, Severity, SimpleFormatter};
use std::sync::Arc;

let sink = Arc::new(InMemorySink::new());
let logger = Logger::builder()
    .sink(sink.clone())
    .formatter(Arc::new(SimpleFormatter))
    .level(Severity::Info)
    .build();

logger.tagged(["req-42"], |l| {
    l.info("start").unwrap();
    l.silence(Severity::Error, |l| l.warn("noisy retry").unwrap());
    scopelog::info!(l, "done in {}ms", 12).unwrap();
});

assert_eq!(sink.drain_logs(), "[req-42] start\n[req-42] done in 12ms");
```

Scoped operations release what they acquired on every way out of the block, including
panics.  Guard forms ([`LoggerExt::tag_scope`], [`LoggerExt::silence_scope`],
[`LoggerExt::log_at_scope`]) exist for code that cannot be written as a closure.

# Multithreading

Per-context state lives in sharded concurrent maps keyed by [`ContextId`](context::ContextId),
so contexts never contend on a single lock.  Handles are `Send + Sync` and are meant to be
shared through `Arc`.

# Diagnostics

Problems the crate cannot return to a caller go to the [diagnostic logger](global_logger),
which writes to stderr unless replaced.
*/

mod broadcast;
pub mod context;
mod context_map;
mod error;
mod formatter;
pub mod global_logger;
mod handle;
mod inmemory_sink;
mod log_record;
mod logger;
mod macros;
mod severity;
mod severity_filter;
mod silence;
mod sink;
mod stderror_sink;
mod tags;
mod writer_sink;

pub use broadcast::{Broadcast, FanoutPolicy};
pub use error::LogError;
pub use formatter::{DefaultFormatter, Formatter, SimpleFormatter};
pub use handle::{LevelSnapshot, LoggerExt, LoggerHandle};
pub use inmemory_sink::InMemorySink;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder};
pub use severity::{IntoSeverity, Severity};
pub use severity_filter::SeverityFilter;
pub use silence::{LevelGuard, SilencerSwitch};
pub use sink::{Destination, Sink};
pub use stderror_sink::StdErrSink;
pub use tags::{TagScope, TagStack, TaggedFormatter, render_prefix};
pub use writer_sink::WriterSink;
