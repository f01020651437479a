// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution-context identity.
//!
//! Every piece of per-context state in this crate (severity overrides, tag stacks) is
//! keyed by the [`ContextId`] of the [`Context`] that is current when the call is made.
//!
//! # Threads
//!
//! Each thread lazily receives its own root context, so plain multithreaded code needs
//! nothing special:
//!
//! ```rust
//! use scopelog::context::Context;
//!
//! let here = Context::current().id();
//! let there = std::thread::spawn(|| Context::current().id()).join().unwrap();
//! assert_ne!(here, there);
//! ```
//!
//! # Thread pools
//!
//! A pool thread keeps its context identity between jobs.  Either clear the logger's
//! tags at the job boundary, or give each job a fresh context:
//!
//! ```rust
//! use scopelog::context::Context;
//!
//! let job = Context::new("job-42");
//! let id = job.scope(|| Context::current().id());
//! assert_eq!(id, job.id());
//! ```
//!
//! # Async executors
//!
//! Executors multiplex many tasks onto a few threads, so thread identity is the wrong key.
//! Wrap each task in [`ApplyContext`] so that its own context is current whenever it
//! is polled:
//!
//! ```rust
//! use scopelog::context::{ApplyContext, Context};
//!
//! # async fn example() {
//! let ctx = Context::new("request");
//! let id = ctx.id();
//! let seen = ApplyContext::new(ctx, async { Context::current().id() }).await;
//! assert_eq!(seen, id);
//! # }
//! ```

mod apply_context;
mod context_impl;

#[cfg(test)]
mod tests;

pub use apply_context::ApplyContext;
pub use context_impl::{Context, ContextGuard, ContextId};
