// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async context preservation.

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use super::context_impl::Context;

/// A [`Future`] wrapper that makes a context current while the inner future is polled.
///
/// Executors poll many tasks on the same worker thread, and may move a task between
/// workers.  Keying per-context logging state by thread would let interleaved tasks see
/// each other's tags and level overrides.  `ApplyContext` installs the task's own
/// context around each poll and puts the worker's previous context back afterwards.
///
/// # Examples
///
/// ```rust
/// use scopelog::context::{ApplyContext, Context};
/// use scopelog::{InMemorySink, Logger, LoggerExt, SimpleFormatter};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let sink = Arc::new(InMemorySink::new());
/// let logger = Logger::builder()
///     .sink(sink.clone())
///     .formatter(Arc::new(SimpleFormatter))
///     .build();
///
/// let request = ApplyContext::new(Context::new("request-1"), async {
///     logger.tagged(["req-1"], |l| l.info("handled")).unwrap();
/// });
/// request.await;
/// assert_eq!(sink.drain_logs(), "[req-1] handled");
/// # }
/// ```
pub struct ApplyContext<F>(Context, F);

impl<F> ApplyContext<F> {
    /// Wraps `f` so that `context` is current whenever it is polled.
    pub fn new(context: Context, f: F) -> Self {
        Self(context, f)
    }

    /// The context applied to the inner future.
    pub fn context(&self) -> &Context {
        &self.0
    }
}

impl<F> Future for ApplyContext<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        // SAFETY: the inner future is never moved out of `self`
        let (context, fut) = unsafe {
            let d = self.get_unchecked_mut();
            (d.0.clone(), Pin::new_unchecked(&mut d.1))
        };
        let _guard = context.enter();
        fut.poll(cx)
    }
}
