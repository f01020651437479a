// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning a message into a line.

use crate::context::ContextId;
use crate::log_record::elapsed_since_start;
use crate::severity::Severity;
use std::fmt::Debug;
use std::time::Instant;

/**
Renders one log line.

The returned string must not end with a newline; line termination is the sink's job.
Formatters are shared between threads and are called from whichever context emits, so
they may consult [`ContextId::current`].
*/
pub trait Formatter: Debug + Send + Sync {
    fn format(
        &self,
        severity: Severity,
        timestamp: Instant,
        label: Option<&str>,
        message: &str,
    ) -> String;
}

/**
The default line layout.

```text
W, [1.204ms #3]  WARN -- billing: card declined
```

Severity initial, time since the first record, emitting context id, the padded severity
name, the program label (empty if unset), and the message.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {
    fn format(
        &self,
        severity: Severity,
        timestamp: Instant,
        label: Option<&str>,
        message: &str,
    ) -> String {
        format!(
            "{}, [{:?} #{}] {:>5} -- {}: {}",
            severity.initial(),
            elapsed_since_start(timestamp),
            ContextId::current(),
            severity,
            label.unwrap_or(""),
            message
        )
    }
}

/// Emits the message verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SimpleFormatter;

impl Formatter for SimpleFormatter {
    fn format(&self, _: Severity, _: Instant, _: Option<&str>, message: &str) -> String {
        message.to_string()
    }
}
