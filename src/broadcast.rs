// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
Fan-out: one handle, many loggers.

A [`Broadcast`] forwards every call to each of its members in order and then applies
the call to its own per-context state (its level overrides and its tag stack).  Callers
cannot tell it from a single logger: it implements [`LoggerHandle`], so it can be tagged,
silenced, or nested inside another broadcast.

```rust
use scopelog::{Broadcast, InMemorySink, Logger, LoggerExt, LoggerHandle, SimpleFormatter};
use std::sync::Arc;

let screen = Arc::new(InMemorySink::new());
let file = Arc::new(InMemorySink::new());
let members: Vec<Arc<dyn LoggerHandle>> = vec![
    Arc::new(Logger::builder().sink(screen.clone()).formatter(Arc::new(SimpleFormatter)).build()),
    Arc::new(Logger::builder().sink(file.clone()).formatter(Arc::new(SimpleFormatter)).build()),
];
let both = Broadcast::new(members).unwrap();

both.tagged(["X"], |l| l.info("hi")).unwrap();
assert_eq!(screen.drain_logs(), "[X] hi");
assert_eq!(file.drain_logs(), "[X] hi");
assert!(both.current_tags().is_empty());
```

# Failures

Under [`FanoutPolicy::BestEffort`] every member is attempted even after one fails, and
the first failure is returned once all members have been tried.  Later failures are
reported to the [diagnostic logger](crate::global_logger).  [`FanoutPolicy::FailFast`]
stops at the first failing member instead.

# Membership

The member list is an [`ArcSwap`] snapshot: a call in flight keeps using the list it
started with, and [`broadcast_to`](Broadcast::broadcast_to) or
[`stop_broadcasting_to`](Broadcast::stop_broadcasting_to) never block callers.  A scoped
level change remembers the members it touched, so leaving the scope restores exactly
those, even if the membership changed in between.

Tags work the same way.  Each tag the broadcast holds for a context remembers which
members it was pushed to, and popping it pops exactly those members.  A member added
while tags are active is given the calling context's tags so its lines carry them too;
other contexts reach it from their next push on.
*/

use crate::context::ContextId;
use crate::context_map::ContextMap;
use crate::error::LogError;
use crate::formatter::Formatter;
use crate::global_logger::diagnostic;
use crate::handle::{LevelSnapshot, LoggerHandle};
use crate::severity::Severity;
use crate::silence::SilencerSwitch;
use crate::sink::Destination;
use crate::tags::TagStack;
use arc_swap::{ArcSwap, ArcSwapOption};
use std::fmt::Debug;
use std::sync::Arc;

static SILENCER: SilencerSwitch = SilencerSwitch::new(true);

type Holders = Vec<Arc<dyn LoggerHandle>>;

fn same_member(a: &Arc<dyn LoggerHandle>, b: &Arc<dyn LoggerHandle>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// What a [`Broadcast`] does when a member fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FanoutPolicy {
    /// Attempt every member, then return the first error.
    #[default]
    BestEffort,
    /// Return the first error immediately; later members are not attempted.
    FailFast,
}

/**
A handle that replays every call to an ordered list of members.

See the [module documentation](self) for an overview.
*/
pub struct Broadcast {
    members: ArcSwap<Vec<Arc<dyn LoggerHandle>>>,
    overrides: ContextMap<Severity>,
    tags: TagStack,
    /// For each own tag of a context, the members it was pushed to.
    holders: ContextMap<Vec<Holders>>,
    progname: ArcSwapOption<String>,
    policy: FanoutPolicy,
}

impl Broadcast {
    /// A best-effort broadcast over `members`.  An empty list is rejected.
    pub fn new(members: Vec<Arc<dyn LoggerHandle>>) -> Result<Self, LogError> {
        Self::with_policy(members, FanoutPolicy::default())
    }

    pub fn with_policy(
        members: Vec<Arc<dyn LoggerHandle>>,
        policy: FanoutPolicy,
    ) -> Result<Self, LogError> {
        if members.is_empty() {
            return Err(LogError::EmptyBroadcast);
        }
        Ok(Self {
            members: ArcSwap::from_pointee(members),
            overrides: ContextMap::new(),
            tags: TagStack::new(),
            holders: ContextMap::new(),
            progname: ArcSwapOption::empty(),
            policy,
        })
    }

    /// Turns `silence` on or off for every [`Broadcast`] in the process.
    pub fn set_silencer(enabled: bool) {
        SILENCER.set(enabled);
    }

    pub fn silencer() -> bool {
        SILENCER.is_enabled()
    }

    pub fn policy(&self) -> FanoutPolicy {
        self.policy
    }

    /**
    Appends `member`.  Calls already in flight do not see it.

    If the calling context has tags active on this broadcast, they are pushed onto the
    new member and popped from it again when their scopes end.
    */
    pub fn broadcast_to(&self, member: Arc<dyn LoggerHandle>) {
        self.members.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(member.clone());
            next
        });
        let context = ContextId::current();
        let active = self.tags.current(context);
        if active.is_empty() {
            return;
        }
        member.push_tag_list(&active);
        self.holders.update(context, |slot| {
            if let Some(holders) = slot.as_mut() {
                for tag_holders in holders.iter_mut() {
                    tag_holders.push(member.clone());
                }
            }
        });
    }

    /**
    Removes every occurrence of `member` (compared by identity), returning whether
    anything was removed.

    Removing the last member is allowed; an empty broadcast writes nowhere.
    */
    pub fn stop_broadcasting_to(&self, member: &Arc<dyn LoggerHandle>) -> bool {
        let mut removed = false;
        self.members.rcu(|current| {
            let kept: Vec<Arc<dyn LoggerHandle>> = current
                .iter()
                .filter(|m| !same_member(m, member))
                .cloned()
                .collect();
            removed = kept.len() != current.len();
            kept
        });
        removed
    }

    /// A snapshot of the current members, in order.
    pub fn members(&self) -> Vec<Arc<dyn LoggerHandle>> {
        self.members.load().iter().cloned().collect()
    }

    /// The tag stack mirrored from the members.
    pub fn tags(&self) -> &TagStack {
        &self.tags
    }

    /// Runs `op` on each member according to the policy.
    fn fan_out<T>(
        &self,
        what: &str,
        mut op: impl FnMut(&dyn LoggerHandle) -> Result<T, LogError>,
    ) -> Result<Vec<T>, LogError> {
        let members = self.members.load();
        let mut outputs = Vec::with_capacity(members.len());
        let mut first = None;
        for member in members.iter() {
            match op(&**member) {
                Ok(output) => outputs.push(output),
                Err(e) if self.policy == FanoutPolicy::FailFast => return Err(e),
                Err(e) => match first {
                    None => first = Some(e),
                    Some(_) => diagnostic(
                        Severity::Warn,
                        &format!("broadcast {what}: member {member:?} also failed: {e}"),
                    ),
                },
            }
        }
        match first {
            Some(e) => Err(e),
            None => Ok(outputs),
        }
    }

    /// Runs an infallible `op` on each member.
    fn for_each_member(&self, mut op: impl FnMut(&dyn LoggerHandle)) {
        for member in self.members.load().iter() {
            op(&**member);
        }
    }
}

impl Debug for Broadcast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast")
            .field("members", &self.members.load().len())
            .field("policy", &self.policy)
            .field("progname", &self.progname.load_full())
            .finish_non_exhaustive()
    }
}

/*
Boilerplate notes.

# Broadcast

Clone: same question as Logger (shared or fresh per-context state), left out.
PartialEq: identity is what stop_broadcasting_to needs, and Arc provides it.
Default: a broadcast needs members.
*/

impl LoggerHandle for Broadcast {
    fn log(
        &self,
        severity: Severity,
        label: Option<&str>,
        message: &str,
    ) -> Result<bool, LogError> {
        if let Some(level) = self.overrides.get(ContextId::current()) {
            if severity < level {
                return Ok(false);
            }
        }
        let label = match label {
            Some(label) => Some(label.to_string()),
            None => self.progname.load_full().map(|p| (*p).clone()),
        };
        let written = self.fan_out("log", |m| m.log(severity, label.as_deref(), message))?;
        Ok(written.into_iter().any(|w| w))
    }

    fn write_raw(&self, text: &str) -> Result<(), LogError> {
        self.fan_out("write_raw", |m| m.write_raw(text)).map(drop)
    }

    /// The own override if set, else the lowest effective level among the members.
    fn level(&self) -> Severity {
        if let Some(level) = self.overrides.get(ContextId::current()) {
            return level;
        }
        self.members
            .load()
            .iter()
            .map(|m| m.level())
            .min()
            .unwrap_or(Severity::Unknown)
    }

    fn static_level(&self) -> Severity {
        self.members
            .load()
            .iter()
            .map(|m| m.static_level())
            .min()
            .unwrap_or(Severity::Unknown)
    }

    fn apply_level(&self, level: Severity) {
        self.for_each_member(|m| m.apply_level(level));
    }

    fn local_level(&self) -> Option<Severity> {
        self.overrides.get(ContextId::current())
    }

    fn apply_local_level(&self, level: Option<Severity>) {
        self.for_each_member(|m| m.apply_local_level(level));
        self.overrides.set(ContextId::current(), level);
    }

    fn swap_local_level(&self, level: Option<Severity>) -> LevelSnapshot {
        let members = self
            .members
            .load()
            .iter()
            .map(|m| (m.clone(), m.swap_local_level(level)))
            .collect();
        let own = self.overrides.set(ContextId::current(), level);
        LevelSnapshot::Fanout { own, members }
    }

    fn restore_local_level(&self, snapshot: LevelSnapshot) {
        match snapshot {
            LevelSnapshot::Fanout { own, members } => {
                for (member, saved) in members {
                    member.restore_local_level(saved);
                }
                self.overrides.set(ContextId::current(), own);
            }
            LevelSnapshot::Local(level) => self.apply_local_level(level),
        }
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.for_each_member(|m| m.set_formatter(formatter.clone()));
    }

    fn progname(&self) -> Option<String> {
        self.progname.load_full().map(|p| (*p).clone())
    }

    fn set_progname(&self, progname: Option<String>) {
        self.for_each_member(|m| m.set_progname(progname.clone()));
        self.progname.store(progname.map(Arc::new));
    }

    fn push_tag_list(&self, tags: &[String]) {
        if tags.is_empty() {
            return;
        }
        let context = ContextId::current();
        let members = self.members();
        for member in &members {
            member.push_tag_list(tags);
        }
        self.tags.push_normalized(context, tags);
        self.holders.update(context, |slot| {
            let holders = slot.get_or_insert_with(Vec::new);
            holders.extend(std::iter::repeat_n(members, tags.len()));
        });
    }

    /**
    Pops the newest `count` tags from this broadcast and, for each of them, from the
    members it was pushed to.

    If a member had fewer of those tags left than expected, the result is shortened by
    the shortfall, so a [`TagScope`](crate::TagScope) sees the imbalance.
    */
    fn pop_tags(&self, count: usize) -> Vec<String> {
        if count == 0 {
            return Vec::new();
        }
        let context = ContextId::current();
        let mut popped = self.tags.pop(context, count);
        let released = self.holders.update(context, |slot| {
            let Some(holders) = slot.as_mut() else {
                return Vec::new();
            };
            let keep = holders.len().saturating_sub(popped.len());
            let released = holders.split_off(keep);
            if holders.is_empty() {
                *slot = None;
            }
            released
        });

        // how many tags each member owes
        let mut owed: Vec<(Arc<dyn LoggerHandle>, usize)> = Vec::new();
        for member in released.into_iter().flatten() {
            match owed.iter_mut().find(|(m, _)| same_member(m, &member)) {
                Some((_, n)) => *n += 1,
                None => owed.push((member, 1)),
            }
        }
        let mut shortfall = 0;
        for (member, n) in owed {
            let got = member.pop_tags(n).len();
            shortfall = shortfall.max(n - got.min(n));
        }
        let short = shortfall.min(popped.len());
        popped.split_off(short)
    }

    fn clear_tags(&self) {
        self.for_each_member(|m| m.clear_tags());
        let context = ContextId::current();
        self.tags.clear(context);
        self.holders.remove(context);
    }

    fn current_tags(&self) -> Vec<String> {
        self.tags.current(ContextId::current())
    }

    fn flush(&self) -> Result<(), LogError> {
        let result = self.fan_out("flush", |m| m.flush());
        let context = ContextId::current();
        self.tags.clear(context);
        self.holders.remove(context);
        result.map(drop)
    }

    fn close(&self) -> Result<(), LogError> {
        self.fan_out("close", |m| m.close()).map(drop)
    }

    fn outputs_to(&self, destination: &Destination) -> bool {
        self.members.load().iter().any(|m| m.outputs_to(destination))
    }

    fn silencer_enabled(&self) -> bool {
        SILENCER.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::SimpleFormatter;
    use crate::global_logger::{TEST_DIAGNOSTIC_GUARD, set_diagnostic_logger};
    use crate::handle::LoggerExt;
    use crate::inmemory_sink::InMemorySink;
    use crate::log_record::LogRecord;
    use crate::logger::Logger;
    use crate::sink::Sink;
    use std::sync::Mutex;

    /// Serializes tests that flip the broadcast silencer switch.
    static SILENCER_GUARD: Mutex<()> = Mutex::new(());

    #[derive(Debug)]
    struct FailingSink {
        reason: &'static str,
    }

    impl Sink for FailingSink {
        fn write(&self, _record: &LogRecord) -> Result<(), LogError> {
            Err(std::io::Error::other(self.reason).into())
        }

        fn write_raw(&self, _text: &str) -> Result<(), LogError> {
            Err(std::io::Error::other(self.reason).into())
        }
    }

    fn member(level: Severity) -> (Arc<Logger>, Arc<InMemorySink>) {
        let sink = Arc::new(InMemorySink::new());
        let logger = Logger::builder()
            .sink(sink.clone())
            .formatter(Arc::new(SimpleFormatter))
            .level(level)
            .build();
        (Arc::new(logger), sink)
    }

    fn dynamic(logger: &Arc<Logger>) -> Arc<dyn LoggerHandle> {
        logger.clone()
    }

    fn failing(reason: &'static str) -> Arc<dyn LoggerHandle> {
        Arc::new(Logger::new(Arc::new(FailingSink { reason })))
    }

    #[test]
    fn empty_member_list_is_rejected() {
        assert!(matches!(Broadcast::new(Vec::new()), Err(LogError::EmptyBroadcast)));
    }

    #[test]
    fn tagged_reaches_every_member() {
        let (m1, s1) = member(Severity::Debug);
        let (m2, s2) = member(Severity::Debug);
        let b = Broadcast::new(vec![dynamic(&m1), dynamic(&m2)]).unwrap();
        assert!(b.tagged(["X"], |b| b.info("hi")).unwrap());
        assert_eq!(s1.lines(), vec!["[X] hi"]);
        assert_eq!(s2.lines(), vec!["[X] hi"]);
        assert!(m1.current_tags().is_empty());
        assert!(m2.current_tags().is_empty());
        assert!(b.current_tags().is_empty());
        assert_eq!(b.tags().context_count(), 0);
    }

    #[test]
    fn best_effort_attempts_all_and_returns_first_error() {
        let _guard = TEST_DIAGNOSTIC_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let diagnostics = Arc::new(InMemorySink::new());
        let previous = set_diagnostic_logger(Arc::new(
            Logger::builder()
                .sink(diagnostics.clone())
                .formatter(Arc::new(SimpleFormatter))
                .build(),
        ));

        let (ok, sink) = member(Severity::Debug);
        let b = Broadcast::new(vec![failing("first"), dynamic(&ok), failing("second")]).unwrap();
        let result = b.info("hello");
        set_diagnostic_logger(previous);

        match result {
            Err(LogError::SinkIo(e)) => assert_eq!(e.to_string(), "first"),
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(sink.lines(), vec!["hello"]);
        let reported = diagnostics.drain_logs();
        assert!(reported.contains("second"), "{reported}");
    }

    #[test]
    fn fail_fast_stops_at_first_error() {
        let (ok, sink) = member(Severity::Debug);
        let b = Broadcast::with_policy(vec![failing("down"), dynamic(&ok)], FanoutPolicy::FailFast)
            .unwrap();
        assert!(matches!(b.warn("x"), Err(LogError::SinkIo(_))));
        assert!(sink.is_empty());
        assert_eq!(b.policy(), FanoutPolicy::FailFast);
    }

    #[test]
    fn sink_failure_leaves_tags_balanced() {
        let (ok, _sink) = member(Severity::Debug);
        let b = Broadcast::new(vec![failing("io"), dynamic(&ok)]).unwrap();
        let result = b.tagged(["t"], |b| {
            assert_eq!(ok.current_tags(), vec!["t"]);
            b.info("m")
        });
        assert!(result.is_err());
        assert!(ok.current_tags().is_empty());
        assert!(b.current_tags().is_empty());
    }

    #[test]
    fn silence_restores_each_member_exactly() {
        let _guard = SILENCER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (m1, s1) = member(Severity::Info);
        let (m2, s2) = member(Severity::Info);
        m1.set_local_level(Severity::Debug).unwrap();
        let b = Broadcast::new(vec![dynamic(&m1), dynamic(&m2)]).unwrap();

        b.silence(Severity::Error, |b| {
            assert_eq!(m1.local_level(), Some(Severity::Error));
            assert_eq!(m2.local_level(), Some(Severity::Error));
            assert_eq!(b.level(), Severity::Error);
            b.warn("hidden").unwrap();
            b.error("shown").unwrap();
        });

        assert_eq!(m1.local_level(), Some(Severity::Debug));
        assert_eq!(m2.local_level(), None);
        assert_eq!(b.local_level(), None);
        assert_eq!(s1.lines(), vec!["shown"]);
        assert_eq!(s2.lines(), vec!["shown"]);
        m1.clear_local_level();
    }

    #[test]
    fn silence_restores_members_removed_mid_scope() {
        let _guard = SILENCER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (m1, _s1) = member(Severity::Info);
        let (m2, _s2) = member(Severity::Info);
        let b = Broadcast::new(vec![dynamic(&m1), dynamic(&m2)]).unwrap();
        let m2_dyn: Arc<dyn LoggerHandle> = m2.clone();
        b.silence(Severity::Fatal, |b| {
            assert!(b.stop_broadcasting_to(&m2_dyn));
        });
        assert_eq!(m2.local_level(), None);
        assert_eq!(b.members().len(), 1);
    }

    #[test]
    fn disabled_switch_leaves_levels_alone() {
        let _guard = SILENCER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (m1, _s1) = member(Severity::Info);
        let b = Broadcast::new(vec![dynamic(&m1)]).unwrap();
        Broadcast::set_silencer(false);
        b.silence(Severity::Error, |_| {
            assert_eq!(m1.local_level(), None);
        });
        Broadcast::set_silencer(true);
        assert!(Broadcast::silencer());
    }

    #[test]
    fn level_is_lowest_member_unless_overridden() {
        let (m1, _s1) = member(Severity::Warn);
        let (m2, _s2) = member(Severity::Info);
        let b = Broadcast::new(vec![dynamic(&m1), dynamic(&m2)]).unwrap();
        assert_eq!(b.level(), Severity::Info);
        assert_eq!(b.static_level(), Severity::Info);
        assert!(b.info_enabled());
        assert!(!b.debug_enabled());

        b.set_local_level(Severity::Fatal).unwrap();
        assert_eq!(b.level(), Severity::Fatal);
        assert_eq!(m1.local_level(), Some(Severity::Fatal));
        b.clear_local_level();
        assert_eq!(m2.local_level(), None);

        b.set_level("error").unwrap();
        assert_eq!(m1.static_level(), Severity::Error);
        assert_eq!(m2.static_level(), Severity::Error);
    }

    #[test]
    fn nested_broadcasts_compose() {
        let (m1, s1) = member(Severity::Debug);
        let (m2, s2) = member(Severity::Debug);
        let inner: Arc<dyn LoggerHandle> = Arc::new(Broadcast::new(vec![dynamic(&m1)]).unwrap());
        let outer = Broadcast::new(vec![inner.clone(), dynamic(&m2)]).unwrap();

        outer.tagged(["a"], |o| {
            o.tagged(["b"], |o| o.debug("deep").unwrap());
        });
        outer.log_at(Severity::Error, |o| {
            assert_eq!(m1.local_level(), Some(Severity::Error));
            o.info("dropped").unwrap();
        });

        assert_eq!(s1.lines(), vec!["[a] [b] deep"]);
        assert_eq!(s2.lines(), vec!["[a] [b] deep"]);
        assert_eq!(m1.local_level(), None);
        assert!(inner.current_tags().is_empty());
    }

    #[test]
    fn member_added_inside_tag_scope_keeps_its_own_tags() {
        let (m1, s1) = member(Severity::Debug);
        let (m2, s2) = member(Severity::Debug);
        m2.push_tags(["keep"]);
        let b = Broadcast::new(vec![dynamic(&m1)]).unwrap();

        b.tagged(["X"], |b| {
            b.broadcast_to(dynamic(&m2));
            b.info("hi").unwrap();
        });

        assert_eq!(s1.lines(), vec!["[X] hi"]);
        assert_eq!(s2.lines(), vec!["[keep] [X] hi"]);
        assert_eq!(m2.current_tags(), vec!["keep"]);
        assert!(m1.current_tags().is_empty());
        assert!(b.current_tags().is_empty());
        m2.clear_tags();
    }

    #[test]
    fn member_removed_inside_tag_scope_is_released() {
        let (m1, _s1) = member(Severity::Debug);
        let (m2, _s2) = member(Severity::Debug);
        let b = Broadcast::new(vec![dynamic(&m1), dynamic(&m2)]).unwrap();
        let m2_dyn: Arc<dyn LoggerHandle> = m2.clone();

        b.tagged(["X"], |b| {
            assert!(b.stop_broadcasting_to(&m2_dyn));
            assert_eq!(m2.current_tags(), vec!["X"]);
        });

        assert!(m2.current_tags().is_empty());
        assert!(m1.current_tags().is_empty());
    }

    #[test]
    #[should_panic(expected = "unbalanced tag stack")]
    fn member_imbalance_inside_scope_panics() {
        let (m1, _s1) = member(Severity::Debug);
        let b = Broadcast::new(vec![dynamic(&m1)]).unwrap();
        b.tagged(["X"], |_| {
            m1.pop_tags(1);
        });
    }

    #[test]
    fn own_override_gates_members_added_while_silenced() {
        let _guard = SILENCER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (m1, s1) = member(Severity::Info);
        let (m2, s2) = member(Severity::Info);
        let b = Broadcast::new(vec![dynamic(&m1)]).unwrap();

        b.silence(Severity::Fatal, |b| {
            b.broadcast_to(dynamic(&m2));
            assert_eq!(b.level(), Severity::Fatal);
            assert!(!b.info("leak").unwrap());
            assert!(b.fatal("loud").unwrap());
        });

        assert_eq!(s1.lines(), vec!["loud"]);
        assert_eq!(s2.lines(), vec!["loud"]);
        assert_eq!(m2.local_level(), None);
    }

    #[test]
    fn membership_changes() {
        let (m1, s1) = member(Severity::Debug);
        let (m2, s2) = member(Severity::Debug);
        let b = Broadcast::new(vec![dynamic(&m1)]).unwrap();
        let m2_dyn: Arc<dyn LoggerHandle> = m2.clone();

        b.broadcast_to(m2_dyn.clone());
        b.info("both").unwrap();
        assert!(b.stop_broadcasting_to(&m2_dyn));
        assert!(!b.stop_broadcasting_to(&m2_dyn));
        b.info("one").unwrap();

        assert_eq!(s1.lines(), vec!["both", "one"]);
        assert_eq!(s2.lines(), vec!["both"]);

        let m1_dyn: Arc<dyn LoggerHandle> = m1.clone();
        assert!(b.stop_broadcasting_to(&m1_dyn));
        assert!(b.members().is_empty());
        assert!(!b.info("nowhere").unwrap());
        assert_eq!(b.level(), Severity::Unknown);
    }

    #[test]
    fn flush_clears_tags_everywhere() {
        let (m1, _s1) = member(Severity::Debug);
        let b = Broadcast::new(vec![dynamic(&m1)]).unwrap();
        b.push_tags(["job-9"]);
        assert_eq!(b.tags_text(), "[job-9] ");
        b.flush().unwrap();
        assert!(b.current_tags().is_empty());
        assert!(m1.current_tags().is_empty());
    }

    #[test]
    fn progname_and_formatter_reach_members() {
        let (m1, s1) = member(Severity::Debug);
        let b = Broadcast::new(vec![dynamic(&m1)]).unwrap();
        b.set_progname(Some("svc".to_string()));
        assert_eq!(m1.progname().as_deref(), Some("svc"));
        assert_eq!(b.progname().as_deref(), Some("svc"));

        b.set_formatter(Arc::new(crate::formatter::DefaultFormatter));
        b.error("boom").unwrap();
        let line = s1.drain_logs();
        assert!(line.starts_with("E, ["), "{line}");
        assert!(line.ends_with("ERROR -- svc: boom"), "{line}");
    }

    #[test]
    fn outputs_to_any_member() {
        let (m1, s1) = member(Severity::Debug);
        let b = Broadcast::new(vec![dynamic(&m1), failing("x")]).unwrap();
        assert!(b.outputs_to(&s1.destination().unwrap()));
        assert!(!b.outputs_to(&Destination::Stdout));
    }

    #[test]
    fn raw_writes_fan_out() {
        let (m1, s1) = member(Severity::Fatal);
        let (m2, s2) = member(Severity::Fatal);
        let b = Broadcast::new(vec![dynamic(&m1), dynamic(&m2)]).unwrap();
        b.write_raw("banner").unwrap();
        assert_eq!(s1.lines(), vec!["banner"]);
        assert_eq!(s2.lines(), vec!["banner"]);
    }

    #[test]
    fn overrides_are_per_context() {
        let (m1, _s1) = member(Severity::Warn);
        let b = Arc::new(Broadcast::new(vec![dynamic(&m1)]).unwrap());
        b.set_local_level(Severity::Debug).unwrap();
        let seen = {
            let b = b.clone();
            std::thread::spawn(move || (b.level(), b.local_level()))
                .join()
                .unwrap()
        };
        assert_eq!(seen, (Severity::Warn, None));
        assert_eq!(b.level(), Severity::Debug);
        b.clear_local_level();
    }
}
