// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent per-context storage.
//!
//! Both the severity overrides and the tag stacks are process-wide maps keyed by
//! [`ContextId`].  They are backed by a sharded [`DashMap`], so two contexts touching
//! their own entries only contend when their keys land in the same shard, and never on a
//! map-wide lock.
//!
//! Entries are created on first write and removed (not left empty) when cleared, so the
//! map stays proportional to the number of contexts that currently hold state.

use crate::context::ContextId;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt::Debug;

pub(crate) struct ContextMap<V> {
    entries: DashMap<ContextId, V>,
}

impl<V> ContextMap<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Stores `value` for `id`, or removes the entry when `value` is `None`.
    /// Returns the previous value.
    pub(crate) fn set(&self, id: ContextId, value: Option<V>) -> Option<V> {
        match value {
            Some(value) => self.entries.insert(id, value),
            None => self.entries.remove(&id).map(|(_, v)| v),
        }
    }

    pub(crate) fn remove(&self, id: ContextId) -> Option<V> {
        self.entries.remove(&id).map(|(_, v)| v)
    }

    /// Reads the entry for `id` without cloning it.
    pub(crate) fn read<R>(&self, id: ContextId, f: impl FnOnce(Option<&V>) -> R) -> R {
        match self.entries.get(&id) {
            Some(entry) => f(Some(entry.value())),
            None => f(None),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<V: Default> ContextMap<V> {
    /**
    Atomically updates the entry for `id`.

    `f` receives the current value (or `None`) and may replace it.  If it leaves `None`
    behind, the entry is removed.  The shard lock is held while `f` runs, so `f` must not
    touch this map.
    */
    pub(crate) fn update<R>(&self, id: ContextId, f: impl FnOnce(&mut Option<V>) -> R) -> R {
        match self.entries.entry(id) {
            Entry::Occupied(mut occupied) => {
                let mut slot = Some(std::mem::take(occupied.get_mut()));
                let result = f(&mut slot);
                match slot {
                    Some(value) => *occupied.get_mut() = value,
                    None => {
                        occupied.remove();
                    }
                }
                result
            }
            Entry::Vacant(vacant) => {
                let mut slot = None;
                let result = f(&mut slot);
                if let Some(value) = slot {
                    vacant.insert(value);
                }
                result
            }
        }
    }
}

impl<V: Copy> ContextMap<V> {
    pub(crate) fn get(&self, id: ContextId) -> Option<V> {
        self.entries.get(&id).map(|entry| *entry.value())
    }
}

impl<V> Default for ContextMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for ContextMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextMap")
            .field("entries", &self.entries.len())
            .finish()
    }
}
