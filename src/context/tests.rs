// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the context module.

use super::apply_context::ApplyContext;
use super::context_impl::{Context, ContextId};

#[test]
fn test_current_is_stable() {
    let a = Context::current();
    let b = Context::current();
    assert_eq!(a, b);
    assert_eq!(a.id(), ContextId::current());
}

#[test]
fn test_threads_get_distinct_contexts() {
    let main_id = ContextId::current();
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(ContextId::current))
        .collect();
    let mut ids: Vec<ContextId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.push(main_id);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[test]
fn test_thread_root_label_uses_thread_name() {
    let label = std::thread::Builder::new()
        .name("named-worker".to_string())
        .spawn(|| Context::current().label().to_string())
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(label, "named-worker");
}

#[test]
fn test_enter_restores_previous() {
    let outer = Context::current();
    let inner = Context::new("inner");
    {
        let _guard = inner.clone().enter();
        assert_eq!(Context::current(), inner);
        let nested = Context::new("nested");
        nested.scope(|| assert_eq!(Context::current().label(), "nested"));
        assert_eq!(Context::current(), inner);
    }
    assert_eq!(Context::current(), outer);
}

#[test]
fn test_scope_restores_on_panic() {
    let outer = Context::current();
    let ctx = Context::new("panicky");
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        ctx.scope(|| panic!("boom"));
    }));
    assert!(result.is_err());
    assert_eq!(Context::current(), outer);
}

#[test]
fn test_reset_installs_fresh_root() {
    let before = ContextId::current();
    let fresh = Context::reset("fresh");
    assert_ne!(before, fresh);
    assert_eq!(ContextId::current(), fresh);
    assert_eq!(Context::current().label(), "fresh");
}

#[test]
fn test_context_display() {
    let ctx = Context::new("display_me");
    assert_eq!(format!("{}", ctx), format!("{} (display_me)", ctx.id()));
}

#[test]
fn test_context_hash_matches_eq() {
    use std::collections::HashMap;

    let a = Context::new("a");
    let b = Context::new("b");
    let mut map = HashMap::new();
    map.insert(a.clone(), 1);
    map.insert(b.clone(), 2);
    assert_eq!(map.get(&a), Some(&1));
    assert_eq!(map.get(&a.clone()), Some(&1));
    assert_eq!(map.len(), 2);
}

#[test_executors::async_test]
async fn test_apply_context_during_poll() {
    let outer = ContextId::current();
    let ctx = Context::new("task");
    let expected = ctx.id();
    let seen = ApplyContext::new(ctx, async { ContextId::current() }).await;
    assert_eq!(seen, expected);
    assert_eq!(ContextId::current(), outer);
}
