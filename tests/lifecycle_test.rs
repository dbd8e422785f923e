//! Integration tests for the full handle lifecycle.
//!
//! These exercise the manager, handle, and diagnostic sink together the way
//! an application would drive them.

use std::sync::Arc;

use errcheck_mutex::{
    InMemoryDiagnosticSink, LockError, LockManager, ManagerConfig,
};

fn manager_with_sink(max_handles: usize) -> (LockManager, Arc<InMemoryDiagnosticSink>) {
    let sink = Arc::new(InMemoryDiagnosticSink::new(64));
    let config = ManagerConfig::new().with_max_handles(max_handles);
    let manager = LockManager::with_sink(&config, Arc::<InMemoryDiagnosticSink>::clone(&sink)).unwrap();
    (manager, sink)
}

#[test]
fn test_full_lifecycle_happy_path() {
    let (manager, sink) = manager_with_sink(4);

    let handle = manager.create().unwrap();
    assert!(!handle.is_locked());

    handle.lock().unwrap();
    assert!(handle.is_locked());
    handle.unlock().unwrap();
    assert!(!handle.is_locked());

    handle.destroy().unwrap();

    // No failure, no diagnostics.
    assert!(sink.events().is_empty());
}

#[test]
fn test_destroyed_handle_stays_inert() {
    let (manager, sink) = manager_with_sink(4);
    let handle = manager.create().unwrap();
    handle.destroy().unwrap();

    // Every further operation fails, reports, and does not crash.
    assert_eq!(handle.lock(), Err(LockError::Destroyed));
    assert_eq!(handle.unlock(), Err(LockError::Destroyed));
    assert_eq!(handle.destroy(), Err(LockError::Destroyed));
    assert!(!handle.is_locked());

    let operations: Vec<String> = sink.events().into_iter().map(|e| e.operation).collect();
    assert_eq!(operations, ["lock", "unlock", "destroy"]);
}

#[test]
fn test_locked_handle_survives_failed_destroy() {
    let (manager, _sink) = manager_with_sink(4);
    let handle = manager.create().unwrap();

    handle.lock().unwrap();
    assert_eq!(handle.destroy(), Err(LockError::StillLocked));

    // Still locked, still releasable, still destructible once unlocked.
    assert!(handle.is_locked());
    handle.unlock().unwrap();
    handle.destroy().unwrap();
}

#[test]
fn test_destroy_frees_a_unit_for_reuse() {
    let (manager, _sink) = manager_with_sink(1);

    let first = manager.create().unwrap();
    assert_eq!(manager.create().unwrap_err(), LockError::Exhausted(1));

    // Destroy marks the lock terminal; the unit itself returns when the
    // last clone of the handle drops.
    first.destroy().unwrap();
    assert_eq!(manager.live_handles(), 1);
    drop(first);
    assert_eq!(manager.live_handles(), 0);

    let second = manager.create().unwrap();
    second.lock().unwrap();
    second.unlock().unwrap();
}

#[test]
fn test_handles_are_independent() {
    let (manager, _sink) = manager_with_sink(4);
    let a = manager.create().unwrap();
    let b = manager.create().unwrap();
    assert_ne!(a.id(), b.id());

    a.lock().unwrap();
    assert!(!b.is_locked());
    b.lock().unwrap();
    b.unlock().unwrap();
    a.unlock().unwrap();
}
