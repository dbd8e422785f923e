//! Lock handle manager.
//!
//! Owns handle-count accounting and the shared diagnostic sink. Uses a
//! lock-free `AtomicUsize` for the live-handle count; the reserved unit is
//! held by an RAII guard so no failure path after reservation can leak it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::ManagerConfig;
use crate::diag::{build_diagnostic, DiagnosticSink, TracingSink};
use crate::error::{AppResult, LockError, LockResult};
use crate::handle::LockHandle;

struct ManagerState {
    max_handles: usize,
    live: AtomicUsize,
}

/// One reserved live-handle unit, released on drop.
pub(crate) struct UnitReservation {
    state: Arc<ManagerState>,
}

impl UnitReservation {
    fn acquire(state: &Arc<ManagerState>) -> Option<Self> {
        state
            .live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < state.max_handles).then_some(live + 1)
            })
            .ok()
            .map(|_| Self {
                state: Arc::clone(state),
            })
    }
}

impl Drop for UnitReservation {
    fn drop(&mut self) {
        self.state.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Factory for error-checking lock handles.
///
/// # Examples
///
/// ```
/// use errcheck_mutex::{LockManager, ManagerConfig};
///
/// let manager = LockManager::new(&ManagerConfig::default()).unwrap();
/// let handle = manager.create().unwrap();
/// assert_eq!(manager.live_handles(), 1);
/// drop(handle);
/// assert_eq!(manager.live_handles(), 0);
/// ```
pub struct LockManager {
    state: Arc<ManagerState>,
    diag: Arc<dyn DiagnosticSink>,
}

impl LockManager {
    /// Create a manager reporting failures through the default tracing sink.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation.
    pub fn new(config: &ManagerConfig) -> AppResult<Self> {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Create a manager reporting failures through the given sink.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation.
    pub fn with_sink(config: &ManagerConfig, sink: Arc<dyn DiagnosticSink>) -> AppResult<Self> {
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(Self {
            state: Arc::new(ManagerState {
                max_handles: config.max_handles,
                live: AtomicUsize::new(0),
            }),
            diag: sink,
        })
    }

    /// Allocate a new lock handle in the *unlocked* state.
    ///
    /// Never returns a partially constructed handle: the reserved unit is
    /// released on every failure path after reservation.
    ///
    /// # Errors
    ///
    /// [`LockError::Exhausted`] when `max_handles` handles are already live;
    /// the failure is also reported through the diagnostic sink.
    pub fn create(&self) -> LockResult<LockHandle> {
        let Some(unit) = UnitReservation::acquire(&self.state) else {
            let err = LockError::Exhausted(self.state.max_handles);
            self.diag.record(build_diagnostic(
                None,
                Some(err.code()),
                format!("{}:{}", file!(), line!()),
                "create",
                Some("could not create handle: live-handle limit reached".to_string()),
            ));
            return Err(err);
        };
        Ok(LockHandle::new(Arc::clone(&self.diag), unit))
    }

    /// Current number of live handles.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.state.live.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::diag::InMemoryDiagnosticSink;

    #[test]
    fn test_invalid_config_rejected() {
        let config = ManagerConfig::new().with_max_handles(0);
        assert!(LockManager::new(&config).is_err());
    }

    #[test]
    fn test_accounting_tracks_drops() {
        let manager = LockManager::new(&ManagerConfig::default()).unwrap();
        let a = manager.create().unwrap();
        let b = manager.create().unwrap();
        assert_eq!(manager.live_handles(), 2);
        drop(a);
        assert_eq!(manager.live_handles(), 1);
        drop(b);
        assert_eq!(manager.live_handles(), 0);
    }

    #[test]
    fn test_clones_share_one_unit() {
        let manager = LockManager::new(&ManagerConfig::default()).unwrap();
        let handle = manager.create().unwrap();
        let clone = handle.clone();
        assert_eq!(manager.live_handles(), 1);
        drop(handle);
        assert_eq!(manager.live_handles(), 1);
        drop(clone);
        assert_eq!(manager.live_handles(), 0);
    }

    #[test]
    fn test_exhaustion_reported_and_recoverable() {
        let sink = Arc::new(InMemoryDiagnosticSink::new(16));
        let config = ManagerConfig::new().with_max_handles(1);
        let manager = LockManager::with_sink(&config, Arc::<InMemoryDiagnosticSink>::clone(&sink)).unwrap();

        let held = manager.create().unwrap();
        let err = manager.create().unwrap_err();
        assert_eq!(err, LockError::Exhausted(1));
        assert_eq!(manager.live_handles(), 1);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].operation, "create");
        assert_eq!(events[0].code, Some(err.code()));

        // A freed unit makes creation succeed again.
        drop(held);
        assert!(manager.create().is_ok());
    }
}
