//! Error-checking lock handle.
//!
//! Rust has no native equivalent of `PTHREAD_MUTEX_ERRORCHECK`, so the handle
//! tracks the owning [`ThreadId`] alongside the lock state: relocking a lock
//! the calling thread already holds, unlocking a lock it does not hold, and
//! destroying a held lock are all detected and reported as errors instead of
//! deadlocking or being undefined behavior.
//!
//! The state word lives behind a `parking_lot::Mutex`; blocked acquirers wait
//! on a `parking_lot::Condvar`. The destroy probe reads state under the same
//! mutex as `lock`/`unlock`, so there are no racy state observations.
//! Fairness among waiters is whatever `Condvar::notify_one` provides; FIFO
//! order is not guaranteed.
//!
//! # Examples
//!
//! ```
//! use errcheck_mutex::{LockManager, ManagerConfig};
//!
//! let manager = LockManager::new(&ManagerConfig::default()).unwrap();
//! let handle = manager.create().unwrap();
//!
//! handle.lock().unwrap();
//! assert!(handle.lock().is_err()); // relock detected, no deadlock
//! handle.unlock().unwrap();
//! handle.destroy().unwrap();
//! ```

use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};
use uuid::Uuid;

use crate::diag::{build_diagnostic, DiagnosticSink};
use crate::error::{LockError, LockResult};
use crate::manager::UnitReservation;

/// Lock state guarded by the core mutex.
struct CoreState {
    /// Thread currently holding the lock, if any.
    owner: Option<ThreadId>,
    /// Set once by a successful destroy; terminal.
    destroyed: bool,
}

impl CoreState {
    /// Non-blocking acquisition attempt.
    fn try_acquire(&mut self, me: ThreadId) -> bool {
        if self.owner.is_some() {
            return false;
        }
        self.owner = Some(me);
        true
    }
}

/// Shared core behind every clone of a handle.
struct LockCore {
    id: Uuid,
    state: Mutex<CoreState>,
    waiters: Condvar,
    diag: Arc<dyn DiagnosticSink>,
    /// Releases the manager's live-handle unit when the core drops.
    _unit: UnitReservation,
}

/// Handle to one error-checking mutual-exclusion lock.
///
/// Created by [`LockManager::create`](crate::LockManager::create). Clones
/// share the same underlying lock; the backing memory is released when the
/// last clone drops. A handle is *unlocked* immediately after creation and
/// transitions between *locked* and *unlocked* only through [`lock`] and
/// [`unlock`]. After a successful [`destroy`] every operation fails with
/// [`LockError::Destroyed`].
///
/// [`lock`]: LockHandle::lock
/// [`unlock`]: LockHandle::unlock
/// [`destroy`]: LockHandle::destroy
#[derive(Clone)]
pub struct LockHandle {
    core: Arc<LockCore>,
}

impl LockHandle {
    pub(crate) fn new(diag: Arc<dyn DiagnosticSink>, unit: UnitReservation) -> Self {
        Self {
            core: Arc::new(LockCore {
                id: Uuid::new_v4(),
                state: Mutex::new(CoreState {
                    owner: None,
                    destroyed: false,
                }),
                waiters: Condvar::new(),
                diag,
                _unit: unit,
            }),
        }
    }

    /// Identifier correlating this handle with its diagnostic events.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.core.id
    }

    /// Whether the lock is currently held by any thread.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.core.state.lock().owner.is_some()
    }

    /// Acquire the lock, blocking until it is available.
    ///
    /// Returns immediately with [`LockError::WouldDeadlock`] if the calling
    /// thread already holds the lock, and with [`LockError::Destroyed`] if the
    /// handle was destroyed (including while this thread was blocked waiting).
    /// There is no timeout and no cancellation; a blocked call returns only
    /// when the holder releases or destroys the lock.
    ///
    /// # Errors
    ///
    /// See above; every failure is also reported through the diagnostic sink.
    pub fn lock(&self) -> LockResult<()> {
        let me = thread::current().id();
        let mut state = self.core.state.lock();
        if state.destroyed {
            return Err(self.fail("lock", LockError::Destroyed, "could not lock: handle destroyed"));
        }
        if state.owner == Some(me) {
            return Err(self.fail(
                "lock",
                LockError::WouldDeadlock,
                "could not lock: already held by calling thread",
            ));
        }
        while state.owner.is_some() && !state.destroyed {
            self.core.waiters.wait(&mut state);
        }
        if state.destroyed {
            return Err(self.fail(
                "lock",
                LockError::Destroyed,
                "could not lock: handle destroyed while waiting",
            ));
        }
        state.owner = Some(me);
        Ok(())
    }

    /// Release the lock held by the calling thread and wake one waiter.
    ///
    /// # Errors
    ///
    /// [`LockError::NotOwner`] if the calling thread does not hold the lock,
    /// [`LockError::Destroyed`] if the handle was destroyed. Failures are
    /// reported through the diagnostic sink.
    pub fn unlock(&self) -> LockResult<()> {
        let me = thread::current().id();
        let mut state = self.core.state.lock();
        if state.destroyed {
            return Err(self.fail(
                "unlock",
                LockError::Destroyed,
                "could not unlock: handle destroyed",
            ));
        }
        if state.owner != Some(me) {
            return Err(self.fail(
                "unlock",
                LockError::NotOwner,
                "could not unlock: not held by calling thread",
            ));
        }
        state.owner = None;
        drop(state);
        self.core.waiters.notify_one();
        Ok(())
    }

    /// Tear down the lock.
    ///
    /// Performs a non-blocking acquisition probe first: destroying a held lock
    /// is rejected with [`LockError::StillLocked`] and the handle stays fully
    /// usable. On success the probe's acquisition is released, the handle
    /// becomes terminal, and all blocked waiters wake to observe
    /// [`LockError::Destroyed`]. Succeeds at most once per handle.
    ///
    /// # Errors
    ///
    /// [`LockError::StillLocked`] if any thread holds the lock,
    /// [`LockError::Destroyed`] on a second destroy. Failures are reported
    /// through the diagnostic sink.
    pub fn destroy(&self) -> LockResult<()> {
        let me = thread::current().id();
        let mut state = self.core.state.lock();
        if state.destroyed {
            return Err(self.fail(
                "destroy",
                LockError::Destroyed,
                "could not destroy: handle already destroyed",
            ));
        }
        if !state.try_acquire(me) {
            return Err(self.fail(
                "destroy",
                LockError::StillLocked,
                "could not destroy: lock is held",
            ));
        }
        // Release the probe's acquisition before teardown so the terminal
        // state never holds the lock.
        state.owner = None;
        state.destroyed = true;
        drop(state);
        self.core.waiters.notify_all();
        Ok(())
    }

    /// Report a failure through the sink, then hand the error back for
    /// propagation. Never panics regardless of sink behavior.
    #[track_caller]
    fn fail(&self, operation: &str, err: LockError, message: &str) -> LockError {
        let loc = Location::caller();
        self.core.diag.record(build_diagnostic(
            Some(self.core.id),
            Some(err.code()),
            format!("{}:{}", loc.file(), loc.line()),
            operation,
            Some(message.to_string()),
        ));
        err
    }
}

impl fmt::Debug for LockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockHandle")
            .field("id", &self.core.id)
            .field("locked", &self.is_locked())
            .finish()
    }
}
