//! # errcheck_mutex
//!
//! An error-checking mutual-exclusion lock with explicit lifecycle management
//! and consistent failure diagnostics.
//!
//! Standard Rust mutexes make a class of misuse either impossible (guards) or
//! undefined/deadlocking (raw primitives). This crate instead detects and
//! *reports* illegal usage, the way `PTHREAD_MUTEX_ERRORCHECK` does on POSIX
//! systems:
//!
//! - relocking a lock the calling thread already holds fails fast with
//!   [`LockError::WouldDeadlock`] instead of deadlocking;
//! - unlocking a lock the calling thread does not hold fails with
//!   [`LockError::NotOwner`] instead of corrupting state;
//! - destroying a held lock is refused with [`LockError::StillLocked`];
//! - operating on a destroyed handle fails with [`LockError::Destroyed`]
//!   instead of crashing.
//!
//! Rust has no native error-checking lock mode, so the handle tracks the
//! owning thread alongside the lock state (built on `parking_lot`).
//!
//! Every failure is additionally reported through a pluggable
//! [`DiagnosticSink`] with an operation tag, source location, and errno-style
//! numeric code; the default sink emits through `tracing`. The sink is
//! observability-only: errors still propagate as [`Result`]s and nothing in
//! this crate panics or terminates the process on a lock failure.
//!
//! ## Example
//!
//! ```
//! use errcheck_mutex::{LockError, LockManager, ManagerConfig};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let manager = LockManager::new(&ManagerConfig::default()).unwrap();
//! let handle = Arc::new(manager.create().unwrap());
//!
//! handle.lock().unwrap();
//! assert_eq!(handle.lock(), Err(LockError::WouldDeadlock));
//!
//! // Another thread blocks until the holder releases.
//! let contender = Arc::clone(&handle);
//! let waiter = thread::spawn(move || contender.lock());
//! handle.unlock().unwrap();
//! waiter.join().unwrap().unwrap();
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Configuration for the lock handle manager.
pub mod config;
/// Diagnostic sink abstraction and implementations.
pub mod diag;
/// Error types for lock lifecycle operations.
pub mod error;
/// The error-checking lock handle.
pub mod handle;
/// Factory and accounting for lock handles.
pub mod manager;
/// Shared utilities.
pub mod util;

pub use config::ManagerConfig;
pub use diag::{build_diagnostic, DiagnosticEvent, DiagnosticSink, InMemoryDiagnosticSink, TracingSink};
pub use error::{AppResult, LockError, LockResult};
pub use handle::LockHandle;
pub use manager::LockManager;
