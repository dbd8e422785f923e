//! Error types for lock lifecycle operations.

use thiserror::Error;

/// Errors produced by lock handle operations.
///
/// Every variant maps to an errno-style numeric code (see [`LockError::code`])
/// so diagnostics carry the same numeric context an error-checking OS mutex
/// would report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// The calling thread already holds this lock.
    #[error("would deadlock: lock already held by calling thread")]
    WouldDeadlock,
    /// The calling thread does not hold this lock.
    #[error("not owner: lock is not held by calling thread")]
    NotOwner,
    /// The lock is currently held, so it cannot be torn down.
    #[error("still locked: refusing to destroy a held lock")]
    StillLocked,
    /// The handle was already destroyed.
    #[error("handle destroyed: lock has been torn down")]
    Destroyed,
    /// The live-handle limit was reached during creation.
    #[error("handle limit reached: {0} live handles")]
    Exhausted(usize),
}

impl LockError {
    /// Errno-style numeric code for this error, included in diagnostics.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::WouldDeadlock => 35, // EDEADLK
            Self::NotOwner => 1,       // EPERM
            Self::StillLocked => 16,   // EBUSY
            Self::Destroyed => 22,     // EINVAL
            Self::Exhausted(_) => 11,  // EAGAIN
        }
    }
}

/// Result alias for lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
