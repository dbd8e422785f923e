//! Configuration for the lock handle manager.

use serde::{Deserialize, Serialize};

/// Manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Maximum number of live lock handles.
    pub max_handles: usize,
}

impl ManagerConfig {
    /// Create a configuration with default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_handles: 1024 }
    }

    /// Set the live-handle limit.
    #[must_use]
    pub const fn with_max_handles(mut self, max_handles: usize) -> Self {
        self.max_handles = max_handles;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_handles == 0 {
            return Err("max_handles must be greater than 0".into());
        }
        Ok(())
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}
