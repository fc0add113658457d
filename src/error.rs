//! Error types for rope construction.
//!
//! Steady-state operations (simulation, mesh generation, submission) never
//! fail; only building a rope or a scheduler can.

use thiserror::Error;

/// Result type alias for rope construction.
pub type RopeResult<T> = Result<T, RopeError>;

/// Errors that can occur while constructing ropes and schedulers.
#[derive(Debug, Error)]
pub enum RopeError {
    /// A configuration field is out of its valid range.
    #[error("invalid config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// The worker thread pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl RopeError {
    /// Create an invalid config error.
    #[must_use]
    pub const fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { field, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RopeError::invalid("rope_resolution", "must be at least 3");
        let msg = format!("{err}");
        assert!(msg.contains("rope_resolution"));
        assert!(msg.contains("at least 3"));
    }
}
