//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the timer engine and its handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine task is gone and no longer accepts commands.
    #[error("timer engine is not running")]
    Closed,

    /// Nobody receives timer updates any more.
    #[error("timer update channel closed")]
    UpdatesClosed,

    /// The engine has no timer state yet.
    #[error("timer engine has not been initialized")]
    NotInitialized,
}

impl EngineError {
    /// Returns true if the engine can no longer be reached.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed | Self::UpdatesClosed)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Closed | Self::UpdatesClosed => "restart the session",
            Self::NotInitialized => "initialize or start the timer first",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(EngineError::Closed.to_string(), "timer engine is not running");
        assert_eq!(
            EngineError::NotInitialized.to_string(),
            "timer engine has not been initialized"
        );
    }

    #[test]
    fn test_is_closed() {
        assert!(EngineError::Closed.is_closed());
        assert!(EngineError::UpdatesClosed.is_closed());
        assert!(!EngineError::NotInitialized.is_closed());
    }
}
