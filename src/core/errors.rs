//! Error taxonomy surfaced to callers.
//!
//! Every variant maps to a stable kind string so the transport layer can
//! translate it without matching on message text. Internal failures carry no
//! detail; the detail is logged server-side where it occurred.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("caller is not authenticated")]
    Unauthenticated,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("precondition failed: {0}")]
    FailedPrecondition(String),

    #[error("cooldown active, retry in {seconds_remaining}s")]
    ResourceExhausted { seconds_remaining: i64 },

    #[error("internal error")]
    Internal,
}

impl EngineError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Stable kind identifier for the transport layer.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Unauthenticated => "UNAUTHENTICATED",
            EngineError::PermissionDenied(_) => "PERMISSION_DENIED",
            EngineError::InvalidArgument(_) => "INVALID_ARGUMENT",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::FailedPrecondition(_) => "FAILED_PRECONDITION",
            EngineError::ResourceExhausted { .. } => "RESOURCE_EXHAUSTED",
            EngineError::Internal => "INTERNAL",
        }
    }

    /// Whether the caller may retry the identical call later.
    pub fn retryable(&self) -> bool {
        matches!(self, EngineError::ResourceExhausted { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable_per_variant() {
        assert_eq!(EngineError::Unauthenticated.kind(), "UNAUTHENTICATED");
        assert_eq!(
            EngineError::PermissionDenied("x".into()).kind(),
            "PERMISSION_DENIED"
        );
        assert_eq!(EngineError::not_found("player", "p1").kind(), "NOT_FOUND");
        assert_eq!(EngineError::Internal.kind(), "INTERNAL");
    }

    #[test]
    fn test_only_cooldown_is_retryable() {
        assert!(EngineError::ResourceExhausted {
            seconds_remaining: 30
        }
        .retryable());
        assert!(!EngineError::Unauthenticated.retryable());
        assert!(!EngineError::FailedPrecondition("x".into()).retryable());
    }

    #[test]
    fn test_not_found_message_names_record() {
        let err = EngineError::not_found("quest", "q-7");
        assert_eq!(err.to_string(), "quest not found: q-7");
    }
}
