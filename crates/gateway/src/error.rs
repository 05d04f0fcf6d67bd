//! Gateway errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unknown model id: {0}")]
    UnknownModel(String),

    #[error("transient gateway error: {0}")]
    Transient(String),

    #[error("gateway call timed out after {0}s")]
    Timeout(u64),

    #[error("gateway retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted { attempts: u32, source: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GatewayError {
    /// Whether this error should be retried, per the gateway's retry policy.
    ///
    /// Unknown model, validation, and access-denied errors are terminal;
    /// everything else (throttling, network resets, 5xx, timeouts) is
    /// treated as transient and worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Transient(_) | GatewayError::Timeout(_) | GatewayError::Transport(_)
        )
    }
}
