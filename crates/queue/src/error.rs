//! Queue errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
