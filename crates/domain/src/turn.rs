//! The Turn entity: one tutor response plus its student prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One conversational turn within a Run. Immutable once written; the
/// `(run_id, turn_index)` pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub run_id: String,
    pub turn_index: i32,
    pub student_prompt: String,
    pub ai_response: String,
    pub tokens_in: i32,
    pub tokens_out: i32,
    pub latency_ms: i64,
    pub created_at: DateTime<Utc>,
    pub body_ref: String,
}

/// The full turn payload written to the object store at `body_ref`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnBody {
    pub run_id: String,
    pub turn_index: i32,
    pub student_prompt: String,
    pub ai_response: String,
    pub tokens_in: i32,
    pub tokens_out: i32,
    pub latency_ms: i64,
    pub created_at: DateTime<Utc>,
}

/// Deterministic object-store key for a turn body.
pub fn turn_body_key(run_id: &str, turn_index: i32) -> String {
    format!("raw/runs/{run_id}/turn_{turn_index:03}.json")
}
