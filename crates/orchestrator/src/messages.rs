//! Wire shapes for the job bus (spec §4.4, §6): the two work-queue
//! message bodies and the `run-judged` event payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `dialogue-jobs` message body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogueJob {
    pub run_id: String,
    pub manifest_id: String,
    pub model_id: String,
    pub scenario_id: String,
    pub max_turns: u32,
}

/// `judge-jobs` message body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgeJob {
    pub run_id: String,
    pub turn_index: i32,
    pub body_ref: String,
    pub judge_model: String,
}

/// `run-judged` event payload (spec §6), fired exactly once per Run by
/// whichever Judge invocation's atomic commit brings `n_turns_judged` to
/// `n_turns_planned`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunJudgedEvent {
    pub run_id: String,
    pub manifest_id: String,
    pub model_id: String,
    pub week: String,
    pub judged_at: DateTime<Utc>,
}
