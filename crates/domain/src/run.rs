//! The Run entity: one dialogue of one model against one scenario.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a Run.
///
/// `CompletedRecording` is an intermediate state the literal spec data model
/// doesn't name in its four-value status list, but §4.5 step 5 requires it
/// ("mark Run status=completed-recording (distinct from completed...)"); it
/// is carried here as an enrichment, never surfaced as `completed` until
/// judging catches up. See DESIGN.md for the Open Question resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    Running,
    CompletedRecording,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::Running => "running",
            RunStatus::CompletedRecording => "completed_recording",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(RunStatus::Queued),
            "running" => Some(RunStatus::Running),
            "completed_recording" => Some(RunStatus::CompletedRecording),
            "completed" => Some(RunStatus::Completed),
            "failed" => Some(RunStatus::Failed),
            _ => None,
        }
    }
}

/// One dialogue of one model against one scenario under one manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: String,
    pub manifest_id: String,
    pub model_id: String,
    pub scenario_id: String,
    pub week: String,
    pub status: RunStatus,
    pub n_turns_planned: i32,
    pub n_turns_recorded: i32,
    pub n_turns_judged: i32,
    pub completion_committed: bool,
    pub failure_reason: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub judged_at: Option<DateTime<Utc>>,
}

impl Run {
    pub fn new(
        run_id: String,
        manifest_id: String,
        model_id: String,
        scenario_id: String,
        week: String,
        n_turns_planned: i32,
    ) -> Self {
        Self {
            run_id,
            manifest_id,
            model_id,
            scenario_id,
            week,
            status: RunStatus::Queued,
            n_turns_planned,
            n_turns_recorded: 0,
            n_turns_judged: 0,
            completion_committed: false,
            failure_reason: None,
            started_at: None,
            completed_at: None,
            judged_at: None,
        }
    }

    /// §3 invariant: `n_turns_judged <= n_turns_recorded <= n_turns_planned`.
    pub fn invariant_holds(&self) -> bool {
        self.n_turns_judged <= self.n_turns_recorded && self.n_turns_recorded <= self.n_turns_planned
    }
}
