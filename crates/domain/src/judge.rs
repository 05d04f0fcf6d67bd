//! The Judge entity: rubric scores and heuristic flags for one Turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deterministic flags computed over an `ai_response`, no I/O involved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heuristics {
    pub has_question: bool,
    pub question_count: u32,
    pub open_ended: bool,
    pub has_advice: bool,
    pub is_leading: bool,
    pub approx_tokens: u32,
}

/// The three-dimension rubric form (spec §4.2, §9 Open Questions: this
/// supersedes a documented but unimplemented 0-10 composite form).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RubricScores {
    pub verbosity: f64,
    pub exploratory: f64,
    pub interrogative: f64,
    pub overall: f64,
}

impl RubricScores {
    /// Build from the three raw dimensions, computing `overall` as their mean.
    pub fn from_dimensions(verbosity: f64, exploratory: f64, interrogative: f64) -> Self {
        let overall = (verbosity + exploratory + interrogative) / 3.0;
        Self {
            verbosity,
            exploratory,
            interrogative,
            overall,
        }
    }

    pub fn zeroed() -> Self {
        Self {
            verbosity: 0.0,
            exploratory: 0.0,
            interrogative: 0.0,
            overall: 0.0,
        }
    }

    /// §8 score-bounds invariant: every dimension lies in `[0, 1]`.
    pub fn in_bounds(&self) -> bool {
        let dims = [self.verbosity, self.exploratory, self.interrogative, self.overall];
        dims.iter().all(|d| (0.0..=1.0).contains(d))
    }
}

/// The rubric scores and heuristic flags computed for one Turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judge {
    pub run_id: String,
    pub turn_index: i32,
    pub scores: RubricScores,
    pub heuristics: Heuristics,
    pub rationale: String,
    pub judge_model: String,
    pub failed: bool,
    pub body_ref: String,
    pub created_at: DateTime<Utc>,
}

/// The full judge payload written to the object store at `body_ref`,
/// matching the §6 scoring output file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeBody {
    pub run_id: String,
    pub turn_index: i32,
    pub scores: RubricScores,
    pub heuristics: Heuristics,
    pub rationale: String,
    pub judge_model: String,
    pub failed: bool,
    pub created_at: DateTime<Utc>,
}

/// Deterministic object-store key for a judge body.
pub fn judge_body_key(run_id: &str, turn_index: i32) -> String {
    format!("raw/runs/{run_id}/judge_{turn_index:03}.json")
}
