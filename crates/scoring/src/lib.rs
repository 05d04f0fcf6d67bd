//! The Scoring Engine: heuristic layer, rubric layer, and the judge
//! prompt builder / response parser, all pure functions (spec §4.2).

pub mod error;
pub mod heuristics;
pub mod rubric;

pub use error::ScoringError;
pub use heuristics::compute_heuristics;
pub use rubric::{judge_system_prompt, judge_user_prompt, parse_judge_response, ParsedJudgeResponse};
