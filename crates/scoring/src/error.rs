//! Scoring errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// The judge's response could not be parsed into the three-dimension
    /// rubric form. Not retried automatically -- the caller records a
    /// `failed=true` Judge with zeroed scores.
    #[error("judge response parse error: {0}")]
    JudgeParse(String),
}
