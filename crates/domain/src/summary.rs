//! Aggregates computed by the Curator: RunSummary and WeeklyRollup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::judge::Judge;

/// Aggregated metrics for a single Run, computed once by the Curator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub manifest_id: String,
    pub model_id: String,
    pub scenario_id: String,
    pub week: String,
    pub n_turns: i32,
    pub mean_overall: f64,
    pub mean_verbosity: f64,
    pub mean_exploratory: f64,
    pub mean_interrogative: f64,
    pub compliance_rate: f64,
    pub half_life: i32,
    pub advice_violation_rate: f64,
    pub leading_violation_rate: f64,
    pub created_at: DateTime<Utc>,
}

impl RunSummary {
    /// Compute a RunSummary over a Run's Judges, per spec §3 and §4.5.
    ///
    /// Failed-judge turns contribute zeroed scores but count in the
    /// compliance/mean denominators. Heuristic-derived violation rates
    /// exclude failed turns (§4.5 Curator step 2): a turn whose judge call
    /// failed has no trustworthy rubric read, so it is dropped from both
    /// the violation numerators and their denominator. If every turn in
    /// the run failed, there is nothing left to exclude against, so the
    /// rates fall back to counting over all turns (§8 scenario 6) rather
    /// than dividing by zero.
    pub fn compute(
        run_id: &str,
        manifest_id: &str,
        model_id: &str,
        scenario_id: &str,
        week: &str,
        n_turns_planned: i32,
        judges: &[Judge],
        compliance_threshold: f64,
        discipline_threshold: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let n_turns = judges.len() as i32;

        if n_turns == 0 {
            return Self {
                run_id: run_id.to_string(),
                manifest_id: manifest_id.to_string(),
                model_id: model_id.to_string(),
                scenario_id: scenario_id.to_string(),
                week: week.to_string(),
                n_turns: 0,
                mean_overall: 0.0,
                mean_verbosity: 0.0,
                mean_exploratory: 0.0,
                mean_interrogative: 0.0,
                compliance_rate: 0.0,
                half_life: 0,
                advice_violation_rate: 0.0,
                leading_violation_rate: 0.0,
                created_at,
            };
        }

        let mut sorted = judges.to_vec();
        sorted.sort_by_key(|j| j.turn_index);

        let sum_overall: f64 = sorted.iter().map(|j| j.scores.overall).sum();
        let sum_verbosity: f64 = sorted.iter().map(|j| j.scores.verbosity).sum();
        let sum_exploratory: f64 = sorted.iter().map(|j| j.scores.exploratory).sum();
        let sum_interrogative: f64 = sorted.iter().map(|j| j.scores.interrogative).sum();

        let compliant = sorted
            .iter()
            .filter(|j| j.scores.overall >= compliance_threshold)
            .count();

        // compliance_rate is defined over n_turns_planned (§8), not n_turns
        // recorded/judged, so a partial run under-counts correctly.
        let denom = if n_turns_planned > 0 {
            n_turns_planned as f64
        } else {
            n_turns as f64
        };

        let half_life = sorted
            .iter()
            .find(|j| j.scores.overall < discipline_threshold)
            .map(|j| j.turn_index)
            .unwrap_or(n_turns_planned);

        let non_failed_count = sorted.iter().filter(|j| !j.failed).count();
        let (advice_violations, leading_violations, violation_denom) = if non_failed_count > 0 {
            let advice = sorted
                .iter()
                .filter(|j| !j.failed && j.heuristics.has_advice)
                .count();
            let leading = sorted
                .iter()
                .filter(|j| !j.failed && j.heuristics.is_leading)
                .count();
            (advice, leading, non_failed_count as f64)
        } else {
            let advice = sorted.iter().filter(|j| j.heuristics.has_advice).count();
            let leading = sorted.iter().filter(|j| j.heuristics.is_leading).count();
            (advice, leading, n_turns as f64)
        };

        Self {
            run_id: run_id.to_string(),
            manifest_id: manifest_id.to_string(),
            model_id: model_id.to_string(),
            scenario_id: scenario_id.to_string(),
            week: week.to_string(),
            n_turns,
            mean_overall: sum_overall / n_turns as f64,
            mean_verbosity: sum_verbosity / n_turns as f64,
            mean_exploratory: sum_exploratory / n_turns as f64,
            mean_interrogative: sum_interrogative / n_turns as f64,
            compliance_rate: compliant as f64 / denom,
            half_life,
            advice_violation_rate: advice_violations as f64 / violation_denom,
            leading_violation_rate: leading_violations as f64 / violation_denom,
            created_at,
        }
    }
}

/// Aggregate over all completed RunSummaries sharing a `(week, model_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyRollup {
    pub week: String,
    pub model_id: String,
    pub run_count: i32,
    pub turn_count: i32,
    pub mean_overall: f64,
    pub mean_compliance_rate: f64,
    pub mean_half_life: f64,
    pub mean_verbosity: f64,
    pub mean_exploratory: f64,
    pub mean_interrogative: f64,
    pub advice_violation_rate: f64,
    pub leading_violation_rate: f64,
    pub run_ids: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl WeeklyRollup {
    pub fn empty(week: &str, model_id: &str, updated_at: DateTime<Utc>) -> Self {
        Self {
            week: week.to_string(),
            model_id: model_id.to_string(),
            run_count: 0,
            turn_count: 0,
            mean_overall: 0.0,
            mean_compliance_rate: 0.0,
            mean_half_life: 0.0,
            mean_verbosity: 0.0,
            mean_exploratory: 0.0,
            mean_interrogative: 0.0,
            advice_violation_rate: 0.0,
            leading_violation_rate: 0.0,
            run_ids: Vec::new(),
            updated_at,
        }
    }

    /// Merge one more RunSummary into this rollup.
    ///
    /// Idempotent under replay (§4.5 step 5): if `run_id` is already present
    /// in `run_ids` the merge is a no-op, which is what makes rollup
    /// associativity (§8) and replay-safety hold at the same time.
    pub fn merge(&mut self, summary: &RunSummary, updated_at: DateTime<Utc>) {
        if self.run_ids.iter().any(|id| id == &summary.run_id) {
            return;
        }

        let prior_count = self.run_count as f64;
        let new_count = prior_count + 1.0;

        self.mean_overall = (self.mean_overall * prior_count + summary.mean_overall) / new_count;
        self.mean_compliance_rate =
            (self.mean_compliance_rate * prior_count + summary.compliance_rate) / new_count;
        self.mean_half_life =
            (self.mean_half_life * prior_count + summary.half_life as f64) / new_count;
        self.mean_verbosity =
            (self.mean_verbosity * prior_count + summary.mean_verbosity) / new_count;
        self.mean_exploratory =
            (self.mean_exploratory * prior_count + summary.mean_exploratory) / new_count;
        self.mean_interrogative =
            (self.mean_interrogative * prior_count + summary.mean_interrogative) / new_count;
        self.advice_violation_rate =
            (self.advice_violation_rate * prior_count + summary.advice_violation_rate) / new_count;
        self.leading_violation_rate = (self.leading_violation_rate * prior_count
            + summary.leading_violation_rate)
            / new_count;

        self.run_count += 1;
        self.turn_count += summary.n_turns;
        self.run_ids.push(summary.run_id.clone());
        self.updated_at = updated_at;
    }
}

/// Deterministic object-store key for a curated run summary.
pub fn curated_run_key(run_id: &str) -> String {
    format!("curated/runs/{run_id}.json")
}

/// Deterministic object-store key for a curated weekly rollup.
pub fn curated_weekly_key(week: &str, model_id: &str) -> String {
    format!("curated/weekly/{week}/{model_id}.json")
}
