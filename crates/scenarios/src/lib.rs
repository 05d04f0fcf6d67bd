//! The compiled-in scenario registry: persona, seed prompt, and
//! student-reply policy per scenario, one per Socratic vector.
//!
//! This crate holds data, not I/O. A `Simulated` reply policy names the
//! student model and prompt template to invoke; it is the Dialogue
//! Runner's job (via the gateway) to actually call it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three Socratic vectors a scenario exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vector {
    /// Cross-examination: surfacing contradictions in the student's view.
    Elenchus,
    /// Guided discovery: drawing out a conclusion the student already has
    /// the pieces for.
    Maieutics,
    /// Productive impasse: deliberately driving toward an unresolved
    /// tension rather than a tidy answer.
    Aporia,
}

/// How the simulated student's next utterance is produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StudentReplyPolicy {
    /// A fixed ordered list of follow-up utterances, consumed one per turn.
    /// Once exhausted, the dialogue has no more scripted turns to draw on.
    FixedList(Vec<String>),
    /// A simulated-student prompt template invoked through the gateway
    /// with a dedicated student model. `{tutor_utterance}` is substituted
    /// with the tutor's most recent turn before the call.
    Simulated {
        model_id: String,
        prompt_template: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: String,
    pub vector: Vector,
    pub persona: String,
    pub seed_prompt: String,
    pub student_reply_policy: StudentReplyPolicy,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario not found: {0}")]
    NotFound(String),
}

/// Substitute the tutor's utterance into a `Simulated` policy's prompt
/// template. Pure string formatting; the actual gateway call is the
/// caller's responsibility.
pub fn render_student_prompt(template: &str, tutor_utterance: &str) -> String {
    template.replace("{tutor_utterance}", tutor_utterance)
}

/// The next scripted student utterance for a `FixedList` policy at a given
/// turn index, or `None` once the list is exhausted.
pub fn next_fixed_utterance(policy: &StudentReplyPolicy, turn_index: usize) -> Option<&str> {
    match policy {
        StudentReplyPolicy::FixedList(utterances) => utterances.get(turn_index).map(String::as_str),
        StudentReplyPolicy::Simulated { .. } => None,
    }
}

fn registry() -> Vec<Scenario> {
    vec![
        Scenario {
            scenario_id: "EL-ETH-UTIL-DEON-01".to_string(),
            vector: Vector::Elenchus,
            persona: "A philosophy student confident that utilitarianism and deontology never conflict."
                .to_string(),
            seed_prompt: "I think the right action is always whatever produces the most good, \
                and that's basically the same thing as following our duties anyway."
                .to_string(),
            student_reply_policy: StudentReplyPolicy::FixedList(vec![
                "But duties are still about consequences in the end, aren't they?".to_string(),
                "Okay, but in practice they always point the same direction.".to_string(),
                "I guess I hadn't thought about a case where they'd pull apart.".to_string(),
                "So which one wins when they actually conflict?".to_string(),
                "That's... less settled than I thought.".to_string(),
            ]),
        },
        Scenario {
            scenario_id: "MA-EPI-JUST-BELIEF-01".to_string(),
            vector: Vector::Maieutics,
            persona: "A first-year student who already believes justified true belief is knowledge \
                but hasn't examined why."
                .to_string(),
            seed_prompt: "Knowledge is just a belief that's true and that you have good reasons for. \
                That covers every case, right?".to_string(),
            student_reply_policy: StudentReplyPolicy::Simulated {
                model_id: "student-sim-01".to_string(),
                prompt_template: "You are a first-year philosophy student in a Socratic dialogue \
                    about the definition of knowledge. Respond to your tutor's last remark in one \
                    or two sentences, staying in character and only revising your view when the \
                    tutor's point genuinely lands. Tutor said: \"{tutor_utterance}\""
                    .to_string(),
            },
        },
        Scenario {
            scenario_id: "AP-MIND-PERSID-01".to_string(),
            vector: Vector::Aporia,
            persona: "A student who treats personal identity over time as obviously settled by \
                bodily continuity."
                .to_string(),
            seed_prompt: "I'm the same person I was ten years ago because it's the same body, \
                just older. What else would it even mean?".to_string(),
            student_reply_policy: StudentReplyPolicy::FixedList(vec![
                "Sure, but the body is still mine the whole way through.".to_string(),
                "I suppose memory matters too, not just the body.".to_string(),
                "What if the memories and the body came apart, though?".to_string(),
                "I don't actually know which one I'd say makes it 'me' then.".to_string(),
            ]),
        },
    ]
}

/// Look up a scenario by id, or `None` if it isn't in the compiled-in
/// registry.
pub fn scenario_by_id(scenario_id: &str) -> Option<Scenario> {
    registry().into_iter().find(|s| s.scenario_id == scenario_id)
}

/// Look up a scenario by id, failing with [`ScenarioError::NotFound`]
/// (the orchestrator's `ScenarioNotFound` error) when it isn't registered.
pub fn require_scenario(scenario_id: &str) -> Result<Scenario, ScenarioError> {
    scenario_by_id(scenario_id).ok_or_else(|| ScenarioError::NotFound(scenario_id.to_string()))
}

/// All compiled-in scenario ids, in registry order.
pub fn all_scenario_ids() -> Vec<String> {
    registry().into_iter().map(|s| s.scenario_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_one_scenario_per_vector() {
        let scenarios = registry();
        assert_eq!(scenarios.len(), 3);
        assert!(scenarios.iter().any(|s| s.vector == Vector::Elenchus));
        assert!(scenarios.iter().any(|s| s.vector == Vector::Maieutics));
        assert!(scenarios.iter().any(|s| s.vector == Vector::Aporia));
    }

    #[test]
    fn one_scenario_uses_a_simulated_student_policy() {
        let scenarios = registry();
        assert!(
            scenarios
                .iter()
                .any(|s| matches!(s.student_reply_policy, StudentReplyPolicy::Simulated { .. }))
        );
    }

    #[test]
    fn unknown_scenario_id_fails() {
        let result = require_scenario("does-not-exist");
        assert!(matches!(result, Err(ScenarioError::NotFound(_))));
    }

    #[test]
    fn fixed_list_policy_is_exhausted_past_its_length() {
        let policy = StudentReplyPolicy::FixedList(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(next_fixed_utterance(&policy, 0), Some("a"));
        assert_eq!(next_fixed_utterance(&policy, 1), Some("b"));
        assert_eq!(next_fixed_utterance(&policy, 2), None);
    }

    #[test]
    fn render_student_prompt_substitutes_the_tutor_utterance() {
        let rendered = render_student_prompt("Tutor said: {tutor_utterance}", "hello there");
        assert_eq!(rendered, "Tutor said: hello there");
    }
}
