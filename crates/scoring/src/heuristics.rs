//! The heuristic layer: deterministic, no-I/O flags over an `ai_response`.

use socratic_bench_domain::Heuristics;

const CLOSED_INTERROGATIVE_STARTERS: &[&str] = &[
    "is", "are", "do", "does", "did", "can", "could", "will", "would", "should", "have", "has", "had",
];

const ADVICE_KEYWORDS: &[&str] = &["should", "try", "recommend", "must", "ought to", "need to"];

const LEADING_PHRASES: &[&str] = &[
    "don't you think",
    "isn't it",
    "wouldn't it",
    "obviously",
    "clearly",
];

/// Compute the heuristic flags for one `ai_response`. Pure and cheap enough
/// to be recomputed redundantly at judge-time rather than threaded through
/// from the Runner.
pub fn compute_heuristics(ai_response: &str) -> Heuristics {
    let question_count = ai_response.matches('?').count() as u32;
    let has_question = question_count > 0;
    let trimmed = ai_response.trim();
    let ends_in_question = trimmed.ends_with('?');
    let starts_closed = first_word_lowercase(trimmed)
        .map(|word| CLOSED_INTERROGATIVE_STARTERS.contains(&word.as_str()))
        .unwrap_or(false);
    let open_ended = ends_in_question && !starts_closed;

    let lowercase = ai_response.to_lowercase();
    let has_advice = ADVICE_KEYWORDS.iter().any(|kw| lowercase.contains(kw));
    let is_leading = LEADING_PHRASES.iter().any(|phrase| lowercase.contains(phrase));
    let approx_tokens = ai_response.split_whitespace().count() as u32;

    Heuristics {
        has_question,
        question_count,
        open_ended,
        has_advice,
        is_leading,
        approx_tokens,
    }
}

fn first_word_lowercase(text: &str) -> Option<String> {
    text.split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_ended_question_is_flagged() {
        let h = compute_heuristics("What do you think justifies that claim?");
        assert!(h.has_question);
        assert!(h.open_ended);
        assert_eq!(h.question_count, 1);
    }

    #[test]
    fn closed_interrogative_is_not_open_ended() {
        let h = compute_heuristics("Is that really the only possibility?");
        assert!(h.has_question);
        assert!(!h.open_ended);
    }

    #[test]
    fn non_question_is_not_open_ended() {
        let h = compute_heuristics("That's an interesting position.");
        assert!(!h.has_question);
        assert!(!h.open_ended);
    }

    #[test]
    fn advice_keywords_are_case_insensitive() {
        let h = compute_heuristics("You SHOULD reconsider your premise here.");
        assert!(h.has_advice);
    }

    #[test]
    fn leading_phrases_are_detected() {
        let h = compute_heuristics("Obviously that can't be right, can it?");
        assert!(h.is_leading);
    }

    #[test]
    fn approx_tokens_counts_whitespace_delimited_words() {
        let h = compute_heuristics("one two three four");
        assert_eq!(h.approx_tokens, 4);
    }

    #[test]
    fn multiple_question_marks_are_all_counted() {
        let h = compute_heuristics("Why? Why not? Who decides?");
        assert_eq!(h.question_count, 3);
    }
}
