//! Typed-answer matching.

/// Normalize a typed answer for judgment (strip surrounding whitespace).
pub fn normalize(input: &str) -> &str {
    input.trim()
}

/// Whether a submission carries anything to judge.
pub fn is_blank(input: &str) -> bool {
    normalize(input).is_empty()
}

/// Whether the typed input counts as the expected word.
///
/// Case-insensitive, surrounding whitespace ignored; interior spelling must
/// match exactly.
pub fn answer_matches(typed: &str, correct: &str) -> bool {
    let typed = normalize(typed);
    !typed.is_empty() && typed.to_lowercase() == normalize(correct).to_lowercase()
}
