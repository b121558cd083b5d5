//! Classification of final-looking model text.

use crate::constants::CLARIFICATION_PHRASES;

/// Whether `text` asks the user for clarification instead of acting.
///
/// A plain substring match on a fixed English phrase set. It is a heuristic:
/// it misses rephrasings and other languages, and may flag a genuine answer
/// that happens to quote one of the phrases.
pub fn is_clarification(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CLARIFICATION_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}
