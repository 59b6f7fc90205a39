/// Outcome of checking the typed buffer against the target word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Buffer is a proper prefix of the word.
    Partial,
    /// Buffer equals the word.
    Complete,
    /// Buffer is not a prefix of the word.
    Miss,
}

/// Judge `typed` against `word`. Comparison is exact and case-sensitive.
pub fn judge(word: &str, typed: &str) -> Verdict {
    if !word.starts_with(typed) {
        Verdict::Miss
    } else if typed.len() == word.len() {
        Verdict::Complete
    } else {
        Verdict::Partial
    }
}

/// Number of blank cells still to fill, counted in characters.
pub fn remaining_chars(word: &str, typed: &str) -> usize {
    word.chars().count().saturating_sub(typed.chars().count())
}
