//! Positional feedback for a guess against the target word.

use serde::Serialize;

use super::value_object::{WORD_LENGTH, Word};

/// Per-letter evaluation of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterMark {
    /// Letter does not occur among the unconsumed target letters
    None,
    /// Letter occurs elsewhere in the target
    Misplaced,
    /// Letter is in the right position
    Exact,
}

/// Compares `guess` with `target` position by position.
///
/// Exact matches consume their target letter first, then misplaced letters
/// consume one remaining occurrence each, so a repeated guess letter is never
/// credited more times than it occurs in the target.
pub fn evaluate_guess(guess: &Word, target: &Word) -> [LetterMark; WORD_LENGTH] {
    let guess = guess.letters();
    let target = target.letters();
    let mut marks = [LetterMark::None; WORD_LENGTH];
    let mut consumed = [false; WORD_LENGTH];

    for i in 0..WORD_LENGTH {
        if guess[i] == target[i] {
            marks[i] = LetterMark::Exact;
            consumed[i] = true;
        }
    }

    for i in 0..WORD_LENGTH {
        if marks[i] == LetterMark::Exact {
            continue;
        }
        if let Some(j) = (0..WORD_LENGTH).find(|&j| !consumed[j] && target[j] == guess[i]) {
            marks[i] = LetterMark::Misplaced;
            consumed[j] = true;
        }
    }

    marks
}
