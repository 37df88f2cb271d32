use rand::Rng;

use crate::keyboard::{qwerty_adjacent_char, random_row_char};

/// Mistake budget: 5% of the text length, at least one.
pub fn max_mistakes_for(text_len: usize) -> u32 {
    (((text_len as f64) * 0.05).floor() as u32).max(1)
}

/// A mistake fires only when enabled, budget remains, at least one
/// character is already committed (never on the first keystroke of a
/// field), and the per-character probability draw hits.
pub fn should_mistake(
    enabled: bool,
    mistake_count: u32,
    max_mistakes: u32,
    current_len: usize,
    probability: f64,
    rng: &mut impl Rng,
) -> bool {
    enabled && mistake_count < max_mistakes && current_len > 0 && rng.gen_bool(probability)
}

/// A plausible wrong keystroke for the intended character: a QWERTY
/// neighbor when one exists, otherwise any letter from a random letter row.
pub fn wrong_char_for(intended: char, rng: &mut impl Rng) -> char {
    qwerty_adjacent_char(intended, rng).unwrap_or_else(|| random_row_char(rng))
}
