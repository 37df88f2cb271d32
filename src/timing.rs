use rand::Rng;

use crate::model::{TypingConfig, TypingStyle};

/// Hard floor on every scheduled delay; anything lower degenerates into a
/// timer storm.
pub const MIN_DELAY_MS: u64 = 10;

/// Re-check interval while a session is paused.
pub const PAUSE_POLL_MS: u64 = 100;

pub fn floored_delay(delay_ms: u64) -> u64 {
    delay_ms.max(MIN_DELAY_MS)
}

/// Delay before the next character (or word, in word-batch style).
pub fn step_delay(config: &TypingConfig, rng: &mut impl Rng) -> u64 {
    let base = floored_delay(config.delay_ms) as f64;
    let tuning = &config.tuning;
    let raw = match config.style {
        TypingStyle::Constant => base,
        TypingStyle::Randomized => {
            rng.gen_range(tuning.random_min_factor * base..tuning.random_max_factor * base)
        }
        TypingStyle::WordBatch => tuning.word_delay_factor * base,
    };
    (raw.round() as u64).max(MIN_DELAY_MS)
}

/// Delay between a wrong keystroke and its corrective backspace, scaled up
/// from the normal step delay.
pub fn mistake_backoff_delay(config: &TypingConfig, rng: &mut impl Rng) -> u64 {
    let step = step_delay(config, rng) as f64;
    let tuning = &config.tuning;
    let factor = rng.gen_range(tuning.mistake_backoff_min..=tuning.mistake_backoff_max);
    ((step * factor).round() as u64).max(MIN_DELAY_MS)
}
