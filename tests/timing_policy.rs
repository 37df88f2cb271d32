use rand::rngs::StdRng;
use rand::SeedableRng;

use ghosttype::model::{TypingConfig, TypingStyle};
use ghosttype::timing::{floored_delay, mistake_backoff_delay, step_delay, MIN_DELAY_MS};

fn config(delay_ms: u64, style: TypingStyle) -> TypingConfig {
    TypingConfig::new(delay_ms, style)
}

#[test]
fn constant_style_returns_the_base_delay_every_call() {
    let cfg = config(50, TypingStyle::Constant);
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..100 {
        assert_eq!(step_delay(&cfg, &mut rng), 50);
    }
}

#[test]
fn constant_style_enforces_the_floor() {
    let cfg = config(3, TypingStyle::Constant);
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(step_delay(&cfg, &mut rng), MIN_DELAY_MS);
    assert_eq!(floored_delay(3), MIN_DELAY_MS);
    assert_eq!(floored_delay(500), 500);
}

#[test]
fn randomized_delays_stay_within_the_configured_bounds() {
    let cfg = config(100, TypingStyle::Randomized);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..2000 {
        let delay = step_delay(&cfg, &mut rng);
        assert!(
            (50..=250).contains(&delay),
            "randomized delay {delay} outside [50, 250]"
        );
    }
}

#[test]
fn randomized_with_tiny_base_respects_the_floor() {
    let cfg = config(1, TypingStyle::Randomized);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..2000 {
        let delay = step_delay(&cfg, &mut rng);
        assert!(
            (MIN_DELAY_MS..=25).contains(&delay),
            "floored randomized delay {delay} outside [{MIN_DELAY_MS}, 25]"
        );
    }
}

#[test]
fn word_batch_is_a_multiple_of_the_base_delay() {
    let cfg = config(40, TypingStyle::WordBatch);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..10 {
        assert_eq!(step_delay(&cfg, &mut rng), 120);
    }
}

#[test]
fn mistake_backoff_scales_the_step_delay() {
    let cfg = config(100, TypingStyle::Constant);
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..500 {
        let delay = mistake_backoff_delay(&cfg, &mut rng);
        assert!(
            (120..=150).contains(&delay),
            "backoff delay {delay} outside [120, 150]"
        );
    }
}
