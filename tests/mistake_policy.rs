use rand::rngs::StdRng;
use rand::SeedableRng;

use ghosttype::keyboard::qwerty_adjacent_char;
use ghosttype::mistakes::{max_mistakes_for, should_mistake, wrong_char_for};

#[test]
fn budget_is_five_percent_with_a_minimum_of_one() {
    assert_eq!(max_mistakes_for(0), 1);
    assert_eq!(max_mistakes_for(5), 1);
    assert_eq!(max_mistakes_for(19), 1);
    assert_eq!(max_mistakes_for(20), 1);
    assert_eq!(max_mistakes_for(40), 2);
    assert_eq!(max_mistakes_for(100), 5);
}

#[test]
fn never_fires_when_disabled() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
        assert!(!should_mistake(false, 0, 5, 10, 1.0, &mut rng));
    }
}

#[test]
fn never_fires_once_the_budget_is_spent() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(!should_mistake(true, 5, 5, 10, 1.0, &mut rng));
    assert!(!should_mistake(true, 6, 5, 10, 1.0, &mut rng));
}

#[test]
fn never_fires_on_the_first_keystroke() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
        assert!(!should_mistake(true, 0, 5, 0, 1.0, &mut rng));
    }
}

#[test]
fn fires_when_enabled_with_budget_and_content() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(should_mistake(true, 0, 5, 1, 1.0, &mut rng));
}

#[test]
fn wrong_char_is_a_qwerty_neighbor_when_one_exists() {
    let neighbors = ['q', 'w', 's', 'z', 'x'];
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let wrong = wrong_char_for('a', &mut rng);
        assert!(
            neighbors.contains(&wrong),
            "{wrong:?} is not adjacent to 'a'"
        );
    }
}

#[test]
fn wrong_char_preserves_case_for_adjacent_picks() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let wrong = wrong_char_for('A', &mut rng);
        assert!(wrong.is_ascii_uppercase(), "expected uppercase, got {wrong:?}");
    }
}

#[test]
fn wrong_char_falls_back_to_a_letter_row() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let wrong = wrong_char_for('!', &mut rng);
        assert!(
            wrong.is_ascii_lowercase(),
            "fallback should be a row letter, got {wrong:?}"
        );
    }
}

#[test]
fn adjacency_is_defined_for_letters_and_digits_only() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(qwerty_adjacent_char('e', &mut rng).is_some());
    assert!(qwerty_adjacent_char('7', &mut rng).is_some());
    assert!(qwerty_adjacent_char(' ', &mut rng).is_none());
    assert!(qwerty_adjacent_char('@', &mut rng).is_none());
}
