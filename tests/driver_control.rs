use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use ghosttype::control::{ControlRegistry, SessionControl, SessionOutcome};
use ghosttype::driver::{run_single_field, sleep_interruptible, RecordingClock};
use ghosttype::error::{NotTypable, StartError};
use ghosttype::model::{TypingConfig, TypingStyle};
use ghosttype::page::MemoryField;
use ghosttype::surface::SurfaceKind;

fn config(delay_ms: u64) -> TypingConfig {
    TypingConfig::new(delay_ms, TypingStyle::Constant)
}

#[test]
fn run_single_field_completes_and_retires_the_control_handle() {
    let mut field = MemoryField::new("text", SurfaceKind::Input);
    let control = SessionControl::new();
    let mut clock = RecordingClock::new();
    let mut rng = StdRng::seed_from_u64(1);

    let outcome = run_single_field(
        &mut field,
        "hi",
        &config(50),
        &control,
        &mut clock,
        &mut rng,
    )
    .expect("run should start");

    assert_eq!(outcome, SessionOutcome::Completed);
    assert_eq!(field.value, "hi");
    assert_eq!(clock.slept, vec![50, 50]);
    assert_eq!(control.outcome(), Some(SessionOutcome::Completed));

    // The handle is inert once terminal.
    control.stop();
    control.pause();
    assert!(!control.is_stopped());
    assert!(!control.is_paused());
}

#[test]
fn run_single_field_surfaces_untypable_targets_synchronously() {
    let mut field = MemoryField::new("text", SurfaceKind::Input);
    field.read_only = true;
    let control = SessionControl::new();
    let mut clock = RecordingClock::new();
    let mut rng = StdRng::seed_from_u64(1);

    let err = run_single_field(
        &mut field,
        "hi",
        &config(50),
        &control,
        &mut clock,
        &mut rng,
    )
    .unwrap_err();

    assert_eq!(err, StartError::TargetNotTypable(NotTypable::ReadOnly));
    assert!(clock.slept.is_empty());
    assert!(!control.is_terminal());
}

#[test]
fn interruptible_sleep_slices_and_bails_on_stop() {
    let control = SessionControl::new();
    let mut clock = RecordingClock::new();

    sleep_interruptible(&control, &mut clock, 120);
    assert_eq!(clock.slept, vec![50, 50, 20]);

    let stopped = SessionControl::new();
    stopped.stop();
    let mut clock = RecordingClock::new();
    sleep_interruptible(&stopped, &mut clock, 120);
    assert!(clock.slept.is_empty());
}

#[test]
fn installing_a_new_handle_stops_and_waits_out_the_prior_one() {
    let registry = ControlRegistry::new();
    let mut clock = RecordingClock::new();

    let first = registry.install(&mut clock);
    assert!(clock.slept.is_empty());

    // The first session never reaches a terminal state, so the registry
    // stops it and waits out the bounded acknowledgement window.
    let second = registry.install(&mut clock);
    assert!(first.is_stopped());
    assert_eq!(clock.total_ms(), 200);

    let active = registry.active().expect("a handle should be active");
    assert!(Arc::ptr_eq(&active, &second));
    assert!(!Arc::ptr_eq(&active, &first));
}

#[test]
fn installing_over_a_finished_session_does_not_wait() {
    let registry = ControlRegistry::new();
    let mut clock = RecordingClock::new();
    let mut rng = StdRng::seed_from_u64(1);

    let first = registry.install(&mut clock);
    let mut field = MemoryField::new("text", SurfaceKind::Input);
    run_single_field(&mut field, "x", &config(10), &first, &mut clock, &mut rng)
        .expect("run should start");
    assert!(first.is_terminal());

    let sleeps_before = clock.slept.len();
    let _second = registry.install(&mut clock);
    assert_eq!(clock.slept.len(), sleeps_before);
}
