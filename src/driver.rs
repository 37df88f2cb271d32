use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::control::{SessionControl, SessionOutcome};
use crate::error::StartError;
use crate::model::TypingConfig;
use crate::session::{Tick, TypingSession};
use crate::surface::Surface;

/// All engine waits go through this seam so tests can drive sessions on a
/// recording clock with no wall-clock time.
pub trait Clock {
    fn sleep(&mut self, ms: u64);
}

#[derive(Debug, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn sleep(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Test/inspection clock: returns instantly and records every requested
/// sleep.
#[derive(Debug, Default)]
pub struct RecordingClock {
    pub slept: Vec<u64>,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.slept.iter().sum()
    }
}

impl Clock for RecordingClock {
    fn sleep(&mut self, ms: u64) {
        self.slept.push(ms);
    }
}

const SLEEP_SLICE_MS: u64 = 50;

/// Sleep in short slices, bailing out as soon as the session is stopped.
pub fn sleep_interruptible(control: &SessionControl, clock: &mut dyn Clock, ms: u64) {
    let mut remaining = ms;
    while remaining > 0 {
        if control.is_stopped() {
            return;
        }
        let step = remaining.min(SLEEP_SLICE_MS);
        clock.sleep(step);
        remaining -= step;
    }
}

/// Drive one session to a terminal state against the given clock.
pub fn drive(
    session: &mut TypingSession,
    surface: &mut dyn Surface,
    control: &SessionControl,
    clock: &mut dyn Clock,
    rng: &mut impl Rng,
) -> SessionOutcome {
    loop {
        match session.tick(surface, control, rng) {
            Tick::Wait(ms) => sleep_interruptible(control, clock, ms),
            Tick::Finished(outcome) => return outcome,
        }
    }
}

/// Start and run a single-field session. `TargetNotTypable` (and the other
/// start failures) surface synchronously here, before any state exists;
/// once running, every fault resolves to an outcome instead of an error.
/// The control handle is finished on return, making it inert.
pub fn run_single_field(
    surface: &mut dyn Surface,
    text: &str,
    config: &TypingConfig,
    control: &SessionControl,
    clock: &mut dyn Clock,
    rng: &mut impl Rng,
) -> Result<SessionOutcome, StartError> {
    let mut session = TypingSession::start(surface, text, config.clone(), control)?;
    let outcome = drive(&mut session, surface, control, clock, rng);
    control.finish(outcome);
    Ok(outcome)
}
