use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use crate::driver::Clock;

/// How a session ended. `Interrupted` means the target element went away
/// mid-run and the session is reported incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Stopped,
    Interrupted,
}

const STATE_ACTIVE: u8 = 0;
const STATE_COMPLETED: u8 = 1;
const STATE_STOPPED: u8 = 2;
const STATE_INTERRUPTED: u8 = 3;

/// The control seam between a host and a running engine invocation.
///
/// Hosts only ever read progress and issue pause/resume/stop; they never
/// touch session internals. All three commands are idempotent and become
/// no-ops once the session reaches a terminal state. Progress is stored in
/// basis points and published with `fetch_max`, so observed progress never
/// regresses within a session.
#[derive(Debug, Default)]
pub struct SessionControl {
    paused: AtomicBool,
    stopped: AtomicBool,
    progress_bp: AtomicU32,
    state: AtomicU8,
}

impl SessionControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        if self.is_terminal() {
            return;
        }
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        if self.is_terminal() {
            return;
        }
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Request termination. The stepping side observes the flag before
    /// every step and on every sleep slice, so no step scheduled before
    /// this call runs after the flag is visible.
    pub fn stop(&self) {
        if self.is_terminal() {
            return;
        }
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Progress percentage in [0, 100] for the field currently being typed.
    pub fn progress(&self) -> f32 {
        self.progress_bp.load(Ordering::SeqCst) as f32 / 100.0
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.state.load(Ordering::SeqCst) {
            STATE_COMPLETED => Some(SessionOutcome::Completed),
            STATE_STOPPED => Some(SessionOutcome::Stopped),
            STATE_INTERRUPTED => Some(SessionOutcome::Interrupted),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.load(Ordering::SeqCst) != STATE_ACTIVE
    }

    pub(crate) fn publish_progress(&self, percent: f32) {
        let bp = (percent.clamp(0.0, 100.0) * 100.0).round() as u32;
        self.progress_bp.fetch_max(bp, Ordering::SeqCst);
    }

    /// A new field starts from zero; monotonicity holds within a field.
    pub(crate) fn reset_progress(&self) {
        self.progress_bp.store(0, Ordering::SeqCst);
    }

    /// Terminal transition, taken exactly once.
    pub(crate) fn finish(&self, outcome: SessionOutcome) {
        let encoded = match outcome {
            SessionOutcome::Completed => STATE_COMPLETED,
            SessionOutcome::Stopped => STATE_STOPPED,
            SessionOutcome::Interrupted => STATE_INTERRUPTED,
        };
        let _ = self.state.compare_exchange(
            STATE_ACTIVE,
            encoded,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

/// How long a new session waits for a replaced one to acknowledge its stop.
pub const REPLACE_WAIT_MS: u64 = 200;
const REPLACE_POLL_MS: u64 = 10;

/// Single-slot registry for the one control handle an execution context may
/// have. Installing a new handle first stops any prior session and waits
/// for its cancellation to take effect.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    slot: Mutex<Option<Arc<SessionControl>>>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, clock: &mut dyn Clock) -> Arc<SessionControl> {
        let mut slot = self.slot.lock().unwrap();
        if let Some(prev) = slot.take() {
            prev.stop();
            let mut waited = 0u64;
            while !prev.is_terminal() && waited < REPLACE_WAIT_MS {
                clock.sleep(REPLACE_POLL_MS);
                waited += REPLACE_POLL_MS;
            }
        }
        let control = Arc::new(SessionControl::new());
        *slot = Some(Arc::clone(&control));
        control
    }

    pub fn active(&self) -> Option<Arc<SessionControl>> {
        self.slot.lock().unwrap().clone()
    }
}
