use log::debug;
use rand::Rng;

use crate::control::{SessionControl, SessionOutcome};
use crate::error::{NotTypable, StartError};
use crate::events;
use crate::mistakes;
use crate::model::{TypingConfig, TypingStyle};
use crate::surface::Surface;
use crate::timing::{self, PAUSE_POLL_MS};

/// What the driver should do after one step: wait before the next tick, or
/// tear the session down with the given outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Wait(u64),
    Finished(SessionOutcome),
}

#[derive(Debug)]
enum Units {
    Chars(Vec<char>),
    Words(Vec<String>),
}

impl Units {
    fn len(&self) -> usize {
        match self {
            Units::Chars(chars) => chars.len(),
            Units::Words(words) => words.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Normal stepping: emit the unit at the current index.
    Step,
    /// A wrong character was just emitted; the corrective backspace is
    /// pending and the index has not advanced.
    Correct,
}

/// One field's typing session from start to a terminal state.
///
/// The session never sleeps: each `tick` performs at most one step and
/// returns how long the driver should wait before the next one. Stop,
/// pause, and detach are re-checked on every tick, so cancellation takes
/// effect at the next scheduled step and a pause freezes progress without
/// consuming it.
#[derive(Debug)]
pub struct TypingSession {
    config: TypingConfig,
    units: Units,
    index: usize,
    mistake_count: u32,
    max_mistakes: u32,
    phase: Phase,
    outcome: Option<SessionOutcome>,
}

fn ensure_typable(surface: &dyn Surface) -> Result<(), NotTypable> {
    if !surface.is_attached() {
        return Err(NotTypable::Detached);
    }
    if surface.is_read_only() {
        return Err(NotTypable::ReadOnly);
    }
    if surface.is_disabled() {
        return Err(NotTypable::Disabled);
    }
    Ok(())
}

impl TypingSession {
    /// Validate the target and begin a session: focus, clear existing
    /// content (announcing the clearing), capture the unit list for the
    /// configured style. Fails before any state is created if the target
    /// cannot accept synthetic text.
    pub fn start(
        surface: &mut dyn Surface,
        text: &str,
        config: TypingConfig,
        control: &SessionControl,
    ) -> Result<Self, StartError> {
        config
            .validate()
            .map_err(|err| StartError::InvalidConfig(err.to_string()))?;
        ensure_typable(surface)?;

        let units = match config.style {
            TypingStyle::WordBatch => {
                let words: Vec<String> =
                    text.split_whitespace().map(str::to_string).collect();
                if words.is_empty() {
                    return Err(StartError::EmptyText);
                }
                Units::Words(words)
            }
            _ => Units::Chars(text.chars().collect()),
        };
        let max_mistakes = mistakes::max_mistakes_for(text.chars().count());

        surface.focus();
        events::clear_content(surface);
        control.reset_progress();

        Ok(Self {
            config,
            units,
            index: 0,
            mistake_count: 0,
            max_mistakes,
            phase: Phase::Step,
            outcome: None,
        })
    }

    /// Cursor into the unit list and the total unit count.
    pub fn position(&self) -> (usize, usize) {
        (self.index, self.units.len())
    }

    pub fn mistake_count(&self) -> u32 {
        self.mistake_count
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// One scheduled step. Order per step: stop check, pause re-check,
    /// detach check, completion check, then the actual emission, the
    /// progress publish, and the computed delay for the next step.
    pub fn tick(
        &mut self,
        surface: &mut dyn Surface,
        control: &SessionControl,
        rng: &mut impl Rng,
    ) -> Tick {
        if let Some(outcome) = self.outcome {
            return Tick::Finished(outcome);
        }
        if control.is_stopped() {
            return self.finish(SessionOutcome::Stopped);
        }
        if control.is_paused() {
            return Tick::Wait(PAUSE_POLL_MS);
        }
        if !surface.is_attached() {
            debug!("target detached mid-session at unit {}", self.index);
            return self.finish(SessionOutcome::Interrupted);
        }

        if self.index >= self.units.len() {
            control.publish_progress(100.0);
            events::emit_completion(surface);
            return self.finish(SessionOutcome::Completed);
        }

        if self.phase == Phase::Correct {
            events::emit_backspace(surface);
            self.phase = Phase::Step;
            return Tick::Wait(timing::step_delay(&self.config, rng));
        }

        match &self.units {
            Units::Chars(chars) => {
                let c = chars[self.index];
                let typed_len = surface.text().chars().count();
                if mistakes::should_mistake(
                    self.config.include_mistakes,
                    self.mistake_count,
                    self.max_mistakes,
                    typed_len,
                    self.config.tuning.mistake_probability,
                    rng,
                ) {
                    self.mistake_count += 1;
                    let wrong = mistakes::wrong_char_for(c, rng);
                    events::emit_char(surface, wrong);
                    self.phase = Phase::Correct;
                    return Tick::Wait(timing::mistake_backoff_delay(&self.config, rng));
                }
                events::emit_char(surface, c);
                self.index += 1;
            }
            Units::Words(words) => {
                let word = &words[self.index];
                let chunk = if self.index + 1 == words.len() {
                    word.clone()
                } else {
                    format!("{word} ")
                };
                events::emit_text(surface, &chunk);
                self.index += 1;
            }
        }

        self.publish_progress(control);
        Tick::Wait(timing::step_delay(&self.config, rng))
    }

    fn publish_progress(&self, control: &SessionControl) {
        let total = self.units.len();
        if total == 0 {
            return;
        }
        control.publish_progress(self.index as f32 / total as f32 * 100.0);
    }

    fn finish(&mut self, outcome: SessionOutcome) -> Tick {
        self.outcome = Some(outcome);
        Tick::Finished(outcome)
    }
}
