use log::{debug, warn};
use rand::Rng;

use crate::control::{SessionControl, SessionOutcome};
use crate::driver::{sleep_interruptible, Clock};
use crate::model::{FieldTask, SequencePacing, TypingConfig};
use crate::page::{resolve_field, Page};
use crate::session::{Tick, TypingSession};
use crate::timing::floored_delay;

/// Settle time after scrolling a field into view.
pub const SCROLL_SETTLE_MS: u64 = 200;
/// Settle time after focusing a field.
pub const FOCUS_SETTLE_MS: u64 = 100;
/// Grace added to every per-field ceiling.
pub const CEILING_GRACE_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unresolved,
    NotVisible,
    NotTypable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Completed,
    /// The field hit its hard ceiling and was abandoned mid-type; the
    /// sequence moves on.
    ForcedComplete,
    /// Target detached mid-session.
    Interrupted,
    /// The whole run was stopped before or during this field.
    Stopped,
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
pub struct FieldReport {
    pub label: String,
    pub selector: String,
    pub outcome: FieldOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct SequenceReport {
    pub fields: Vec<FieldReport>,
}

impl SequenceReport {
    pub fn completed(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| f.outcome == FieldOutcome::Completed)
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| matches!(f.outcome, FieldOutcome::Skipped(_)))
            .count()
    }
}

/// Hard ceiling for one field: enough time to type every character at the
/// base delay, plus grace. A safety net against a silently stalled step,
/// not the primary cancellation path.
pub fn ceiling_ms(text: &str, config: &TypingConfig) -> u64 {
    (text.chars().count() as u64).saturating_mul(floored_delay(config.delay_ms)) + CEILING_GRACE_MS
}

/// Type an ordered list of fields, one session per field, in ascending
/// priority order. A field that cannot be resolved, is invisible, or is
/// not typable is logged and skipped; nothing a single field does aborts
/// the sequence. Scan markers are cleared unconditionally afterwards and
/// the control handle is finished with the aggregate outcome.
pub fn run_fields(
    page: &mut dyn Page,
    tasks: &[FieldTask],
    config: &TypingConfig,
    pacing: &SequencePacing,
    control: &SessionControl,
    clock: &mut dyn Clock,
    rng: &mut impl Rng,
) -> SequenceReport {
    let mut ordered: Vec<&FieldTask> = tasks.iter().filter(|t| t.enabled).collect();
    ordered.sort_by_key(|t| t.priority);

    let report = run_ordered(page, &ordered, config, pacing, control, clock, rng);

    page.clear_markers();
    control.finish(if control.is_stopped() {
        SessionOutcome::Stopped
    } else {
        SessionOutcome::Completed
    });
    report
}

fn run_ordered(
    page: &mut dyn Page,
    ordered: &[&FieldTask],
    config: &TypingConfig,
    pacing: &SequencePacing,
    control: &SessionControl,
    clock: &mut dyn Clock,
    rng: &mut impl Rng,
) -> SequenceReport {
    let mut report = SequenceReport::default();

    sleep_interruptible(control, clock, pacing.initial_delay_ms());

    let last = ordered.len().saturating_sub(1);
    for (i, task) in ordered.iter().enumerate() {
        let outcome = if control.is_stopped() {
            FieldOutcome::Stopped
        } else {
            type_one_field(page, task, config, control, clock, rng)
        };

        match outcome {
            FieldOutcome::Skipped(SkipReason::Unresolved) => {
                warn!("skipping field {:?}: selector did not resolve", task.label)
            }
            FieldOutcome::Skipped(SkipReason::NotVisible) => {
                warn!("skipping field {:?}: element is not visible", task.label)
            }
            FieldOutcome::Skipped(SkipReason::NotTypable) => {
                warn!("skipping field {:?}: element is not typable", task.label)
            }
            FieldOutcome::ForcedComplete => {
                warn!("field {:?} exceeded its time ceiling, moving on", task.label)
            }
            _ => debug!("field {:?}: {outcome:?}", task.label),
        }

        report.fields.push(FieldReport {
            label: task.label.clone(),
            selector: task.selector.clone(),
            outcome,
        });

        if i < last {
            sleep_interruptible(control, clock, pacing.inter_field_delay_ms());
        }
    }

    report
}

fn type_one_field(
    page: &mut dyn Page,
    task: &FieldTask,
    config: &TypingConfig,
    control: &SessionControl,
    clock: &mut dyn Clock,
    rng: &mut impl Rng,
) -> FieldOutcome {
    let Some(field) = resolve_field(page, task) else {
        return FieldOutcome::Skipped(SkipReason::Unresolved);
    };
    if !page.is_visible(field) {
        return FieldOutcome::Skipped(SkipReason::NotVisible);
    }

    page.scroll_into_view(field);
    sleep_interruptible(control, clock, SCROLL_SETTLE_MS);
    page.surface_mut(field).focus();
    sleep_interruptible(control, clock, FOCUS_SETTLE_MS);

    let mut session =
        match TypingSession::start(page.surface_mut(field), &task.text, config.clone(), control) {
            Ok(session) => session,
            Err(err) => {
                debug!("field {:?} failed to start: {err}", task.label);
                return FieldOutcome::Skipped(SkipReason::NotTypable);
            }
        };

    let ceiling = ceiling_ms(&task.text, config);
    let mut waited: u64 = 0;
    loop {
        match session.tick(page.surface_mut(field), control, rng) {
            Tick::Finished(outcome) => {
                return match outcome {
                    SessionOutcome::Completed => FieldOutcome::Completed,
                    SessionOutcome::Stopped => FieldOutcome::Stopped,
                    SessionOutcome::Interrupted => FieldOutcome::Interrupted,
                }
            }
            Tick::Wait(ms) => {
                // Pause polling does not consume the ceiling.
                if !control.is_paused() {
                    waited = waited.saturating_add(ms);
                    if waited > ceiling {
                        return FieldOutcome::ForcedComplete;
                    }
                }
                sleep_interruptible(control, clock, ms);
            }
        }
    }
}
