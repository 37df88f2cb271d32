use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypingStyle {
    Constant,
    Randomized,
    WordBatch,
}

/// Observed defaults for the probabilistic knobs. None of these are tuned
/// against a realism target; hosts may override them per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub mistake_probability: f64,
    pub mistake_backoff_min: f64,
    pub mistake_backoff_max: f64,
    pub random_min_factor: f64,
    pub random_max_factor: f64,
    pub word_delay_factor: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            mistake_probability: 0.03,
            mistake_backoff_min: 1.2,
            mistake_backoff_max: 1.5,
            random_min_factor: 0.5,
            random_max_factor: 2.5,
            word_delay_factor: 3.0,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.mistake_probability),
            "mistake_probability must be between 0.0 and 1.0"
        );
        ensure!(
            self.mistake_backoff_min >= 1.0,
            "mistake_backoff_min must be >= 1.0"
        );
        ensure!(
            self.mistake_backoff_min <= self.mistake_backoff_max,
            "mistake_backoff_min must be <= mistake_backoff_max"
        );
        ensure!(
            self.random_min_factor > 0.0 && self.random_max_factor > 0.0,
            "random delay factors must be > 0"
        );
        ensure!(
            self.random_min_factor < self.random_max_factor,
            "random_min_factor must be < random_max_factor"
        );
        ensure!(
            self.word_delay_factor > 0.0,
            "word_delay_factor must be > 0"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingConfig {
    pub delay_ms: u64,
    pub include_mistakes: bool,
    /// Carried for host-config compatibility; audio is a host concern and
    /// the engine never reads it.
    #[serde(default)]
    pub sound_enabled: bool,
    pub style: TypingStyle,
    #[serde(default)]
    pub tuning: Tuning,
}

impl TypingConfig {
    pub fn new(delay_ms: u64, style: TypingStyle) -> Self {
        Self {
            delay_ms,
            include_mistakes: false,
            sound_enabled: false,
            style,
            tuning: Tuning::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.delay_ms > 0, "delay_ms must be > 0");
        self.tuning.validate()
    }
}

fn default_enabled() -> bool {
    true
}

/// One field of a multi-field run, as produced by a page scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTask {
    pub selector: String,
    /// Marker attribute value stamped on the element at scan time; used as
    /// a resolution fallback when the selector no longer matches.
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub label: String,
    pub text: String,
    pub priority: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SequencePacing {
    #[serde(default)]
    pub initial_delay_secs: f64,
    #[serde(default)]
    pub inter_field_delay_secs: f64,
}

impl SequencePacing {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.initial_delay_secs.is_finite() && self.initial_delay_secs >= 0.0,
            "initial_delay_secs must be >= 0"
        );
        ensure!(
            self.inter_field_delay_secs.is_finite() && self.inter_field_delay_secs >= 0.0,
            "inter_field_delay_secs must be >= 0"
        );
        Ok(())
    }

    pub fn initial_delay_ms(&self) -> u64 {
        (self.initial_delay_secs * 1000.0).round() as u64
    }

    pub fn inter_field_delay_ms(&self) -> u64 {
        (self.inter_field_delay_secs * 1000.0).round() as u64
    }
}
