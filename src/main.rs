use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ghosttype::control::{ControlRegistry, SessionControl};
use ghosttype::driver::{run_single_field, sleep_interruptible, WallClock};
use ghosttype::error::StartError;
use ghosttype::model::{FieldTask, SequencePacing, TypingConfig, TypingStyle};
use ghosttype::page::{MemoryField, MemoryPage, Page};
use ghosttype::sequencer::{run_fields, FieldOutcome};
use ghosttype::surface::SurfaceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TypingStyleArg {
    /// Fixed delay between characters.
    Constant,
    /// Uniformly jittered delay between characters.
    Randomized,
    /// Whole words at once, with a longer delay per word.
    WordBatch,
}

impl TypingStyleArg {
    fn to_library(self) -> TypingStyle {
        match self {
            TypingStyleArg::Constant => TypingStyle::Constant,
            TypingStyleArg::Randomized => TypingStyle::Randomized,
            TypingStyleArg::WordBatch => TypingStyle::WordBatch,
        }
    }
}

#[derive(Debug, Args, Clone)]
struct TypingArgs {
    /// Base delay between keystrokes, in milliseconds
    #[arg(long, default_value_t = 80)]
    delay: u64,

    #[arg(long, value_enum, default_value_t = TypingStyleArg::Constant)]
    style: TypingStyleArg,

    /// Inject occasional wrong keystrokes followed by a corrective backspace
    #[arg(long)]
    mistakes: bool,

    /// Per-character mistake probability (0.0-1.0)
    #[arg(long, default_value_t = 0.03)]
    mistake_probability: f64,

    /// Optional RNG seed (for reproducible runs)
    #[arg(long)]
    seed: Option<u64>,
}

impl TypingArgs {
    fn to_config(&self) -> TypingConfig {
        let mut config = TypingConfig::new(self.delay, self.style.to_library());
        config.include_mistakes = self.mistakes;
        config.tuning.mistake_probability = self.mistake_probability;
        config
    }
}

#[derive(Debug, Parser)]
#[command(name = "ghosttype")]
#[command(about = "Human-like typing simulator for form fields", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Type text into one field of a page
    Type {
        /// Input text file, or '-' for stdin
        #[arg(long, value_name = "PATH")]
        text: PathBuf,

        /// Page file (JSON). Omitted: a single blank input field.
        #[arg(long, value_name = "PATH")]
        page: Option<PathBuf>,

        /// Target field selector. Omitted: the focused or first typable field.
        #[arg(long, value_name = "SELECTOR")]
        field: Option<String>,

        /// Seconds to wait before the first keystroke
        #[arg(long, default_value_t = 0.0)]
        initial_delay: f64,

        /// Write the resulting page state (JSON)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        #[command(flatten)]
        typing: TypingArgs,
    },

    /// Type a task list into a page, one field at a time in priority order
    Fill {
        /// Page file (JSON)
        #[arg(long, value_name = "PATH")]
        page: PathBuf,

        /// Field task list (JSON array)
        #[arg(long, value_name = "PATH")]
        tasks: PathBuf,

        /// Seconds to wait before the first field
        #[arg(long, default_value_t = 0.0)]
        initial_delay: f64,

        /// Seconds to wait between fields
        #[arg(long, default_value_t = 0.0)]
        inter_field_delay: f64,

        /// Write the resulting page state (JSON)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        #[command(flatten)]
        typing: TypingArgs,
    },
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == std::ffi::OsStr::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_page(path: &PathBuf) -> Result<MemoryPage> {
    let json = read_input(path)?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn load_tasks(path: &PathBuf) -> Result<Vec<FieldTask>> {
    let json = read_input(path)?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_page(path: &PathBuf, page: &MemoryPage) -> Result<()> {
    let json = serde_json::to_string_pretty(page).context("failed to serialize page")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn install_ctrlc(control: &Arc<SessionControl>) -> Result<()> {
    let control = Arc::clone(control);
    ctrlc::set_handler(move || {
        control.stop();
    })
    .context("failed to install Ctrl+C handler")
}

fn delay_secs_to_ms(secs: f64) -> Result<u64> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(anyhow!("delay seconds must be >= 0"));
    }
    Ok((secs * 1000.0).round() as u64)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Type {
            text,
            page,
            field,
            initial_delay,
            out,
            typing,
        } => {
            let text = read_input(&text)?;
            let mut page_state = match &page {
                Some(path) => load_page(path)?,
                None => MemoryPage::new(vec![MemoryField::new("text", SurfaceKind::Input)]),
            };

            let target = match &field {
                Some(selector) => {
                    let mut found = page_state.query_selector(selector);
                    if found.is_none() {
                        if let Some(id) = selector.strip_prefix('#') {
                            found = page_state.element_by_id(id);
                        }
                    }
                    found.ok_or_else(|| anyhow!("target field not found: {selector}"))?
                }
                None => page_state.active_field().ok_or(StartError::NoTarget)?,
            };

            let config = typing.to_config();
            config.validate()?;

            let registry = ControlRegistry::new();
            let mut clock = WallClock;
            let control = registry.install(&mut clock);
            install_ctrlc(&control)?;

            let mut rng = rng_from_seed(typing.seed);
            sleep_interruptible(&control, &mut clock, delay_secs_to_ms(initial_delay)?);

            let outcome = run_single_field(
                page_state.surface_mut(target),
                &text,
                &config,
                &control,
                &mut clock,
                &mut rng,
            )?;

            eprintln!(
                "Typed {} of {} characters into {:?} ({outcome:?})",
                page_state.field(target).value.chars().count(),
                text.chars().count(),
                page_state.field(target).id,
            );

            if let Some(out) = out {
                write_page(&out, &page_state)?;
            } else {
                println!("{}", page_state.field(target).value);
            }
        }
        Command::Fill {
            page,
            tasks,
            initial_delay,
            inter_field_delay,
            out,
            typing,
        } => {
            let mut page_state = load_page(&page)?;
            let tasks = load_tasks(&tasks)?;

            let config = typing.to_config();
            config.validate()?;
            let pacing = SequencePacing {
                initial_delay_secs: initial_delay,
                inter_field_delay_secs: inter_field_delay,
            };
            pacing.validate()?;

            let registry = ControlRegistry::new();
            let mut clock = WallClock;
            let control = registry.install(&mut clock);
            install_ctrlc(&control)?;

            let mut rng = rng_from_seed(typing.seed);
            let report = run_fields(
                &mut page_state,
                &tasks,
                &config,
                &pacing,
                &control,
                &mut clock,
                &mut rng,
            );

            for field in &report.fields {
                let status = match field.outcome {
                    FieldOutcome::Completed => "done",
                    FieldOutcome::ForcedComplete => "timed out",
                    FieldOutcome::Interrupted => "interrupted",
                    FieldOutcome::Stopped => "stopped",
                    FieldOutcome::Skipped(_) => "skipped",
                };
                eprintln!("  {:<24} {status}", field.label);
            }
            eprintln!(
                "Filled {} of {} fields ({} skipped)",
                report.completed(),
                report.fields.len(),
                report.skipped(),
            );

            if let Some(out) = out {
                write_page(&out, &page_state)?;
            }
        }
    }

    Ok(())
}
