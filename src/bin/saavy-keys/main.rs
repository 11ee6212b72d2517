//! saavy-keys - play a polyphonic keyboard in the terminal with the mouse
//!
//! Run with: cargo run --bin saavy-keys
//! Hold the left button and drag across the keys for legato.

mod app;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use saavy_keys::{PitchTable, WaveformKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "saavy-keys", version, about = "A mouse-played polyphonic keyboard")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the keyboard (default)
    Play(PlayArgs),
    /// Print the pitch table and exit
    Table(RangeArgs),
}

#[derive(Args, Debug, Clone)]
struct RangeArgs {
    /// Lowest octave with playable keys
    #[arg(long, default_value_t = 3)]
    low_octave: u8,

    /// Highest octave with playable keys
    #[arg(long, default_value_t = 5)]
    high_octave: u8,
}

#[derive(Args, Debug, Clone)]
struct PlayArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// Initial waveform: sine, square, sawtooth, triangle or custom
    #[arg(short, long, default_value = "sine")]
    waveform: WaveformKind,

    /// Initial master gain (0.0 - 1.0)
    #[arg(short, long, default_value_t = saavy_keys::tone::DEFAULT_GAIN)]
    gain: f32,

    /// Maximum simultaneous voices
    #[arg(long, default_value_t = 32)]
    voices: usize,

    /// Sine coefficients for the custom waveform, index 0 is DC
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    custom_sine: Vec<f32>,

    /// Cosine coefficients for the custom waveform (defaults to zeros)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    custom_cosine: Vec<f32>,

    /// Write logs here (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl RangeArgs {
    fn table(&self) -> EyreResult<PitchTable> {
        PitchTable::build(self.low_octave..=self.high_octave).wrap_err("invalid octave range")
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Table(range)) => {
            init_tracing(None)?;
            print_table(&range.table()?);
            Ok(())
        }
        Some(Command::Play(args)) => play(args),
        None => play(cli.play),
    }
}

fn play(args: PlayArgs) -> EyreResult<()> {
    if let Some(path) = &args.log_file {
        init_tracing(Some(path))?;
    }
    app::run(args)
}

/// Install the global subscriber. `None` logs to stderr.
fn init_tracing(log_file: Option<&Path>) -> EyreResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn print_table(table: &PitchTable) {
    for slot in table.octaves() {
        if slot.keys.is_empty() {
            println!("octave {}: (reserved)", slot.octave);
            continue;
        }
        println!("octave {}:", slot.octave);
        for note in saavy_keys::NoteName::ALL {
            let key = saavy_keys::KeyId::new(slot.octave, note);
            if let Ok(hz) = table.frequency(key) {
                let marker = if note.is_natural() { "" } else { "  (unmapped)" };
                println!("  {:<4} {:>10.3} Hz{}", key.to_string(), hz, marker);
            }
        }
    }
    tracing::info!(
        low = *table.populated().start(),
        high = *table.populated().end(),
        "pitch table printed"
    );
}
