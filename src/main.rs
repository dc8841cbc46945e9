//! `paddock`: run horse races in the terminal.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;

use paddock::app::{self, TOO_FEW_HORSES};
use paddock::race::REQUIRED_LANES;
use paddock::{Config, Finish, HorseSpec};

#[derive(Parser)]
#[command(name = "paddock", version, about = "A three-lane horse race simulator")]
struct Cli {
    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Race length in units [default: 20]
    #[arg(long, value_name = "N")]
    length: Option<u32>,

    /// Seed for reproducible races
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Pause between race ticks in milliseconds [default: 100]
    #[arg(long = "tick-ms", value_name = "MS")]
    tick_ms: Option<u64>,

    /// Enter a horse; repeat for more. Replaces the configured roster.
    #[arg(long = "horse", value_name = "NAME,SYMBOL,CONFIDENCE")]
    horses: Vec<HorseSpec>,

    /// Run a single race on stdout without the interactive UI
    #[arg(long)]
    headless: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Load the config file (if any) and apply command-line overrides.
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("could not load {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(length) = self.length {
            config.race.length = length;
        }
        if let Some(seed) = self.seed {
            config.race.seed = Some(seed);
        }
        if let Some(tick_ms) = self.tick_ms {
            config.race.tick_interval_ms = tick_ms;
        }
        if !self.horses.is_empty() {
            config.roster = self.horses.iter().map(|spec| spec.0.clone()).collect();
        }

        config.validate().context("invalid settings")?;
        Ok(config)
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    // stderr output would corrupt the alternate screen.
    let default_filter = if cli.headless || cli.log_file.is_some() {
        "info"
    } else {
        "off"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    builder.format_timestamp_micros();

    if let Some(path) = &cli.log_file {
        let log_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("could not open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(())
}

fn run_headless(config: &Config) -> anyhow::Result<()> {
    if config.roster.len() < REQUIRED_LANES {
        bail!(TOO_FEW_HORSES);
    }

    let stdout = io::stdout();
    let (outcome, horses) = app::run_headless(config, stdout.lock()).context("race failed")?;

    let mut out = stdout.lock();
    writeln!(out)?;
    match &outcome.finish {
        Finish::Winner { .. } => {}
        Finish::AllFallen => writeln!(out, "Every horse fell. There is no winner.")?,
        Finish::Stalled => writeln!(out, "No standing horse can move. The race was called off.")?,
    }
    writeln!(out, "Race over after {} ticks.", outcome.ticks)?;
    for (lane, horse) in &horses {
        writeln!(out, "  lane {lane}: {horse}")?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = cli.resolve_config()?;

    info!(
        "Starting paddock: length {}, {} horse(s), seed {:?}",
        config.race.length,
        config.roster.len(),
        config.race.seed
    );

    if cli.headless {
        run_headless(&config)
    } else {
        app::run(config).context("terminal UI failed")
    }
}
