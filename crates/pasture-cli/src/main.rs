//! Headless runner for Pasture simulations.
//!
//! Loads a TOML world description, steps the model for a fixed number of
//! ticks and logs the population after each one. With `--render-every`
//! the grid is printed as a text matrix (`W` wolf, `s` sick sheep, `S`
//! healthy sheep, `"` grass, `.` bare ground). With `--background` the
//! model runs on the tick thread and this process only consumes updates.

mod settings;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pasture_engine::{GridSnapshot, Model, Runner, RunnerConfig, StopReason, TickReport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pasture-cli",
    version,
    about = "Run a predator-prey-grass simulation and log its populations"
)]
struct Cli {
    /// World description (TOML). Keys can be overridden with PASTURE__* variables.
    #[arg(long, env = "PASTURE_CONFIG")]
    config: PathBuf,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// Override the seed from the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the grid every N ticks.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    render_every: Option<u64>,

    /// Step the model on a background thread.
    #[arg(long)]
    background: bool,

    /// Minimum wall-clock milliseconds per tick in background mode.
    #[arg(long, default_value_t = 0)]
    tick_interval_ms: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let mut config = settings::load(&cli.config)?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    info!(
        config = %cli.config.display(),
        seed = config.seed,
        ticks = cli.ticks,
        background = cli.background,
        "configuration loaded"
    );
    let model = Model::new(config).context("invalid simulation configuration")?;

    let model = if cli.background {
        run_background(model, &cli)?
    } else {
        run_inline(model, &cli)?
    };

    let counts = model.counts();
    info!(
        tick = %model.tick(),
        sheep = counts.sheep,
        wolves = counts.wolves,
        grass = counts.grass,
        sick_sheep = ?counts.sick_sheep,
        "simulation finished"
    );
    Ok(())
}

fn run_inline(mut model: Model, cli: &Cli) -> Result<Model> {
    model.set_running(true);
    for _ in 0..cli.ticks {
        if !model.is_running() {
            break;
        }
        let report = model
            .step()
            .with_context(|| format!("tick {} failed", model.tick()))?;
        log_report(&report);
        if should_render(cli, report.tick.0) {
            print_grid(&report, &model.snapshot());
        }
        let counts = model.counts();
        if counts.sheep == 0 && counts.wolves == 0 {
            warn!(tick = %report.tick, "both populations extinct");
            model.set_running(false);
        }
    }
    model.set_running(false);
    Ok(model)
}

fn run_background(model: Model, cli: &Cli) -> Result<Model> {
    let handle = Runner::spawn(
        model,
        RunnerConfig {
            tick_interval: Duration::from_millis(cli.tick_interval_ms),
            max_ticks: Some(cli.ticks),
        },
    )?;
    for update in handle.updates().iter() {
        log_report(&update.report);
        if should_render(cli, update.report.tick.0) {
            print_grid(&update.report, &update.snapshot);
        }
    }
    let outcome = handle.join()?;
    match outcome.reason {
        StopReason::Failed(err) => Err(err).context("background run failed"),
        reason => {
            info!(?reason, "background run ended");
            Ok(outcome.model)
        }
    }
}

fn log_report(report: &TickReport) {
    let counts = &report.counts;
    info!(
        tick = %report.tick,
        sheep = counts.sheep,
        wolves = counts.wolves,
        grass = counts.grass,
        sick_sheep = ?counts.sick_sheep,
        births = report.births,
        deaths = report.deaths,
        "tick"
    );
}

fn should_render(cli: &Cli, tick: u64) -> bool {
    cli.render_every.is_some_and(|every| tick % every == 0)
}

fn print_grid(report: &TickReport, snapshot: &GridSnapshot) {
    println!("tick {}", report.tick);
    println!("{snapshot}");
}
