mod doctor;
mod scheduler;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ppd_core::config::DEFAULT_CONFIG_FILE;
use ppd_core::state::DEFAULT_STATE_FILE;
use ppd_core::{Config, EffectApplier, StateStore};
use ppd_sysfs::{BatterySensor, SysfsSurface};
use ppd_tuner::TlpClient;

#[derive(Debug, Parser)]
#[command(name = "power-profiled", version, about = "Battery-aware power profile daemon (works alongside TLP)")]
struct Cli {
    /// Config file (KEY=value lines).
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// State marker file.
    #[arg(long, default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the polling loop until SIGTERM/SIGINT.
    Run,
    /// Report which power controls this host exposes.
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config);

    match cli.cmd {
        Command::Run => run(cfg, cli.state_file).await,
        Command::Doctor => doctor::run(&cfg, &cli.state_file),
    }
}

async fn run(cfg: Config, state_file: PathBuf) -> Result<()> {
    info!("power profile daemon started");

    if !ppd_tuner::service_active("tlp") {
        // Not fatal: our own sysfs knobs keep working without TLP.
        warn!("TLP service is not active; continuing with sysfs controls only");
    }

    let sensor = BatterySensor::new();
    let surface = SysfsSurface::new();
    if cfg.auto_brightness && !surface.has_backlight() {
        warn!("auto_brightness enabled but no backlight device found");
    }
    let applier = EffectApplier::new(surface, TlpClient::new());
    let store = StateStore::new(state_file);

    let shutdown = CancellationToken::new();
    spawn_signal_listener(shutdown.clone())?;

    scheduler::run_loop(sensor, applier, store, cfg, shutdown).await;

    info!("power profile daemon stopped");
    Ok(())
}

/// Cancel the token on SIGTERM or SIGINT. The loop finishes its in-flight
/// tick and exits.
fn spawn_signal_listener(shutdown: CancellationToken) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate()).context("install SIGTERM handler")?;
    let mut int = signal(SignalKind::interrupt()).context("install SIGINT handler")?;

    tokio::spawn(async move {
        tokio::select! {
            _ = term.recv() => info!("received SIGTERM, shutting down"),
            _ = int.recv() => info!("received SIGINT, shutting down"),
        }
        shutdown.cancel();
    });
    Ok(())
}
