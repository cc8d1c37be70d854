//! Read-only status tool for the power profile daemon. Everything here is
//! best-effort display; it never writes a knob or the state marker.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ppd_core::config::DEFAULT_CONFIG_FILE;
use ppd_core::state::DEFAULT_STATE_FILE;
use ppd_core::{SensorReader, StateStore, StatusSnapshot};
use ppd_sysfs::{BatterySensor, SysfsSurface};

#[derive(Debug, Parser)]
#[command(name = "power-profilectl", version, about = "Show power profile daemon status")]
struct Cli {
    /// Config file (KEY=value lines).
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// State marker file maintained by the daemon.
    #[arg(long, default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show current status (default).
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Redraw status every 2 seconds until interrupted.
    Monitor,
    /// Dump the active configuration file.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd.unwrap_or(Command::Status { json: false }) {
        Command::Status { json } => status(&cli.state_file, json),
        Command::Monitor => monitor(&cli.state_file),
        Command::Config => show_config(&cli.config),
    }
}

fn snapshot(state_file: &Path) -> StatusSnapshot {
    let mut sensor = BatterySensor::new();
    let surface = SysfsSurface::new();
    let store = StateStore::new(state_file);

    let sample = sensor.sample();
    StatusSnapshot {
        battery_percent: sample.battery_percent,
        power_status: sensor.status_string().unwrap_or_else(|| "unknown".to_string()),
        active_profile: store
            .read()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "inactive".to_string()),
        epp: surface.current_epp(),
        turbo_boost: surface.current_turbo(),
        platform_profile: surface.current_platform_profile(),
    }
}

fn status(state_file: &Path, json: bool) -> Result<()> {
    let snap = snapshot(state_file);
    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
    } else {
        print!("{}", snap.render());
    }
    Ok(())
}

fn monitor(state_file: &Path) -> Result<()> {
    println!("Monitoring power profile (Ctrl+C to stop)...\n");
    loop {
        // ANSI clear screen + home.
        print!("\x1b[2J\x1b[H");
        print!("{}", snapshot(state_file).render());
        std::thread::sleep(Duration::from_secs(2));
    }
}

fn show_config(path: &Path) -> Result<()> {
    let Ok(text) = std::fs::read_to_string(path) else {
        println!("No configuration file found at {}", path.display());
        return Ok(());
    };

    println!("Configuration ({}):", path.display());
    println!("===================================");
    for line in text.lines() {
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') {
            println!("{line}");
        }
    }
    Ok(())
}
