//! Host capability report: which sensors and knobs this machine exposes.

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use ppd_core::{Config, SensorReader, StateStore};
use ppd_sysfs::{BatterySensor, SysfsSurface};

pub fn run(cfg: &Config, state_path: &Path) -> Result<()> {
    info!("doctor: starting");

    let mut sensor = BatterySensor::new();
    let sample = sensor.sample();
    match sample.battery_percent {
        Some(pct) => info!("doctor: battery readable ({pct}%), on_ac={}", sample.on_ac),
        None => warn!("doctor: no readable battery; decisions will fail open to AC/balanced"),
    }

    let surface = SysfsSurface::new();
    match surface.current_epp() {
        Some(epp) => info!("doctor: EPP control present (cpu0 currently {epp})"),
        None => warn!("doctor: no EPP control on cpu0"),
    }
    match surface.current_turbo() {
        Some(enabled) => info!("doctor: turbo boost control present (currently {enabled})"),
        None => warn!("doctor: no turbo boost control found"),
    }
    match surface.current_platform_profile() {
        Some(profile) => info!("doctor: platform profile present (currently {profile})"),
        None => info!("doctor: platform profile not available (common; not an error)"),
    }
    if surface.has_backlight() {
        info!("doctor: backlight device found (auto_brightness={})", cfg.auto_brightness);
    } else if cfg.auto_brightness {
        warn!("doctor: auto_brightness enabled but no backlight device found");
    }

    if ppd_tuner::service_active("tlp") {
        info!("doctor: TLP service active");
    } else {
        warn!("doctor: TLP service not active; AC/battery tuning will be sysfs-only");
    }

    // Probe the marker location so permission problems show up here and not
    // as warnings on the first transition.
    let store = StateStore::new(state_path);
    let persisted = store.read();
    info!("doctor: state marker at {} (currently {:?})", state_path.display(), persisted);
    if let Some(parent) = state_path.parent() {
        if !parent.is_dir() {
            warn!("doctor: state directory {} does not exist", parent.display());
        }
    }

    info!("doctor: OK");
    Ok(())
}
