use std::path::PathBuf;

use ppd_core::{PowerSample, SensorReader};

use crate::{read_trimmed, read_u32};

/// Default sysfs location of power-supply devices.
pub const DEFAULT_POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Battery names to probe, most common first.
const BATTERY_NAMES: &[&str] = &["BAT0", "BAT1", "BATT"];

/// Battery/AC sensor over `/sys/class/power_supply`.
///
/// Reading is pure and best-effort: an unreadable capacity becomes `None`,
/// and AC detection falls back from the `AC/online` attribute to the battery
/// status string. When nothing at all is readable the machine is assumed to
/// be on AC, so a sensorless host never gets forced into powersave.
#[derive(Debug, Clone)]
pub struct BatterySensor {
    root: PathBuf,
}

impl BatterySensor {
    pub fn new() -> Self {
        Self::with_root(DEFAULT_POWER_SUPPLY_ROOT)
    }

    /// Point the sensor at an alternate power-supply tree (tests).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn battery_dir(&self) -> Option<PathBuf> {
        BATTERY_NAMES
            .iter()
            .map(|name| self.root.join(name))
            .find(|dir| dir.is_dir())
    }

    /// Raw battery status string (`Charging`, `Discharging`, `Full`, ...).
    pub fn status_string(&self) -> Option<String> {
        read_trimmed(&self.battery_dir()?.join("status"))
    }

    fn on_ac(&self) -> bool {
        // Primary: the AC adapter's own online flag.
        if let Some(online) = read_u32(&self.root.join("AC/online")) {
            return online != 0;
        }

        // Fallback: infer from the battery status string.
        match self.status_string() {
            Some(s) => s == "Charging" || s == "Not charging" || s == "Full",
            // Nothing readable: assume AC.
            None => true,
        }
    }
}

impl Default for BatterySensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorReader for BatterySensor {
    fn sample(&mut self) -> PowerSample {
        let battery_percent = self
            .battery_dir()
            .and_then(|dir| read_u32(&dir.join("capacity")))
            .map(|pct| pct.min(100) as u8);

        PowerSample { battery_percent, on_ac: self.on_ac() }
    }
}
