use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::mode::Mode;

/// System-wide config file location.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/power-profiled.conf";

pub const DEFAULT_THRESHOLD: u8 = 30;
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_BRIGHTNESS_POWERSAVE: u8 = 60;
pub const DEFAULT_BRIGHTNESS_BALANCED: u8 = 80;
pub const DEFAULT_BRIGHTNESS_PERFORMANCE: u8 = 100;

/// Daemon configuration, loaded once at startup.
///
/// Parsing is never fatal: a malformed or out-of-range field falls back to
/// its default, a missing file yields `Config::default()`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Battery percentage at or below which powersave is enforced (1-99).
    pub threshold_percent: u8,
    /// Poll cadence (1-600 seconds).
    pub poll_interval: Duration,
    /// Whether the daemon may lower screen brightness on transitions.
    pub auto_brightness: bool,
    pub brightness_powersave: u8,
    pub brightness_balanced: u8,
    pub brightness_performance: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD,
            poll_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            auto_brightness: false,
            brightness_powersave: DEFAULT_BRIGHTNESS_POWERSAVE,
            brightness_balanced: DEFAULT_BRIGHTNESS_BALANCED,
            brightness_performance: DEFAULT_BRIGHTNESS_PERFORMANCE,
        }
    }
}

impl Config {
    /// Load from a `KEY=value` config file. A missing file is not an error.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let cfg = Self::parse(&text);
                info!(
                    "configuration loaded: threshold={}%, interval={}s, auto_brightness={}",
                    cfg.threshold_percent,
                    cfg.poll_interval.as_secs(),
                    cfg.auto_brightness
                );
                cfg
            }
            Err(_) => {
                info!(
                    "no config file at {}, using defaults (threshold={}%, interval={}s)",
                    path.display(),
                    DEFAULT_THRESHOLD,
                    DEFAULT_INTERVAL_SECS
                );
                Self::default()
            }
        }
    }

    /// Parse `KEY=value` lines. Comments (`#`) and blank lines are skipped,
    /// unknown keys ignored.
    pub fn parse(text: &str) -> Self {
        let mut cfg = Self::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                warn!("skipping malformed config line: {:?}", line);
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "THRESHOLD" => {
                    cfg.threshold_percent =
                        parse_ranged(key, value, 1, 99, DEFAULT_THRESHOLD);
                }
                "INTERVAL" => {
                    let secs = parse_ranged(key, value, 1u64, 600, DEFAULT_INTERVAL_SECS);
                    cfg.poll_interval = Duration::from_secs(secs);
                }
                "AUTO_BRIGHTNESS" => {
                    cfg.auto_brightness = match value.parse::<i64>() {
                        Ok(n) => n != 0,
                        Err(_) => {
                            warn!("AUTO_BRIGHTNESS={:?} not numeric, keeping default", value);
                            cfg.auto_brightness
                        }
                    };
                }
                "BRIGHTNESS_POWERSAVE" => {
                    cfg.brightness_powersave =
                        parse_ranged(key, value, 1, 100, DEFAULT_BRIGHTNESS_POWERSAVE);
                }
                "BRIGHTNESS_BALANCED" => {
                    cfg.brightness_balanced =
                        parse_ranged(key, value, 1, 100, DEFAULT_BRIGHTNESS_BALANCED);
                }
                "BRIGHTNESS_PERFORMANCE" => {
                    cfg.brightness_performance =
                        parse_ranged(key, value, 1, 100, DEFAULT_BRIGHTNESS_PERFORMANCE);
                }
                _ => {}
            }
        }

        cfg
    }

    /// Brightness target for a mode, as a percentage of max brightness.
    pub fn brightness_for(&self, mode: Mode) -> u8 {
        match mode {
            Mode::Powersave => self.brightness_powersave,
            Mode::Balanced => self.brightness_balanced,
            Mode::Performance => self.brightness_performance,
        }
    }
}

fn parse_ranged<T>(key: &str, value: &str, min: T, max: T, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Copy + std::fmt::Display,
{
    match value.parse::<T>() {
        Ok(n) if n >= min && n <= max => n,
        Ok(n) => {
            warn!("{}={} out of range ({}..={}), using default {}", key, n, min, max, default);
            default
        }
        Err(_) => {
            warn!("{}={:?} not numeric, using default {}", key, value, default);
            default
        }
    }
}
