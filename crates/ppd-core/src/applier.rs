use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::TransitionEvent;
use crate::mode::Mode;

/// Current and maximum raw backlight values.
#[derive(Debug, Clone, Copy)]
pub struct BrightnessRead {
    pub current: u32,
    pub max: u32,
}

/// The OS power-control knobs the applier drives.
///
/// One real sysfs-backed implementation lives in `ppd-sysfs`; an in-memory
/// one lives in [`crate::testing`] so the applier and scheduler can be tested
/// without hardware. Every operation is best-effort: a missing control is the
/// implementation's business to log, not an error the applier must handle.
pub trait PowerControlSurface {
    /// Apply an energy-performance-preference policy to every CPU core that
    /// exposes the control.
    fn set_energy_preference(&mut self, policy: &str) -> Result<()>;

    /// Enable or disable turbo boost via whichever of the two mutually
    /// exclusive control surfaces exists.
    fn set_turbo_boost(&mut self, enabled: bool) -> Result<()>;

    /// Write the firmware platform-profile knob. Absence is expected on many
    /// platforms and must not surface as an error.
    fn set_platform_profile(&mut self, profile: &str) -> Result<()>;

    /// Current backlight reading, or `None` when no backlight is present.
    fn brightness(&self) -> Option<BrightnessRead>;

    /// Write a raw backlight value.
    fn set_raw_brightness(&mut self, value: u32) -> Result<()>;
}

/// Which side of the external tuner to switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunerDirection {
    Ac,
    Battery,
}

impl TunerDirection {
    pub fn as_arg(&self) -> &'static str {
        match self {
            TunerDirection::Ac => "ac",
            TunerDirection::Battery => "bat",
        }
    }
}

#[derive(Debug, Error)]
pub enum TunerError {
    #[error("external tuner not installed")]
    Unavailable,
    #[error("external tuner exited with status {0}")]
    ExitStatus(i32),
    #[error("failed to launch external tuner: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Fire-and-forget notification to the external power tuning service.
pub trait TunerClient {
    fn notify(&mut self, direction: TunerDirection) -> Result<(), TunerError>;
}

/// Runs the side effects of a mode transition.
///
/// Invoked only on transition edges; the brightness debounce (by mode
/// identity) is the one piece of memory it keeps between calls.
pub struct EffectApplier<S, T> {
    surface: S,
    tuner: T,
    last_brightness_mode: Option<Mode>,
}

impl<S: PowerControlSurface, T: TunerClient> EffectApplier<S, T> {
    pub fn new(surface: S, tuner: T) -> Self {
        Self { surface, tuner, last_brightness_mode: None }
    }

    /// Apply the effect set for one transition. Individual failures are
    /// logged and never abort the remaining effects.
    pub fn apply(&mut self, event: &TransitionEvent, cfg: &Config) {
        if event.sample.on_ac {
            // Back on AC: hand broader tuning to the external service and
            // restore brightness. CPU knobs are left to the tuner's AC side.
            self.notify_tuner(TunerDirection::Ac);
            self.set_brightness(cfg, Mode::Performance);
            info!(
                "AC connected, switched tuner to AC mode (battery={:?})",
                event.sample.battery_percent
            );
            return;
        }

        match event.to {
            Mode::Powersave => {
                log_knob("epp", self.surface.set_energy_preference("power"));
                log_knob("turbo", self.surface.set_turbo_boost(false));
                log_knob("platform profile", self.surface.set_platform_profile("low-power"));
                self.set_brightness(cfg, Mode::Powersave);
                info!("applied powersave profile (battery={:?})", event.sample.battery_percent);
            }
            Mode::Balanced | Mode::Performance => {
                log_knob("epp", self.surface.set_energy_preference("balance_power"));
                log_knob("turbo", self.surface.set_turbo_boost(true));
                log_knob("platform profile", self.surface.set_platform_profile("balanced"));
                self.notify_tuner(TunerDirection::Battery);
                self.set_brightness(cfg, Mode::Balanced);
                info!(
                    "restored balanced profile (battery={:?} above threshold)",
                    event.sample.battery_percent
                );
            }
        }
    }

    /// Lower the backlight toward `cfg.brightness_for(mode)`.
    ///
    /// No-ops when auto-brightness is off, when no backlight exists, or when
    /// `mode` already drove the last adjustment. Never raises brightness, so
    /// manual dimming by the user is respected.
    pub fn set_brightness(&mut self, cfg: &Config, mode: Mode) {
        if !cfg.auto_brightness {
            return;
        }
        if self.last_brightness_mode == Some(mode) {
            return;
        }
        let Some(read) = self.surface.brightness() else {
            return;
        };
        if read.max == 0 {
            return;
        }

        let percent = cfg.brightness_for(mode);
        let target = read.max * u32::from(percent) / 100;
        if target >= read.current {
            debug!(
                "skipping brightness change: current {} <= target {}",
                read.current, target
            );
            self.last_brightness_mode = Some(mode);
            return;
        }

        match self.surface.set_raw_brightness(target) {
            Ok(()) => {
                info!("reduced brightness to {}% for {} mode", percent, mode);
                self.last_brightness_mode = Some(mode);
            }
            Err(e) => warn!("failed to set brightness: {e:#}"),
        }
    }

    pub fn into_parts(self) -> (S, T) {
        (self.surface, self.tuner)
    }

    fn notify_tuner(&mut self, direction: TunerDirection) {
        if let Err(e) = self.tuner.notify(direction) {
            warn!("external tuner {} switch failed: {e}", direction.as_arg());
        }
    }
}

fn log_knob(what: &str, result: Result<()>) {
    if let Err(e) = result {
        warn!("failed to set {what}: {e:#}");
    }
}
