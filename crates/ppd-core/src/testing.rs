//! In-memory fakes for the collaborator traits, usable from any crate's
//! tests. No hardware or filesystem involved.

use anyhow::Result;

use crate::applier::{BrightnessRead, PowerControlSurface, TunerClient, TunerDirection, TunerError};
use crate::sample::{PowerSample, SensorReader};

/// Records knob writes instead of touching sysfs.
#[derive(Debug, Default)]
pub struct MemorySurface {
    pub epp: Option<String>,
    pub turbo: Option<bool>,
    pub platform_profile: Option<String>,

    pub backlight: Option<u32>,
    pub brightness_current: u32,
    pub brightness_writes: u32,

    /// When set, EPP writes fail, for exercising partial-failure paths.
    pub fail_epp: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the fake a backlight with the given current and max raw values.
    pub fn with_brightness(mut self, current: u32, max: u32) -> Self {
        self.backlight = Some(max);
        self.brightness_current = current;
        self
    }
}

impl PowerControlSurface for MemorySurface {
    fn set_energy_preference(&mut self, policy: &str) -> Result<()> {
        if self.fail_epp {
            anyhow::bail!("simulated EPP write failure");
        }
        self.epp = Some(policy.to_string());
        Ok(())
    }

    fn set_turbo_boost(&mut self, enabled: bool) -> Result<()> {
        self.turbo = Some(enabled);
        Ok(())
    }

    fn set_platform_profile(&mut self, profile: &str) -> Result<()> {
        self.platform_profile = Some(profile.to_string());
        Ok(())
    }

    fn brightness(&self) -> Option<BrightnessRead> {
        self.backlight.map(|max| BrightnessRead { current: self.brightness_current, max })
    }

    fn set_raw_brightness(&mut self, value: u32) -> Result<()> {
        self.brightness_current = value;
        self.brightness_writes += 1;
        Ok(())
    }
}

/// Records tuner notifications; optionally fails every call.
#[derive(Debug, Default)]
pub struct MemoryTuner {
    pub calls: Vec<TunerDirection>,
    pub fail: bool,
}

impl MemoryTuner {
    pub fn failing() -> Self {
        Self { calls: Vec::new(), fail: true }
    }
}

impl TunerClient for MemoryTuner {
    fn notify(&mut self, direction: TunerDirection) -> Result<(), TunerError> {
        if self.fail {
            return Err(TunerError::Unavailable);
        }
        self.calls.push(direction);
        Ok(())
    }
}

/// Replays a fixed sequence of samples, then repeats the last one.
#[derive(Debug)]
pub struct ScriptedSensor {
    samples: Vec<PowerSample>,
    next: usize,
}

impl ScriptedSensor {
    pub fn new(samples: Vec<PowerSample>) -> Self {
        Self { samples, next: 0 }
    }
}

impl SensorReader for ScriptedSensor {
    fn sample(&mut self) -> PowerSample {
        let idx = self.next.min(self.samples.len().saturating_sub(1));
        if self.next < self.samples.len() {
            self.next += 1;
        }
        self.samples
            .get(idx)
            .cloned()
            .unwrap_or(PowerSample { battery_percent: None, on_ac: true })
    }
}
