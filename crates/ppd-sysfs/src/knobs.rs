use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use ppd_core::{BrightnessRead, PowerControlSurface};

use crate::{read_trimmed, read_u32};

pub const DEFAULT_CPU_ROOT: &str = "/sys/devices/system/cpu";
pub const DEFAULT_PLATFORM_PROFILE: &str = "/sys/firmware/acpi/platform_profile";
pub const DEFAULT_BACKLIGHT_ROOT: &str = "/sys/class/backlight";

/// Real power-control surface over sysfs.
///
/// All roots are injectable so the whole surface can be exercised against a
/// temp directory. The backlight device is discovered once at construction:
/// the first entry under the backlight root that exposes `max_brightness`.
#[derive(Debug)]
pub struct SysfsSurface {
    cpu_root: PathBuf,
    platform_profile: PathBuf,
    backlight: Option<PathBuf>,
}

impl SysfsSurface {
    pub fn new() -> Self {
        Self::with_roots(DEFAULT_CPU_ROOT, DEFAULT_PLATFORM_PROFILE, DEFAULT_BACKLIGHT_ROOT)
    }

    pub fn with_roots(
        cpu_root: impl Into<PathBuf>,
        platform_profile: impl Into<PathBuf>,
        backlight_root: impl Into<PathBuf>,
    ) -> Self {
        let backlight = discover_backlight(&backlight_root.into());
        Self { cpu_root: cpu_root.into(), platform_profile: platform_profile.into(), backlight }
    }

    fn no_turbo_path(&self) -> PathBuf {
        self.cpu_root.join("intel_pstate/no_turbo")
    }

    fn boost_path(&self) -> PathBuf {
        self.cpu_root.join("cpufreq/boost")
    }

    /// EPP policy currently active on cpu0, for status display.
    pub fn current_epp(&self) -> Option<String> {
        read_trimmed(&self.cpu_root.join("cpu0/cpufreq/energy_performance_preference"))
    }

    /// Resolved turbo-boost state, accounting for the inverted Intel control.
    pub fn current_turbo(&self) -> Option<bool> {
        if let Some(no_turbo) = read_u32(&self.no_turbo_path()) {
            return Some(no_turbo == 0);
        }
        read_u32(&self.boost_path()).map(|boost| boost != 0)
    }

    /// Active firmware platform profile, for status display.
    pub fn current_platform_profile(&self) -> Option<String> {
        read_trimmed(&self.platform_profile)
    }

    /// Whether any backlight device was found.
    pub fn has_backlight(&self) -> bool {
        self.backlight.is_some()
    }

    /// Paths of the per-core EPP controls currently present.
    fn epp_paths(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.cpu_root) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .filter(|e| is_cpu_dir(&e.file_name().to_string_lossy()))
            .map(|e| e.path().join("cpufreq/energy_performance_preference"))
            .filter(|p| p.exists())
            .collect();
        paths.sort();
        paths
    }
}

impl Default for SysfsSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerControlSurface for SysfsSurface {
    fn set_energy_preference(&mut self, policy: &str) -> Result<()> {
        let paths = self.epp_paths();
        if paths.is_empty() {
            warn!("no EPP controls found under {}", self.cpu_root.display());
            return Ok(());
        }
        for path in &paths {
            if let Err(e) = std::fs::write(path, policy) {
                // Some cores may reject the write; keep going.
                warn!("failed to write {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    fn set_turbo_boost(&mut self, enabled: bool) -> Result<()> {
        let no_turbo = self.no_turbo_path();
        if no_turbo.exists() {
            // Intel surface, inverted logic: 1 = turbo disabled.
            let value = if enabled { "0" } else { "1" };
            return std::fs::write(&no_turbo, value)
                .with_context(|| format!("write {}", no_turbo.display()));
        }

        let boost = self.boost_path();
        if boost.exists() {
            let value = if enabled { "1" } else { "0" };
            return std::fs::write(&boost, value)
                .with_context(|| format!("write {}", boost.display()));
        }

        warn!("no turbo boost control found");
        Ok(())
    }

    fn set_platform_profile(&mut self, profile: &str) -> Result<()> {
        if !self.platform_profile.exists() {
            // Expected on many platforms.
            debug!("platform profile not available");
            return Ok(());
        }
        std::fs::write(&self.platform_profile, profile)
            .with_context(|| format!("write {}", self.platform_profile.display()))
    }

    fn brightness(&self) -> Option<BrightnessRead> {
        let dir = self.backlight.as_ref()?;
        let current = read_u32(&dir.join("brightness"))?;
        let max = read_u32(&dir.join("max_brightness"))?;
        Some(BrightnessRead { current, max })
    }

    fn set_raw_brightness(&mut self, value: u32) -> Result<()> {
        let dir = self.backlight.as_ref().context("no backlight device")?;
        let path = dir.join("brightness");
        std::fs::write(&path, value.to_string())
            .with_context(|| format!("write {}", path.display()))
    }
}

fn is_cpu_dir(name: &str) -> bool {
    name.strip_prefix("cpu")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn discover_backlight(root: &Path) -> Option<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.join("max_brightness").exists())
        .collect();
    dirs.sort();
    dirs.into_iter().next()
}
