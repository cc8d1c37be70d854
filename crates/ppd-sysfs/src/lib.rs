pub mod battery;
pub mod knobs;

pub use battery::BatterySensor;
pub use knobs::SysfsSurface;

use std::path::Path;

/// Read a sysfs attribute as a trimmed string. Absent or unreadable is `None`.
pub(crate) fn read_trimmed(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

/// Read a sysfs attribute as an integer. Absent, unreadable, or non-numeric
/// is `None`.
pub(crate) fn read_u32(path: &Path) -> Option<u32> {
    read_trimmed(path)?.parse().ok()
}
