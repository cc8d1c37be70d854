use serde::{Deserialize, Serialize};

/// Snapshot of the machine's power inputs, produced fresh on every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerSample {
    /// Battery charge percentage (0-100), or `None` if unreadable.
    pub battery_percent: Option<u8>,
    /// Whether the machine is drawing from AC.
    pub on_ac: bool,
}

/// Source of `PowerSample`s. Pure query; reading must never mutate the host.
pub trait SensorReader {
    fn sample(&mut self) -> PowerSample;
}
