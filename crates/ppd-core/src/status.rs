use serde::Serialize;

/// Read-only view of the daemon's world, assembled by the status tool.
///
/// Every field is best-effort; `None` renders as `N/A`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub battery_percent: Option<u8>,
    /// Raw power-supply status string (`Charging`, `Discharging`, ...).
    pub power_status: String,
    /// Persisted mode token, or `inactive` when no marker exists.
    pub active_profile: String,
    pub epp: Option<String>,
    pub turbo_boost: Option<bool>,
    pub platform_profile: Option<String>,
}

impl StatusSnapshot {
    /// Human-readable rendering, one knob per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Power Profile Manager Status\n");
        out.push_str("=============================\n");

        match self.battery_percent {
            Some(pct) => out.push_str(&format!("Battery:          {pct}%\n")),
            None => out.push_str("Battery:          N/A\n"),
        }
        out.push_str(&format!("Power Status:     {}\n", self.power_status));
        out.push_str(&format!("Active Profile:   {}\n", self.active_profile));

        out.push_str("\nCPU Settings:\n");
        out.push_str(&format!(
            "  EPP:            {}\n",
            self.epp.as_deref().unwrap_or("N/A")
        ));
        match self.turbo_boost {
            Some(true) => out.push_str("  Turbo Boost:    enabled\n"),
            Some(false) => out.push_str("  Turbo Boost:    disabled\n"),
            None => out.push_str("  Turbo Boost:    N/A\n"),
        }
        out.push_str(&format!(
            "  Platform:       {}\n",
            self.platform_profile.as_deref().unwrap_or("N/A")
        ));

        out
    }
}
