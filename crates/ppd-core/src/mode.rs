use serde::{Deserialize, Serialize};

/// Power mode the daemon can hold the machine in.
///
/// `Performance` is only reached on the AC-reconnect edge while brightness
/// auto-adjustment is enabled; without it the daemon alternates between
/// `Powersave` and `Balanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Powersave,
    Balanced,
    Performance,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Powersave => "powersave",
            Mode::Balanced => "balanced",
            Mode::Performance => "performance",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "powersave" => Ok(Mode::Powersave),
            "balanced" => Ok(Mode::Balanced),
            "performance" => Ok(Mode::Performance),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
