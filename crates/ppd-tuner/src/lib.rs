//! Client for the external power tuning service (TLP).
//!
//! The daemon only nudges the tuner between its AC and battery sides on
//! transition edges; everything else the tuner does is its own business.

use std::io::ErrorKind;
use std::process::{Command, Stdio};

use tracing::debug;

use ppd_core::{TunerClient, TunerDirection, TunerError};

/// Invokes `tlp ac` / `tlp bat`, output discarded.
#[derive(Debug, Clone)]
pub struct TlpClient {
    program: String,
}

impl TlpClient {
    pub fn new() -> Self {
        Self::with_program("tlp")
    }

    /// Use an alternate binary (tests, nonstandard installs).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for TlpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TunerClient for TlpClient {
    fn notify(&mut self, direction: TunerDirection) -> Result<(), TunerError> {
        let status = Command::new(&self.program)
            .arg(direction.as_arg())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => TunerError::Unavailable,
                _ => TunerError::Spawn(e),
            })?;

        if status.success() {
            debug!("tlp {} succeeded", direction.as_arg());
            Ok(())
        } else {
            Err(TunerError::ExitStatus(status.code().unwrap_or(-1)))
        }
    }
}

/// Whether a systemd unit is currently active. Used by startup checks and
/// `doctor`; any failure to ask counts as "not active".
pub fn service_active(unit: &str) -> bool {
    Command::new("systemctl")
        .args(["is-active", "--quiet", unit])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
