use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::mode::Mode;

/// Where the daemon keeps the marker on a real system.
pub const DEFAULT_STATE_FILE: &str = "/var/run/power-profile-state";

/// Durable marker for the last applied mode.
///
/// Backed by a single one-line file outside process memory so it survives
/// daemon restarts. The daemon is the only writer; the status tool only
/// reads. An absent or unrecognized token means "no special mode applied"
/// (the implicit balanced baseline).
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the persisted mode. Missing or corrupt records are `None`,
    /// never an error.
    pub fn read(&self) -> Option<Mode> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        match text.trim().parse::<Mode>() {
            Ok(mode) => Some(mode),
            Err(()) => {
                debug!("unrecognized state token in {}, treating as absent", self.path.display());
                None
            }
        }
    }

    pub fn write(&self, mode: Mode) -> Result<()> {
        std::fs::write(&self.path, mode.as_str())
            .with_context(|| format!("write state file {}", self.path.display()))
    }

    /// Remove the marker. Already-absent is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("remove state file {}", self.path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> StateStore {
        StateStore::new(dir.path().join("power-profile-state"))
    }

    #[test]
    fn read_absent_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).read(), None);
    }

    #[test]
    fn write_then_read_roundtrips() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.write(Mode::Powersave).unwrap();
        assert_eq!(s.read(), Some(Mode::Powersave));
    }

    #[test]
    fn clear_removes_marker_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.write(Mode::Powersave).unwrap();
        s.clear().unwrap();
        assert_eq!(s.read(), None);
        s.clear().unwrap();
    }

    #[test]
    fn unrecognized_token_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("power-profile-state");
        std::fs::write(&path, "turbo-ludicrous\n").unwrap();
        assert_eq!(StateStore::new(path).read(), None);
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("power-profile-state");
        std::fs::write(&path, "powersave\n").unwrap();
        assert_eq!(StateStore::new(path).read(), Some(Mode::Powersave));
    }
}
