//! File system paths for the client.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Session hint filename under the base directory.
const SESSION_HINT_NAME: &str = "session";

/// Manages file system paths for the client.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for client runtime files (~/.hili)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.hili`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".hili"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.hili).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.hili/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the session hint file path (~/.hili/session).
    ///
    /// Holds only the non-authoritative "is logged in" rendering hint,
    /// never a credential.
    pub fn session_hint_file(&self) -> PathBuf {
        self.base_dir.join(SESSION_HINT_NAME)
    }

    /// Get the logs directory (~/.hili/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().expect("Failed to determine home directory")
    }
}
