//! JSON persistence of the application state.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::app::{AppState, Step};
use crate::error::{Error, Result};

/// File name of the persisted state.
const STATE_FILE: &str = "state.json";

/// Reads and writes [`AppState`] as pretty-printed JSON.
///
/// Only committed state is stored. Drag sessions and in-flight callbacks
/// live in memory and never reach disk.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory (`~/.local/share/mailera/state.json` on Linux).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no data directory.
    pub fn in_data_dir() -> Result<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| Error::Config("no data directory on this platform".into()))?;
        Ok(Self::new(dir.join("mailera").join(STATE_FILE)))
    }

    /// Path of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads state, falling back to defaults when no file exists yet.
    ///
    /// A persisted `Callback` step resumes at `Connect`: the redirect that
    /// started it is gone and its code must not be replayed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<AppState> {
        if !tokio::fs::try_exists(&self.path).await? {
            debug!(path = ?self.path, "No saved state, using defaults");
            return Ok(AppState::default());
        }

        let contents = tokio::fs::read_to_string(&self.path).await?;
        let mut state: AppState = serde_json::from_str(&contents)?;
        if state.step == Step::Callback {
            state.step = Step::Connect;
        }
        Ok(state)
    }

    /// Saves state, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, contents)
            .await
            .inspect_err(|e| error!(path = ?self.path, error = %e, "Failed to write state"))?;
        info!(path = ?self.path, "State saved");
        Ok(())
    }

    /// Deletes the state file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
