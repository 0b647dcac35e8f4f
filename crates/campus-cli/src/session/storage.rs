//! Session storage for persisting login state.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use tracing::debug;

use campus_core::error::Error;
use campus_core::{PersistedSession, SessionStorage};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

fn storage_error(action: &str, err: impl std::fmt::Display) -> Error {
    Error::Storage {
        message: format!("{action}: {err}"),
    }
}

/// Keeps the session as `auth.json` in the user's data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/campus/auth.json`.
    pub fn default_location() -> anyhow::Result<Self> {
        let dirs =
            ProjectDirs::from("", "", "campus").context("Could not determine data directory")?;
        Ok(Self::new(dirs.data_dir().join("auth.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> campus_core::Result<Option<PersistedSession>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error("Failed to read session file", e)),
        };
        let session = serde_json::from_str(&json)
            .map_err(|e| storage_error("Invalid session file", e))?;
        Ok(Some(session))
    }

    fn save(&self, session: &PersistedSession) -> campus_core::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| storage_error("Failed to create data directory", e))?;
        }
        let json = serde_json::to_string_pretty(session)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options
            .open(&self.path)
            .map_err(|e| storage_error("Failed to open session file", e))?;

        // A file left by an older run keeps its mode on open
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| storage_error("Failed to restrict session file", e))?;

        file.write_all(json.as_bytes())
            .map_err(|e| storage_error("Failed to write session file", e))?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> campus_core::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("Failed to remove session file", e)),
        }
    }
}
