use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The signed-in user as remembered between application runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Narrow capability surface for session persistence: the current user is
/// loaded once at startup, saved on login and cleared on logout. Callers
/// receive this as an explicit object, never as ambient global state.
pub trait SessionStore {
    fn load(&self) -> Option<StoredUser>;
    fn save(&self, user: &StoredUser) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Session record persisted as JSON in a single well-known file
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's configuration directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lacuna").join("session.json"))
    }
}

impl SessionStore for SessionFile {
    /// A missing or unreadable session is `None`, not an error: the caller
    /// simply starts signed out.
    fn load(&self) -> Option<StoredUser> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!("discarding unreadable session file: {}", err);
                None
            }
        }
    }

    fn save(&self, user: &StoredUser) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(user)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
