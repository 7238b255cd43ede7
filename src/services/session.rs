use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Role;

/// Errors that can occur when persisting the session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Session state restored across application runs: the auth token and the
/// active role. A reload must bring both back without re-prompting login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            token: token.into(),
            role,
            saved_at: Utc::now(),
        }
    }
}

/// File-backed store for the persisted session
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the persisted session, if any
    ///
    /// A missing file means no session. An unreadable or corrupt file is
    /// treated the same way (the user logs in again) rather than failing
    /// startup.
    pub fn load(&self) -> Option<StoredSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(
                    "Ignoring corrupt session file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Persist the session, creating parent directories as needed
    pub fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)?;

        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Remove the persisted session (logout or forced teardown)
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Session cleared at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let mut path = std::env::temp_dir();
        path.push(format!("jobdeck_session_test_{}", name));
        path.push("session.json");
        SessionStore::new(path)
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let store = temp_store("missing");
        let _ = store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = temp_store("round_trip");
        let session = StoredSession::new("tok_abc", Some(Role::Candidate));

        store.save(&session).expect("save failed");
        let restored = store.load().expect("expected a session");

        assert_eq!(restored.token, "tok_abc");
        assert_eq!(restored.role, Some(Role::Candidate));

        store.clear().expect("clear failed");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_file_treated_as_absent() {
        let store = temp_store("corrupt");
        if let Some(parent) = store.path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&store.path, "{not json").unwrap();

        assert!(store.load().is_none());
        store.clear().unwrap();
    }
}
