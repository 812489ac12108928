use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub user_id: String,
    pub saved_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            saved_at: Utc::now(),
        }
    }
}

/// Keeps the backend session cookie on disk between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<data_dir>/draftdesk/session.json`
    pub fn default_location() -> Option<Self> {
        crate::config::data_dir().map(|dir| Self::new(dir.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(session).context("Failed to encode session")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove session file: {}", self.path.display())),
        }
    }
}
