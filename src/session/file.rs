//! Session slot persisted as a JSON document in the data dir.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{SearchSession, SessionError, SessionSlots, SessionStore};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw slots as stored, `None` when the file is missing or unreadable.
    pub fn load_slots(&self) -> Option<SessionSlots> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), "reading session failed: {e}");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(path = %self.path.display(), "ignoring damaged session: {e}"))
            .ok()
    }

    /// Local time of the last save.
    pub fn saved_at(&self) -> Option<DateTime<Local>> {
        let modified = std::fs::metadata(&self.path).ok()?.modified().ok()?;
        Some(DateTime::<Local>::from(modified))
    }

    fn io_err(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<SearchSession> {
        self.load_slots()?.decode()
    }

    fn save(&mut self, session: &SearchSession) -> Result<(), SessionError> {
        let slots = SessionSlots::encode(session)?;
        let body = serde_json::to_string_pretty(&slots)?;

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;

        // Write next to the target so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| self.io_err(e))?;
        tmp.write_all(body.as_bytes()).map_err(|e| self.io_err(e))?;
        tmp.flush().map_err(|e| self.io_err(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_err(e.error))?;

        debug!(
            path = %self.path.display(),
            results = session.results.len(),
            category = %session.selected_category,
            "session_saved"
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}
