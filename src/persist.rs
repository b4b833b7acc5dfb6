//! Local persistence of the working outline.
//!
//! The outline is saved as a bare node array after every change and read back on start-up.
//! Persistence is best effort: the in-memory outline stays authoritative for the session even
//! when a save fails.

use std::path::{Path, PathBuf};
use std::{fs, io};

#[derive(Debug, thiserror::Error)]
/// Failure to read or write the saved outline.
pub enum PersistError {
    /// The backing store could not be accessed.
    #[error("storage error: {0}")]
    Io(#[from] io::Error),
    /// The outline could not be serialised.
    #[error("serialisation error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value slot holding the serialised outline.
pub trait Persister {
    /// Replaces the saved payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be written.
    fn save(&mut self, payload: &str) -> Result<(), PersistError>;

    /// Returns the saved payload, or `None` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> Result<Option<String>, PersistError>;

    /// Forgets the saved payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload exists but cannot be removed.
    fn clear(&mut self) -> Result<(), PersistError>;
}

#[derive(Clone, Debug)]
/// Persists the outline as a JSON file on disk.
pub struct FilePersister {
    path: PathBuf,
}

impl FilePersister {
    #[must_use]
    /// A persister writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    /// File backing this persister.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persister for FilePersister {
    fn save(&mut self, payload: &str) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, payload)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "tests/persist.rs"]
mod tests;
