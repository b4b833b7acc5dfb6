//! A directory-backed store for published, read-only snapshots.
//!
//! Publishing accepts a JSON snapshot body, files it under a random 32-hex-character share id
//! and returns the id with a share URL. Fetching by id renders the numbered preview of the
//! stored outline. Every failure carries the HTTP status an endpoint would answer with, so the
//! store can sit behind any server without re-deciding the error mapping.

use crate::numbering::{number, PreviewRow};
use crate::snapshot::normalize;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::{fs, io};
use tracing::{info, warn};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 512 * 1024;

#[derive(Debug, thiserror::Error)]
/// Reasons a publish or fetch is refused.
pub enum StoreError {
    /// Publishing requires POST.
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    /// The request body is empty.
    #[error("Empty body")]
    EmptyBody,
    /// The request body exceeds [`MAX_BODY_BYTES`].
    #[error("Payload too large")]
    PayloadTooLarge,
    /// The body is not a JSON object or array.
    #[error("Invalid JSON")]
    InvalidJson,
    /// The body has no `tree` array and is not itself an array.
    #[error("Missing tree")]
    MissingTree,
    /// The share id is not 32 lowercase hex characters.
    #[error("Invalid id")]
    InvalidId,
    /// No snapshot is stored under the id.
    #[error("Not found")]
    NotFound,
    /// The stored file is not a JSON object or array.
    #[error("Corrupted data")]
    Corrupted,
    /// The store directory could not be read or written.
    #[error("Storage failed: {0}")]
    Io(#[from] io::Error),
    /// The payload could not be re-encoded.
    #[error("JSON encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    #[must_use]
    /// HTTP status an endpoint should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::EmptyBody | Self::InvalidJson | Self::MissingTree | Self::InvalidId => 400,
            Self::PayloadTooLarge => 413,
            Self::NotFound => 404,
            Self::Corrupted | Self::Io(_) | Self::Encode(_) => 500,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Successful publish response.
pub struct Published {
    /// Always `true` on success.
    pub ok: bool,
    /// Share id: 32 lowercase hex characters.
    pub id: String,
    /// Relative URL of the read-only view.
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Read-only rendering of a published snapshot.
pub struct SharedView {
    /// Share id the snapshot was fetched by.
    pub id: String,
    /// Export time if recorded, else the time it was stored, else empty.
    pub timestamp: String,
    /// Numbered preview rows; empty when the snapshot holds no nodes.
    pub rows: Vec<PreviewRow>,
}

#[derive(Debug, thiserror::Error)]
/// Why publishing a snapshot did not produce a share link.
pub enum PublishError {
    /// The store refused the snapshot.
    #[error("HTTP {status}: {message}")]
    Rejected {
        /// Status the store answered with.
        status: u16,
        /// Human-readable reason.
        message: String,
    },
    /// The store answered, but not with a usable share link.
    #[error("malformed response")]
    MalformedResponse,
    /// The snapshot could not be serialised.
    #[error("JSON encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Destination a session publishes snapshots to.
pub trait SnapshotSink {
    /// Publishes an already-serialised snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination refuses or cannot store the snapshot.
    fn publish(&self, payload: &str) -> Result<Published, PublishError>;
}

#[must_use]
/// Whether `id` has the shape of a share id.
pub fn is_share_id(id: &str) -> bool {
    id.len() == 32 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// 16 random bytes as 32 lowercase hex characters.
fn share_id() -> String {
    uuid::Uuid::from_bytes(rand::random()).simple().to_string()
}

#[derive(Clone, Debug)]
/// Snapshot store keeping one JSON file per share id.
pub struct SnapshotStore {
    dir: PathBuf,
    share_prefix: String,
}

impl SnapshotStore {
    #[must_use]
    /// A store rooted at `dir`, building share URLs as `share_prefix` + id.
    pub fn new(dir: impl Into<PathBuf>, share_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            share_prefix: share_prefix.into(),
        }
    }

    #[must_use]
    /// Directory holding the stored snapshots.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Entry point for a publish request made with `method`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MethodNotAllowed`] for anything but POST, otherwise as
    /// [`SnapshotStore::save`].
    pub fn handle_post(&self, method: &str, body: &[u8]) -> Result<Published, StoreError> {
        if !method.eq_ignore_ascii_case("POST") {
            return Err(StoreError::MethodNotAllowed);
        }
        self.save(body)
    }

    /// Validates a snapshot body and stores it under a fresh share id.
    ///
    /// The stored document is the body plus a `savedAt` timestamp. A bare node array is wrapped
    /// as `{tree: [...]}` so the timestamp has somewhere to live.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is empty, too large, not a JSON object or array, lacks a
    /// `tree` array, or cannot be written.
    pub fn save(&self, body: &[u8]) -> Result<Published, StoreError> {
        if body.is_empty() {
            return Err(StoreError::EmptyBody);
        }
        if body.len() > MAX_BODY_BYTES {
            return Err(StoreError::PayloadTooLarge);
        }
        let data: Value = serde_json::from_slice(body).map_err(|_| StoreError::InvalidJson)?;
        let mut document = match data {
            Value::Object(map) => {
                if !matches!(map.get("tree"), Some(Value::Array(_))) {
                    return Err(StoreError::MissingTree);
                }
                map
            }
            Value::Array(tree) => {
                let mut map = Map::new();
                map.insert("tree".to_string(), Value::Array(tree));
                map
            }
            _ => return Err(StoreError::InvalidJson),
        };
        document.insert(
            "savedAt".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)),
        );

        let id = share_id();
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(&Value::Object(document))?;
        fs::write(self.path_for(&id), json)?;
        info!(%id, "snapshot stored");

        Ok(Published {
            ok: true,
            url: format!("{}{id}", self.share_prefix),
            id,
        })
    }

    /// Loads a published snapshot and renders its numbered preview.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is malformed, nothing is stored under it, or the stored file
    /// is unreadable or corrupt.
    pub fn fetch(&self, id: &str) -> Result<SharedView, StoreError> {
        if !is_share_id(id) {
            return Err(StoreError::InvalidId);
        }
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(StoreError::NotFound);
        }
        let raw = fs::read_to_string(&path)?;
        let data: Value = match serde_json::from_str(&raw) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
            _ => {
                warn!(%id, "stored snapshot is corrupt");
                return Err(StoreError::Corrupted);
            }
        };

        let has_nodes = match &data {
            Value::Array(tree) => !tree.is_empty(),
            _ => matches!(data.get("tree"), Some(Value::Array(tree)) if !tree.is_empty()),
        };
        let rows = if has_nodes {
            normalize(&data).map(|outline| number(&outline)).unwrap_or_default()
        } else {
            Vec::new()
        };
        let timestamp = ["exportedAt", "savedAt"]
            .iter()
            .find_map(|key| data.get(key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();

        Ok(SharedView {
            id: id.to_string(),
            timestamp,
            rows,
        })
    }
}

impl SnapshotSink for SnapshotStore {
    fn publish(&self, payload: &str) -> Result<Published, PublishError> {
        self.handle_post("POST", payload.as_bytes())
            .map_err(|e| PublishError::Rejected {
                status: e.status(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
