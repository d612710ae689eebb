//! JSON file persistence for the question document.
//!
//! The document is stored as one JSON array. Writes serialize the full array
//! to a temp file next to the target and rename it into place, so a crash or
//! failed write leaves the previous document intact.

use crate::document::Document;
use crate::error::StoreError;
use crate::storage::DocumentStorage;
use std::fs;
use std::path::{Path, PathBuf};

/// A [`DocumentStorage`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty document file (and its parent directories) if none exists.
    ///
    /// Returns `true` when a new file was written.
    pub fn ensure_exists(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        self.save(&Document::new())?;
        tracing::info!("Initialized empty document at {:?}", self.path);
        Ok(true)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DocumentStorage for JsonFileStorage {
    fn load(&self) -> Result<Document, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!("Document {:?} failed to parse: {}", self.path, e);
            StoreError::Malformed {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(document).map_err(StoreError::Serialize)?;
        let tmp_path = self.tmp_path();

        // Atomic write: write to temp, then rename
        fs::write(&tmp_path, &bytes).map_err(|e| StoreError::io(&tmp_path, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))
                .map_err(|e| StoreError::io(&tmp_path, e))?;
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(&self.path, e));
        }

        tracing::debug!(
            "Saved document {:?} ({} questions, {} bytes)",
            self.path,
            document.len(),
            bytes.len()
        );
        Ok(())
    }
}
