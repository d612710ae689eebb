//! Error type shared by the repository and storage backends.

use crate::document::QuestionId;
use std::io;
use std::path::PathBuf;

/// Failure of a store operation.
///
/// Lookups that find nothing are not errors; they return `None`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Author or summary was empty on create.
    #[error("{0}")]
    Validation(&'static str),

    /// An answer was submitted for a question that does not exist.
    #[error("Invalid questionId: {0}")]
    InvalidParent(QuestionId),

    /// The document file could not be read, written, or replaced.
    #[error("document I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document file does not contain a valid question list.
    #[error("document {path:?} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory document could not be encoded.
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures of the underlying storage rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Malformed { .. } | Self::Serialize(_)
        )
    }
}
