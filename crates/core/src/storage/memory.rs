//! In-memory document storage.

use crate::document::Document;
use crate::error::StoreError;
use crate::storage::DocumentStorage;
use parking_lot::RwLock;
use std::sync::Arc;

/// A [`DocumentStorage`] holding the document in process memory.
///
/// Clones share the same document, so a test can keep a handle to inspect
/// what the repository wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    document: Arc<RwLock<Document>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with `document`.
    pub fn with_document(document: Document) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
        }
    }

    /// Copy of the currently stored document.
    pub fn snapshot(&self) -> Document {
        self.document.read().clone()
    }
}

impl DocumentStorage for MemoryStorage {
    fn load(&self) -> Result<Document, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        *self.document.write() = document.clone();
        Ok(())
    }
}
