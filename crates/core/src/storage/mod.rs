//! Storage layer: the port the repository persists through, and its backends.
//!
//! The whole [`Document`] is the unit of both read and write. A backend never
//! sees partial updates; it is handed the full question list on every save.

/// Single JSON file persistence with atomic replace.
pub mod file;
/// Process-local storage for tests and embedding.
pub mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::document::Document;
use crate::error::StoreError;

/// Whole-document load/save port.
pub trait DocumentStorage: Send + Sync {
    /// Reads and decodes the full persisted document.
    fn load(&self) -> Result<Document, StoreError>;

    /// Replaces the persisted document with `document`.
    ///
    /// On error the previously persisted document must remain readable.
    fn save(&self, document: &Document) -> Result<(), StoreError>;
}
