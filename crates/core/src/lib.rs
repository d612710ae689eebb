//! # responder-core
//!
//! Question/answer store persisted as a single JSON document. Every operation
//! reads the whole document, and every mutation rewrites it in full.
//!
//! This is the core library crate with zero async dependencies; the HTTP
//! gateway lives in `responder-server`.

/// Global configuration constants: defaults and limits.
pub mod config;
/// Entity types: `Question`, `Answer`, `Draft`, and their identifiers.
pub mod document;
/// Store error type.
pub mod error;
/// `QuestionRepository`: create/read operations over the document.
pub mod repository;
/// Storage port and its file and in-memory backends.
pub mod storage;

pub use document::{Answer, AnswerId, Document, Draft, Question, QuestionId};
pub use error::StoreError;
pub use repository::QuestionRepository;
