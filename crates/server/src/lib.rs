//! responder-server — HTTP gateway for the responder question store.
//!
//! Translates routes and JSON bodies into `QuestionRepository` calls and maps
//! results to status codes. Store logic lives in `responder-core`.

/// REST API layer: Axum router, HTTP handlers, models, errors, metrics.
pub mod api;
