//! Global configuration constants for responder.
//!
//! These are compile-time defaults; runtime configuration is handled via CLI
//! arguments and environment variables in the server's `main.rs`.

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default path of the JSON document holding every question.
pub const DEFAULT_STORAGE_FILE: &str = "questions.json";

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum HTTP request body size in bytes (1 MB).
///
/// Every write rewrites the whole document, so oversized entries are refused
/// at the edge.
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Maximum number of concurrent in-flight requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;
