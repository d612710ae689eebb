//! Request and response data transfer objects for the REST API.
//!
//! Questions and answers are returned as the core entity types directly; their
//! serde layout is the wire format.

use responder_core::Draft;
use serde::{Deserialize, Deserializer, Serialize};

/// Request body for `POST /questions` and `POST /questions/:id/answers`.
///
/// Missing, `null`, or non-string fields decode as `None` and are treated as
/// empty, so they fail validation instead of failing body extraction.
#[derive(Debug, Default, Deserialize)]
pub struct DraftRequest {
    #[serde(default, deserialize_with = "text_or_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub summary: Option<String>,
}

impl DraftRequest {
    /// Decodes a JSON body. An empty body or a non-object value is an empty
    /// draft; only syntactically broken JSON is an error.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        match serde_json::from_slice::<serde_json::Value>(bytes)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value),
            _ => Ok(Self::default()),
        }
    }
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl From<DraftRequest> for Draft {
    fn from(req: DraftRequest) -> Self {
        Draft::new(
            req.author.unwrap_or_default(),
            req.summary.unwrap_or_default(),
        )
    }
}

/// Generic message response (e.g., the `GET /` greeting).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub storage_path: String,
}
