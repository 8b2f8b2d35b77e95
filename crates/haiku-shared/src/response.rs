//! Error body returned by every failing endpoint.

use serde::{Deserialize, Serialize};

/// Short human-readable error, optionally with upstream detail.
///
/// ```json
/// { "error": "Failed to generate haiku", "details": "Invalid API key" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
