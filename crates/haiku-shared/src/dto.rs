//! Data Transfer Objects - request/response types for the API.
//!
//! Field names follow the JSON the web client already speaks, hence the
//! camelCase renames.

use serde::{Deserialize, Serialize};

/// POST /api/generate-haiku
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateHaikuRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Generated text plus the stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateHaikuResponse {
    pub haiku: String,
    #[serde(rename = "haikuData")]
    pub haiku_data: HaikuResponse,
}

/// POST /api/haikus/{id}/rate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateHaikuRequest {
    #[serde(rename = "isLike", default)]
    pub is_like: Option<bool>,
}

/// POST /api/haikus/{id}/comments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub comment: Option<String>,
}

/// DELETE /api/haikus/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHaikuResponse {
    pub success: bool,
    pub message: String,
}

/// A haiku as shown in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaikuResponse {
    pub id: String,
    pub text: String,
    pub prompt: String,
    /// RFC 3339, millisecond precision, UTC.
    pub timestamp: String,
    pub likes: u64,
    pub dislikes: u64,
    pub comments: Vec<CommentResponse>,
    /// Set when the stored value was unreadable and this record is a placeholder.
    #[serde(default, skip_serializing_if = "is_false")]
    pub recovered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub text: String,
    pub timestamp: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}
