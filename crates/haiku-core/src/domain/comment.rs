use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reader comment attached to a haiku.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    /// Create a comment stamped with the current time.
    ///
    /// The id is derived from the creation time in milliseconds, so two
    /// comments added within the same millisecond share an id.
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("comment_{}", now.timestamp_millis()),
            text: text.into(),
            timestamp: now,
        }
    }
}
