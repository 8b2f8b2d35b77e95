use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Comment;

/// Haiku entity - a generated poem plus its reader feedback.
///
/// This is also the exact JSON document stored under `id` in the KV store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Haiku {
    pub id: String,
    pub text: String,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u64,
    pub dislikes: u64,
    pub comments: Vec<Comment>,
}

impl Haiku {
    /// Prefix shared by every haiku key in the store.
    pub const KEY_PREFIX: &'static str = "haiku_";

    /// Create a freshly generated haiku with a new id and no feedback.
    pub fn new(prompt: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: format!("{}{}", Self::KEY_PREFIX, Uuid::new_v4()),
            text: text.into(),
            prompt: prompt.into(),
            timestamp: Utc::now(),
            likes: 0,
            dislikes: 0,
            comments: Vec::new(),
        }
    }

    /// Count one like or one dislike.
    pub fn record_rating(&mut self, is_like: bool) {
        if is_like {
            self.likes = self.likes.saturating_add(1);
        } else {
            self.dislikes = self.dislikes.saturating_add(1);
        }
    }

    /// Append a comment after all existing ones.
    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.comments.push(Comment::new(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_haiku_has_prefixed_id_and_no_feedback() {
        let haiku = Haiku::new("autumn", "leaves fall");
        assert!(haiku.id.starts_with(Haiku::KEY_PREFIX));
        assert_eq!(haiku.likes, 0);
        assert_eq!(haiku.dislikes, 0);
        assert!(haiku.comments.is_empty());
    }

    #[test]
    fn test_record_rating_touches_one_counter() {
        let mut haiku = Haiku::new("autumn", "leaves fall");
        haiku.record_rating(true);
        assert_eq!((haiku.likes, haiku.dislikes), (1, 0));
        haiku.record_rating(false);
        haiku.record_rating(false);
        assert_eq!((haiku.likes, haiku.dislikes), (1, 2));
    }

    #[test]
    fn test_record_rating_saturates() {
        let mut haiku = Haiku::new("autumn", "leaves fall");
        haiku.likes = u64::MAX;
        haiku.record_rating(true);
        assert_eq!(haiku.likes, u64::MAX);
    }

    #[test]
    fn test_comments_keep_insertion_order() {
        let mut haiku = Haiku::new("autumn", "leaves fall");
        haiku.add_comment("first");
        haiku.add_comment("second");
        let texts: Vec<_> = haiku.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
        assert!(haiku.comments[0].id.starts_with("comment_"));
    }
}
