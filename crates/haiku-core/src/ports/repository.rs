use async_trait::async_trait;

use crate::domain::{Haiku, StoredHaiku};
use crate::error::RepoError;

/// Haiku repository - document operations over a key-value store.
///
/// `rate` and `add_comment` are read-modify-write sequences with no
/// compare-and-swap: concurrent writers to the same haiku can lose updates.
#[async_trait]
pub trait HaikuRepository: Send + Sync {
    /// Every stored haiku. Entries that cannot be fetched are skipped;
    /// entries that cannot be parsed come back as [`StoredHaiku::Recovered`].
    async fn get_all(&self) -> Result<Vec<StoredHaiku>, RepoError>;

    /// A single haiku, or `None` when it is missing or the fetch failed.
    async fn get_one(&self, id: &str) -> Option<StoredHaiku>;

    /// Create or overwrite a haiku under its own id.
    async fn save(&self, haiku: &Haiku) -> Result<(), RepoError>;

    /// Add one like (`is_like`) or one dislike and return the updated haiku.
    async fn rate(&self, id: &str, is_like: bool) -> Result<Haiku, RepoError>;

    /// Append a comment and return the updated haiku.
    async fn add_comment(&self, id: &str, text: &str) -> Result<Haiku, RepoError>;

    /// Remove a haiku.
    async fn delete(&self, id: &str) -> Result<(), RepoError>;
}
