//! Haiku repository over a raw key-value store.

use std::sync::Arc;

use async_trait::async_trait;

use haiku_core::RepoError;
use haiku_core::domain::{Haiku, StoredHaiku};
use haiku_core::ports::{HaikuRepository, KvError, KvStore};

/// Document-style haiku repository backed by any [`KvStore`].
///
/// Each haiku is one JSON document stored under its id.
pub struct KvHaikuRepository {
    store: Arc<dyn KvStore>,
    prefix: String,
}

impl KvHaikuRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_prefix(store, Haiku::KEY_PREFIX)
    }

    /// Use a custom key prefix for listing.
    pub fn with_prefix(store: Arc<dyn KvStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Fetch and decode one key, surfacing store errors.
    async fn fetch(&self, id: &str) -> Result<Option<StoredHaiku>, KvError> {
        let raw = self.store.get(id).await?;
        Ok(raw.map(|raw| {
            let stored = StoredHaiku::decode(id, &raw);
            if let StoredHaiku::Recovered { reason, .. } = &stored {
                tracing::warn!(
                    key = %id,
                    reason = %reason,
                    "Stored haiku is not a valid record, recovered as text"
                );
            }
            stored
        }))
    }

    /// Fetch a haiku for modification. Missing records are an error here.
    async fn fetch_for_update(&self, id: &str) -> Result<Haiku, RepoError> {
        match self.fetch(id).await? {
            Some(stored) => {
                if stored.is_recovered() {
                    tracing::info!(key = %id, "Rewriting recovered haiku as a full record");
                }
                Ok(stored.into_haiku())
            }
            None => Err(RepoError::NotFound(id.to_string())),
        }
    }

    /// Write `haiku` under `key`.
    async fn persist(&self, key: &str, haiku: &Haiku) -> Result<(), RepoError> {
        let value = serde_json::to_string(haiku)?;
        self.store.put(key, &value).await?;
        Ok(())
    }
}

#[async_trait]
impl HaikuRepository for KvHaikuRepository {
    async fn get_all(&self) -> Result<Vec<StoredHaiku>, RepoError> {
        let keys = self.store.list_keys(&self.prefix).await?;
        tracing::debug!(count = keys.len(), prefix = %self.prefix, "Listing haikus");

        let mut haikus = Vec::with_capacity(keys.len());
        for key in &keys {
            match self.fetch(key).await {
                Ok(Some(stored)) => haikus.push(stored),
                Ok(None) => {
                    tracing::debug!(key = %key, "Haiku disappeared between list and fetch");
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping haiku that failed to load");
                }
            }
        }

        Ok(haikus)
    }

    async fn get_one(&self, id: &str) -> Option<StoredHaiku> {
        match self.fetch(id).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(key = %id, error = %e, "Failed to fetch haiku");
                None
            }
        }
    }

    async fn save(&self, haiku: &Haiku) -> Result<(), RepoError> {
        tracing::debug!(key = %haiku.id, "Saving haiku");
        self.persist(&haiku.id, haiku).await
    }

    async fn rate(&self, id: &str, is_like: bool) -> Result<Haiku, RepoError> {
        let mut haiku = self.fetch_for_update(id).await?;
        haiku.record_rating(is_like);
        self.persist(id, &haiku).await?;

        tracing::debug!(
            key = %id,
            is_like,
            likes = haiku.likes,
            dislikes = haiku.dislikes,
            "Haiku rated"
        );
        Ok(haiku)
    }

    async fn add_comment(&self, id: &str, text: &str) -> Result<Haiku, RepoError> {
        let mut haiku = self.fetch_for_update(id).await?;
        haiku.add_comment(text);
        self.persist(id, &haiku).await?;

        tracing::debug!(key = %id, comments = haiku.comments.len(), "Comment added");
        Ok(haiku)
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        self.store.delete(id).await?;
        tracing::info!(key = %id, "Haiku deleted");
        Ok(())
    }
}
