//! Application state - shared across all handlers.

use std::sync::Arc;

use haiku_core::ports::{HaikuGenerator, HaikuRepository, KvStore};
use haiku_infra::{InMemoryKvStore, KvHaikuRepository};

#[cfg(feature = "openai")]
use haiku_infra::ChatCompletionGenerator;
#[cfg(feature = "cloudflare")]
use haiku_infra::CloudflareKvStore;

use crate::config::AppConfig;

/// Which KV backend the repository runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvBackend {
    Cloudflare,
    Memory,
}

impl KvBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            KvBackend::Cloudflare => "cloudflare",
            KvBackend::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub haikus: Arc<dyn HaikuRepository>,
    /// `None` when no generation API key is configured.
    pub generator: Option<Arc<dyn HaikuGenerator>>,
    pub kv_backend: KvBackend,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig) -> Self {
        let (store, kv_backend) = Self::build_store(config);
        let haikus: Arc<dyn HaikuRepository> = Arc::new(KvHaikuRepository::new(store));
        let generator = Self::build_generator(config);

        tracing::info!(
            kv_backend = kv_backend.as_str(),
            generator_configured = generator.is_some(),
            "Application state initialized"
        );

        Self {
            haikus,
            generator,
            kv_backend,
        }
    }

    #[cfg(feature = "cloudflare")]
    fn build_store(config: &AppConfig) -> (Arc<dyn KvStore>, KvBackend) {
        match &config.kv {
            Some(kv_config) => match CloudflareKvStore::new(kv_config.clone()) {
                Ok(store) => (Arc::new(store), KvBackend::Cloudflare),
                Err(e) => {
                    tracing::error!(
                        "Failed to configure Cloudflare KV: {}. Using in-memory fallback.",
                        e
                    );
                    (Arc::new(InMemoryKvStore::new()), KvBackend::Memory)
                }
            },
            None => {
                tracing::warn!(
                    "CLOUDFLARE_* not set. Running without persistent storage (in-memory mode)."
                );
                (Arc::new(InMemoryKvStore::new()), KvBackend::Memory)
            }
        }
    }

    #[cfg(not(feature = "cloudflare"))]
    fn build_store(_config: &AppConfig) -> (Arc<dyn KvStore>, KvBackend) {
        tracing::info!("Running without cloudflare feature - using in-memory store");
        (Arc::new(InMemoryKvStore::new()), KvBackend::Memory)
    }

    #[cfg(feature = "openai")]
    fn build_generator(config: &AppConfig) -> Option<Arc<dyn HaikuGenerator>> {
        let Some(gen_config) = &config.generator else {
            tracing::warn!("OPENAI_API_KEY not set. Haiku generation is disabled.");
            return None;
        };

        match ChatCompletionGenerator::new(gen_config.clone()) {
            Ok(generator) => Some(Arc::new(generator)),
            Err(e) => {
                tracing::error!("Failed to configure haiku generator: {}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "openai"))]
    fn build_generator(_config: &AppConfig) -> Option<Arc<dyn HaikuGenerator>> {
        tracing::info!("Running without openai feature - haiku generation is disabled");
        None
    }
}
