//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "openai")]
use haiku_infra::ChatCompletionConfig;
#[cfg(feature = "cloudflare")]
use haiku_infra::CloudflareKvConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Remote KV namespace; `None` runs on the in-memory store.
    #[cfg(feature = "cloudflare")]
    pub kv: Option<CloudflareKvConfig>,
    /// Generation endpoint; `None` when no API key is configured.
    #[cfg(feature = "openai")]
    pub generator: Option<ChatCompletionConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            #[cfg(feature = "cloudflare")]
            kv: CloudflareKvConfig::from_env(),
            #[cfg(feature = "openai")]
            generator: ChatCompletionConfig::from_env(),
        }
    }
}
