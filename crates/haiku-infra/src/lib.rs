//! # Haiku Infrastructure
//!
//! Concrete implementations of the ports defined in `haiku-core`.
//! This crate contains the KV store clients, the KV-backed haiku
//! repository, and the text generation client.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `cloudflare` - Cloudflare Workers KV store via reqwest
//! - `openai` - OpenAI-compatible chat completion generator via reqwest

#[cfg(feature = "openai")]
pub mod generation;
pub mod kv;
pub mod repository;

// Re-exports - In-Memory
pub use kv::InMemoryKvStore;
pub use repository::KvHaikuRepository;

// Re-exports - Remote
#[cfg(feature = "cloudflare")]
pub use kv::{CloudflareKvConfig, CloudflareKvStore};
#[cfg(feature = "openai")]
pub use generation::{ChatCompletionConfig, ChatCompletionGenerator};
