//! KV store implementations - Cloudflare Workers KV and in-memory fallback.

mod memory;

#[cfg(feature = "cloudflare")]
mod cloudflare;

pub use memory::InMemoryKvStore;

#[cfg(feature = "cloudflare")]
pub use cloudflare::{CloudflareKvConfig, CloudflareKvStore};
