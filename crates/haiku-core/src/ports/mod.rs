//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod generator;
mod kv_store;
mod repository;

pub use generator::{GenerationError, HaikuGenerator};
pub use kv_store::{KvError, KvStore};
pub use repository::HaikuRepository;
