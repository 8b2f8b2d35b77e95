//! # Haiku Core
//!
//! The domain layer of the haiku feed.
//! Entities, decode rules for stored records, and the ports that
//! infrastructure implements. No I/O happens in this crate.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::RepoError;
