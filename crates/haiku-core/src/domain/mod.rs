//! Domain entities - the core business objects.

mod comment;
mod haiku;
mod stored;

pub use comment::Comment;
pub use haiku::Haiku;
pub use stored::{Provenance, RECOVERED_PROMPT, StoredHaiku};
