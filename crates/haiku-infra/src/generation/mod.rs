//! Text generation clients.

mod chat_completion;

pub use chat_completion::{ChatCompletionConfig, ChatCompletionGenerator};
