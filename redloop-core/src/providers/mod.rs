//! LLM provider abstraction and implementations

pub mod ollama;
pub mod traits;

pub use ollama::OllamaProvider;
pub use traits::{CompletionRequest, LlmProvider, Message, Role};
