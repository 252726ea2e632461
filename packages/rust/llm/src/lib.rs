//! Remote text generation for StudyBuddy.
//!
//! [`TextGenerator`] is the seam the prompt orchestrator talks to;
//! [`OpenRouterClient`] implements it against an OpenAI-compatible
//! chat-completions endpoint.

mod client;

use std::future::Future;

use studybuddy_shared::Result;

pub use client::{OpenRouterClient, USER_AGENT};

/// Something that turns a prompt into generated text.
///
/// Implementations perform exactly one request per call and never retry.
pub trait TextGenerator: Send + Sync {
    /// Identifier of the model answering the prompts.
    fn model(&self) -> &str;

    /// Send `prompt` as a single user message and return the reply text
    /// unchanged.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}
