//! Trait definitions for external interactions
//!
//! These traits define the boundaries between swarm logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{ToolError, ToolSpec};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token counts for one model call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u64,
    /// Tokens in the completion
    pub completion_tokens: u64,
}

impl TokenUsage {
    /// Estimate usage from text lengths (roughly four characters per token)
    pub fn estimate(prompt: &str, completion: &str) -> Self {
        Self {
            prompt_tokens: estimate_tokens(prompt),
            completion_tokens: estimate_tokens(completion),
        }
    }

    /// Sum of prompt and completion tokens
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

/// Text completion plus token usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Completion text
    pub text: String,
    /// Token usage reported by the provider or estimated
    pub usage: TokenUsage,
}

/// Trait for language model operations
///
/// Implemented by the infrastructure layer (swarmboard-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::fmt::Display + Send;

    /// Generate text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate a completion with token usage
    ///
    /// Providers that report usage override this; the default estimates it
    /// from prompt and completion length.
    async fn generate_with_usage(&self, prompt: &str) -> Result<Completion, Self::Error> {
        let text = self.generate(prompt).await?;
        let usage = TokenUsage::estimate(prompt, &text);
        Ok(Completion { text, usage })
    }

    /// Name of the underlying model, for reporting
    fn model_name(&self) -> &str {
        "llm"
    }
}

/// Trait for a tool specialists can invoke
///
/// Implemented by the infrastructure layer (swarmboard-tools)
#[async_trait]
pub trait Tool: Send + Sync {
    /// Metadata used in planning and specialist prompts
    fn spec(&self) -> &ToolSpec;

    /// Run the tool on structured input
    async fn invoke(&self, input: Value) -> Result<Value, ToolError>;
}

/// Trait for the persisted user settings the orchestrator reads
///
/// Implementations clamp the stored team size to [1, 10].
pub trait SettingsStore: Send + Sync {
    /// Error type for settings persistence
    type Error: std::fmt::Display;

    /// Persisted maximum team size
    fn max_specialists(&self) -> u8;

    /// Persist a new maximum team size
    fn set_max_specialists(&mut self, value: u8) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl LlmProvider for Echo {
        type Error = String;

        async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
            Ok(prompt.to_uppercase())
        }
    }

    #[test]
    fn test_estimate_rounds_up() {
        let usage = TokenUsage::estimate("abcde", "");
        assert_eq!(usage.prompt_tokens, 2);
        assert_eq!(usage.completion_tokens, 0);
        assert_eq!(usage.total(), 2);
    }

    #[tokio::test]
    async fn test_default_generate_with_usage() {
        let completion = Echo.generate_with_usage("abcdefgh").await.unwrap();
        assert_eq!(completion.text, "ABCDEFGH");
        assert_eq!(completion.usage.prompt_tokens, 2);
        assert_eq!(completion.usage.completion_tokens, 2);
        assert_eq!(Echo.model_name(), "llm");
    }
}
