//! Swarmboard LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `swarmboard-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted provider for tests and demos
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use swarmboard_domain::LlmProvider;
//! use swarmboard_llm::MockProvider;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = runtime.block_on(provider.generate("test prompt")).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use swarmboard_domain::LlmProvider;
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One scripted reply
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Delayed(Duration, String),
    Error(String),
    Unreachable,
}

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<Reply>,
    by_substring: Vec<(String, Reply)>,
    prompts: Vec<String>,
    unreachable: bool,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen in this order:
///
/// 1. the next queued reply, if any
/// 2. the first scripted reply whose substring occurs in the prompt
/// 3. the default response
///
/// Clones share the script, the call count and the prompt log.
///
/// # Examples
///
/// ```
/// use swarmboard_domain::LlmProvider;
/// use swarmboard_llm::MockProvider;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
///
/// let provider = MockProvider::default();
/// provider.add_response("planner", r#"[{"id": "a"}]"#);
/// provider.add_response("specialist `a`", "done");
///
/// let plan = runtime.block_on(provider.generate("You are the planner")).unwrap();
/// assert_eq!(plan, r#"[{"id": "a"}]"#);
/// let answer = runtime.block_on(provider.generate("You are specialist `a`")).unwrap();
/// assert_eq!(answer, "done");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<Script>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    /// A provider whose every call fails as if the endpoint were down
    pub fn unreachable() -> Self {
        let provider = Self::default();
        provider.script().unreachable = true;
        provider
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        // A panicking test thread must not take the other clones down with it
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reply with `response` to any prompt containing `substring`
    pub fn add_response(&self, substring: impl Into<String>, response: impl Into<String>) {
        self.script()
            .by_substring
            .push((substring.into(), Reply::Text(response.into())));
    }

    /// Reply with `response` after `delay` to any prompt containing `substring`
    pub fn add_delayed_response(
        &self,
        substring: impl Into<String>,
        response: impl Into<String>,
        delay: Duration,
    ) {
        self.script()
            .by_substring
            .push((substring.into(), Reply::Delayed(delay, response.into())));
    }

    /// Fail any prompt containing `substring`
    pub fn add_error(&self, substring: impl Into<String>) {
        let substring = substring.into();
        let message = format!("Mock error for prompt containing `{}`", substring);
        self.script().by_substring.push((substring, Reply::Error(message)));
    }

    /// Queue a reply for the next call, whatever the prompt
    pub fn queue_response(&self, response: impl Into<String>) {
        self.script().queue.push_back(Reply::Text(response.into()));
    }

    /// Queue a failure for the next call, whatever the prompt
    pub fn queue_error(&self, message: impl Into<String>) {
        self.script().queue.push_back(Reply::Error(message.into()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.script().prompts.len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.script().prompts.clone()
    }

    /// Reset the call count and the prompt log
    pub fn reset_call_count(&self) {
        self.script().prompts.clear();
    }

    fn next_reply(&self, prompt: &str) -> Reply {
        let mut script = self.script();
        script.prompts.push(prompt.to_string());

        if script.unreachable {
            return Reply::Unreachable;
        }
        if let Some(reply) = script.queue.pop_front() {
            return reply;
        }
        script
            .by_substring
            .iter()
            .find(|(substring, _)| prompt.contains(substring.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        // The guard is released before any await point
        let reply = self.next_reply(prompt);
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Reply::Error(message) => Err(LlmError::Other(message)),
            Reply::Unreachable => Err(LlmError::Communication("connection refused".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
