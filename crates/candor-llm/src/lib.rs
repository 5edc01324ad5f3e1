//! Candor Model Client Layer
//!
//! Pluggable AI client implementations behind the `ModelClient` trait from
//! `candor-domain`.
//!
//! # Clients
//!
//! - `MockClient`: deterministic scripted mock for testing
//! - `GeminiClient`: hosted Gemini API over HTTP
//!
//! # Examples
//!
//! ```
//! use candor_llm::MockClient;
//! use candor_domain::traits::{ModelClient, ModelRequest};
//!
//! let client = MockClient::new("{\"text\": \"hello\"}");
//! let request = ModelRequest {
//!     model: "gemini-2.5-flash".into(),
//!     prompt: "test prompt".into(),
//!     temperature: 0.2,
//!     shape_hint: "a JSON object".into(),
//! };
//! assert_eq!(client.generate(&request).unwrap(), "{\"text\": \"hello\"}");
//! ```

#![warn(missing_docs)]

pub mod gemini;

use candor_domain::traits::{ModelClient, ModelRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Errors that can occur during model operations
#[derive(Error, Debug)]
pub enum ModelError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Model error: {0}")]
    Other(String),
}

/// One scripted reply sequence, matched by a prompt substring
#[derive(Debug, Clone)]
struct Script {
    needle: String,
    replies: VecDeque<Reply>,
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error,
}

/// Deterministic mock client for testing
///
/// Replies are scripted per prompt substring: the first script whose needle
/// occurs in the prompt answers the call. Scripts consume their replies in
/// order and keep repeating the final one, so a script with one entry acts
/// as a fixed response while a multi-entry script can fail a few times and
/// then recover. Prompts matching no script get the default response.
///
/// # Examples
///
/// ```
/// use candor_llm::MockClient;
/// use candor_domain::traits::{ModelClient, ModelRequest};
///
/// let client = MockClient::new("default");
/// client.add_response("weather", "sunny");
///
/// let request = ModelRequest {
///     model: "m".into(),
///     prompt: "what is the weather".into(),
///     temperature: 0.0,
///     shape_hint: String::new(),
/// };
/// assert_eq!(client.generate(&request).unwrap(), "sunny");
/// assert_eq!(client.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockClient {
    default_response: String,
    scripts: Arc<Mutex<Vec<Script>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl MockClient {
    /// Create a mock returning the given response for unscripted prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            scripts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    /// Queue a reply for prompts containing the given substring
    pub fn add_response(&self, needle: impl Into<String>, response: impl Into<String>) {
        self.push_reply(needle.into(), Reply::Text(response.into()));
    }

    /// Queue an error for prompts containing the given substring
    pub fn add_error(&self, needle: impl Into<String>) {
        self.push_reply(needle.into(), Reply::Error);
    }

    /// Make every call sleep first; pairs with orchestrator timeout tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call counter
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    fn push_reply(&self, needle: String, reply: Reply) {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.iter_mut().find(|s| s.needle == needle) {
            Some(script) => script.replies.push_back(reply),
            None => scripts.push(Script {
                needle,
                replies: VecDeque::from([reply]),
            }),
        }
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl ModelClient for MockClient {
    type Error = ModelError;

    fn generate(&self, request: &ModelRequest) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let mut scripts = self.scripts.lock().unwrap();
        if let Some(script) = scripts
            .iter_mut()
            .find(|s| request.prompt.contains(&s.needle))
        {
            let reply = if script.replies.len() > 1 {
                script.replies.pop_front()
            } else {
                script.replies.front().cloned()
            };
            return match reply {
                Some(Reply::Text(text)) => Ok(text),
                Some(Reply::Error) | None => Err(ModelError::Other("Mock error".to_string())),
            };
        }

        Ok(self.default_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> ModelRequest {
        ModelRequest {
            model: "test-model".into(),
            prompt: prompt.into(),
            temperature: 0.0,
            shape_hint: String::new(),
        }
    }

    #[test]
    fn test_mock_default_response() {
        let client = MockClient::new("Test response");
        assert_eq!(client.generate(&request("anything")).unwrap(), "Test response");
    }

    #[test]
    fn test_mock_scripted_responses() {
        let client = MockClient::default();
        client.add_response("hello", "world");
        client.add_response("foo", "bar");

        assert_eq!(client.generate(&request("say hello")).unwrap(), "world");
        assert_eq!(client.generate(&request("foo fighters")).unwrap(), "bar");
        assert_eq!(
            client.generate(&request("unknown")).unwrap(),
            "Default mock response"
        );
    }

    #[test]
    fn test_mock_replies_drain_in_order_and_last_repeats() {
        let client = MockClient::default();
        client.add_response("q", "first");
        client.add_response("q", "second");

        assert_eq!(client.generate(&request("q")).unwrap(), "first");
        assert_eq!(client.generate(&request("q")).unwrap(), "second");
        assert_eq!(client.generate(&request("q")).unwrap(), "second");
    }

    #[test]
    fn test_mock_fails_then_recovers() {
        let client = MockClient::default();
        client.add_error("flaky");
        client.add_response("flaky", "recovered");

        assert!(client.generate(&request("flaky")).is_err());
        assert_eq!(client.generate(&request("flaky")).unwrap(), "recovered");
    }

    #[test]
    fn test_mock_call_count() {
        let client = MockClient::new("x");
        assert_eq!(client.call_count(), 0);

        client.generate(&request("a")).unwrap();
        client.generate(&request("b")).unwrap();
        assert_eq!(client.call_count(), 2);

        client.reset_call_count();
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_mock_clone_shares_state() {
        let a = MockClient::new("x");
        let b = a.clone();
        a.generate(&request("p")).unwrap();
        assert_eq!(b.call_count(), 1);
    }
}
