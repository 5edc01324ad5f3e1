//! Gemini API client
//!
//! Talks to the hosted Gemini `generateContent` endpoint over HTTP. Each
//! prompt spec forwards its own model identifier and temperature, so one
//! client instance serves the whole catalog.
//!
//! # Features
//!
//! - Async HTTP communication with the Gemini API
//! - Per-request model and temperature
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use candor_llm::GeminiClient;
//!
//! let client = GeminiClient::default_endpoint("api-key-from-caller");
//! // The generate method is async; the ModelClient trait impl wraps it for
//! // sync call sites.
//! ```

use crate::ModelError;
use candor_domain::traits::{ModelClient, ModelRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default timeout for model requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Gemini API client
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

impl GeminiClient {
    /// Create a client against the given endpoint
    ///
    /// The API key arrives from the caller with the run request; it is
    /// never read from configuration files.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a client against the hosted endpoint
    pub fn default_endpoint(api_key: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, api_key)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate text for one request
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable, the model is
    /// unknown, the rate limit holds through every retry, or the response
    /// body cannot be parsed.
    pub async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, request.model, self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        };

        debug!(
            "Dispatching to {} ({} chars, expecting {})",
            request.model,
            request.prompt.len(),
            request.shape_hint
        );

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return match response.json::<GenerateContentResponse>().await {
                            Ok(parsed) => extract_text(parsed),
                            Err(e) => Err(ModelError::InvalidResponse(format!(
                                "Failed to parse response: {}",
                                e
                            ))),
                        };
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(ModelError::ModelNotAvailable(request.model.clone()));
                    } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(ModelError::RateLimitExceeded);
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(ModelError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(ModelError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| ModelError::Communication("Max retries exceeded".to_string())))
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, ModelError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::InvalidResponse("No candidates in response".to_string()))?;

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(ModelError::InvalidResponse("Empty candidate text".to_string()));
    }
    Ok(text)
}

impl ModelClient for GeminiClient {
    type Error = ModelError;

    fn generate(&self, request: &ModelRequest) -> Result<String, Self::Error> {
        // Blocking wrapper for the async call; call sites that must not
        // block run this through spawn_blocking
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| ModelError::Other(format!("Runtime error: {}", e)))?;
        runtime.block_on(async { self.generate(request).await })
    }
}
