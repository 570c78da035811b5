//! Completion client abstraction and request/response types.

use async_trait::async_trait;
use docqa_core::AppResult;
use serde::{Deserialize, Serialize};

/// Text completion request.
///
/// One request maps to one round trip against the hosted endpoint; there is
/// no retry or cancellation at this level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Deployment (engine) identifier to run the completion against
    pub deployment: String,

    /// The prompt text
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Number of candidates to generate
    pub n: u32,

    /// Sequences at which generation stops
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl CompletionRequest {
    /// Create a request with default generation parameters.
    pub fn new(deployment: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            deployment: deployment.into(),
            prompt: prompt.into(),
            temperature: 1.0,
            max_tokens: 256,
            n: 1,
            stop: Vec::new(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the number of candidates.
    pub fn with_n(mut self, n: u32) -> Self {
        self.n = n;
        self
    }

    /// Set the stop sequences.
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }
}

/// A generated completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text of the first candidate
    pub text: String,

    /// Token usage statistics
    #[serde(default)]
    pub usage: CompletionUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionUsage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,

    #[serde(default)]
    pub total_tokens: u32,
}

/// Trait for completion providers.
///
/// Abstracts the hosted completion endpoint so approaches can be exercised
/// against stubs in tests. Implementations hold only immutable configuration
/// and must be safe to share across concurrent requests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Get the provider name (e.g., "azure").
    fn provider_name(&self) -> &str;

    /// Perform one completion round trip.
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion>;
}
