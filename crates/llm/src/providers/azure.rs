//! Azure OpenAI completion provider.
//!
//! Runs text completions against a deployment on an Azure OpenAI resource:
//! `POST {endpoint}/openai/deployments/{deployment}/completions`.

use crate::client::{Completion, CompletionClient, CompletionRequest, CompletionUsage};
use async_trait::async_trait;
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Completion request wire format.
#[derive(Debug, Serialize)]
struct AzureCompletionRequest<'a> {
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

/// Completion response wire format.
#[derive(Debug, Deserialize)]
struct AzureCompletionResponse {
    choices: Vec<AzureChoice>,
    #[serde(default)]
    usage: Option<AzureUsage>,
}

#[derive(Debug, Deserialize)]
struct AzureChoice {
    text: String,
}

#[derive(Debug, Deserialize)]
struct AzureUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

/// Azure OpenAI completion client.
pub struct AzureOpenAiClient {
    endpoint: String,
    api_version: String,
    api_key: String,
    client: reqwest::Client,
}

impl AzureOpenAiClient {
    /// Create a client for one Azure OpenAI resource.
    pub fn new(
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_version: api_version.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert a CompletionRequest to the wire format.
    fn to_wire_request(request: &CompletionRequest) -> AzureCompletionRequest<'_> {
        AzureCompletionRequest {
            prompt: &request.prompt,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            n: request.n,
            stop: if request.stop.is_empty() {
                None
            } else {
                Some(request.stop.as_slice())
            },
        }
    }
}

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    fn provider_name(&self) -> &str {
        "azure"
    }

    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion> {
        let url = format!(
            "{}/openai/deployments/{}/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            request.deployment,
            self.api_version
        );

        tracing::debug!(
            "Requesting completion from deployment '{}' (temperature: {}, max_tokens: {})",
            request.deployment,
            request.temperature,
            request.max_tokens
        );

        let wire_request = Self::to_wire_request(request);

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| AppError::Completion(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Completion(format!(
                "Completion API error ({}): {}",
                status, error_text
            )));
        }

        let response: AzureCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Completion(format!("Failed to parse response: {}", e)))?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AppError::Completion(format!(
                "Deployment '{}' returned no choices",
                request.deployment
            ))
        })?;

        let usage = response
            .usage
            .map(|u| CompletionUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        tracing::debug!("Received completion ({} tokens total)", usage.total_tokens);

        Ok(Completion {
            text: choice.text,
            usage,
        })
    }
}
