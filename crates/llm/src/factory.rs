//! Completion provider factory.
//!
//! Creates a completion client from configuration values. Kept separate so
//! the CLI never constructs concrete providers directly.

use crate::client::CompletionClient;
use crate::providers::AzureOpenAiClient;
use docqa_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a completion client for the given provider.
///
/// # Arguments
/// * `provider` - Provider identifier (currently only "azure")
/// * `endpoint` - Service endpoint URL
/// * `api_version` - REST API version
/// * `api_key` - API key for the service
pub fn create_client(
    provider: &str,
    endpoint: &str,
    api_version: &str,
    api_key: &str,
) -> AppResult<Arc<dyn CompletionClient>> {
    match provider.to_lowercase().as_str() {
        "azure" | "azure-openai" => Ok(Arc::new(AzureOpenAiClient::new(
            endpoint,
            api_version,
            api_key,
        ))),
        _ => Err(AppError::Config(format!(
            "Unknown completion provider: {}",
            provider
        ))),
    }
}
