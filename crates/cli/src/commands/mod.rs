//! Command handlers for the docqa CLI.

pub mod ask;
pub mod chat;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;

use std::sync::Arc;

use docqa_approaches::Retriever;
use docqa_core::{AppConfig, AppResult};
use docqa_llm::CompletionClient;
use docqa_search::AzureSearchClient;

/// Build the retrieval capability from configuration.
pub(crate) fn build_retriever(config: &AppConfig) -> AppResult<Retriever> {
    let api_key = config.resolve_search_api_key()?;
    let client = AzureSearchClient::new(
        config.search.endpoint.as_str(),
        config.search.index.as_str(),
        config.search.api_version.as_str(),
        api_key,
    );

    Ok(Retriever::new(
        Arc::new(client),
        config.search.sourcepage_field.as_str(),
        config.search.content_field.as_str(),
        config.search.semantic_configuration.as_str(),
    ))
}

/// Build the completion client from configuration.
pub(crate) fn build_completions(config: &AppConfig) -> AppResult<Arc<dyn CompletionClient>> {
    let api_key = config.resolve_completions_api_key()?;
    docqa_llm::create_client(
        &config.completions.provider,
        &config.completions.endpoint,
        &config.completions.api_version,
        &api_key,
    )
}
