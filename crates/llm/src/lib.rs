//! Completion collaborator for docqa.
//!
//! This crate provides a provider-agnostic abstraction for hosted text
//! completion endpoints through a unified trait-based interface.
//!
//! # Providers
//! - **Azure OpenAI**: completions against a deployment (default)
//!
//! # Example
//! ```no_run
//! use docqa_llm::{AzureOpenAiClient, CompletionClient, CompletionRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AzureOpenAiClient::new(
//!     "https://myservice.openai.azure.com",
//!     "2022-12-01",
//!     "secret",
//! );
//! let request = CompletionRequest::new("davinci", "Say hello.");
//! let completion = client.complete(&request).await?;
//! println!("{}", completion.text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{Completion, CompletionClient, CompletionRequest, CompletionUsage};
pub use factory::create_client;
pub use providers::AzureOpenAiClient;
