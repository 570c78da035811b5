//! Search collaborator for docqa.
//!
//! This crate talks to a hosted search index (Azure Cognitive Search REST
//! shape): ranked keyword or semantic queries, optional extractive captions,
//! and OData filtering. The approaches depend only on the [`SearchClient`]
//! trait, never on the concrete REST client.

pub mod client;
pub mod filter;
pub mod types;

// Re-export main types
pub use client::{AzureSearchClient, SearchClient};
pub use types::{Caption, RetrievedDocument, SearchOptions, SemanticOptions};
