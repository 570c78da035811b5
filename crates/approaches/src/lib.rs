//! Question-answering approaches for docqa.
//!
//! Two interchangeable retrieve-then-read strategies over one collaborator
//! pair (search index + completion endpoint):
//!
//! - [`RetrieveThenReadApproach`]: single-turn. Retrieves documents for the
//!   raw question, formats one few-shot prompt, requests one completion.
//! - [`ChatReadRetrieveReadApproach`]: multi-turn. First rewrites the chat
//!   history and last question into a search query, then retrieves, then
//!   requests the final answer with the history in the prompt.
//!
//! Control flow is strictly linear per request: no retries, no background
//! work, no state outliving a call.

pub mod chat;
pub mod history;
pub mod retrieval;
pub mod retrieve_then_read;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types
pub use chat::ChatReadRetrieveReadApproach;
pub use retrieval::{Retrieved, Retriever};
pub use retrieve_then_read::RetrieveThenReadApproach;
pub use types::{ApproachResult, Overrides, Turn};
