//! Test doubles for the two collaborator traits.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docqa_core::{AppError, AppResult};
use docqa_llm::{Completion, CompletionClient, CompletionRequest, CompletionUsage};
use docqa_search::{Caption, RetrievedDocument, SearchClient, SearchOptions};

/// Search stub returning a fixed document list and recording every call.
pub struct StubSearchClient {
    documents: Vec<RetrievedDocument>,
    pub calls: Arc<Mutex<Vec<(String, SearchOptions)>>>,
}

impl StubSearchClient {
    pub fn new(documents: Vec<RetrievedDocument>) -> Self {
        Self {
            documents,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl SearchClient for StubSearchClient {
    async fn search(
        &self,
        query_text: &str,
        options: &SearchOptions,
    ) -> AppResult<Vec<RetrievedDocument>> {
        self.calls
            .lock()
            .unwrap()
            .push((query_text.to_string(), options.clone()));
        Ok(self.documents.clone())
    }
}

/// Completion stub replaying scripted replies in order and recording every
/// request it receives.
pub struct ScriptedCompletions {
    replies: Mutex<VecDeque<String>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedCompletions {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletions {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion> {
        self.requests.lock().unwrap().push(request.clone());
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Completion("No scripted reply left".to_string()))?;
        Ok(Completion {
            text,
            usage: CompletionUsage::default(),
        })
    }
}

/// Build a document from (field, value) string pairs.
pub fn document(fields: &[(&str, &str)]) -> RetrievedDocument {
    let mut document = RetrievedDocument::default();
    for (name, value) in fields {
        document
            .fields
            .insert(name.to_string(), serde_json::json!(value));
    }
    document
}

/// Build a document that also carries extractive captions.
pub fn document_with_captions(fields: &[(&str, &str)], captions: &[&str]) -> RetrievedDocument {
    let mut document = document(fields);
    document.captions = captions
        .iter()
        .map(|text| Caption {
            text: text.to_string(),
        })
        .collect();
    document
}
