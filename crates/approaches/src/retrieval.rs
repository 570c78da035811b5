//! Shared retrieval-and-format capability.
//!
//! Both approaches retrieve documents and shape them into per-source lines
//! the same way; the logic lives here once, behind a small capability
//! (`search` via the injected client, `format_results` for the shaping).

use std::sync::Arc;

use docqa_core::{AppError, AppResult};
use docqa_search::{filter, RetrievedDocument, SearchClient, SearchOptions, SemanticOptions};

use crate::text::nonewlines;
use crate::types::Overrides;

/// Documents formatted for prompt assembly.
#[derive(Debug, Clone)]
pub struct Retrieved {
    /// One "sourcepage: text" line per document
    pub data_points: Vec<String>,

    /// The same lines joined with newlines, ready for the sources block
    pub content: String,
}

/// Retrieval capability shared by both approaches.
///
/// Holds the search client plus the index field names; immutable after
/// construction and safe to share across concurrent requests.
pub struct Retriever {
    search: Arc<dyn SearchClient>,
    sourcepage_field: String,
    content_field: String,
    semantic_configuration: String,
}

impl Retriever {
    /// Create a retriever over the given search client and field names.
    pub fn new(
        search: Arc<dyn SearchClient>,
        sourcepage_field: impl Into<String>,
        content_field: impl Into<String>,
        semantic_configuration: impl Into<String>,
    ) -> Self {
        Self {
            search,
            sourcepage_field: sourcepage_field.into(),
            content_field: content_field.into(),
            semantic_configuration: semantic_configuration.into(),
        }
    }

    /// Run one query and format the ranked documents.
    pub async fn retrieve(&self, query_text: &str, overrides: &Overrides) -> AppResult<Retrieved> {
        let options = self.search_options(overrides);

        tracing::debug!(
            "Retrieving up to {} documents for query: {}",
            options.top,
            query_text
        );

        let documents = self.search.search(query_text, &options).await?;

        tracing::debug!("Retrieved {} documents", documents.len());

        self.format_results(&documents, overrides.semantic_captions)
    }

    /// Build search options from the per-request overrides.
    fn search_options(&self, overrides: &Overrides) -> SearchOptions {
        let filter = overrides
            .exclude_category
            .as_deref()
            .map(filter::exclude_category);
        let top = overrides.top();

        if overrides.semantic_ranker {
            let mut semantic = SemanticOptions::new(self.semantic_configuration.as_str());
            if overrides.semantic_captions {
                semantic = semantic.with_extractive_captions();
            }
            SearchOptions::semantic(filter, top, semantic)
        } else {
            SearchOptions::keyword(filter, top)
        }
    }

    /// Format each document as a one-line `"sourcepage: text"` entry.
    ///
    /// With captions enabled the text is the caption snippets joined by
    /// `" . "`; otherwise it is the raw content field. Newlines are
    /// flattened either way so each source stays on one line.
    pub fn format_results(
        &self,
        documents: &[RetrievedDocument],
        use_captions: bool,
    ) -> AppResult<Retrieved> {
        let mut data_points = Vec::with_capacity(documents.len());

        for document in documents {
            let sourcepage = document.field(&self.sourcepage_field).ok_or_else(|| {
                AppError::Search(format!(
                    "Document is missing the '{}' field",
                    self.sourcepage_field
                ))
            })?;

            let text = if use_captions {
                document
                    .captions
                    .iter()
                    .map(|caption| caption.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" . ")
            } else {
                document
                    .field(&self.content_field)
                    .ok_or_else(|| {
                        AppError::Search(format!(
                            "Document is missing the '{}' field",
                            self.content_field
                        ))
                    })?
                    .to_string()
            };

            data_points.push(format!("{}: {}", sourcepage, nonewlines(&text)));
        }

        let content = data_points.join("\n");

        Ok(Retrieved {
            data_points,
            content,
        })
    }
}
