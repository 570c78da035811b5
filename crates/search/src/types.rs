//! Search request and document types.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Extractive caption returned by the search service for a matched document.
#[derive(Debug, Clone, Deserialize)]
pub struct Caption {
    /// Caption text snippet
    pub text: String,
}

/// A ranked document returned by the search service.
///
/// Index schemas differ between deployments, so the fields are kept as a
/// dynamic map and read by name; the field names themselves come from
/// configuration. Documents are read-only once returned.
#[derive(Debug, Clone, Default)]
pub struct RetrievedDocument {
    /// Raw index fields keyed by field name
    pub fields: Map<String, Value>,

    /// Extractive captions; populated only when requested in semantic mode
    pub captions: Vec<Caption>,
}

impl RetrievedDocument {
    /// Read a string field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Options for a single search call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// OData filter expression, e.g. `category ne 'internal'`
    pub filter: Option<String>,

    /// Maximum number of documents to return
    pub top: u32,

    /// Semantic-ranker settings; `None` means plain keyword search
    pub semantic: Option<SemanticOptions>,
}

impl SearchOptions {
    /// Plain keyword search with only filter and top.
    pub fn keyword(filter: Option<String>, top: u32) -> Self {
        Self {
            filter,
            top,
            semantic: None,
        }
    }

    /// Semantic-ranked search.
    pub fn semantic(filter: Option<String>, top: u32, semantic: SemanticOptions) -> Self {
        Self {
            filter,
            top,
            semantic: Some(semantic),
        }
    }
}

/// Settings applied when the semantic ranker is requested.
#[derive(Debug, Clone)]
pub struct SemanticOptions {
    /// Semantic configuration name defined on the index
    pub configuration: String,

    /// Query language
    pub language: String,

    /// Query speller
    pub speller: String,

    /// Caption mode, e.g. `extractive|highlight-false`
    pub captions: Option<String>,
}

impl SemanticOptions {
    /// Query language sent in semantic mode.
    pub const QUERY_LANGUAGE: &'static str = "en-us";

    /// Query speller sent in semantic mode.
    pub const QUERY_SPELLER: &'static str = "lexicon";

    /// Caption mode requesting extractive captions without highlighting.
    pub const EXTRACTIVE_CAPTIONS: &'static str = "extractive|highlight-false";

    /// Create semantic options for the given configuration name.
    pub fn new(configuration: impl Into<String>) -> Self {
        Self {
            configuration: configuration.into(),
            language: Self::QUERY_LANGUAGE.to_string(),
            speller: Self::QUERY_SPELLER.to_string(),
            captions: None,
        }
    }

    /// Request extractive captions with highlighting disabled.
    pub fn with_extractive_captions(mut self) -> Self {
        self.captions = Some(Self::EXTRACTIVE_CAPTIONS.to_string());
        self
    }
}
