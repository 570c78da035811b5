//! Search client abstraction and the Azure Cognitive Search implementation.

use async_trait::async_trait;
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Caption, RetrievedDocument, SearchOptions};

/// Trait for the search collaborator.
///
/// The approaches depend on this seam rather than a concrete client, so
/// retrieval can be stubbed in tests and swapped between services. The
/// client holds only immutable configuration and must be safe to share
/// across concurrent requests.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one query against the index and return the ranked documents.
    async fn search(
        &self,
        query_text: &str,
        options: &SearchOptions,
    ) -> AppResult<Vec<RetrievedDocument>>;
}

/// Search request wire format.
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
    top: u32,
    #[serde(rename = "queryType", skip_serializing_if = "Option::is_none")]
    query_type: Option<&'a str>,
    #[serde(rename = "queryLanguage", skip_serializing_if = "Option::is_none")]
    query_language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speller: Option<&'a str>,
    #[serde(
        rename = "semanticConfiguration",
        skip_serializing_if = "Option::is_none"
    )]
    semantic_configuration: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    captions: Option<&'a str>,
}

/// Search response wire format. Documents are returned under `value`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    value: Vec<RawDocument>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    /// Extractive captions ride alongside the index fields
    #[serde(rename = "@search.captions", default)]
    captions: Vec<Caption>,

    /// Everything else is an index field (plus `@search.*` metadata)
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// REST client for an Azure Cognitive Search endpoint.
pub struct AzureSearchClient {
    endpoint: String,
    index: String,
    api_version: String,
    api_key: String,
    client: reqwest::Client,
}

impl AzureSearchClient {
    /// Create a client for one index.
    pub fn new(
        endpoint: impl Into<String>,
        index: impl Into<String>,
        api_version: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            index: index.into(),
            api_version: api_version.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert query text and options to the wire format.
    fn to_search_request<'a>(query_text: &'a str, options: &'a SearchOptions) -> SearchRequest<'a> {
        match &options.semantic {
            Some(semantic) => SearchRequest {
                search: query_text,
                filter: options.filter.as_deref(),
                top: options.top,
                query_type: Some("semantic"),
                query_language: Some(&semantic.language),
                speller: Some(&semantic.speller),
                semantic_configuration: Some(&semantic.configuration),
                captions: semantic.captions.as_deref(),
            },
            None => SearchRequest {
                search: query_text,
                filter: options.filter.as_deref(),
                top: options.top,
                query_type: None,
                query_language: None,
                speller: None,
                semantic_configuration: None,
                captions: None,
            },
        }
    }
}

#[async_trait]
impl SearchClient for AzureSearchClient {
    async fn search(
        &self,
        query_text: &str,
        options: &SearchOptions,
    ) -> AppResult<Vec<RetrievedDocument>> {
        let url = format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.index,
            self.api_version
        );
        let request = Self::to_search_request(query_text, options);

        tracing::debug!("Searching index '{}' for: {}", self.index, query_text);

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Failed to send search request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Search(format!(
                "Search API error ({}): {}",
                status, error_text
            )));
        }

        let response: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search response: {}", e)))?;

        tracing::debug!("Search returned {} documents", response.value.len());

        Ok(response
            .value
            .into_iter()
            .map(|doc| RetrievedDocument {
                fields: doc.fields,
                captions: doc.captions,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SemanticOptions;

    #[test]
    fn test_keyword_request_omits_semantic_fields() {
        let options = SearchOptions::keyword(Some("category ne 'x'".to_string()), 3);
        let request = AzureSearchClient::to_search_request("leave policy", &options);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["search"], "leave policy");
        assert_eq!(json["filter"], "category ne 'x'");
        assert_eq!(json["top"], 3);
        assert!(json.get("queryType").is_none());
        assert!(json.get("queryLanguage").is_none());
        assert!(json.get("captions").is_none());
    }

    #[test]
    fn test_semantic_request_fields() {
        let options = SearchOptions::semantic(
            None,
            5,
            SemanticOptions::new("default").with_extractive_captions(),
        );
        let request = AzureSearchClient::to_search_request("leave policy", &options);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["queryType"], "semantic");
        assert_eq!(json["queryLanguage"], "en-us");
        assert_eq!(json["speller"], "lexicon");
        assert_eq!(json["semanticConfiguration"], "default");
        assert_eq!(json["captions"], "extractive|highlight-false");
        assert!(json.get("filter").is_none());
    }

    #[test]
    fn test_parse_response_with_captions() {
        let body = r#"{
            "value": [
                {
                    "@search.score": 1.23,
                    "@search.captions": [{"text": "first"}, {"text": "second"}],
                    "sourcepage": "info1.pdf",
                    "content": "full text"
                }
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.value.len(), 1);

        let doc = &response.value[0];
        assert_eq!(doc.captions.len(), 2);
        assert_eq!(doc.captions[0].text, "first");
        assert_eq!(doc.fields.get("sourcepage").unwrap(), "info1.pdf");
        assert_eq!(doc.fields.get("content").unwrap(), "full text");
    }

    #[test]
    fn test_parse_response_without_captions() {
        let body = r#"{"value": [{"sourcepage": "a.pdf", "content": "text"}]}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(response.value[0].captions.is_empty());
    }
}
