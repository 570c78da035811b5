//! Data model shared by the approaches.

use serde::{Deserialize, Serialize};

/// One exchange in a conversation.
///
/// The ordered sequence of turns forms the chat history. The history is
/// owned by the caller and only ever grows by appending; the approaches
/// never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// What the user asked
    pub user: String,

    /// The assistant's reply; absent until answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<String>,
}

impl Turn {
    /// A turn carrying a user question with no reply yet.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: None,
        }
    }
}

/// Per-request configuration overriding approach defaults.
///
/// Validation is strict: the struct is fully typed, and deserializing a
/// wrong-typed value or an unknown key fails with a clear error before any
/// collaborator is called.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    /// Use extractive captions instead of full document content
    pub semantic_captions: bool,

    /// Maximum documents to retrieve (default 3)
    pub top: Option<u32>,

    /// Category filtered out via a "not equal" filter clause
    pub exclude_category: Option<String>,

    /// Use semantic ranking instead of plain keyword search
    pub semantic_ranker: bool,

    /// Append the follow-up-question instruction block to the prompt
    pub suggest_followup_questions: bool,

    /// Full prompt template replacement, or an injection into the built-in
    /// template when prefixed with the `>>>` sentinel
    pub prompt_template: Option<String>,

    /// Sampling temperature override
    pub temperature: Option<f32>,
}

impl Overrides {
    /// Default number of documents retrieved per query.
    pub const DEFAULT_TOP: u32 = 3;

    /// Effective document count.
    pub fn top(&self) -> u32 {
        self.top.unwrap_or(Self::DEFAULT_TOP)
    }

    /// Effective temperature given the approach's default.
    pub fn temperature_or(&self, default: f32) -> f32 {
        self.temperature.unwrap_or(default)
    }
}

/// Result of one approach run.
///
/// Created fresh per call and handed to the caller; nothing here outlives
/// the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproachResult {
    /// One "sourcepage: text" line per retrieved document
    pub data_points: Vec<String>,

    /// The generated answer
    pub answer: String,

    /// Diagnostic trace of the query and full prompt, with newlines
    /// rendered as `<br>` for display
    pub thoughts: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_defaults() {
        let overrides = Overrides::default();
        assert!(!overrides.semantic_captions);
        assert!(!overrides.semantic_ranker);
        assert!(!overrides.suggest_followup_questions);
        assert_eq!(overrides.top(), 3);
        assert_eq!(overrides.temperature_or(0.7), 0.7);
    }

    #[test]
    fn test_overrides_deserialization() {
        let overrides: Overrides = serde_json::from_str(
            r#"{"semantic_ranker": true, "top": 5, "exclude_category": "internal"}"#,
        )
        .unwrap();
        assert!(overrides.semantic_ranker);
        assert_eq!(overrides.top(), 5);
        assert_eq!(overrides.exclude_category.as_deref(), Some("internal"));
    }

    #[test]
    fn test_overrides_reject_wrong_types() {
        // A non-numeric top is a deserialization error, not undefined behavior
        assert!(serde_json::from_str::<Overrides>(r#"{"top": "three"}"#).is_err());
        assert!(serde_json::from_str::<Overrides>(r#"{"semantic_ranker": "yes"}"#).is_err());
    }

    #[test]
    fn test_overrides_reject_unknown_keys() {
        assert!(serde_json::from_str::<Overrides>(r#"{"semantic_rankr": true}"#).is_err());
    }

    #[test]
    fn test_turn_serialization_skips_missing_bot() {
        let turn = Turn::new("hello");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"user":"hello"}"#);
    }
}
