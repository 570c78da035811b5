//! Configuration management for docqa.
//!
//! Configuration is layered from multiple sources, later sources winning:
//! built-in defaults, a YAML config file, environment variables, and
//! command-line flags.
//!
//! Everything the two collaborator clients need (endpoints, index and field
//! names, deployments, credential locations) lives in this struct and is
//! injected at construction time. No ambient process-wide client state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Search collaborator settings
    pub search: SearchConfig,

    /// Completion collaborator settings
    pub completions: CompletionsConfig,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Settings for the hosted search index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Service endpoint URL (e.g. "https://myservice.search.windows.net")
    pub endpoint: String,

    /// Index name to query
    pub index: String,

    /// REST API version
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "apiKeyEnv")]
    pub api_key_env: String,

    /// Document field holding the source page identifier
    #[serde(rename = "sourcepageField")]
    pub sourcepage_field: String,

    /// Document field holding the passage content
    #[serde(rename = "contentField")]
    pub content_field: String,

    /// Semantic configuration name used in semantic-ranker mode
    #[serde(rename = "semanticConfiguration")]
    pub semantic_configuration: String,
}

/// Settings for the hosted completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionsConfig {
    /// Provider identifier (currently "azure")
    pub provider: String,

    /// Service endpoint URL (e.g. "https://myservice.openai.azure.com")
    pub endpoint: String,

    /// REST API version
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "apiKeyEnv")]
    pub api_key_env: String,

    /// Deployment used to generate answers
    #[serde(rename = "answerDeployment")]
    pub answer_deployment: String,

    /// Deployment used to rewrite chat history into a search query
    #[serde(rename = "queryDeployment")]
    pub query_deployment: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            index: String::new(),
            api_version: "2021-04-30-Preview".to_string(),
            api_key_env: "DOCQA_SEARCH_KEY".to_string(),
            sourcepage_field: "sourcepage".to_string(),
            content_field: "content".to_string(),
            semantic_configuration: "default".to_string(),
        }
    }
}

impl Default for CompletionsConfig {
    fn default() -> Self {
        Self {
            provider: "azure".to_string(),
            endpoint: String::new(),
            api_version: "2022-12-01".to_string(),
            api_key_env: "DOCQA_OPENAI_KEY".to_string(),
            answer_deployment: "davinci".to_string(),
            query_deployment: "davinci".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            search: SearchConfig::default(),
            completions: CompletionsConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

/// Full configuration file structure.
///
/// Every field is optional so a file can set only what it needs.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    search: Option<SearchFileConfig>,
    completions: Option<CompletionsFileConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchFileConfig {
    endpoint: Option<String>,
    index: Option<String>,
    #[serde(rename = "apiVersion")]
    api_version: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    #[serde(rename = "sourcepageField")]
    sourcepage_field: Option<String>,
    #[serde(rename = "contentField")]
    content_field: Option<String>,
    #[serde(rename = "semanticConfiguration")]
    semantic_configuration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionsFileConfig {
    provider: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiVersion")]
    api_version: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    #[serde(rename = "answerDeployment")]
    answer_deployment: Option<String>,
    #[serde(rename = "queryDeployment")]
    query_deployment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `DOCQA_CONFIG`: path to the config file (default: `docqa.yaml`)
    /// - `DOCQA_SEARCH_ENDPOINT`: search service endpoint
    /// - `DOCQA_SEARCH_INDEX`: search index name
    /// - `DOCQA_OPENAI_ENDPOINT`: completion service endpoint
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an explicit config file path taking
    /// precedence over `DOCQA_CONFIG`.
    pub fn load_from(config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(config_file) = config_file {
            config.config_file = Some(config_file.to_path_buf());
        } else if let Ok(config_file) = std::env::var("DOCQA_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("docqa.yaml"));

        if config_path.exists() {
            let file = Self::read_config_file(&config_path)?;
            config.merge_file(file);
        }

        // Environment variables override the file
        if let Ok(endpoint) = std::env::var("DOCQA_SEARCH_ENDPOINT") {
            config.search.endpoint = endpoint;
        }
        if let Ok(index) = std::env::var("DOCQA_SEARCH_INDEX") {
            config.search.index = index;
        }
        if let Ok(endpoint) = std::env::var("DOCQA_OPENAI_ENDPOINT") {
            config.completions.endpoint = endpoint;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    fn read_config_file(path: &Path) -> AppResult<ConfigFile> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Merge a parsed configuration file into this config.
    fn merge_file(&mut self, file: ConfigFile) {
        if let Some(search) = file.search {
            merge_opt(&mut self.search.endpoint, search.endpoint);
            merge_opt(&mut self.search.index, search.index);
            merge_opt(&mut self.search.api_version, search.api_version);
            merge_opt(&mut self.search.api_key_env, search.api_key_env);
            merge_opt(&mut self.search.sourcepage_field, search.sourcepage_field);
            merge_opt(&mut self.search.content_field, search.content_field);
            merge_opt(
                &mut self.search.semantic_configuration,
                search.semantic_configuration,
            );
        }

        if let Some(completions) = file.completions {
            merge_opt(&mut self.completions.provider, completions.provider);
            merge_opt(&mut self.completions.endpoint, completions.endpoint);
            merge_opt(&mut self.completions.api_version, completions.api_version);
            merge_opt(&mut self.completions.api_key_env, completions.api_key_env);
            merge_opt(
                &mut self.completions.answer_deployment,
                completions.answer_deployment,
            );
            merge_opt(
                &mut self.completions.query_deployment,
                completions.query_deployment,
            );
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }
    }

    /// Apply CLI overrides, which take precedence over everything else.
    pub fn with_overrides(
        mut self,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Check that everything needed to reach the collaborators is present.
    pub fn validate(&self) -> AppResult<()> {
        if self.search.endpoint.is_empty() {
            return Err(AppError::Config(
                "Search endpoint is not configured (set search.endpoint or DOCQA_SEARCH_ENDPOINT)"
                    .to_string(),
            ));
        }
        if self.search.index.is_empty() {
            return Err(AppError::Config(
                "Search index is not configured (set search.index or DOCQA_SEARCH_INDEX)"
                    .to_string(),
            ));
        }
        if self.completions.endpoint.is_empty() {
            return Err(AppError::Config(
                "Completion endpoint is not configured (set completions.endpoint or DOCQA_OPENAI_ENDPOINT)"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the search API key from the configured environment variable.
    pub fn resolve_search_api_key(&self) -> AppResult<String> {
        std::env::var(&self.search.api_key_env).map_err(|_| {
            AppError::Config(format!(
                "Search API key not found in environment variable {}",
                self.search.api_key_env
            ))
        })
    }

    /// Resolve the completion API key from the configured environment variable.
    pub fn resolve_completions_api_key(&self) -> AppResult<String> {
        std::env::var(&self.completions.api_key_env).map_err(|_| {
            AppError::Config(format!(
                "Completion API key not found in environment variable {}",
                self.completions.api_key_env
            ))
        })
    }
}

fn merge_opt(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.search.sourcepage_field, "sourcepage");
        assert_eq!(config.search.content_field, "content");
        assert_eq!(config.search.semantic_configuration, "default");
        assert_eq!(config.completions.provider, "azure");
        assert!(!config.verbose);
    }

    #[test]
    fn test_merge_file() {
        let yaml = r#"
search:
  endpoint: https://example.search.windows.net
  index: docs
  contentField: body
completions:
  endpoint: https://example.openai.azure.com
  answerDeployment: chat
  queryDeployment: query
logging:
  level: debug
  color: false
"#;
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        let mut config = AppConfig::default();
        config.merge_file(file);

        assert_eq!(config.search.endpoint, "https://example.search.windows.net");
        assert_eq!(config.search.index, "docs");
        assert_eq!(config.search.content_field, "body");
        // Untouched fields keep their defaults
        assert_eq!(config.search.sourcepage_field, "sourcepage");
        assert_eq!(config.completions.answer_deployment, "chat");
        assert_eq!(config.completions.query_deployment, "query");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.no_color);
    }

    #[test]
    fn test_validate_requires_endpoints() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.search.endpoint = "https://s.example".to_string();
        config.search.index = "docs".to_string();
        config.completions.endpoint = "https://c.example".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_overrides_verbose_implies_debug() {
        let config = AppConfig::default().with_overrides(None, true, false);
        assert!(config.verbose);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }
}
