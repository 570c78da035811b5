//! Ask command handler.
//!
//! Runs the single-turn retrieve-then-read approach for one question.

use clap::Args;
use docqa_approaches::{Overrides, RetrieveThenReadApproach};
use docqa_core::{AppConfig, AppError, AppResult};

/// Answer a single question with retrieved sources
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub question: String,

    /// Maximum documents to retrieve
    #[arg(long)]
    pub top: Option<u32>,

    /// Category to exclude from retrieval
    #[arg(long)]
    pub exclude_category: Option<String>,

    /// Use semantic ranking instead of keyword search
    #[arg(long)]
    pub semantic_ranker: bool,

    /// Use extractive captions instead of full document content
    #[arg(long)]
    pub semantic_captions: bool,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Replacement prompt template, or an injection when prefixed with >>>
    #[arg(long)]
    pub prompt_template: Option<String>,

    /// Show the supporting source lines after the answer
    #[arg(long)]
    pub show_sources: bool,

    /// Output as JSON (answer, data points, and diagnostic trace)
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let retriever = super::build_retriever(config)?;
        let completions = super::build_completions(config)?;
        let approach = RetrieveThenReadApproach::new(
            retriever,
            completions,
            config.completions.answer_deployment.as_str(),
        );

        let result = approach.run(&self.question, &self.overrides()).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", result.answer);
            if self.show_sources {
                for line in &result.data_points {
                    println!("  {}", line);
                }
            }
        }

        Ok(())
    }

    /// Map CLI flags onto per-request overrides.
    fn overrides(&self) -> Overrides {
        Overrides {
            semantic_captions: self.semantic_captions,
            top: self.top,
            exclude_category: self.exclude_category.clone(),
            semantic_ranker: self.semantic_ranker,
            suggest_followup_questions: false,
            prompt_template: self.prompt_template.clone(),
            temperature: self.temperature,
        }
    }
}
