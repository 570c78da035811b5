//! Chat command handler.
//!
//! Runs a stdin REPL over the multi-turn approach. The conversation history
//! lives here, in the hosting layer, and grows by one turn per exchange;
//! the approach itself never holds state between calls.

use std::io::{self, BufRead, Write};

use clap::Args;
use docqa_approaches::{ChatReadRetrieveReadApproach, Overrides, Turn};
use docqa_core::{AppConfig, AppError, AppResult};

/// Interactive multi-turn chat over the index
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Maximum documents to retrieve per question
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

    /// Ask the model to suggest follow-up questions after each answer
    #[arg(long)]
    pub suggest_followups: bool,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Replacement prompt template, or an injection when prefixed with >>>
    #[arg(long)]
    pub prompt_template: Option<String>,

    /// Show the supporting source lines after each answer
    #[arg(long)]
    pub show_sources: bool,

    /// Output each result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let retriever = super::build_retriever(config)?;
        let completions = super::build_completions(config)?;
        let approach = ChatReadRetrieveReadApproach::new(
            retriever,
            completions,
            config.completions.answer_deployment.as_str(),
            config.completions.query_deployment.as_str(),
        );

        let overrides = self.overrides();
        let stdin = io::stdin();
        let mut history: Vec<Turn> = Vec::new();

        loop {
            print!("> ");
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break; // EOF
            }

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question == "exit" || question == "quit" {
                break;
            }

            history.push(Turn::new(question));
            let result = approach.run(&history, &overrides).await?;

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

            // Record the reply so the next turn sees the full exchange
            if let Some(last) = history.last_mut() {
                last.bot = Some(result.answer);
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
            suggest_followup_questions: self.suggest_followups,
            prompt_template: self.prompt_template.clone(),
            temperature: self.temperature,
        }
    }
}
