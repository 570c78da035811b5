//! Single-turn retrieve-then-read approach.
//!
//! Retrieves top documents for the raw question, formats one few-shot
//! prompt with them, and requests a single completion as the answer.

use std::collections::HashMap;
use std::sync::Arc;

use docqa_core::AppResult;
use docqa_llm::{CompletionClient, CompletionRequest};
use docqa_prompt::render;

use crate::retrieval::Retriever;
use crate::types::{ApproachResult, Overrides};

/// Built-in few-shot template. `{q}` is the question, `{retrieved}` the
/// newline-joined source lines.
const ANSWER_TEMPLATE: &str = "\
You are an intelligent assistant helping employees with questions about the company's internal documentation. \
Use 'you' to refer to the individual asking the questions even if they ask with 'I'. \
Answer the following question using only the data provided in the sources below. \
Each source has a name followed by colon and the actual information; always include the source name for each fact you use in the response. \
If you cannot answer using the sources below, say that you don't have the data at this moment.

###
Question: 'What leave can I take without it counting against my annual leave?'

Sources:
info1.pdf: Leave in the following cases is paid and does not count against annual leave, a) Marriage of the employee, b) Marriage of a child, c) Moving house
info2.pdf: d) Birth of a child e) Bereavement in the immediate family

Answer:
According to info1 [info1.pdf] and info2 [info2.pdf], paid leave that does not count against annual leave covers: <br><br>
a) Marriage of the employee [info1.pdf]<br>
b) Marriage of a child [info1.pdf]<br>
c) Moving house [info1.pdf]<br>
d) Birth of a child [info2.pdf]<br>
e) Bereavement in the immediate family [info2.pdf]

###
Question: '{q}'?

Sources:
{retrieved}

Answer:
";

const DEFAULT_TEMPERATURE: f32 = 0.3;
const MAX_ANSWER_TOKENS: u32 = 2048;

/// Single-turn question answering over the search index.
pub struct RetrieveThenReadApproach {
    retriever: Retriever,
    completions: Arc<dyn CompletionClient>,
    deployment: String,
}

impl RetrieveThenReadApproach {
    /// Create the approach over its two collaborators.
    pub fn new(
        retriever: Retriever,
        completions: Arc<dyn CompletionClient>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            retriever,
            completions,
            deployment: deployment.into(),
        }
    }

    /// Answer one question.
    pub async fn run(&self, question: &str, overrides: &Overrides) -> AppResult<ApproachResult> {
        tracing::info!("Answering question: {}", question);

        let retrieved = self.retriever.retrieve(question, overrides).await?;

        let template = overrides
            .prompt_template
            .as_deref()
            .unwrap_or(ANSWER_TEMPLATE);
        let prompt = render(
            template,
            &HashMap::from([("q", question), ("retrieved", retrieved.content.as_str())]),
        )?;

        let request = CompletionRequest::new(&self.deployment, &prompt)
            .with_temperature(overrides.temperature_or(DEFAULT_TEMPERATURE))
            .with_max_tokens(MAX_ANSWER_TOKENS);
        let completion = self.completions.complete(&request).await?;

        Ok(ApproachResult {
            data_points: retrieved.data_points,
            answer: completion.text,
            thoughts: format!(
                "Question:<br>{}<br><br>Prompt:<br>{}",
                question,
                prompt.replace('\n', "<br>")
            ),
        })
    }
}
