//! Multi-turn chat approach: read the history, retrieve, read the sources.
//!
//! Three completions-era stages: rewrite the chat history and last question
//! into a search query, retrieve documents with it, then answer with a
//! chat-markup prompt carrying the history and sources.

use std::collections::HashMap;
use std::sync::Arc;

use docqa_core::{AppError, AppResult};
use docqa_llm::{CompletionClient, CompletionRequest};
use docqa_prompt::render;

use crate::history::{chat_history_as_text, DEFAULT_APPROX_MAX_TOKENS, TURN_END, TURN_START};
use crate::retrieval::Retriever;
use crate::types::{ApproachResult, Overrides, Turn};

/// Prefix marking a prompt override as an injection into the built-in
/// template rather than a replacement of it.
pub const INJECTION_SENTINEL: &str = ">>>";

/// Built-in chat prompt. The system block carries the instructions, the
/// optional injected text, and the sources; the rendered history follows.
const PROMPT_PREFIX: &str = "<|im_start|>system
The assistant helps employees with questions about the company's internal documentation. Be brief in your answers.
Answer ONLY with the facts listed in the list of sources below. If there isn't enough information below, say you don't know. Do not generate answers that don't use the sources below. If asking a clarifying question to the user would help, ask the question.
Each source has a name followed by colon and the actual information; always include the source name for each fact you use in the response. Use square brackets to reference the source, e.g. [info1.pdf]. Don't combine sources, list each source separately, e.g. [info1.pdf][info2.pdf].
{follow_up_questions_prompt}
{injected_prompt}
Sources:
{sources}
<|im_end|>
{chat_history}
";

/// Suffix block appended when follow-up suggestions are requested.
const FOLLOW_UP_QUESTIONS_PROMPT: &str = "Generate three very brief follow-up questions that the user would likely ask next about the documentation. Use double angle brackets to reference the questions, e.g. <<Is parental leave paid?>>. Try not to repeat questions that have already been asked. Only generate questions and do not generate any text before or after the questions.";

/// Template turning chat history plus the new question into a search query.
const QUERY_PROMPT_TEMPLATE: &str = "Below is a history of the conversation so far, and a new question asked by the user that needs to be answered by searching the documentation index. Generate a search query based on the conversation and the new question.

Chat History:
{chat_history}

Question:
{question}

Search query:
";

const QUERY_TEMPERATURE: f32 = 0.0;
const QUERY_MAX_TOKENS: u32 = 32;
const DEFAULT_ANSWER_TEMPERATURE: f32 = 0.7;
const MAX_ANSWER_TOKENS: u32 = 3072;

/// Multi-turn question answering over the search index.
pub struct ChatReadRetrieveReadApproach {
    retriever: Retriever,
    completions: Arc<dyn CompletionClient>,
    answer_deployment: String,
    query_deployment: String,
}

impl ChatReadRetrieveReadApproach {
    /// Create the approach over its two collaborators.
    pub fn new(
        retriever: Retriever,
        completions: Arc<dyn CompletionClient>,
        answer_deployment: impl Into<String>,
        query_deployment: impl Into<String>,
    ) -> Self {
        Self {
            retriever,
            completions,
            answer_deployment: answer_deployment.into(),
            query_deployment: query_deployment.into(),
        }
    }

    /// Answer the last question in a non-empty chat history.
    pub async fn run(&self, history: &[Turn], overrides: &Overrides) -> AppResult<ApproachResult> {
        let last_turn = history.last().ok_or_else(|| {
            AppError::Approach(
                "Chat history is empty; the last turn must carry the active question".to_string(),
            )
        })?;

        // Stage A: rewrite history + question into a keyword search query
        let history_text = chat_history_as_text(history, false, DEFAULT_APPROX_MAX_TOKENS);
        let query_prompt = render(
            QUERY_PROMPT_TEMPLATE,
            &HashMap::from([
                ("chat_history", history_text.as_str()),
                ("question", last_turn.user.as_str()),
            ]),
        )?;
        let query_request = CompletionRequest::new(&self.query_deployment, &query_prompt)
            .with_temperature(QUERY_TEMPERATURE)
            .with_max_tokens(QUERY_MAX_TOKENS)
            .with_stop(["\n"]);
        let query = self.completions.complete(&query_request).await?.text;

        tracing::info!("Rewrote question into search query: {}", query);

        // Stage B: retrieve documents with the rewritten query
        let retrieved = self.retriever.retrieve(&query, overrides).await?;

        // Stage C: assemble the answer prompt
        let follow_up_questions_prompt = if overrides.suggest_followup_questions {
            FOLLOW_UP_QUESTIONS_PROMPT
        } else {
            ""
        };
        let chat_history = chat_history_as_text(history, true, DEFAULT_APPROX_MAX_TOKENS);
        let prompt = build_answer_prompt(
            overrides.prompt_template.as_deref(),
            &retrieved.content,
            &chat_history,
            follow_up_questions_prompt,
        )?;

        // Stage D: generate the answer, stopping at turn boundaries
        let answer_request = CompletionRequest::new(&self.answer_deployment, &prompt)
            .with_temperature(overrides.temperature_or(DEFAULT_ANSWER_TEMPERATURE))
            .with_max_tokens(MAX_ANSWER_TOKENS)
            .with_stop([TURN_END, TURN_START]);
        let completion = self.completions.complete(&answer_request).await?;

        Ok(ApproachResult {
            data_points: retrieved.data_points,
            answer: completion.text,
            thoughts: format!(
                "Searched for:<br>{}<br><br>Prompt:<br>{}",
                query,
                prompt.replace('\n', "<br>")
            ),
        })
    }
}

/// Resolve the answer prompt in one of three modes: the built-in template,
/// a sentinel-marked injection into it, or a full replacement.
fn build_answer_prompt(
    override_template: Option<&str>,
    sources: &str,
    chat_history: &str,
    follow_up_questions_prompt: &str,
) -> AppResult<String> {
    match override_template {
        None => render(
            PROMPT_PREFIX,
            &HashMap::from([
                ("injected_prompt", ""),
                ("sources", sources),
                ("chat_history", chat_history),
                ("follow_up_questions_prompt", follow_up_questions_prompt),
            ]),
        ),
        Some(template) if template.starts_with(INJECTION_SENTINEL) => {
            let injected = format!("{}\n", &template[INJECTION_SENTINEL.len()..]);
            render(
                PROMPT_PREFIX,
                &HashMap::from([
                    ("injected_prompt", injected.as_str()),
                    ("sources", sources),
                    ("chat_history", chat_history),
                    ("follow_up_questions_prompt", follow_up_questions_prompt),
                ]),
            )
        }
        Some(template) => render(
            template,
            &HashMap::from([
                ("sources", sources),
                ("chat_history", chat_history),
                ("follow_up_questions_prompt", follow_up_questions_prompt),
            ]),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{document, ScriptedCompletions, StubSearchClient};

    fn two_document_retriever() -> Retriever {
        let stub = StubSearchClient::new(vec![
            document(&[("sourcepage", "info1.pdf"), ("content", "a) Marriage")]),
            document(&[("sourcepage", "info2.pdf"), ("content", "b) Birth")]),
        ]);
        Retriever::new(Arc::new(stub), "sourcepage", "content", "default")
    }

    fn approach(completions: Arc<ScriptedCompletions>) -> ChatReadRetrieveReadApproach {
        ChatReadRetrieveReadApproach::new(two_document_retriever(), completions, "chat", "query")
    }

    #[tokio::test]
    async fn test_empty_history_fails_fast() {
        let approach = approach(Arc::new(ScriptedCompletions::new(Vec::<String>::new())));
        let err = approach.run(&[], &Overrides::default()).await.unwrap_err();
        assert!(err.to_string().contains("history is empty"));
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let completions = Arc::new(ScriptedCompletions::new(["leave policy", "final answer"]));
        let requests = completions.requests.clone();
        let approach = approach(completions);

        let history = vec![Turn::new("What is the leave policy?")];
        let result = approach.run(&history, &Overrides::default()).await.unwrap();

        assert_eq!(
            result.data_points,
            vec!["info1.pdf: a) Marriage", "info2.pdf: b) Birth"]
        );
        assert_eq!(result.answer, "final answer");
        assert!(result.thoughts.starts_with("Searched for:<br>leave policy"));

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);

        // Stage A: query rewriting against the query deployment
        let rewrite = &requests[0];
        assert_eq!(rewrite.deployment, "query");
        assert_eq!(rewrite.temperature, 0.0);
        assert_eq!(rewrite.max_tokens, 32);
        assert_eq!(rewrite.stop, vec!["\n".to_string()]);
        assert!(rewrite.prompt.contains("Question:\nWhat is the leave policy?"));
        // A single-turn history contributes nothing before the question
        assert!(rewrite.prompt.contains("Chat History:\n\n"));

        // Stage D: final answer against the answer deployment
        let answer = &requests[1];
        assert_eq!(answer.deployment, "chat");
        assert_eq!(answer.temperature, 0.7);
        assert_eq!(answer.max_tokens, 3072);
        assert_eq!(
            answer.stop,
            vec!["<|im_end|>".to_string(), "<|im_start|>".to_string()]
        );
        // Both source lines inside the sources section, newline-joined
        assert!(answer
            .prompt
            .contains("Sources:\ninfo1.pdf: a) Marriage\ninfo2.pdf: b) Birth"));
        // History including the active question follows the system block
        assert!(answer
            .prompt
            .contains("<|im_start|>user\nWhat is the leave policy?"));
    }

    #[tokio::test]
    async fn test_run_rewritten_query_drives_retrieval() {
        let stub = StubSearchClient::new(vec![document(&[
            ("sourcepage", "a.pdf"),
            ("content", "text"),
        ])]);
        let calls = stub.calls.clone();
        let retriever = Retriever::new(Arc::new(stub), "sourcepage", "content", "default");
        let completions = Arc::new(ScriptedCompletions::new(["rewritten query", "answer"]));
        let approach =
            ChatReadRetrieveReadApproach::new(retriever, completions, "chat", "query");

        let history = vec![Turn::new("what about it?")];
        approach.run(&history, &Overrides::default()).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].0, "rewritten query");
    }

    #[test]
    fn test_sentinel_injects_exactly_the_body_and_newline() {
        let base = build_answer_prompt(None, "S", "H", "FU").unwrap();
        let injected = build_answer_prompt(Some(">>>X"), "S", "H", "FU").unwrap();
        // The injected-prompt region is exactly "X\n"
        assert_eq!(injected, base.replacen("FU\n", "FU\nX\n", 1));
    }

    #[test]
    fn test_full_replacement_substitutes_three_placeholders() {
        let template = "Answer from {sources} given {chat_history}{follow_up_questions_prompt}";
        let prompt =
            build_answer_prompt(Some(template), "the sources", "the history", "").unwrap();
        assert_eq!(prompt, "Answer from the sources given the history");
    }

    #[test]
    fn test_full_replacement_with_unknown_placeholder_fails_loudly() {
        let template = "Custom {sources} {injected_prompt}";
        let err = build_answer_prompt(Some(template), "S", "H", "").unwrap_err();
        assert!(err.to_string().contains("injected_prompt"));
    }

    #[tokio::test]
    async fn test_follow_up_block_presence() {
        let completions = Arc::new(ScriptedCompletions::new(["q", "a"]));
        let requests = completions.requests.clone();
        let approach = approach(completions);

        let history = vec![Turn::new("hello")];
        let overrides = Overrides {
            suggest_followup_questions: true,
            ..Overrides::default()
        };
        approach.run(&history, &overrides).await.unwrap();

        let requests = requests.lock().unwrap();
        assert!(requests[1].prompt.contains(FOLLOW_UP_QUESTIONS_PROMPT));
    }

    #[tokio::test]
    async fn test_follow_up_block_absent_by_default() {
        let completions = Arc::new(ScriptedCompletions::new(["q", "a"]));
        let requests = completions.requests.clone();
        let approach = approach(completions);

        let history = vec![Turn::new("hello")];
        approach.run(&history, &Overrides::default()).await.unwrap();

        let requests = requests.lock().unwrap();
        assert!(!requests[1].prompt.contains("follow-up questions"));
        assert!(!requests[1].prompt.contains(FOLLOW_UP_QUESTIONS_PROMPT));
    }

    #[tokio::test]
    async fn test_history_rendered_without_last_turn_in_rewrite_prompt() {
        let completions = Arc::new(ScriptedCompletions::new(["q", "a"]));
        let requests = completions.requests.clone();
        let approach = approach(completions);

        let history = vec![
            Turn {
                user: "earlier question".to_string(),
                bot: Some("earlier answer".to_string()),
            },
            Turn::new("active question"),
        ];
        approach.run(&history, &Overrides::default()).await.unwrap();

        let requests = requests.lock().unwrap();
        let rewrite = &requests[0];
        assert!(rewrite.prompt.contains("earlier question"));
        // The active question appears only in the Question block, not in
        // the rendered history
        let history_block = rewrite
            .prompt
            .split("Question:")
            .next()
            .unwrap()
            .to_string();
        assert!(!history_block.contains("active question"));

        // The final prompt's history does include the active question
        assert!(requests[1]
            .prompt
            .contains("<|im_start|>user\nactive question"));
    }
}
