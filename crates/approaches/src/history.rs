//! Chat history rendering for the completion prompt.
//!
//! The completion endpoint takes one prompt string, so history is framed
//! with chat-markup delimiters; the same delimiters double as stop tokens
//! for the final completion.

use crate::types::Turn;

/// Marker opening a turn in the chat-markup prompt format.
pub const TURN_START: &str = "<|im_start|>";

/// Marker closing a turn.
pub const TURN_END: &str = "<|im_end|>";

/// Default history budget, in approximate tokens (one token ≈ 4 characters).
pub const DEFAULT_APPROX_MAX_TOKENS: usize = 1000;

/// Render history as chat-markup text, oldest turn first.
///
/// Turns are accumulated newest-first and dropped whole, oldest first, once
/// the accumulated length exceeds `approx_max_tokens * 4` characters. The
/// budget check runs after a turn is added, so the most recent qualifying
/// turn is always present even when it alone exceeds the budget.
///
/// With `include_last_turn = false` the final turn is left out entirely;
/// the query-rewriting stage uses this so the active question is not
/// repeated inside the history block.
pub fn chat_history_as_text(
    history: &[Turn],
    include_last_turn: bool,
    approx_max_tokens: usize,
) -> String {
    let turns = if include_last_turn {
        history
    } else {
        &history[..history.len().saturating_sub(1)]
    };

    let mut text = String::new();
    for turn in turns.iter().rev() {
        // The assistant close marker only appears when there is a reply
        let assistant = match &turn.bot {
            Some(bot) => format!("{}{}", bot, TURN_END),
            None => String::new(),
        };
        let block = format!(
            "{}user\n{}\n{}\n{}assistant\n{}\n",
            TURN_START, turn.user, TURN_END, TURN_START, assistant
        );
        text.insert_str(0, &block);
        if text.chars().count() > approx_max_tokens * 4 {
            break;
        }
    }
    text
}
