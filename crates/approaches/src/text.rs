//! Text cleanup helpers.

/// Replace newline characters with single spaces.
///
/// Keeps each retrieved source on one logical line of the prompt, so the
/// "sourcepage: text" entries stay newline-separated from each other.
pub fn nonewlines(text: &str) -> String {
    text.replace('\n', " ").replace('\r', " ")
}
