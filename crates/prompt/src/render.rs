//! Strict placeholder substitution.

use docqa_core::{AppError, AppResult};
use std::collections::HashMap;

/// Render a template by substituting `{name}` placeholders from `vars`.
///
/// Rules:
/// - Placeholder names match exactly and consist of ASCII alphanumerics and
///   underscores.
/// - `{{` and `}}` are literal braces.
/// - A placeholder without a binding is an error (templates fail loudly,
///   they are never silently blanked).
/// - A binding without a placeholder is fine; override templates may ignore
///   variables they do not use.
pub fn render(template: &str, vars: &HashMap<&str, &str>) -> AppResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => name.push(ch),
                        Some(ch) => {
                            return Err(AppError::Prompt(format!(
                                "Invalid character '{}' in template placeholder",
                                ch
                            )))
                        }
                        None => {
                            return Err(AppError::Prompt(
                                "Unclosed '{' in template".to_string(),
                            ))
                        }
                    }
                }

                if name.is_empty() {
                    return Err(AppError::Prompt(
                        "Empty placeholder '{}' in template".to_string(),
                    ));
                }

                match vars.get(name.as_str()) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(AppError::Prompt(format!(
                            "Unknown placeholder '{{{}}}' in template",
                            name
                        )))
                    }
                }
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(AppError::Prompt(
                        "Unmatched '}' in template".to_string(),
                    ));
                }
            }
            _ => out.push(c),
        }
    }

    tracing::trace!("Rendered template ({} chars)", out.len());

    Ok(out)
}
