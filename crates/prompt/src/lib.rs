//! Prompt template rendering for docqa.
//!
//! Templates use single-brace named placeholders (`{sources}`,
//! `{chat_history}`, ...) because that is the syntax callers use in
//! override templates. Rendering is strict: a placeholder with no binding is
//! an error, never a silent blank substitution.

pub mod render;

pub use render::render;
