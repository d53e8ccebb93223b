//! Template model and placeholder handling
//!
//! A template is an ordered sequence of text blocks (the paragraph texts of
//! a Word document). Placeholders are `{{name}}` markers inside a block;
//! the inner name is whitespace-trimmed. Matching is block-granular: a
//! marker split across two blocks is never detected.

mod substitute;
mod tokenize;

pub use substitute::{substitute, Substitution};
pub use tokenize::extract_tokens;

/// Ordered, immutable sequence of text blocks.
///
/// The pipeline never mutates a template; substitution produces fresh
/// blocks and the source document stays the session's source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    blocks: Vec<String>,
}

impl Template {
    pub fn from_blocks<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocks: blocks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
