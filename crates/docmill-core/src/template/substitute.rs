//! Best-effort placeholder substitution
//!
//! Bound tokens are replaced everywhere they occur; unbound tokens stay as
//! literal `{{token}}` text so that partially corrected bindings still
//! produce a usable document. Callers get the unresolved count back and
//! decide whether to warn.

use crate::bind::Binding;
use crate::template::Template;

/// Result of substituting one template against one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Substituted text blocks, same order and count as the template.
    pub blocks: Vec<String>,
    /// Number of placeholder occurrences left verbatim because the binding
    /// had no value for them.
    pub unresolved: usize,
}

/// Substitute every bound `{{token}}` occurrence in the template.
///
/// The template itself is untouched; all non-placeholder text and block
/// ordering are preserved exactly. Multiple occurrences of the same token
/// within one block are all replaced.
pub fn substitute(template: &Template, binding: &Binding) -> Substitution {
    let mut blocks = Vec::with_capacity(template.blocks().len());
    let mut unresolved = 0;

    for block in template.blocks() {
        let (text, missed) = substitute_block(block, binding);
        unresolved += missed;
        blocks.push(text);
    }

    Substitution { blocks, unresolved }
}

fn substitute_block(text: &str, binding: &Binding) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut unresolved = 0;
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];

        let Some(close) = after.find("}}") else {
            // Unclosed marker: emit the rest of the block verbatim
            out.push_str("{{");
            out.push_str(after);
            return (out, unresolved);
        };

        let inner = &after[..close];
        match binding.value(inner.trim()) {
            Some(value) => out.push_str(value),
            None => {
                // Original delimiter spelling, inner whitespace included
                out.push_str("{{");
                out.push_str(inner);
                out.push_str("}}");
                if !inner.trim().is_empty() {
                    unresolved += 1;
                }
            }
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    (out, unresolved)
}
