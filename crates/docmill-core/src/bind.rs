//! Value-to-placeholder binding
//!
//! The column check is dataset-wide and runs once, before any row work:
//! columns are shared by every row, so a per-row check would only repeat
//! the same answer N times.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::error::{DocmillError, Result};

/// Token name → string value mapping for exactly one dataset row.
///
/// Created per row, consumed by the substituter, then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    values: BTreeMap<String, String>,
}

impl Binding {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for Binding {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Verify that every token has a matching dataset column.
///
/// Fails with `MissingColumns` naming exactly the unmatched tokens, in
/// sorted order.
pub fn check_columns(tokens: &BTreeSet<String>, columns: &[String]) -> Result<()> {
    let missing: Vec<String> = tokens
        .iter()
        .filter(|token| !columns.iter().any(|column| column == *token))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DocmillError::MissingColumns { missing })
    }
}

/// Bind one dataset row: every token maps to the row's value in the
/// matching column.
///
/// Assumes `check_columns` already passed; tokens without a column are
/// simply absent from the binding (the substituter leaves them verbatim).
pub fn bind(tokens: &BTreeSet<String>, dataset: &Dataset, row: usize) -> Binding {
    tokens
        .iter()
        .filter_map(|token| {
            dataset
                .value(row, token)
                .map(|value| (token.clone(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn subset_passes() {
        let result = check_columns(&tokens(&["a", "b"]), &columns(&["a", "b", "extra"]));
        assert!(result.is_ok());
    }

    #[test]
    fn missing_columns_are_listed_exactly() {
        let err = check_columns(&tokens(&["a", "b", "c"]), &columns(&["b"])).unwrap_err();
        match err {
            DocmillError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["a".to_string(), "c".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_token_set_is_trivially_covered() {
        assert!(check_columns(&tokens(&[]), &columns(&[])).is_ok());
    }

    #[test]
    fn bind_maps_tokens_to_row_values() {
        let dataset = Dataset::from_parts(
            columns(&["name", "amount", "unused"]),
            vec![
                vec!["Ana".into(), "42".into(), "x".into()],
                vec!["Ben".into(), "7".into(), "y".into()],
            ],
        );
        let binding = bind(&tokens(&["name", "amount"]), &dataset, 1);
        assert_eq!(binding.value("name"), Some("Ben"));
        assert_eq!(binding.value("amount"), Some("7"));
        assert_eq!(binding.value("unused"), None);
        assert_eq!(binding.len(), 2);
    }
}
