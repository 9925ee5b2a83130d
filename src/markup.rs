//! Best-effort scan of markup for class attribute tokens.
//!
//! Recognizes `class`, `className`, `:class`, `v-bind:class`, `class:list`
//! and `tw` attributes, quoted directly or wrapped in a `{"..."}`,
//! `{'...'}` or `` {`...`} `` expression. Tokens are returned without
//! judging whether they are valid.

use indexmap::IndexSet;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE.get_or_init(|| {
        Regex::new(
            r#"(?:^|[\s<])(?:v-bind:class|class:list|:class|className|class|tw)\s*=\s*(?:"([^"]*)"|'([^']*)'|\{\s*"([^"]*)"\s*\}|\{\s*'([^']*)'\s*\}|\{\s*`([^`]*)`\s*\})"#,
        )
        .expect("attribute pattern is valid")
    })
}

/// A token and where its attribute value starts it in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenLocation {
    pub token: String,
    /// 1-based
    pub line: usize,
    /// 1-based, in characters
    pub column: usize,
}

/// Byte ranges of every attribute value in `markup`
fn attribute_values(markup: &str) -> impl Iterator<Item = (usize, &str)> {
    attribute_regex().captures_iter(markup).filter_map(|caps| {
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .map(|value| (value.start(), value.as_str()))
    })
}

/// Every whitespace-separated token inside class attributes, in document
/// order. Duplicates are kept.
pub fn extract_tokens_from_markup(markup: &str) -> Vec<String> {
    attribute_values(markup)
        .flat_map(|(_, value)| value.split_whitespace())
        .map(str::to_string)
        .collect()
}

/// Like [`extract_tokens_from_markup`], with a line and column per token.
pub fn extract_tokens_with_locations(markup: &str) -> Vec<TokenLocation> {
    let mut locations = Vec::new();
    for (start, value) in attribute_values(markup) {
        let mut offset = 0;
        for token in value.split_whitespace() {
            let relative = value[offset..].find(token).map_or(offset, |i| offset + i);
            offset = relative + token.len();
            let (line, column) = line_and_column(markup, start + relative);
            locations.push(TokenLocation {
                token: token.to_string(),
                line,
                column,
            });
        }
    }
    locations
}

fn line_and_column(text: &str, byte_offset: usize) -> (usize, usize) {
    let before = &text[..byte_offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Scan several documents in parallel. The result is deduplicated and keeps
/// first-seen order across the documents as given.
pub fn extract_tokens_parallel<S: AsRef<str> + Sync>(documents: &[S]) -> Vec<String> {
    let per_document: Vec<Vec<String>> = documents
        .par_iter()
        .map(|document| extract_tokens_from_markup(document.as_ref()))
        .collect();

    let unique: IndexSet<String> = per_document.into_iter().flatten().collect();
    unique.into_iter().collect()
}
