//! `content` and string-list properties such as `quotes`.

use super::{is_custom_ident, ValueValidator};
use crate::errors::TokenError;
use crate::registry::PropertyRule;
use crate::security::is_rendered_url;
use crate::tokenizer::{parse_function_call, split_commas, split_spaced};

const LIST_STYLES: &[&str] = &[
    "disc", "circle", "square", "decimal", "decimal-leading-zero", "lower-roman", "upper-roman",
    "lower-alpha", "upper-alpha", "lower-latin", "upper-latin", "none",
];

/// Re-quote a `'...'` or `"..."` string with double quotes, or with single
/// quotes when the text itself holds a double quote.
fn quoted_string(value: &str) -> Option<String> {
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if value.len() < 2 || !value.ends_with(quote) {
        return None;
    }
    let inner = &value[1..value.len() - 1];
    if inner.contains(quote) {
        return None;
    }
    if inner.contains('"') {
        return Some(format!("'{}'", inner));
    }
    Some(format!("\"{}\"", inner))
}

/// `content`: keywords, strings, `attr()`, `counter()`, `counters()` and URLs.
/// Bare words are quoted.
pub fn validate_content(value: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }

    let parts = split_spaced(value);
    if parts.is_empty() {
        return Err(TokenError::validation("empty content value"));
    }

    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        out.push(v.validate_part(part, |p| content_part(p, rule))?);
    }
    Ok(out.join(" "))
}

fn content_part(part: &str, rule: &PropertyRule) -> Result<String, TokenError> {
    if rule.has_keyword(part) {
        return Ok(part.to_ascii_lowercase());
    }
    if let Some(quoted) = quoted_string(part) {
        return Ok(quoted);
    }
    if is_rendered_url(part) {
        return Ok(part.to_string());
    }

    if let Some((name, args)) = parse_function_call(part) {
        let name = name.to_ascii_lowercase();
        let args = split_commas(args);
        return match (name.as_str(), args.as_slice()) {
            ("attr", [attribute]) if is_custom_ident(attribute) => Ok(format!("attr({})", attribute)),
            ("counter", [counter]) if is_custom_ident(counter) => Ok(format!("counter({})", counter)),
            ("counter", [counter, style]) if is_custom_ident(counter) && is_list_style(style) => {
                Ok(format!("counter({}, {})", counter, style.to_ascii_lowercase()))
            }
            ("counters", [counter, separator, rest @ ..]) if is_custom_ident(counter) && rest.len() <= 1 => {
                let separator = quoted_string(separator)
                    .ok_or_else(|| TokenError::validation("counters() separator must be a string"))?;
                match rest.first() {
                    Some(style) if is_list_style(style) => Ok(format!(
                        "counters({}, {}, {})",
                        counter,
                        separator,
                        style.to_ascii_lowercase()
                    )),
                    Some(style) => Err(TokenError::validation(format!("unknown list style '{}'", style))),
                    None => Ok(format!("counters({}, {})", counter, separator)),
                }
            }
            _ => Err(TokenError::validation(format!("invalid content function '{}'", part))),
        };
    }

    if part.contains(['"', '\'', '(', ')']) {
        return Err(TokenError::validation(format!("invalid content value '{}'", part)));
    }
    Ok(format!("\"{}\"", part))
}

fn is_list_style(value: &str) -> bool {
    LIST_STYLES.iter().any(|s| s.eq_ignore_ascii_case(value))
}

/// A property whose values are quoted strings, such as `quotes`.
pub fn validate_string(value: &str, rule: &PropertyRule) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }
    quoted_string(value).ok_or_else(|| TokenError::validation(format!("'{}' is not a quoted string", value)))
}
