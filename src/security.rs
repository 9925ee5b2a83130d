//! Security gate consulted by every value validator.
//!
//! Two primitives live here:
//! - [`PatternGuard`], which bounds the work done on attacker-controlled text.
//!   Pattern checks use the `regex` crate (finite automata, linear time) and
//!   additionally run under a wall-clock budget; a blown budget is a rejection.
//! - [`UrlPolicy`], the scheme allow/deny policy applied to `u(...)` and
//!   `url(...)` calls, which rewrites accepted URLs to `url('...')`.

use crate::config::SecurityConfig;
use crate::errors::SecurityViolation;
use crate::tokenizer::{find_matching_paren, nesting_depth};
use regex::Regex;
use std::borrow::Cow;
use std::time::{Duration, Instant};

const FORBIDDEN_CHARS: &[char] = &[';', '{', '}', '<', '>', '\\'];

const FORBIDDEN_SEQUENCES: &[&str] = &[
    "/*",
    "*/",
    "@import",
    "expression(",
    "javascript:",
    "vbscript:",
    "-moz-binding",
    "behavior:",
];

/// Bounds on how much work any payload check may do
#[derive(Debug, Clone)]
pub struct PatternGuard {
    pub max_input_len: usize,
    pub max_nesting_depth: usize,
    pub max_repeat_run: usize,
    pub time_budget: Duration,
}

impl Default for PatternGuard {
    fn default() -> Self {
        Self::from_config(&SecurityConfig::default())
    }
}

impl PatternGuard {
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self {
            max_input_len: config.max_value_length,
            max_nesting_depth: config.max_nesting_depth,
            max_repeat_run: config.max_repeat_run,
            time_budget: Duration::from_millis(config.pattern_time_budget_ms),
        }
    }

    /// Reject payload text that is oversized, pathologically nested or
    /// carries a sequence able to break out of a declaration.
    pub fn check_payload(&self, text: &str) -> Result<(), SecurityViolation> {
        if text.len() > self.max_input_len {
            return Err(SecurityViolation::InputTooLong {
                len: text.len(),
                max: self.max_input_len,
            });
        }

        if nesting_depth(text) > self.max_nesting_depth {
            return Err(SecurityViolation::NestingTooDeep {
                max: self.max_nesting_depth,
            });
        }

        let mut run_char = '\0';
        let mut run_len = 0usize;
        for ch in text.chars() {
            if ch.is_control() {
                return Err(SecurityViolation::ForbiddenSequence(format!(
                    "U+{:04X}",
                    ch as u32
                )));
            }
            if FORBIDDEN_CHARS.contains(&ch) {
                return Err(SecurityViolation::ForbiddenSequence(ch.to_string()));
            }

            if ch == run_char {
                run_len += 1;
                if run_len > self.max_repeat_run {
                    return Err(SecurityViolation::RepeatedRun {
                        ch,
                        max: self.max_repeat_run,
                    });
                }
            } else {
                run_char = ch;
                run_len = 1;
            }
        }

        let lowered = text.to_ascii_lowercase();
        if let Some(seq) = FORBIDDEN_SEQUENCES.iter().find(|seq| lowered.contains(*seq)) {
            return Err(SecurityViolation::ForbiddenSequence(seq.to_string()));
        }

        Ok(())
    }

    /// Run `regex` against `text` under the guard's length and time limits.
    pub fn is_match(&self, regex: &Regex, text: &str) -> Result<bool, SecurityViolation> {
        if text.len() > self.max_input_len {
            return Err(SecurityViolation::InputTooLong {
                len: text.len(),
                max: self.max_input_len,
            });
        }

        let start = Instant::now();
        let matched = regex.is_match(text);
        if start.elapsed() > self.time_budget {
            return Err(SecurityViolation::PatternBudgetExceeded {
                budget_ms: self.time_budget.as_millis() as u64,
            });
        }

        Ok(matched)
    }
}

/// Scheme allow/deny policy for URL-bearing values
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    pub allowed_schemes: Vec<String>,
    pub denied_schemes: Vec<String>,
    pub allow_svg_data: bool,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self::from_config(&SecurityConfig::default())
    }
}

impl UrlPolicy {
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self {
            allowed_schemes: config
                .allowed_schemes
                .iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
            denied_schemes: config
                .denied_schemes
                .iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
            allow_svg_data: config.allow_svg_data_urls,
        }
    }

    /// Validate one URL payload and render it as `url('...')`.
    pub fn check(&self, raw: &str) -> Result<String, SecurityViolation> {
        let url = unquote(raw.trim());
        if url.is_empty() {
            return Err(SecurityViolation::MalformedUrl("empty URL".to_string()));
        }

        // Scheme detection must see through `java\tscript:` style obfuscation.
        let compact: String = url
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect::<String>()
            .to_ascii_lowercase();

        if let Some(scheme) = detect_scheme(&compact)? {
            if self.denied_schemes.iter().any(|s| *s == scheme) {
                return Err(SecurityViolation::BannedScheme(scheme));
            }
            if !self.allowed_schemes.iter().any(|s| *s == scheme) {
                return Err(SecurityViolation::SchemeNotAllowed(scheme));
            }
            if scheme == "data" {
                self.check_data_url(&compact)?;
            }
        }

        if url.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(SecurityViolation::MalformedUrl(
                "whitespace or control characters in URL".to_string(),
            ));
        }

        Ok(format!("url('{}')", escape_url(&url)))
    }

    fn check_data_url(&self, compact: &str) -> Result<(), SecurityViolation> {
        let body = &compact["data:".len()..];
        let Some(comma) = body.find(',') else {
            return Err(SecurityViolation::MalformedUrl(
                "data URL without payload".to_string(),
            ));
        };

        let header = &body[..comma];
        let mime = header.split(';').next().unwrap_or_default();
        if !mime.starts_with("image/") || mime.len() == "image/".len() {
            return Err(SecurityViolation::DisallowedMimeType(mime.to_string()));
        }
        if mime == "image/svg+xml" && !self.allow_svg_data {
            return Err(SecurityViolation::DisallowedMimeType(mime.to_string()));
        }

        Ok(())
    }
}

/// Scheme of a lower-cased, whitespace-free URL, if it has one.
fn detect_scheme(compact: &str) -> Result<Option<String>, SecurityViolation> {
    if compact.starts_with('#') {
        return Ok(None);
    }

    let Some(end) = compact.find(':') else {
        return Ok(None);
    };

    let scheme = &compact[..end];
    if scheme.contains(['/', '?']) {
        return Ok(None);
    }
    let valid = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid {
        return Err(SecurityViolation::MalformedUrl(format!(
            "unrecognisable scheme '{}'",
            scheme
        )));
    }

    Ok(Some(scheme.to_string()))
}

/// Strip surrounding quotes and undo backslash escapes inside them, so an
/// already rendered `url('...')` payload is not escaped twice.
fn unquote(value: &str) -> Cow<'_, str> {
    for q in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            let inner = &value[1..value.len() - 1];
            if !inner.contains('\\') {
                return Cow::Borrowed(inner);
            }
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(ch) = chars.next() {
                match ch {
                    '\\' => out.extend(chars.next()),
                    _ => out.push(ch),
                }
            }
            return Cow::Owned(out);
        }
    }
    Cow::Borrowed(value)
}

fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for ch in url.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// A value with its URL calls validated and rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRewrite {
    /// Value with every URL call replaced by its `url('...')` rendering
    pub rewritten: String,
    /// Value with every URL call emptied, for payload checks
    pub masked: String,
    pub url_count: usize,
}

/// Find every `u(...)`/`url(...)` call in `value`, check it against `policy`
/// and rewrite it. Any rejected URL rejects the whole value.
pub fn rewrite_urls(value: &str, policy: &UrlPolicy) -> Result<UrlRewrite, SecurityViolation> {
    let mut rewritten = String::with_capacity(value.len());
    let mut masked = String::with_capacity(value.len());
    let mut url_count = 0;
    let mut last = 0;
    let mut from = 0;

    while let Some((start, open)) = find_url_call(value, from) {
        let close = find_matching_paren(value, open).ok_or_else(|| {
            SecurityViolation::MalformedUrl("unclosed URL function".to_string())
        })?;

        rewritten.push_str(&value[last..start]);
        masked.push_str(&value[last..start]);

        rewritten.push_str(&policy.check(&value[open + 1..close])?);
        masked.push_str("url()");
        url_count += 1;

        last = close + 1;
        from = last;
    }

    rewritten.push_str(&value[last..]);
    masked.push_str(&value[last..]);

    Ok(UrlRewrite {
        rewritten,
        masked,
        url_count,
    })
}

/// Locate the next URL call at or after `from`: `(start of name, index of '(')`.
fn find_url_call(value: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = value.as_bytes();
    let mut idx = from;

    while idx < bytes.len() {
        let boundary = idx == 0 || {
            let prev = bytes[idx - 1];
            !(prev.is_ascii_alphanumeric() || prev == b'-' || prev == b'_')
        };

        if boundary {
            let rest = &bytes[idx..];
            if rest.len() >= 4 && rest[..4].eq_ignore_ascii_case(b"url(") {
                return Some((idx, idx + 3));
            }
            if rest.len() >= 2 && (rest[0] == b'u' || rest[0] == b'U') && rest[1] == b'(' {
                return Some((idx, idx + 1));
            }
        }

        idx += 1;
    }

    None
}

/// True for a value already rendered by [`UrlPolicy::check`].
pub fn is_rendered_url(value: &str) -> bool {
    value.starts_with("url('") && value.ends_with("')")
}
