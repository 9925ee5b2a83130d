//! Bracket- and quote-aware splitting shared by the parser and every validator.
//!
//! Separators are only honoured at nesting depth zero and outside quoted
//! strings, so `rgb(1,2,3),red` splits into two parts and `'a,b'` stays whole.
//! All functions run in a single linear pass over the input.

/// Tracks whether the scan is inside a quoted string. A backslash inside
/// quotes escapes the next character.
#[derive(Debug, Default)]
struct Quotes {
    open: Option<char>,
    escaped: bool,
}

impl Quotes {
    /// Feed one character; true when it is part of a quoted string.
    fn inside(&mut self, ch: char) -> bool {
        if let Some(q) = self.open {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == q {
                self.open = None;
            }
            return true;
        }
        if ch == '\'' || ch == '"' {
            self.open = Some(ch);
            return true;
        }
        false
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Split `input` on separator characters at the top level.
///
/// Segments are trimmed. Empty segments are kept so callers can detect
/// inputs such as `1px,,red`.
pub fn split_top_level<F>(input: &str, is_separator: F) -> Vec<&str>
where
    F: Fn(char) -> bool,
{
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quotes = Quotes::default();
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        if quotes.inside(ch) {
            continue;
        }

        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if depth == 0 && is_separator(c) => {
                parts.push(input[start..idx].trim());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(input[start..].trim());
    parts
}

/// Comma-separated segments, empties preserved.
pub fn split_commas(input: &str) -> Vec<&str> {
    split_top_level(input, |c| c == ',')
}

/// Whitespace-separated segments, empties dropped.
pub fn split_whitespace(input: &str) -> Vec<&str> {
    non_empty(split_top_level(input, char::is_whitespace))
}

/// Segments separated by commas and/or whitespace, empties dropped.
pub fn split_list(input: &str) -> Vec<&str> {
    non_empty(split_top_level(input, |c| c == ',' || c.is_whitespace()))
}

/// Segments separated by whitespace or `_`, the in-token stand-in for a space.
pub fn split_spaced(input: &str) -> Vec<&str> {
    non_empty(split_top_level(input, |c| c == '_' || c.is_whitespace()))
}

/// Segments separated by commas, whitespace or `_`; used for shorthand
/// components such as `2px,solid,red` or `2px_solid_red`.
pub fn split_components(input: &str) -> Vec<&str> {
    non_empty(split_top_level(input, |c| c == ',' || c == '_' || c.is_whitespace()))
}

/// Segments separated by `/` at the top level.
pub fn split_slash(input: &str) -> Vec<&str> {
    split_top_level(input, |c| c == '/')
}

fn non_empty(parts: Vec<&str>) -> Vec<&str> {
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Maximum parenthesis/bracket nesting depth outside quotes.
pub fn nesting_depth(input: &str) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    let mut quotes = Quotes::default();

    for ch in input.chars() {
        if quotes.inside(ch) {
            continue;
        }
        match ch {
            '(' | '[' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max_depth
}

/// True when every `(`/`[` is closed in order and no quote is left open.
pub fn is_balanced(input: &str) -> bool {
    let mut stack: Vec<char> = Vec::new();
    let mut quotes = Quotes::default();

    for ch in input.chars() {
        if quotes.inside(ch) {
            continue;
        }
        match ch {
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            ')' | ']' => {
                if stack.pop() != Some(ch) {
                    return false;
                }
            }
            _ => {}
        }
    }

    stack.is_empty() && !quotes.is_open()
}

/// Index of the `)` closing the `(` at byte offset `open`.
pub fn find_matching_paren(input: &str, open: usize) -> Option<usize> {
    if input.as_bytes().get(open) != Some(&b'(') {
        return None;
    }

    let mut depth = 0usize;
    let mut quotes = Quotes::default();

    for (idx, ch) in input[open..].char_indices() {
        if quotes.inside(ch) {
            continue;
        }
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }

    None
}

/// Split `name(args)` into its name and raw argument text.
///
/// The opening parenthesis must be closed by the final character, so
/// `a(1) b(2)` is not a single call.
pub fn parse_function_call(input: &str) -> Option<(&str, &str)> {
    let open = input.find('(')?;
    let name = &input[..open];

    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() || !chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }

    let close = find_matching_paren(input, open)?;
    if close != input.len() - 1 {
        return None;
    }

    Some((name, &input[open + 1..close]))
}
