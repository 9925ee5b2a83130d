//! Class token parser.
//!
//! Grammar:
//! `[breakpoint ':'] [pseudo ':'] ['!'] property '-' '[' value (',' value)* ']' ['!' | '!important']`
//!
//! Parsing is pure and never consults the value rules; it only decides whether
//! the token is structurally well formed and resolves short aliases.

use crate::errors::ParseError;
use crate::registry::resolve_alias;
use crate::tokenizer::{is_balanced, split_commas};
use serde::Serialize;

/// Longest class token accepted
pub const MAX_TOKEN_LEN: usize = 512;

/// Named responsive or media condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Sm,
    Md,
    Lg,
    Xl,
    #[serde(rename = "2xl")]
    Xxl,
    Print,
    Screen,
    Dark,
    Light,
}

impl Breakpoint {
    /// All breakpoints in emission order
    pub const ALL: [Breakpoint; 9] = [
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
        Breakpoint::Print,
        Breakpoint::Screen,
        Breakpoint::Dark,
        Breakpoint::Light,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|bp| bp.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "2xl",
            Breakpoint::Print => "print",
            Breakpoint::Screen => "screen",
            Breakpoint::Dark => "dark",
            Breakpoint::Light => "light",
        }
    }

    /// Media query text for the `@media` prelude
    pub fn media_query(&self) -> &'static str {
        match self {
            Breakpoint::Sm => "(min-width: 640px)",
            Breakpoint::Md => "(min-width: 768px)",
            Breakpoint::Lg => "(min-width: 1024px)",
            Breakpoint::Xl => "(min-width: 1280px)",
            Breakpoint::Xxl => "(min-width: 1536px)",
            Breakpoint::Print => "print",
            Breakpoint::Screen => "screen",
            Breakpoint::Dark => "(prefers-color-scheme: dark)",
            Breakpoint::Light => "(prefers-color-scheme: light)",
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Selector suffix for a pseudo-class or pseudo-element modifier.
pub fn pseudo_selector(name: &str) -> Option<&'static str> {
    let selector = match name {
        "hover" => ":hover",
        "focus" => ":focus",
        "focus-within" => ":focus-within",
        "focus-visible" => ":focus-visible",
        "active" => ":active",
        "visited" => ":visited",
        "disabled" => ":disabled",
        "enabled" => ":enabled",
        "checked" => ":checked",
        "required" => ":required",
        "invalid" => ":invalid",
        "valid" => ":valid",
        "empty" => ":empty",
        "target" => ":target",
        "first" => ":first-child",
        "last" => ":last-child",
        "odd" => ":nth-child(odd)",
        "even" => ":nth-child(even)",
        "placeholder-shown" => ":placeholder-shown",
        "before" => "::before",
        "after" => "::after",
        "placeholder" => "::placeholder",
        "selection" => "::selection",
        "marker" => "::marker",
        "first-letter" => "::first-letter",
        "first-line" => "::first-line",
        _ => return None,
    };
    Some(selector)
}

/// A structurally valid class token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedClass {
    /// The token exactly as supplied (trimmed)
    pub class_name: String,
    /// Modifier chain without the trailing colon, e.g. `md:hover`
    pub prefix: Option<String>,
    /// Resolved property used for validation
    pub property: String,
    /// Property name as written in the token
    pub alias: String,
    /// Physical properties written for this token; empty means `property`
    pub expands_to: Vec<String>,
    /// Bracket payload, unsplit
    pub raw_value: String,
    /// Comma-separated payload segments
    pub values: Vec<String>,
    pub responsive: Option<Breakpoint>,
    pub pseudo_class: Option<String>,
    pub important: bool,
}

impl ParsedClass {
    /// Properties the declaration block will contain
    pub fn target_properties(&self) -> Vec<&str> {
        if self.expands_to.is_empty() {
            vec![self.property.as_str()]
        } else {
            self.expands_to.iter().map(String::as_str).collect()
        }
    }

    pub fn pseudo_selector(&self) -> Option<&'static str> {
        self.pseudo_class.as_deref().and_then(pseudo_selector)
    }
}

/// Parse one class token.
pub fn parse_class(token: &str) -> Result<ParsedClass, ParseError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ParseError::Empty);
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(ParseError::TooLong { max: MAX_TOKEN_LEN });
    }

    let (modifiers, utility) = split_modifiers(token)?;

    let mut responsive = None;
    let mut pseudo_class: Option<String> = None;
    for modifier in &modifiers {
        if let Some(bp) = Breakpoint::from_name(modifier) {
            if responsive.is_some() || pseudo_class.is_some() {
                return Err(ParseError::ModifierOrder(modifier.to_string()));
            }
            responsive = Some(bp);
        } else if pseudo_selector(modifier).is_some() {
            if pseudo_class.is_some() {
                return Err(ParseError::ModifierOrder(modifier.to_string()));
            }
            pseudo_class = Some(modifier.to_string());
        } else {
            return Err(ParseError::UnknownModifier(modifier.to_string()));
        }
    }

    let (important, utility) = strip_important(utility);

    let open = utility.find('[').ok_or(ParseError::MissingBracket)?;
    if utility[..open].contains(']') {
        return Err(ParseError::UnbalancedBrackets);
    }

    let mut close = None;
    for (idx, ch) in utility[open + 1..].char_indices() {
        match ch {
            '[' => return Err(ParseError::NestedBrackets),
            ']' => {
                close = Some(open + 1 + idx);
                break;
            }
            _ => {}
        }
    }
    let close = close.ok_or(ParseError::UnbalancedBrackets)?;

    let trailing = &utility[close + 1..];
    if !trailing.is_empty() {
        if trailing.contains(['[', ']']) {
            return Err(ParseError::UnbalancedBrackets);
        }
        return Err(ParseError::TrailingCharacters(trailing.to_string()));
    }

    let name = utility[..open]
        .strip_suffix('-')
        .ok_or(ParseError::MissingProperty)?;
    if name.is_empty() {
        return Err(ParseError::MissingProperty);
    }

    let raw_value = utility[open + 1..close].trim();
    if raw_value.is_empty() {
        return Err(ParseError::EmptyValue);
    }
    if !is_balanced(raw_value) {
        return Err(ParseError::UnbalancedBrackets);
    }

    let segments = split_commas(raw_value);
    if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
        return Err(ParseError::EmptySegment(pos));
    }
    let values = segments.into_iter().map(str::to_string).collect();

    let (property, expands_to) = match resolve_alias(name) {
        Some(alias) => (
            alias.property.to_string(),
            alias.expands_to.iter().map(|p| p.to_string()).collect(),
        ),
        None if is_property_ident(name) => (name.to_string(), Vec::new()),
        None => return Err(ParseError::InvalidProperty(name.to_string())),
    };

    let prefix = if modifiers.is_empty() {
        None
    } else {
        Some(modifiers.join(":"))
    };

    Ok(ParsedClass {
        class_name: token.to_string(),
        prefix,
        property,
        alias: name.to_string(),
        expands_to,
        raw_value: raw_value.to_string(),
        values,
        responsive,
        pseudo_class,
        important,
    })
}

/// Split `md:hover:p-[1rem]` into `(["md", "hover"], "p-[1rem]")`.
///
/// Colons inside the bracketed value are not separators.
fn split_modifiers(token: &str) -> Result<(Vec<&str>, &str), ParseError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in token.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                let part = &token[start..idx];
                if part.is_empty() {
                    return Err(ParseError::UnknownModifier(String::new()));
                }
                parts.push(part);
                start = idx + 1;
            }
            _ => {}
        }
    }

    let utility = &token[start..];
    if utility.is_empty() {
        return Err(ParseError::MissingProperty);
    }

    Ok((parts, utility))
}

fn strip_important(utility: &str) -> (bool, &str) {
    let (mut important, mut rest) = match utility.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, utility),
    };

    if let Some(stripped) = rest.strip_suffix("!important") {
        important = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_suffix('!') {
        important = true;
        rest = stripped;
    }

    (important, rest)
}

/// Lowercase CSS property identifier, optionally vendor-prefixed.
fn is_property_ident(name: &str) -> bool {
    let body = name.strip_prefix('-').unwrap_or(name);
    let mut chars = body.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && body.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !body.ends_with('-')
        && !body.contains("--")
}
