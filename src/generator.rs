//! Turns a validated class into a CSS rule.

use crate::parser::{Breakpoint, ParsedClass};
use crate::validator::font::format_family_list;
use crate::validator::{ValidatedValue, ValueKind};
use crate::registry::ValueType;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

/// Base score of a single class selector
pub const BASE_SPECIFICITY: u32 = 10;
/// Added when the rule carries a pseudo-class or pseudo-element
pub const PSEUDO_SPECIFICITY: u32 = 10;
/// Added when the rule lives inside a media block
pub const RESPONSIVE_SPECIFICITY: u32 = 1;

/// Context a rule was generated in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive: Option<Breakpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo_class: Option<String>,
    pub important: bool,
    /// Validator branch that accepted the value
    pub value_kind: &'static str,
}

/// One rule per accepted class token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssRule {
    pub selector: String,
    pub declarations: IndexMap<String, String>,
    /// `prop: value` pairs joined with `; `, used as the grouping key
    pub declaration_string: String,
    pub class_name: String,
    pub specificity: u32,
    pub metadata: RuleMetadata,
}

impl CssRule {
    pub fn is_responsive(&self) -> bool {
        self.metadata.responsive.is_some()
    }
}

/// Escape a class name so it can be used as a CSS class selector.
///
/// ASCII letters, digits, `-`, `_` and non-ASCII characters pass through;
/// every other character is backslash escaped. A leading digit (or a digit
/// after a leading `-`) is written as a hex escape.
pub fn escape_class_name(class_name: &str) -> String {
    let mut escaped = String::with_capacity(class_name.len() * 2);
    let mut chars = class_name.chars().peekable();

    if let Some(&first) = chars.peek() {
        if first == '-' {
            escaped.push('-');
            chars.next();
        }
    }
    if let Some(&first) = chars.peek() {
        if first.is_ascii_digit() {
            escaped.push_str(&format!("\\{:x} ", first as u32));
            chars.next();
        }
    }

    for ch in chars {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            escaped.push(ch);
        } else if ch == '\\' {
            escaped.push_str("\\\\");
        } else {
            escaped.push('\\');
            escaped.push(ch);
        }
    }

    escaped
}

/// `.` + escaped class name, with the pseudo suffix appended once.
pub fn build_selector(class_name: &str, pseudo: Option<&str>) -> String {
    let mut selector = format!(".{}", escape_class_name(class_name));
    if let Some(pseudo) = pseudo {
        if !selector.ends_with(pseudo) {
            selector.push_str(pseudo);
        }
    }
    selector
}

pub fn specificity(parsed: &ParsedClass) -> u32 {
    let mut score = BASE_SPECIFICITY;
    if parsed.pseudo_class.is_some() {
        score += PSEUDO_SPECIFICITY;
    }
    if parsed.responsive.is_some() {
        score += RESPONSIVE_SPECIFICITY;
    }
    score
}

/// Build the rule for an accepted class. Returns `None` when there is
/// nothing to emit.
pub fn generate_rule(parsed: &ParsedClass, validated: &ValidatedValue) -> Option<CssRule> {
    if parsed.property.is_empty() || validated.value.trim().is_empty() {
        debug!("No rule for '{}': empty property or value", parsed.class_name);
        return None;
    }

    // families keep their original comma placement
    let mut value = if validated.kind == ValueKind::Typed(ValueType::FontFamily) {
        format_family_list(parsed.values.as_slice()).unwrap_or_else(|_| validated.value.clone())
    } else {
        validated.value.clone()
    };
    if parsed.important {
        value.push_str(" !important");
    }

    let mut declarations = IndexMap::new();
    for property in parsed.target_properties() {
        declarations.insert(property.to_string(), value.clone());
    }

    let selector = build_selector(&parsed.class_name, parsed.pseudo_selector());
    if selector.len() <= 1 {
        return None;
    }

    let declaration_string = declarations
        .iter()
        .map(|(property, value)| format!("{}: {}", property, value))
        .collect::<Vec<_>>()
        .join("; ");

    Some(CssRule {
        selector,
        declaration_string,
        declarations,
        class_name: parsed.class_name.clone(),
        specificity: specificity(parsed),
        metadata: RuleMetadata {
            prefix: parsed.prefix.clone(),
            responsive: parsed.responsive,
            pseudo_class: parsed.pseudo_class.clone(),
            important: parsed.important,
            value_kind: validated.kind.name(),
        },
    })
}
