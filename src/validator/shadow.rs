//! `box-shadow` and `text-shadow`.
//!
//! A single shadow is tried first; comma-separated layers are only parsed
//! individually when the combined reading fails.

use super::length::{is_length, validate_length};
use super::{color, ValueValidator};
use crate::errors::TokenError;
use crate::registry::PropertyRule;
use crate::tokenizer::{split_commas, split_spaced};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShadowKind {
    Box,
    Text,
}

impl ShadowKind {
    fn max_lengths(self) -> usize {
        match self {
            ShadowKind::Box => 4,
            ShadowKind::Text => 3,
        }
    }
}

pub fn validate_shadow(value: &str, property: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }

    let kind = if property == "text-shadow" { ShadowKind::Text } else { ShadowKind::Box };
    let layers = split_commas(value);
    if layers.iter().any(|l| l.is_empty()) {
        return Err(TokenError::validation("empty shadow layer"));
    }

    let flattened: Vec<&str> = layers.iter().flat_map(|l| split_spaced(l)).collect();
    let single = parse_single(&flattened, kind, v);
    if single.is_ok() || layers.len() == 1 {
        return single;
    }

    let mut out = Vec::with_capacity(layers.len());
    for layer in layers {
        out.push(parse_single(&split_spaced(layer), kind, v)?);
    }
    Ok(out.join(", "))
}

fn parse_single(comps: &[&str], kind: ShadowKind, v: &ValueValidator) -> Result<String, TokenError> {
    let offset = PropertyRule::argument_length(true, false);
    let blur = PropertyRule::argument_length(false, false);

    let mut out = Vec::with_capacity(comps.len());
    let mut lengths = 0;
    let mut lengths_closed = false;
    let mut has_color = false;
    let mut has_inset = false;

    for comp in comps {
        if comp.eq_ignore_ascii_case("inset") {
            if kind == ShadowKind::Text || has_inset {
                return Err(TokenError::validation("'inset' is not valid here"));
            }
            has_inset = true;
            if lengths > 0 {
                lengths_closed = true;
            }
            out.push("inset".to_string());
        } else if is_length(comp, false) {
            if lengths_closed {
                return Err(TokenError::validation("shadow lengths must be contiguous"));
            }
            lengths += 1;
            if lengths > kind.max_lengths() {
                return Err(TokenError::validation(format!(
                    "a shadow takes at most {} lengths",
                    kind.max_lengths()
                )));
            }
            // third length is the blur radius
            let rule = if lengths == 3 { &blur } else { &offset };
            out.push(validate_length(comp, rule, v)?);
        } else if color::is_color(comp) || comp.to_ascii_lowercase().starts_with("var(") {
            if has_color {
                return Err(TokenError::validation("a shadow takes one color"));
            }
            has_color = true;
            if lengths > 0 {
                lengths_closed = true;
            }
            out.push(v.validate_part(comp, |c| color::validate_color(c, v))?);
        } else {
            return Err(TokenError::validation(format!("'{}' is not a valid shadow component", comp)));
        }
    }

    if lengths < 2 {
        return Err(TokenError::validation("a shadow needs at least an x and y offset"));
    }
    Ok(out.join(" "))
}
