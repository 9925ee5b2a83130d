//! `filter` and `backdrop-filter` function lists.

use super::length::{is_length, parse_dimension, validate_angle, validate_length};
use super::{color, ValueValidator};
use crate::errors::TokenError;
use crate::registry::PropertyRule;
use crate::security::is_rendered_url;
use crate::tokenizer::{parse_function_call, split_list, split_spaced};

const AMOUNT_FUNCTIONS: &[&str] = &[
    "brightness", "contrast", "grayscale", "invert", "opacity", "saturate", "sepia",
];

pub fn validate_filter(value: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }

    let parts = split_list(value);
    if parts.is_empty() {
        return Err(TokenError::validation("empty filter value"));
    }

    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        out.push(v.validate_part(part, |p| filter_function(p, v))?);
    }
    Ok(out.join(" "))
}

fn filter_function(part: &str, v: &ValueValidator) -> Result<String, TokenError> {
    if is_rendered_url(part) {
        return Ok(part.to_string());
    }

    let (name, args) = parse_function_call(part)
        .ok_or_else(|| TokenError::validation(format!("'{}' is not a filter function", part)))?;
    let name = name.to_ascii_lowercase();
    let args = args.trim();

    let rendered = match name.as_str() {
        "blur" => validate_length(args, &PropertyRule::argument_length(false, false), v)?,
        "hue-rotate" => validate_angle(args, true)?,
        "drop-shadow" => drop_shadow(args, v)?,
        n if AMOUNT_FUNCTIONS.contains(&n) => amount(args)?,
        _ => return Err(TokenError::validation(format!("unknown filter function '{}'", name))),
    };

    Ok(format!("{}({})", name, rendered))
}

/// Non-negative number or percentage.
fn amount(args: &str) -> Result<String, TokenError> {
    match parse_dimension(args) {
        Some(dim) if (dim.unit.is_empty() || dim.unit == "%") && dim.number >= 0.0 => Ok(dim.normalized()),
        _ => Err(TokenError::validation(format!("'{}' is not a non-negative amount", args))),
    }
}

fn drop_shadow(args: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let comps = split_spaced(args);
    let offset = PropertyRule::argument_length(true, false);
    let blur = PropertyRule::argument_length(false, false);

    let mut out = Vec::with_capacity(comps.len());
    let mut lengths = 0;
    let mut has_color = false;

    for comp in comps {
        if is_length(comp, false) {
            lengths += 1;
            if lengths > 3 || has_color {
                return Err(TokenError::validation("drop-shadow() takes 2 or 3 contiguous lengths"));
            }
            let rule = if lengths == 3 { &blur } else { &offset };
            out.push(validate_length(comp, rule, v)?);
        } else if !has_color {
            has_color = true;
            out.push(v.validate_part(comp, |c| color::validate_color(c, v))?);
        } else {
            return Err(TokenError::validation("drop-shadow() takes one color"));
        }
    }

    if lengths < 2 {
        return Err(TokenError::validation("drop-shadow() needs an x and y offset"));
    }
    Ok(out.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::registry;

    fn filter(value: &str) -> Result<String, TokenError> {
        let rule = registry().get("filter").unwrap();
        validate_filter(value, rule, &ValueValidator::default())
    }

    #[test]
    fn test_filter_functions() {
        assert_eq!(filter("blur(4px)").unwrap(), "blur(4px)");
        assert_eq!(
            filter("blur(2px),brightness(1.2)").unwrap(),
            "blur(2px) brightness(1.2)"
        );
        assert_eq!(filter("grayscale(100%)").unwrap(), "grayscale(100%)");
        assert_eq!(filter("hue-rotate(90deg)").unwrap(), "hue-rotate(90deg)");
        assert_eq!(
            filter("drop-shadow(0_2px_4px_rgba(0,0,0,0.3))").unwrap(),
            "drop-shadow(0 2px 4px rgba(0, 0, 0, 0.3))"
        );
        assert_eq!(filter("none").unwrap(), "none");
    }

    #[test]
    fn test_filter_errors() {
        assert!(filter("blur(-1px)").is_err());
        assert!(filter("blur(10%)").is_err());
        assert!(filter("hue-rotate(90)").is_err());
        assert!(filter("brightness(-1)").is_err());
        assert!(filter("glow(2px)").is_err());
        assert!(filter("drop-shadow(2px)").is_err());
        assert!(filter("drop-shadow(1px_1px_red_blue)").is_err());
        assert!(filter("blur").is_err());
    }
}
