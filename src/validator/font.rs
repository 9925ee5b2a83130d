//! The `font` shorthand and font-family lists.

use super::length::{parse_dimension, validate_length};
use super::ValueValidator;
use crate::errors::TokenError;
use crate::registry::registry;
use crate::tokenizer::{split_commas, split_list, split_slash};

const SYSTEM_FONTS: &[&str] = &["caption", "icon", "menu", "message-box", "small-caption", "status-bar"];

const GENERIC_FAMILIES: &[&str] = &[
    "serif", "sans-serif", "monospace", "cursive", "fantasy", "system-ui", "ui-serif",
    "ui-sans-serif", "ui-monospace", "ui-rounded", "math", "emoji", "fangsong",
];

const FONT_STYLES: &[&str] = &["italic", "oblique"];
const FONT_VARIANTS: &[&str] = &["small-caps"];
const FONT_WEIGHTS: &[&str] = &["bold", "bolder", "lighter"];
const FONT_STRETCHES: &[&str] = &[
    "ultra-condensed", "extra-condensed", "condensed", "semi-condensed", "semi-expanded",
    "expanded", "extra-expanded", "ultra-expanded",
];

/// Categories that may precede the font-size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    Style,
    Variant,
    Weight,
    Stretch,
    Normal,
}

fn classify_prefix(comp: &str) -> Option<Prefix> {
    let lower = comp.to_ascii_lowercase();
    let lower = lower.as_str();
    if lower == "normal" {
        Some(Prefix::Normal)
    } else if FONT_STYLES.contains(&lower) {
        Some(Prefix::Style)
    } else if FONT_VARIANTS.contains(&lower) {
        Some(Prefix::Variant)
    } else if FONT_WEIGHTS.contains(&lower) || is_numeric_weight(comp) {
        Some(Prefix::Weight)
    } else if FONT_STRETCHES.contains(&lower) {
        Some(Prefix::Stretch)
    } else {
        None
    }
}

fn is_numeric_weight(comp: &str) -> bool {
    parse_dimension(comp).is_some_and(|d| d.unit.is_empty() && (1.0..=1000.0).contains(&d.number))
}

/// A font-size, optionally followed by `/line-height`.
fn is_size_component(comp: &str) -> bool {
    let sides = split_slash(comp);
    let size = sides[0];
    let lower = size.to_ascii_lowercase();
    let size_ok = registry()
        .get("font-size")
        .is_some_and(|rule| rule.has_keyword(&lower))
        || parse_dimension(size).is_some_and(|d| !d.unit.is_empty());
    size_ok && sides.len() <= 2
}

/// `font: [style] [variant] [weight] [stretch] <size>[/<line-height>] <family>, ...`
pub fn validate_font(value: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let comps = split_list(value);
    if comps.is_empty() {
        return Err(TokenError::validation("empty font value"));
    }

    if let [single] = comps.as_slice() {
        let lower = single.to_ascii_lowercase();
        if SYSTEM_FONTS.contains(&lower.as_str()) {
            return Ok(lower);
        }
    }

    let size_idx = comps
        .iter()
        .position(|c| is_size_component(c))
        .ok_or_else(|| TokenError::validation("font shorthand requires a font-size"))?;

    let mut out = Vec::with_capacity(comps.len());

    let prefix = &comps[..size_idx];
    if prefix.len() > 4 {
        return Err(TokenError::validation("too many values before the font-size"));
    }
    let mut used: Vec<Prefix> = Vec::with_capacity(prefix.len());
    for comp in prefix {
        let kind = classify_prefix(comp).ok_or_else(|| {
            TokenError::validation(format!("'{}' is not a font style, variant, weight or stretch", comp))
        })?;
        if kind != Prefix::Normal && used.contains(&kind) {
            return Err(TokenError::validation(format!("duplicate font {:?} '{}'", kind, comp).to_lowercase()));
        }
        used.push(kind);
        out.push(if is_numeric_weight(comp) {
            comp.trim_start_matches('+').to_string()
        } else {
            comp.to_ascii_lowercase()
        });
    }

    out.push(render_size(comps[size_idx], v)?);

    let families = &comps[size_idx + 1..];
    if families.is_empty() {
        return Err(TokenError::validation("font shorthand requires a font-family"));
    }

    let mut rendered_families = Vec::with_capacity(families.len());
    for family in families {
        if classify_prefix(family).is_some() && !is_quoted(family) {
            return Err(TokenError::validation(format!(
                "'{}' must come before the font-size",
                family
            )));
        }
        rendered_families.push(normalize_family(family)?);
    }

    out.push(rendered_families.join(", "));
    Ok(out.join(" "))
}

fn render_size(comp: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let sides = split_slash(comp);
    let (Some(size_rule), Some(line_rule)) = (registry().get("font-size"), registry().get("line-height")) else {
        return Err(TokenError::validation("font-size rule is unavailable"));
    };

    let size = validate_length(sides[0], size_rule, v)?;
    match sides.get(1) {
        Some(line_height) => Ok(format!("{}/{}", size, validate_length(line_height, line_rule, v)?)),
        None => Ok(size),
    }
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"')) || (value.starts_with('\'') && value.ends_with('\'')))
}

/// `font-family` value: a comma-separated list of families.
pub fn validate_family_list(value: &str) -> Result<String, TokenError> {
    let families = split_commas(value);
    format_family_list(&families)
}

/// Render a family list, used both for validation and when rebuilding the
/// declaration from the parsed values.
pub fn format_family_list<S: AsRef<str>>(families: &[S]) -> Result<String, TokenError> {
    if families.is_empty() {
        return Err(TokenError::validation("empty font-family"));
    }
    let mut out = Vec::with_capacity(families.len());
    for family in families {
        out.push(normalize_family(family.as_ref())?);
    }
    Ok(out.join(", "))
}

/// `Open-Sans` becomes `"Open Sans"`; generic families stay bare.
pub fn normalize_family(family: &str) -> Result<String, TokenError> {
    let family = family.trim();
    if family.is_empty() {
        return Err(TokenError::validation("empty font family"));
    }

    if is_quoted(family) {
        let inner = &family[1..family.len() - 1];
        if inner.trim().is_empty() || inner.contains(['"', '\'']) {
            return Err(TokenError::validation(format!("invalid quoted font family {}", family)));
        }
        return Ok(format!("\"{}\"", inner));
    }

    let lower = family.to_ascii_lowercase();
    if GENERIC_FAMILIES.contains(&lower.as_str()) {
        return Ok(lower);
    }

    if !family
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ' ')
    {
        return Err(TokenError::validation(format!("invalid font family '{}'", family)));
    }

    let words: Vec<String> = family
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();
    if words.is_empty() {
        return Err(TokenError::validation(format!("invalid font family '{}'", family)));
    }

    Ok(format!("\"{}\"", words.join(" ")))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(value: &str) -> Result<String, TokenError> {
        validate_font(value, &ValueValidator::default())
    }

    #[test]
    fn test_font_shorthand() {
        assert_eq!(font("bold,18px,Open-Sans").unwrap(), "bold 18px \"Open Sans\"");
        assert_eq!(
            font("italic,700,16px/1.5,Inter,sans-serif").unwrap(),
            "italic 700 16px/1.5 \"Inter\", sans-serif"
        );
        assert_eq!(font("large,serif").unwrap(), "large serif");
        assert_eq!(font("caption").unwrap(), "caption");
        assert_eq!(font("bold 18px \"Open Sans\"").unwrap(), "bold 18px \"Open Sans\"");
    }

    #[test]
    fn test_font_shorthand_errors() {
        assert!(font("bold,Open-Sans").unwrap_err().to_string().contains("font-size"));
        assert!(font("bold,18px").unwrap_err().to_string().contains("font-family"));
        assert!(font("bold,bolder,18px,serif").unwrap_err().to_string().contains("duplicate"));
        assert!(font("18px,bold,serif").unwrap_err().to_string().contains("before the font-size"));
        assert!(font("sparkly,18px,serif").is_err());
        assert!(font("bold,18px,Open<Sans").is_err());
    }

    #[test]
    fn test_family_normalization() {
        assert_eq!(normalize_family("Open-Sans").unwrap(), "\"Open Sans\"");
        assert_eq!(normalize_family("roboto").unwrap(), "\"Roboto\"");
        assert_eq!(normalize_family("'Fira Code'").unwrap(), "\"Fira Code\"");
        assert_eq!(normalize_family("Sans-Serif").unwrap(), "sans-serif");
        assert!(normalize_family("\"\"").is_err());
        assert!(normalize_family("a;b").is_err());
    }

    #[test]
    fn test_family_list() {
        assert_eq!(
            validate_family_list("Open-Sans,Arial,sans-serif").unwrap(),
            "\"Open Sans\", \"Arial\", sans-serif"
        );
        assert_eq!(
            format_family_list(&["Inter".to_string(), "monospace".to_string()]).unwrap(),
            "\"Inter\", monospace"
        );
    }
}
