//! Colors: hex, named, `rgb()`/`rgba()` and `hsl()`/`hsla()`.

use super::ValueValidator;
use super::length::{parse_dimension, ANGLE_UNITS};
use crate::errors::TokenError;
use crate::tokenizer::{parse_function_call, split_commas, split_spaced, split_slash};

const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
];

const SPECIAL_COLORS: &[&str] = &["transparent", "currentcolor"];

/// Validate a color and return its lower-cased canonical form.
pub fn validate_color(value: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let lower = value.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix('#') {
        if matches!(hex.len(), 3 | 4 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Ok(lower);
        }
        return Err(TokenError::validation(format!("'{}' is not a valid hex color", value)));
    }

    if NAMED_COLORS.binary_search(&lower.as_str()).is_ok() || SPECIAL_COLORS.contains(&lower.as_str()) {
        return Ok(lower);
    }

    if let Some((name, args)) = parse_function_call(&lower) {
        return match name {
            "rgb" | "rgba" => validate_channels(name, args, Channels::Rgb, v),
            "hsl" | "hsla" => validate_channels(name, args, Channels::Hsl, v),
            _ => Err(TokenError::validation(format!("'{}' is not a color function", name))),
        };
    }

    Err(TokenError::validation(format!("'{}' is not a valid color", value)))
}

/// Cheap classification used by shorthand validators.
pub fn is_color(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    NAMED_COLORS.binary_search(&lower.as_str()).is_ok()
        || SPECIAL_COLORS.contains(&lower.as_str())
        || parse_function_call(&lower)
            .is_some_and(|(name, _)| matches!(name, "rgb" | "rgba" | "hsl" | "hsla"))
}

#[derive(Debug, Clone, Copy)]
enum Channels {
    Rgb,
    Hsl,
}

fn validate_channels(name: &str, args: &str, kind: Channels, v: &ValueValidator) -> Result<String, TokenError> {
    let mut parts: Vec<&str> = split_commas(args);
    if parts.len() == 1 {
        // Space syntax: `rgb(255_0_0_/_0.5)`
        let halves = split_slash(args);
        if halves.len() > 2 {
            return Err(TokenError::validation(format!("{}() accepts one '/'", name)));
        }
        parts = split_spaced(halves[0]);
        if let Some(alpha) = halves.get(1) {
            if parts.len() != 3 {
                return Err(TokenError::validation(format!("{}() needs three channels before '/'", name)));
            }
            parts.push(*alpha);
        }
    }

    if parts.len() != 3 && parts.len() != 4 {
        return Err(TokenError::validation(format!(
            "{}() takes 3 or 4 components, got {}",
            name,
            parts.len()
        )));
    }

    let mut out = Vec::with_capacity(parts.len());
    for (idx, part) in parts.iter().enumerate() {
        let rendered = v.validate_part(part, |p| match (kind, idx) {
            (_, 3) => channel_alpha(p),
            (Channels::Rgb, _) => channel_rgb(p),
            (Channels::Hsl, 0) => channel_hue(p),
            (Channels::Hsl, _) => channel_percent(p),
        })?;
        out.push(rendered);
    }

    Ok(format!("{}({})", name, out.join(", ")))
}

fn channel_rgb(part: &str) -> Result<String, TokenError> {
    let dim = parse_dimension(part)
        .ok_or_else(|| TokenError::validation(format!("'{}' is not a color channel", part)))?;
    let max = match dim.unit {
        "" => 255.0,
        "%" => 100.0,
        _ => return Err(TokenError::validation(format!("'{}' is not a color channel", part))),
    };
    if !(0.0..=max).contains(&dim.number) {
        return Err(TokenError::validation(format!("color channel '{}' is out of range", part)));
    }
    Ok(dim.normalized())
}

fn channel_alpha(part: &str) -> Result<String, TokenError> {
    let dim = parse_dimension(part)
        .ok_or_else(|| TokenError::validation(format!("'{}' is not an alpha value", part)))?;
    let max = match dim.unit {
        "" => 1.0,
        "%" => 100.0,
        _ => return Err(TokenError::validation(format!("'{}' is not an alpha value", part))),
    };
    if !(0.0..=max).contains(&dim.number) {
        return Err(TokenError::validation(format!("alpha '{}' is out of range", part)));
    }
    Ok(dim.normalized())
}

fn channel_hue(part: &str) -> Result<String, TokenError> {
    match parse_dimension(part) {
        Some(dim) if dim.unit.is_empty() || dim.has_unit(ANGLE_UNITS) => Ok(dim.normalized()),
        _ => Err(TokenError::validation(format!("'{}' is not a hue", part))),
    }
}

fn channel_percent(part: &str) -> Result<String, TokenError> {
    let dim = parse_dimension(part)
        .filter(|d| d.unit.is_empty() || d.unit == "%")
        .ok_or_else(|| TokenError::validation(format!("'{}' is not a percentage", part)))?;
    if !(0.0..=100.0).contains(&dim.number) {
        return Err(TokenError::validation(format!("'{}' must be between 0% and 100%", part)));
    }
    Ok(dim.normalized())
}
