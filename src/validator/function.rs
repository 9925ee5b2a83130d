//! Function-valued properties: transforms, easing functions, gradients,
//! grid track functions and basic shapes. Also the image and complex
//! (grid line, position, flex) categories built on top of them.

use super::length::{is_length, parse_dimension, validate_angle, validate_length, ANGLE_UNITS, MATH_FUNCTIONS};
use super::{color, ValueValidator};
use crate::errors::TokenError;
use crate::registry::{PropertyRule, GRADIENT_FUNCTIONS};
use crate::security::is_rendered_url;
use crate::tokenizer::{parse_function_call, split_commas, split_components, split_slash, split_spaced};

const AXIS_FUNCTIONS: &[&str] = &[
    "translatex", "translatey", "translatez", "scalex", "scaley", "scalez", "rotatex", "rotatey",
    "rotatez", "skewx", "skewy",
];

const STEP_POSITIONS: &[&str] = &["jump-start", "jump-end", "jump-none", "jump-both", "start", "end"];

const TRACK_KEYWORDS: &[&str] = &["auto", "min-content", "max-content"];

const SHAPE_KEYWORDS: &[&str] = &[
    "at", "round", "closest-side", "farthest-side", "left", "right", "top", "bottom", "center",
];

const RADIAL_KEYWORDS: &[&str] = &[
    "circle", "ellipse", "closest-side", "closest-corner", "farthest-side", "farthest-corner",
    "at", "left", "right", "top", "bottom", "center",
];

const SIDES: &[&str] = &["left", "right", "top", "bottom"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arg {
    /// Length or percentage, negatives allowed
    LengthPercentage,
    /// Length without percentage, negatives allowed
    Length,
    Number,
    Angle,
}

/// Validate a single function call against the `allowed` names.
pub fn validate_function(value: &str, allowed: &[&str], v: &ValueValidator) -> Result<String, TokenError> {
    if is_rendered_url(value) {
        if allowed.contains(&"url") {
            return Ok(value.to_string());
        }
        return Err(TokenError::validation("url() is not accepted here"));
    }

    let (name, args) = parse_function_call(value)
        .ok_or_else(|| TokenError::validation(format!("'{}' is not a function call", value)))?;
    let lname = name.to_ascii_lowercase();

    if !allowed.contains(&lname.as_str()) {
        return Err(TokenError::validation(format!("function '{}' is not allowed here", name)));
    }

    render_function(&lname, args, v)
}

fn render_function(name: &str, args: &str, v: &ValueValidator) -> Result<String, TokenError> {
    match name {
        "cubic-bezier" => cubic_bezier(args),
        "steps" => steps(args),
        "linear" => linear_easing(args),
        "repeat" => grid_repeat(args, v),
        "minmax" => minmax(args, v),
        "fit-content" => {
            let arg = validate_length(args.trim(), &PropertyRule::argument_length(false, true), v)?;
            Ok(format!("fit-content({})", arg))
        }
        "inset" | "circle" | "ellipse" => shape(name, args, v),
        "polygon" => polygon(args, v),
        g if GRADIENT_FUNCTIONS.contains(&g) => gradient(g, args, v),
        t => transform(t, args, v),
    }
}

/// Function arguments separated by commas, or by spaces when there are no commas.
fn split_args(args: &str) -> Vec<&str> {
    let parts = split_commas(args);
    if parts.len() == 1 {
        split_spaced(args)
    } else {
        parts
    }
}

fn canonical_name(name: &str) -> String {
    if AXIS_FUNCTIONS.contains(&name) {
        let (head, axis) = name.split_at(name.len() - 1);
        format!("{}{}", head, axis.to_ascii_uppercase())
    } else {
        name.to_string()
    }
}

fn transform(name: &str, args: &str, v: &ValueValidator) -> Result<String, TokenError> {
    use Arg::*;

    let signature: &[&[Arg]] = match name {
        "translate" => &[&[LengthPercentage], &[LengthPercentage, LengthPercentage]],
        "translate3d" => &[&[LengthPercentage, LengthPercentage, Length]],
        "translatex" | "translatey" => &[&[LengthPercentage]],
        "translatez" => &[&[Length]],
        "scale" => &[&[Number], &[Number, Number]],
        "scale3d" => &[&[Number, Number, Number]],
        "scalex" | "scaley" | "scalez" => &[&[Number]],
        "rotate" | "rotatex" | "rotatey" | "rotatez" => &[&[Angle]],
        "rotate3d" => &[&[Number, Number, Number, Angle]],
        "skew" => &[&[Angle], &[Angle, Angle]],
        "skewx" | "skewy" => &[&[Angle]],
        "matrix" => &[&[Number; 6]],
        "matrix3d" => &[&[Number; 16]],
        "perspective" => &[&[Length]],
        _ => return Err(TokenError::validation(format!("unknown function '{}'", name))),
    };

    let parts = split_args(args);
    let kinds = signature
        .iter()
        .find(|s| s.len() == parts.len())
        .ok_or_else(|| TokenError::validation(format!("wrong number of arguments to {}()", name)))?;

    let mut out = Vec::with_capacity(parts.len());
    for (part, kind) in parts.iter().zip(kinds.iter()) {
        out.push(v.validate_part(part, |p| render_arg(p, *kind, v))?);
    }

    if name == "perspective" && out[0].starts_with('-') {
        return Err(TokenError::validation("perspective() must not be negative"));
    }

    Ok(format!("{}({})", canonical_name(name), out.join(", ")))
}

fn render_arg(part: &str, kind: Arg, v: &ValueValidator) -> Result<String, TokenError> {
    match kind {
        Arg::LengthPercentage => validate_length(part, &PropertyRule::argument_length(true, true), v),
        Arg::Length => validate_length(part, &PropertyRule::argument_length(true, false), v),
        Arg::Number => match parse_dimension(part) {
            Some(dim) if dim.unit.is_empty() || dim.unit == "%" => Ok(dim.normalized()),
            _ => Err(TokenError::validation(format!("'{}' is not a number", part))),
        },
        Arg::Angle => validate_angle(part, false),
    }
}

fn plain_number(part: &str) -> Result<f64, TokenError> {
    parse_dimension(part)
        .filter(|d| d.unit.is_empty())
        .map(|d| d.number)
        .ok_or_else(|| TokenError::validation(format!("'{}' is not a number", part)))
}

fn cubic_bezier(args: &str) -> Result<String, TokenError> {
    let parts = split_args(args);
    if parts.len() != 4 {
        return Err(TokenError::validation("cubic-bezier() takes four numbers"));
    }

    let mut out = Vec::with_capacity(4);
    for (idx, part) in parts.iter().enumerate() {
        let number = plain_number(part)?;
        if idx % 2 == 0 && !(0.0..=1.0).contains(&number) {
            return Err(TokenError::validation(format!(
                "cubic-bezier() x value '{}' must be between 0 and 1",
                part
            )));
        }
        out.push(part.trim_start_matches('+').to_string());
    }
    Ok(format!("cubic-bezier({})", out.join(", ")))
}

fn steps(args: &str) -> Result<String, TokenError> {
    let parts = split_args(args);
    let count = parts
        .first()
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| TokenError::validation("steps() needs a positive step count"))?;

    match parts.as_slice() {
        [_] => Ok(format!("steps({})", count)),
        [_, position] => {
            let position = position.to_ascii_lowercase();
            if !STEP_POSITIONS.contains(&position.as_str()) {
                return Err(TokenError::validation(format!("unknown steps() position '{}'", position)));
            }
            if position == "jump-none" && count < 2 {
                return Err(TokenError::validation("steps() with jump-none needs at least 2 steps"));
            }
            Ok(format!("steps({}, {})", count, position))
        }
        _ => Err(TokenError::validation("steps() takes one or two arguments")),
    }
}

/// `linear(0, 0.25 75%, 1)`: each stop is a number with up to two percentages.
fn linear_easing(args: &str) -> Result<String, TokenError> {
    let stops = split_commas(args);
    if stops.len() < 2 {
        return Err(TokenError::validation("linear() needs at least two stops"));
    }

    let mut out = Vec::with_capacity(stops.len());
    for stop in stops {
        let comps = split_spaced(stop);
        if comps.is_empty() || comps.len() > 3 {
            return Err(TokenError::validation(format!("invalid linear() stop '{}'", stop)));
        }
        plain_number(comps[0])?;
        for pct in &comps[1..] {
            if !parse_dimension(pct).is_some_and(|d| d.unit == "%") {
                return Err(TokenError::validation(format!("'{}' is not a percentage", pct)));
            }
        }
        out.push(comps.join(" "));
    }
    Ok(format!("linear({})", out.join(", ")))
}

fn gradient(name: &str, args: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let parts = split_commas(args);
    if parts.iter().any(|p| p.is_empty()) {
        return Err(TokenError::validation(format!("empty argument in {}()", name)));
    }

    let mut out = Vec::with_capacity(parts.len());
    let mut stops = parts.as_slice();

    if let Some(first) = parts.first() {
        let lead = split_spaced(first);
        let is_stop = lead
            .first()
            .is_some_and(|c| color::is_color(c) || c.to_ascii_lowercase().starts_with("var("));
        if !is_stop {
            out.push(gradient_prelude(name, &lead, v)?);
            stops = &parts[1..];
        }
    }

    if stops.len() < 2 {
        return Err(TokenError::validation(format!("{}() needs at least two color stops", name)));
    }

    let conic = name.contains("conic");
    for stop in stops {
        out.push(color_stop(stop, conic, v)?);
    }

    Ok(format!("{}({})", name, out.join(", ")))
}

fn gradient_prelude(name: &str, comps: &[&str], v: &ValueValidator) -> Result<String, TokenError> {
    let invalid = || TokenError::validation(format!("invalid {}() direction '{}'", name, comps.join(" ")));
    let position_length = PropertyRule::argument_length(true, true);
    let mut out = Vec::with_capacity(comps.len());

    if name.contains("linear") {
        match comps {
            [angle] => out.push(validate_angle(angle, false)?),
            [to, sides @ ..] if to.eq_ignore_ascii_case("to") && (1..=2).contains(&sides.len()) => {
                out.push("to".to_string());
                for side in sides {
                    let side = side.to_ascii_lowercase();
                    if !SIDES.contains(&side.as_str()) {
                        return Err(invalid());
                    }
                    out.push(side);
                }
            }
            _ => return Err(invalid()),
        }
    } else if name.contains("radial") {
        for comp in comps {
            let lower = comp.to_ascii_lowercase();
            if RADIAL_KEYWORDS.contains(&lower.as_str()) {
                out.push(lower);
            } else {
                out.push(validate_length(comp, &position_length, v).map_err(|_| invalid())?);
            }
        }
    } else {
        // conic: `from <angle>` and/or `at <position>`
        let mut iter = comps.iter();
        while let Some(comp) = iter.next() {
            let lower = comp.to_ascii_lowercase();
            match lower.as_str() {
                "from" => {
                    let angle = iter.next().ok_or_else(invalid)?;
                    out.push("from".to_string());
                    out.push(validate_angle(angle, false)?);
                }
                "at" | "left" | "right" | "top" | "bottom" | "center" => out.push(lower),
                _ => out.push(validate_length(comp, &position_length, v).map_err(|_| invalid())?),
            }
        }
    }

    if out.is_empty() {
        return Err(invalid());
    }
    Ok(out.join(" "))
}

fn color_stop(stop: &str, conic: bool, v: &ValueValidator) -> Result<String, TokenError> {
    let comps = split_spaced(stop);
    let position = |p: &str| -> Result<String, TokenError> {
        if conic && parse_dimension(p).is_some_and(|d| d.has_unit(ANGLE_UNITS)) {
            return validate_angle(p, false);
        }
        validate_length(p, &PropertyRule::argument_length(true, true), v)
    };

    match comps.as_slice() {
        // color hint between two stops
        [hint] if is_length(hint, true) => position(*hint),
        [color_part, positions @ ..] if positions.len() <= 2 => {
            let mut out = vec![v.validate_part(color_part, |c| color::validate_color(c, v))?];
            for p in positions {
                out.push(v.validate_part(p, &position)?);
            }
            Ok(out.join(" "))
        }
        _ => Err(TokenError::validation(format!("invalid color stop '{}'", stop))),
    }
}

fn track_size(part: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let lower = part.to_ascii_lowercase();
    if TRACK_KEYWORDS.contains(&lower.as_str()) {
        return Ok(lower);
    }
    if let Some((name, args)) = parse_function_call(part) {
        let name = name.to_ascii_lowercase();
        return match name.as_str() {
            "minmax" => minmax(args, v),
            "fit-content" => render_function("fit-content", args, v),
            "var" => v.validate_part(part, |p| Ok(p.to_string())),
            _ => validate_length(part, &PropertyRule::argument_length(false, true), v),
        };
    }
    validate_length(part, &PropertyRule::argument_length(false, true), v)
}

fn minmax(args: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let parts = split_commas(args);
    if parts.len() != 2 {
        return Err(TokenError::validation("minmax() takes two arguments"));
    }
    Ok(format!("minmax({}, {})", track_size(parts[0], v)?, track_size(parts[1], v)?))
}

fn grid_repeat(args: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let parts = split_commas(args);
    let [count, tracks] = parts.as_slice() else {
        return Err(TokenError::validation("repeat() takes a count and a track list"));
    };

    let count = count.to_ascii_lowercase();
    let count_ok = matches!(count.as_str(), "auto-fill" | "auto-fit")
        || count.parse::<u32>().is_ok_and(|n| n > 0);
    if !count_ok {
        return Err(TokenError::validation(format!("invalid repeat() count '{}'", count)));
    }

    let track_parts = split_spaced(tracks);
    if track_parts.is_empty() {
        return Err(TokenError::validation("repeat() needs at least one track"));
    }
    let mut rendered = Vec::with_capacity(track_parts.len());
    for track in track_parts {
        rendered.push(track_size(track, v)?);
    }

    Ok(format!("repeat({}, {})", count, rendered.join(" ")))
}

fn shape(name: &str, args: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let length = PropertyRule::argument_length(name == "inset", true);
    let mut out = Vec::new();

    for comp in split_components(args) {
        let lower = comp.to_ascii_lowercase();
        if SHAPE_KEYWORDS.contains(&lower.as_str()) {
            out.push(lower);
        } else {
            out.push(v.validate_part(comp, |p| validate_length(p, &length, v))?);
        }
    }

    if name == "inset" && out.is_empty() {
        return Err(TokenError::validation("inset() needs at least one offset"));
    }
    Ok(format!("{}({})", name, out.join(" ")))
}

fn polygon(args: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let parts = split_commas(args);
    let mut out = Vec::with_capacity(parts.len());
    let length = PropertyRule::argument_length(true, true);

    for (idx, part) in parts.iter().enumerate() {
        let lower = part.to_ascii_lowercase();
        if idx == 0 && matches!(lower.as_str(), "nonzero" | "evenodd") {
            out.push(lower);
            continue;
        }
        let coords = split_spaced(part);
        if coords.len() != 2 {
            return Err(TokenError::validation(format!("polygon() point '{}' needs two coordinates", part)));
        }
        let x = v.validate_part(coords[0], |p| validate_length(p, &length, v))?;
        let y = v.validate_part(coords[1], |p| validate_length(p, &length, v))?;
        out.push(format!("{} {}", x, y));
    }

    if out.len() < 3 {
        return Err(TokenError::validation("polygon() needs at least three points"));
    }
    Ok(format!("polygon({})", out.join(", ")))
}

/// `none`, an accepted URL or a gradient.
pub fn validate_image(value: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }
    if is_rendered_url(value) {
        return Ok(value.to_string());
    }
    validate_function(value, rule.functions, v)
}

/// Grid lines, track lists, positions and the `flex` shorthand: a sequence
/// of keywords, numbers, lengths and allowed functions with optional `/`.
pub fn validate_complex(value: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    let parts = split_components(value);
    if parts.is_empty() {
        return Err(TokenError::validation("empty value"));
    }

    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        if part == "/" {
            out.push("/".to_string());
            continue;
        }

        let sides = split_slash(part);
        if sides.len() > 1 {
            let mut rendered = Vec::with_capacity(sides.len());
            for side in sides {
                if side.is_empty() {
                    rendered.push(String::new());
                    continue;
                }
                rendered.push(complex_atom(side, rule, v)?);
            }
            out.push(rendered.join(" / ").trim().to_string());
        } else {
            out.push(complex_atom(part, rule, v)?);
        }
    }

    Ok(out.join(" "))
}

fn complex_atom(part: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    v.validate_part(part, |p| {
        if rule.has_keyword(p) {
            return Ok(p.to_ascii_lowercase());
        }
        if let Some((name, _)) = parse_function_call(p) {
            if MATH_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str()) {
                return validate_length(p, &PropertyRule::argument_length(true, true), v);
            }
            return validate_function(p, rule.functions, v);
        }
        match parse_dimension(p) {
            Some(dim) if dim.unit.is_empty() => Ok(dim.normalized()),
            Some(_) => validate_length(p, &PropertyRule::argument_length(true, true), v),
            None => Err(TokenError::validation(format!("'{}' is not accepted here", p))),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{registry, SHAPE_FUNCTIONS, TIMING_FUNCTIONS, TRANSFORM_FUNCTIONS};

    fn v() -> ValueValidator {
        ValueValidator::default()
    }

    #[test]
    fn test_transform_functions() {
        let v = v();
        let ok = |value: &str| validate_function(value, TRANSFORM_FUNCTIONS, &v).unwrap();
        assert_eq!(ok("translateX(10px)"), "translateX(10px)");
        assert_eq!(ok("translatex(-50%)"), "translateX(-50%)");
        assert_eq!(ok("translate(10px,20px)"), "translate(10px, 20px)");
        assert_eq!(ok("translate(10px_20px)"), "translate(10px, 20px)");
        assert_eq!(ok("rotate(45deg)"), "rotate(45deg)");
        assert_eq!(ok("scale(1.5)"), "scale(1.5)");
        assert_eq!(ok("rotate3d(1,0,0,90deg)"), "rotate3d(1, 0, 0, 90deg)");
        assert_eq!(ok("matrix(1,0,0,1,0,0)"), "matrix(1, 0, 0, 1, 0, 0)");

        assert!(validate_function("rotate(45)", TRANSFORM_FUNCTIONS, &v).is_err());
        assert!(validate_function("translateZ(10%)", TRANSFORM_FUNCTIONS, &v).is_err());
        assert!(validate_function("scale(1,2,3)", TRANSFORM_FUNCTIONS, &v).is_err());
        assert!(validate_function("matrix(1,0,0)", TRANSFORM_FUNCTIONS, &v).is_err());
        assert!(validate_function("alert(1)", TRANSFORM_FUNCTIONS, &v).is_err());
        assert!(validate_function("perspective(-1px)", TRANSFORM_FUNCTIONS, &v).is_err());
    }

    #[test]
    fn test_timing_functions() {
        let v = v();
        let check = |value: &str| validate_function(value, TIMING_FUNCTIONS, &v);
        assert_eq!(check("cubic-bezier(0.4,0,0.2,1)").unwrap(), "cubic-bezier(0.4, 0, 0.2, 1)");
        assert_eq!(check("cubic-bezier(0.5,-1,0.5,2)").unwrap(), "cubic-bezier(0.5, -1, 0.5, 2)");
        assert!(check("cubic-bezier(1.5,0,0.2,1)").is_err());
        assert!(check("cubic-bezier(0.4,0,0.2)").is_err());
        assert_eq!(check("steps(4,jump-end)").unwrap(), "steps(4, jump-end)");
        assert_eq!(check("steps(3)").unwrap(), "steps(3)");
        assert!(check("steps(0)").is_err());
        assert!(check("steps(1,jump-none)").is_err());
        assert!(check("steps(2,sideways)").is_err());
        assert_eq!(check("linear(0,0.25_75%,1)").unwrap(), "linear(0, 0.25 75%, 1)");
    }

    #[test]
    fn test_gradients() {
        let v = v();
        let rule = registry().get("background-image").unwrap();
        let ok = |value: &str| validate_image(value, rule, &v).unwrap();
        assert_eq!(
            ok("linear-gradient(to_right,red,blue)"),
            "linear-gradient(to right, red, blue)"
        );
        assert_eq!(
            ok("linear-gradient(45deg,#fff_0%,#000_100%)"),
            "linear-gradient(45deg, #fff 0%, #000 100%)"
        );
        assert_eq!(ok("radial-gradient(circle_at_center,red,blue)"), "radial-gradient(circle at center, red, blue)");
        assert_eq!(ok("conic-gradient(from_90deg,red,blue)"), "conic-gradient(from 90deg, red, blue)");
        assert_eq!(ok("none"), "none");

        assert!(validate_image("linear-gradient(red)", rule, &v).is_err());
        assert!(validate_image("linear-gradient(to_middle,red,blue)", rule, &v).is_err());
        assert!(validate_image("linear-gradient(red,notacolor)", rule, &v).is_err());
        assert!(validate_image("element(#id)", rule, &v).is_err());
    }

    #[test]
    fn test_grid_templates() {
        let v = v();
        let rule = registry().get("grid-template-columns").unwrap();
        let ok = |value: &str| validate_complex(value, rule, &v).unwrap();
        assert_eq!(ok("repeat(3,1fr)"), "repeat(3, 1fr)");
        assert_eq!(ok("repeat(auto-fill,minmax(200px,1fr))"), "repeat(auto-fill, minmax(200px, 1fr))");
        assert_eq!(ok("200px_1fr_auto"), "200px 1fr auto");
        assert!(validate_complex("repeat(0,1fr)", rule, &v).is_err());
        assert!(validate_complex("repeat(3)", rule, &v).is_err());
        assert_eq!(ok("calc(100%-10px)_1fr"), "calc(100% - 10px) 1fr");
        assert!(validate_complex("1fr_url(x)", rule, &v).is_err());
    }

    #[test]
    fn test_grid_lines_and_positions() {
        let v = v();
        let column = registry().get("grid-column").unwrap();
        assert_eq!(validate_complex("1/3", column, &v).unwrap(), "1 / 3");
        assert_eq!(validate_complex("span_2", column, &v).unwrap(), "span 2");
        assert_eq!(validate_complex("1/-1", column, &v).unwrap(), "1 / -1");

        let position = registry().get("background-position").unwrap();
        assert_eq!(validate_complex("center,top", position, &v).unwrap(), "center top");
        assert_eq!(validate_complex("10px_20%", position, &v).unwrap(), "10px 20%");
        assert!(validate_complex("middle", position, &v).is_err());

        let flex = registry().get("flex").unwrap();
        assert_eq!(validate_complex("1_1_0%", flex, &v).unwrap(), "1 1 0%");
        assert_eq!(validate_complex("none", flex, &v).unwrap(), "none");
    }

    #[test]
    fn test_shapes() {
        let v = v();
        let ok = |value: &str| validate_function(value, SHAPE_FUNCTIONS, &v).unwrap();
        assert_eq!(ok("circle(50%_at_center)"), "circle(50% at center)");
        assert_eq!(ok("inset(10px_round_5px)"), "inset(10px round 5px)");
        assert_eq!(
            ok("polygon(50%_0%,100%_50%,50%_100%)"),
            "polygon(50% 0%, 100% 50%, 50% 100%)"
        );
        assert!(validate_function("polygon(0_0,1px_1px)", SHAPE_FUNCTIONS, &v).is_err());
        assert!(validate_function("circle(-5px)", SHAPE_FUNCTIONS, &v).is_err());
    }
}
