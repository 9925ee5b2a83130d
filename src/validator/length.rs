//! Numeric value categories: lengths, numbers, integers, times, angles,
//! border-radius groups, aspect ratios and `calc()`-family math.

use super::ValueValidator;
use crate::errors::TokenError;
use crate::registry::PropertyRule;
use crate::tokenizer::{find_matching_paren, parse_function_call, split_commas, split_list, split_slash};

pub const LENGTH_UNITS: &[&str] = &[
    // absolute
    "px", "cm", "mm", "q", "in", "pt", "pc",
    // font-relative
    "em", "rem", "ex", "rex", "cap", "ch", "ic", "lh", "rlh",
    // viewport
    "vw", "vh", "vmin", "vmax", "vi", "vb", "svw", "svh", "lvw", "lvh", "dvw", "dvh",
    // container
    "cqw", "cqh", "cqi", "cqb", "cqmin", "cqmax",
    // flex
    "fr",
];

pub const ANGLE_UNITS: &[&str] = &["deg", "rad", "grad", "turn"];
pub const TIME_UNITS: &[&str] = &["s", "ms"];
pub const MATH_FUNCTIONS: &[&str] = &["calc", "min", "max", "clamp"];

/// A number with an optional unit, as written
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension<'a> {
    pub number: f64,
    pub number_text: &'a str,
    pub unit: &'a str,
}

impl Dimension<'_> {
    /// Canonical text: no leading `+`, lower-cased unit.
    pub fn normalized(&self) -> String {
        let number = self.number_text.strip_prefix('+').unwrap_or(self.number_text);
        format!("{}{}", number, self.unit.to_ascii_lowercase())
    }

    pub fn has_unit(&self, units: &[&str]) -> bool {
        units.iter().any(|u| u.eq_ignore_ascii_case(self.unit))
    }
}

/// Parse `[+-]digits[.digits][unit]` in one pass. The unit is either `%` or
/// ASCII letters.
pub fn parse_dimension(input: &str) -> Option<Dimension<'_>> {
    let bytes = input.as_bytes();
    let mut idx = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        idx += 1;
    }

    let mut digits = 0;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
        digits += 1;
    }
    if idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
            digits += 1;
        }
    }
    if digits == 0 || input[..idx].ends_with('.') {
        return None;
    }

    let number_text = &input[..idx];
    let unit = &input[idx..];
    if !(unit.is_empty() || unit == "%" || unit.bytes().all(|b| b.is_ascii_alphabetic())) {
        return None;
    }

    let number = number_text.parse::<f64>().ok()?;
    Some(Dimension {
        number,
        number_text,
        unit,
    })
}

/// Enforce sign and min/max constraints from `rule`.
pub fn check_range(number: f64, rule: &PropertyRule, text: &str) -> Result<(), TokenError> {
    if number < 0.0 && !rule.allow_negative && rule.min.is_none() {
        return Err(TokenError::validation(format!("negative value '{}' is not allowed", text)));
    }
    if let Some(min) = rule.min {
        if number < min {
            return Err(TokenError::validation(format!("'{}' is below the minimum of {}", text, min)));
        }
    }
    if let Some(max) = rule.max {
        if number > max {
            return Err(TokenError::validation(format!("'{}' exceeds the maximum of {}", text, max)));
        }
    }
    Ok(())
}

pub fn validate_length(value: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }

    if let Some((name, args)) = parse_function_call(value) {
        let lname = name.to_ascii_lowercase();
        if MATH_FUNCTIONS.contains(&lname.as_str()) {
            return validate_math_function(&lname, args, v);
        }
        return Err(TokenError::validation(format!("function '{}' is not a length", name)));
    }

    let dim = parse_dimension(value)
        .ok_or_else(|| TokenError::validation(format!("'{}' is not a valid length", value)))?;

    if dim.unit.is_empty() {
        if dim.number == 0.0 {
            return Ok("0".to_string());
        }
        if !rule.allow_unitless {
            return Err(TokenError::validation(format!("length '{}' is missing a unit", value)));
        }
    } else if dim.unit == "%" {
        if !rule.allow_percentage {
            return Err(TokenError::validation(format!("percentage '{}' is not allowed here", value)));
        }
    } else if !dim.has_unit(LENGTH_UNITS) {
        return Err(TokenError::validation(format!("unknown length unit in '{}'", value)));
    }

    check_range(dim.number, rule, value)?;
    Ok(dim.normalized())
}

/// Length test used when classifying shorthand components.
pub fn is_length(value: &str, allow_percentage: bool) -> bool {
    match parse_dimension(value) {
        Some(dim) if dim.unit.is_empty() => dim.number == 0.0,
        Some(dim) if dim.unit == "%" => allow_percentage,
        Some(dim) => dim.has_unit(LENGTH_UNITS),
        None => parse_function_call(value)
            .is_some_and(|(name, _)| MATH_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str())),
    }
}

pub fn validate_number(value: &str, rule: &PropertyRule) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }

    let dim = parse_dimension(value)
        .ok_or_else(|| TokenError::validation(format!("'{}' is not a number", value)))?;

    match dim.unit {
        "" => check_range(dim.number, rule, value)?,
        "%" if rule.allow_percentage => check_range(dim.number / 100.0, rule, value)?,
        _ => return Err(TokenError::validation(format!("'{}' must be a plain number", value))),
    }

    Ok(dim.normalized())
}

pub fn validate_integer(value: &str, rule: &PropertyRule) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }

    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TokenError::validation(format!("'{}' is not an integer", value)));
    }

    let number = value
        .parse::<i64>()
        .map_err(|_| TokenError::validation(format!("'{}' is out of range", value)))?;
    check_range(number as f64, rule, value)?;
    Ok(number.to_string())
}

pub fn validate_time(value: &str, rule: &PropertyRule) -> Result<String, TokenError> {
    let dim = parse_dimension(value)
        .filter(|d| d.has_unit(TIME_UNITS))
        .ok_or_else(|| TokenError::validation(format!("'{}' is not a time (s or ms)", value)))?;
    check_range(dim.number, rule, value)?;
    Ok(dim.normalized())
}

pub fn is_time(value: &str) -> bool {
    parse_dimension(value).is_some_and(|d| d.has_unit(TIME_UNITS))
}

/// Angles; a bare `0` is accepted unless `require_unit` is set.
pub fn validate_angle(value: &str, require_unit: bool) -> Result<String, TokenError> {
    let dim = parse_dimension(value)
        .ok_or_else(|| TokenError::validation(format!("'{}' is not an angle", value)))?;

    if dim.unit.is_empty() && dim.number == 0.0 && !require_unit {
        return Ok("0".to_string());
    }
    if !dim.has_unit(ANGLE_UNITS) {
        return Err(TokenError::validation(format!(
            "'{}' needs an angle unit (deg, rad, grad, turn)",
            value
        )));
    }
    Ok(dim.normalized())
}

pub fn is_angle(value: &str) -> bool {
    parse_dimension(value).is_some_and(|d| d.has_unit(ANGLE_UNITS))
}

/// `a b c d / e f g h`: up to two slash-separated groups of 1-4 radii.
pub fn validate_border_radius(value: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    let groups = split_slash(value);
    if groups.len() > 2 {
        return Err(TokenError::validation("border-radius accepts at most one '/'"));
    }

    let radius_rule = rule.single();
    let mut rendered = Vec::with_capacity(groups.len());
    for group in groups {
        let parts = split_list(group);
        if parts.is_empty() || parts.len() > 4 {
            return Err(TokenError::validation(format!(
                "border-radius group '{}' needs 1 to 4 values",
                group
            )));
        }

        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            out.push(v.validate_part(part, |p| validate_length(p, &radius_rule, v))?);
        }
        rendered.push(out.join(" "));
    }

    Ok(rendered.join(" / "))
}

/// `auto`, a positive number or `width/height`.
pub fn validate_aspect_ratio(value: &str, rule: &PropertyRule) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }

    let sides = split_slash(value);
    if sides.len() > 2 {
        return Err(TokenError::validation("aspect-ratio accepts at most one '/'"));
    }

    let mut out = Vec::with_capacity(sides.len());
    for side in sides {
        let dim = parse_dimension(side)
            .filter(|d| d.unit.is_empty() && d.number > 0.0)
            .ok_or_else(|| TokenError::validation(format!("'{}' is not a positive ratio term", side)))?;
        out.push(dim.normalized());
    }
    Ok(out.join(" / "))
}

/// Validate and normalize `calc()`, `min()`, `max()` or `clamp()`.
pub fn validate_math_function(name: &str, args: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let parts = split_commas(args);
    let arity_ok = match name {
        "calc" => parts.len() == 1,
        "clamp" => parts.len() == 3,
        _ => !parts.is_empty(),
    };
    if !arity_ok {
        return Err(TokenError::validation(format!("wrong number of arguments to {}()", name)));
    }

    let mut rendered = Vec::with_capacity(parts.len());
    for part in parts {
        rendered.push(normalize_math_expr(part, v)?);
    }
    Ok(format!("{}({})", name, rendered.join(", ")))
}

/// Re-emit a math expression with single spaces around binary operators.
fn normalize_math_expr(expr: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let bytes = expr.as_bytes();
    let mut tokens: Vec<String> = Vec::new();
    let mut expect_operand = true;
    let mut idx = 0;

    let invalid = || TokenError::validation(format!("invalid math expression '{}'", expr));

    while idx < bytes.len() {
        let ch = bytes[idx];

        if ch.is_ascii_whitespace() || ch == b'_' {
            idx += 1;
            continue;
        }

        if ch == b'(' {
            if !expect_operand {
                return Err(invalid());
            }
            let close = find_matching_paren(expr, idx).ok_or_else(invalid)?;
            let inner = normalize_math_expr(&expr[idx + 1..close], v)?;
            tokens.push(format!("({})", inner));
            idx = close + 1;
            expect_operand = false;
            continue;
        }

        if matches!(ch, b'+' | b'-' | b'*' | b'/') && !expect_operand {
            tokens.push((ch as char).to_string());
            idx += 1;
            expect_operand = true;
            continue;
        }

        if !expect_operand {
            return Err(invalid());
        }

        let starts_ident = ch.is_ascii_alphabetic()
            || (ch == b'-' && bytes.get(idx + 1).is_some_and(|b| b.is_ascii_alphabetic() || *b == b'-'));
        if starts_ident {
            let start = idx;
            idx += 1;
            while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'-') {
                idx += 1;
            }
            if bytes.get(idx) != Some(&b'(') {
                return Err(invalid());
            }
            let close = find_matching_paren(expr, idx).ok_or_else(invalid)?;
            let call = &expr[start..=close];
            let name = expr[start..idx].to_ascii_lowercase();
            let args = &expr[idx + 1..close];

            let rendered = if name == "var" {
                v.validate_custom_property_ref(call)?
            } else if MATH_FUNCTIONS.contains(&name.as_str()) {
                validate_math_function(&name, args, v)?
            } else {
                return Err(TokenError::validation(format!(
                    "function '{}' is not allowed in a math expression",
                    name
                )));
            };
            tokens.push(rendered);
            idx = close + 1;
            expect_operand = false;
            continue;
        }

        let start = idx;
        if matches!(ch, b'+' | b'-') {
            idx += 1;
        }
        while idx < bytes.len() && (bytes[idx].is_ascii_digit() || bytes[idx] == b'.') {
            idx += 1;
        }
        while idx < bytes.len() && (bytes[idx].is_ascii_alphabetic() || bytes[idx] == b'%') {
            idx += 1;
        }

        let dim = parse_dimension(&expr[start..idx]).ok_or_else(invalid)?;
        let unit_ok = dim.unit.is_empty()
            || dim.unit == "%"
            || dim.has_unit(LENGTH_UNITS)
            || dim.has_unit(ANGLE_UNITS)
            || dim.has_unit(TIME_UNITS);
        if !unit_ok {
            return Err(invalid());
        }
        tokens.push(dim.normalized());
        expect_operand = false;
    }

    if expect_operand {
        return Err(invalid());
    }

    Ok(tokens.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::registry;

    fn validator() -> ValueValidator {
        ValueValidator::default()
    }

    #[test]
    fn test_parse_dimension() {
        let dim = parse_dimension("2.5rem").unwrap();
        assert_eq!(dim.number, 2.5);
        assert_eq!(dim.unit, "rem");
        assert_eq!(parse_dimension("-10px").unwrap().number, -10.0);
        assert_eq!(parse_dimension(".5em").unwrap().number, 0.5);
        assert_eq!(parse_dimension("50%").unwrap().unit, "%");
        assert!(parse_dimension("px").is_none());
        assert!(parse_dimension("1.").is_none());
        assert!(parse_dimension("1px2").is_none());
        assert!(parse_dimension("1e5px").is_none());
    }

    #[test]
    fn test_lengths() {
        let v = validator();
        let padding = registry().get("padding").unwrap().single();
        assert_eq!(validate_length("2rem", &padding, &v).unwrap(), "2rem");
        assert_eq!(validate_length("2REM", &padding, &v).unwrap(), "2rem");
        assert_eq!(validate_length("+4px", &padding, &v).unwrap(), "4px");
        assert_eq!(validate_length("0", &padding, &v).unwrap(), "0");
        assert_eq!(validate_length("50%", &padding, &v).unwrap(), "50%");
        assert!(validate_length("12", &padding, &v).is_err());
        assert!(validate_length("12parsecs", &padding, &v).is_err());
        assert!(validate_length("-1rem", &padding, &v).is_err());

        let margin = registry().get("margin").unwrap().single();
        assert_eq!(validate_length("-1rem", &margin, &v).unwrap(), "-1rem");
        assert_eq!(validate_length("auto", &margin, &v).unwrap(), "auto");

        let line_height = registry().get("line-height").unwrap();
        assert_eq!(validate_length("1.5", line_height, &v).unwrap(), "1.5");

        let border_width = registry().get("border-top-width").unwrap();
        assert!(validate_length("10%", border_width, &v).is_err());
        assert_eq!(validate_length("thick", border_width, &v).unwrap(), "thick");
    }

    #[test]
    fn test_container_and_viewport_units() {
        let v = validator();
        let width = registry().get("width").unwrap();
        for value in ["100dvh", "50cqw", "10vmin", "1fr", "3ch"] {
            assert!(validate_length(value, width, &v).is_ok(), "{}", value);
        }
    }

    #[test]
    fn test_math_functions() {
        let v = validator();
        let width = registry().get("width").unwrap();
        assert_eq!(validate_length("calc(100%-2rem)", width, &v).unwrap(), "calc(100% - 2rem)");
        assert_eq!(
            validate_length("calc(100% - 2rem)", width, &v).unwrap(),
            "calc(100% - 2rem)"
        );
        assert_eq!(
            validate_length("calc((1px+2px)*3)", width, &v).unwrap(),
            "calc((1px + 2px) * 3)"
        );
        assert_eq!(
            validate_length("clamp(1rem,2vw,3rem)", width, &v).unwrap(),
            "clamp(1rem, 2vw, 3rem)"
        );
        assert_eq!(
            validate_length("calc(-1*var(--gap))", width, &v).unwrap(),
            "calc(-1 * var(--gap))"
        );
        assert!(validate_length("calc(1px+)", width, &v).is_err());
        assert!(validate_length("calc(alert(1))", width, &v).is_err());
        assert!(validate_length("clamp(1rem,2vw)", width, &v).is_err());
        assert!(validate_length("calc(1px 2px)", width, &v).is_err());
    }

    #[test]
    fn test_numbers_and_integers() {
        let opacity = registry().get("opacity").unwrap();
        assert_eq!(validate_number("0.5", opacity).unwrap(), "0.5");
        assert_eq!(validate_number("50%", opacity).unwrap(), "50%");
        assert!(validate_number("1.5", opacity).is_err());
        assert!(validate_number("-0.1", opacity).is_err());

        let weight = registry().get("font-weight").unwrap();
        assert_eq!(validate_number("700", weight).unwrap(), "700");
        assert_eq!(validate_number("BOLD", weight).unwrap(), "bold");
        assert!(validate_number("1001", weight).is_err());

        let z = registry().get("z-index").unwrap();
        assert_eq!(validate_integer("-5", z).unwrap(), "-5");
        assert_eq!(validate_integer("auto", z).unwrap(), "auto");
        assert!(validate_integer("1.5", z).is_err());

        let columns = registry().get("columns").unwrap();
        assert!(validate_integer("0", columns).is_err());
    }

    #[test]
    fn test_time_and_angle() {
        let duration = registry().get("transition-duration").unwrap().single();
        assert_eq!(validate_time("300ms", &duration).unwrap(), "300ms");
        assert_eq!(validate_time("1.5S", &duration).unwrap(), "1.5s");
        assert!(validate_time("300", &duration).is_err());
        assert!(validate_time("-1s", &duration).is_err());

        let delay = registry().get("transition-delay").unwrap().single();
        assert_eq!(validate_time("-1s", &delay).unwrap(), "-1s");

        assert_eq!(validate_angle("45deg", false).unwrap(), "45deg");
        assert_eq!(validate_angle("0", false).unwrap(), "0");
        assert!(validate_angle("0", true).is_err());
        assert!(validate_angle("45", false).is_err());
    }

    #[test]
    fn test_border_radius_groups() {
        let v = validator();
        let rule = registry().get("border-radius").unwrap();
        assert_eq!(validate_border_radius("10px", rule, &v).unwrap(), "10px");
        assert_eq!(
            validate_border_radius("10px,20px/5px", rule, &v).unwrap(),
            "10px 20px / 5px"
        );
        assert!(validate_border_radius("1px/2px/3px", rule, &v).is_err());
        assert!(validate_border_radius("1px,2px,3px,4px,5px", rule, &v).is_err());
        assert!(validate_border_radius("-1px", rule, &v).is_err());
    }

    #[test]
    fn test_aspect_ratio() {
        let rule = registry().get("aspect-ratio").unwrap();
        assert_eq!(validate_aspect_ratio("16/9", rule).unwrap(), "16 / 9");
        assert_eq!(validate_aspect_ratio("1.5", rule).unwrap(), "1.5");
        assert_eq!(validate_aspect_ratio("auto", rule).unwrap(), "auto");
        assert!(validate_aspect_ratio("0/1", rule).is_err());
        assert!(validate_aspect_ratio("16px/9", rule).is_err());
    }
}
