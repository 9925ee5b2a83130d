//! Multi-component shorthands: border/outline, background, transition and
//! animation. Components are classified one by one and each category may
//! appear at most once.

use super::length::{is_length, is_time, parse_dimension, validate_length, validate_time};
use super::{color, function, is_custom_ident, ValueValidator};
use crate::errors::TokenError;
use crate::registry::{
    PropertyRule, ANIMATION_DIRECTIONS, ANIMATION_FILL_MODES, ANIMATION_PLAY_STATES, BORDER_STYLES,
    BORDER_WIDTH_KEYWORDS, GRADIENT_FUNCTIONS, TIMING_FUNCTIONS, TIMING_KEYWORDS,
};
use crate::security::is_rendered_url;
use crate::tokenizer::{parse_function_call, split_components, split_slash};
use std::collections::HashSet;

const BACKGROUND_REPEAT: &[&str] = &["repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round"];
const BACKGROUND_ATTACHMENT: &[&str] = &["scroll", "fixed", "local"];
const BACKGROUND_BOX: &[&str] = &["border-box", "padding-box", "content-box", "text"];
const BACKGROUND_POSITION: &[&str] = &["left", "right", "top", "bottom", "center"];
const BACKGROUND_SIZE: &[&str] = &["auto", "cover", "contain"];
const TRANSITION_BEHAVIOR: &[&str] = &["normal", "allow-discrete"];

/// Tracks which categories a shorthand has already used
struct Seen(HashSet<&'static str>);

impl Seen {
    fn new() -> Self {
        Self(HashSet::new())
    }

    fn claim(&mut self, category: &'static str, shorthand: &str) -> Result<(), TokenError> {
        if self.0.insert(category) {
            Ok(())
        } else {
            Err(TokenError::validation(format!("duplicate {} in {}", category, shorthand)))
        }
    }

    fn has(&self, category: &str) -> bool {
        self.0.contains(category)
    }
}

fn has_keyword(list: &[&str], value: &str) -> bool {
    list.iter().any(|k| k.eq_ignore_ascii_case(value))
}

fn is_var(value: &str) -> bool {
    value.to_ascii_lowercase().starts_with("var(")
}

/// `border`, `outline`, `column-rule` and the per-side borders: at most one
/// width, one style and one color.
pub fn validate_border(value: &str, property: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let comps = split_components(value);
    if comps.is_empty() {
        return Err(TokenError::validation(format!("empty {} value", property)));
    }

    let width_rule = PropertyRule::argument_length(false, false);
    let mut seen = Seen::new();
    let mut out = Vec::with_capacity(comps.len());

    for comp in comps {
        if is_var(comp) {
            out.push(v.validate_part(comp, |p| Ok(p.to_string()))?);
            continue;
        }

        let lower = comp.to_ascii_lowercase();
        let is_style = has_keyword(BORDER_STYLES, comp) || (property == "outline" && lower == "auto");

        if has_keyword(BORDER_WIDTH_KEYWORDS, comp) || is_length(comp, false) {
            seen.claim("width", property)?;
            out.push(if has_keyword(BORDER_WIDTH_KEYWORDS, comp) {
                lower
            } else {
                validate_length(comp, &width_rule, v)?
            });
        } else if is_style {
            seen.claim("style", property)?;
            out.push(lower);
        } else if color::is_color(comp) {
            seen.claim("color", property)?;
            out.push(color::validate_color(comp, v)?);
        } else {
            return Err(TokenError::validation(format!(
                "'{}' is not a width, style or color",
                comp
            )));
        }
    }

    Ok(out.join(" "))
}

/// `background`: image, color, position/size, repeat, attachment and boxes.
pub fn validate_background(value: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let comps = split_components(value);
    if comps.is_empty() {
        return Err(TokenError::validation("empty background value"));
    }

    let position_rule = PropertyRule::argument_length(true, true);
    let size_rule = PropertyRule::argument_length(false, true);
    let mut seen = Seen::new();
    let mut positions = 0;
    let mut repeats = 0;
    let mut boxes = 0;
    let mut after_slash = false;
    let mut out = Vec::with_capacity(comps.len());

    for comp in comps {
        if comp == "/" {
            if positions == 0 || after_slash {
                return Err(TokenError::validation("'/' must follow a background position"));
            }
            after_slash = true;
            out.push("/".to_string());
            continue;
        }

        // `center/cover` written without spaces
        let sides = split_slash(comp);
        if sides.len() == 2 {
            let position = background_position(sides[0], &position_rule, v)?;
            let size = background_size(sides[1], &size_rule, v)?;
            positions += 1;
            seen.claim("size", "background")?;
            out.push(format!("{} / {}", position, size));
            continue;
        }

        if after_slash {
            seen.claim("size", "background")?;
            out.push(background_size(comp, &size_rule, v)?);
            after_slash = false;
            continue;
        }

        let lower = comp.to_ascii_lowercase();
        if is_var(comp) {
            out.push(v.validate_part(comp, |p| Ok(p.to_string()))?);
        } else if lower == "none" || is_rendered_url(comp) || is_gradient(comp) {
            seen.claim("image", "background")?;
            out.push(if lower == "none" {
                lower
            } else {
                function::validate_image(comp, &image_rule(), v)?
            });
        } else if has_keyword(BACKGROUND_REPEAT, comp) {
            repeats += 1;
            if repeats > 2 {
                return Err(TokenError::validation("too many background-repeat values"));
            }
            out.push(lower);
        } else if has_keyword(BACKGROUND_ATTACHMENT, comp) {
            seen.claim("attachment", "background")?;
            out.push(lower);
        } else if has_keyword(BACKGROUND_BOX, comp) {
            boxes += 1;
            if boxes > 2 {
                return Err(TokenError::validation("too many background box values"));
            }
            out.push(lower);
        } else if has_keyword(BACKGROUND_POSITION, comp) || is_length(comp, true) {
            positions += 1;
            if positions > 4 {
                return Err(TokenError::validation("too many background-position values"));
            }
            out.push(background_position(comp, &position_rule, v)?);
        } else if color::is_color(comp) {
            seen.claim("color", "background")?;
            out.push(color::validate_color(comp, v)?);
        } else {
            return Err(TokenError::validation(format!(
                "'{}' is not a valid background component",
                comp
            )));
        }
    }

    if after_slash {
        return Err(TokenError::validation("missing background-size after '/'"));
    }

    Ok(out.join(" "))
}

fn is_gradient(value: &str) -> bool {
    parse_function_call(value)
        .is_some_and(|(name, _)| GRADIENT_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str()))
}

fn image_rule() -> PropertyRule {
    let mut rule = PropertyRule::argument_length(false, false);
    rule.value_type = crate::registry::ValueType::Image;
    rule.functions = GRADIENT_FUNCTIONS;
    rule
}

fn background_position(value: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    if has_keyword(BACKGROUND_POSITION, value) {
        return Ok(value.to_ascii_lowercase());
    }
    validate_length(value, rule, v)
}

fn background_size(value: &str, rule: &PropertyRule, v: &ValueValidator) -> Result<String, TokenError> {
    if has_keyword(BACKGROUND_SIZE, value) {
        return Ok(value.to_ascii_lowercase());
    }
    validate_length(value, rule, v)
}

fn is_timing(value: &str) -> bool {
    has_keyword(TIMING_KEYWORDS, value)
        || parse_function_call(value)
            .is_some_and(|(name, _)| TIMING_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str()))
}

fn render_timing(value: &str, v: &ValueValidator) -> Result<String, TokenError> {
    if has_keyword(TIMING_KEYWORDS, value) {
        return Ok(value.to_ascii_lowercase());
    }
    function::validate_function(value, TIMING_FUNCTIONS, v)
}

/// Durations come before delays; the first time is always the duration.
fn render_time(value: &str, seen: &mut Seen, shorthand: &str) -> Result<String, TokenError> {
    let mut rule = PropertyRule::argument_length(false, false);
    if seen.has("duration") {
        seen.claim("delay", shorthand)?;
        rule.allow_negative = true;
    } else {
        seen.claim("duration", shorthand)?;
    }
    validate_time(value, &rule)
}

/// `transition: <property> <duration> <timing> <delay> <behavior>`
pub fn validate_transition(value: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let comps = split_components(value);
    if comps.is_empty() {
        return Err(TokenError::validation("empty transition value"));
    }

    let mut seen = Seen::new();
    let mut out = Vec::with_capacity(comps.len());

    for comp in comps {
        if is_var(comp) {
            out.push(v.validate_part(comp, |p| Ok(p.to_string()))?);
        } else if is_time(comp) {
            out.push(render_time(comp, &mut seen, "transition")?);
        } else if is_timing(comp) {
            seen.claim("timing function", "transition")?;
            out.push(render_timing(comp, v)?);
        } else if has_keyword(TRANSITION_BEHAVIOR, comp) {
            seen.claim("transition behavior", "transition")?;
            out.push(comp.to_ascii_lowercase());
        } else if is_custom_ident(comp) {
            seen.claim("property", "transition")?;
            out.push(comp.to_string());
        } else {
            return Err(TokenError::validation(format!(
                "'{}' is not a valid transition component",
                comp
            )));
        }
    }

    Ok(out.join(" "))
}

/// `animation: <name> <duration> <timing> <delay> <count> <direction> <fill> <state>`
pub fn validate_animation(value: &str, v: &ValueValidator) -> Result<String, TokenError> {
    let comps = split_components(value);
    if comps.is_empty() {
        return Err(TokenError::validation("empty animation value"));
    }

    let mut seen = Seen::new();
    let mut out = Vec::with_capacity(comps.len());

    for comp in comps {
        let lower = comp.to_ascii_lowercase();

        if is_var(comp) {
            out.push(v.validate_part(comp, |p| Ok(p.to_string()))?);
        } else if is_time(comp) {
            out.push(render_time(comp, &mut seen, "animation")?);
        } else if is_timing(comp) {
            seen.claim("timing function", "animation")?;
            out.push(render_timing(comp, v)?);
        } else if lower == "infinite" || parse_dimension(comp).is_some_and(|d| d.unit.is_empty()) {
            seen.claim("iteration count", "animation")?;
            let count = parse_dimension(comp).map(|d| d.number).unwrap_or(0.0);
            if count < 0.0 {
                return Err(TokenError::validation("animation iteration count must not be negative"));
            }
            out.push(if lower == "infinite" { lower } else { comp.trim_start_matches('+').to_string() });
        } else if has_keyword(ANIMATION_DIRECTIONS, comp) && !(lower == "normal" && seen.has("direction")) {
            seen.claim("direction", "animation")?;
            out.push(lower);
        } else if has_keyword(ANIMATION_FILL_MODES, comp) && !(lower == "none" && seen.has("fill mode")) {
            seen.claim("fill mode", "animation")?;
            out.push(lower);
        } else if has_keyword(ANIMATION_PLAY_STATES, comp) {
            seen.claim("play state", "animation")?;
            out.push(lower);
        } else if is_custom_ident(comp) || lower == "none" {
            seen.claim("name", "animation")?;
            out.push(comp.to_string());
        } else {
            return Err(TokenError::validation(format!(
                "'{}' is not a valid animation component",
                comp
            )));
        }
    }

    Ok(out.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v() -> ValueValidator {
        ValueValidator::default()
    }

    #[test]
    fn test_border_shorthand() {
        let v = v();
        assert_eq!(validate_border("2px,solid,red", "border", &v).unwrap(), "2px solid red");
        assert_eq!(validate_border("2px_dashed_#FFF", "border", &v).unwrap(), "2px dashed #fff");
        assert_eq!(validate_border("thin", "border-top", &v).unwrap(), "thin");
        assert_eq!(validate_border("auto", "outline", &v).unwrap(), "auto");
        assert_eq!(
            validate_border("1px,solid,var(--edge)", "border", &v).unwrap(),
            "1px solid var(--edge)"
        );
    }

    #[test]
    fn test_border_rejects_duplicate_categories() {
        let v = v();
        assert!(validate_border("2px,2px,solid,red", "outline", &v).is_err());
        let err = validate_border("2px,3px,solid", "border", &v).unwrap_err();
        assert!(err.to_string().contains("duplicate width"));
        assert!(validate_border("solid,dashed", "border", &v).is_err());
        assert!(validate_border("red,blue", "border", &v).is_err());
        assert!(validate_border("2px,solid,sparkly", "border", &v).is_err());
        assert!(validate_border("10%,solid", "border", &v).is_err());
        assert!(validate_border("auto", "border", &v).is_err());
    }

    #[test]
    fn test_background_shorthand() {
        let v = v();
        assert_eq!(validate_background("red", &v).unwrap(), "red");
        assert_eq!(
            validate_background("url('https://a.test/x.png'),no-repeat,center", &v).unwrap(),
            "url('https://a.test/x.png') no-repeat center"
        );
        assert_eq!(
            validate_background("center/cover,#000", &v).unwrap(),
            "center / cover #000"
        );
        assert_eq!(
            validate_background("linear-gradient(red,blue),fixed", &v).unwrap(),
            "linear-gradient(red, blue) fixed"
        );
        assert!(validate_background("red,blue", &v).is_err());
        assert!(validate_background("sparkly", &v).is_err());
        assert!(validate_background("/cover", &v).is_err());
    }

    #[test]
    fn test_transition_shorthand() {
        let v = v();
        assert_eq!(
            validate_transition("opacity,300ms,ease-in-out", &v).unwrap(),
            "opacity 300ms ease-in-out"
        );
        assert_eq!(
            validate_transition("all_150ms_cubic-bezier(0.4,0,0.2,1)_50ms", &v).unwrap(),
            "all 150ms cubic-bezier(0.4, 0, 0.2, 1) 50ms"
        );
        assert!(validate_transition("opacity,1s,2s,3s", &v).is_err());
        assert!(validate_transition("opacity,transform", &v).is_err());
        assert!(validate_transition("opacity,-1s", &v).is_err());
        assert!(validate_transition("opacity,ease,linear", &v).is_err());
    }

    #[test]
    fn test_animation_shorthand() {
        let v = v();
        assert_eq!(
            validate_animation("spin,1s,linear,infinite", &v).unwrap(),
            "spin 1s linear infinite"
        );
        assert_eq!(
            validate_animation("fade_2s_ease-out_1s_3_alternate_forwards_paused", &v).unwrap(),
            "fade 2s ease-out 1s 3 alternate forwards paused"
        );
        assert!(validate_animation("spin,1s,2,infinite", &v).is_err());
        assert!(validate_animation("spin,fade", &v).is_err());
        assert!(validate_animation("spin,1s,-2", &v).is_err());
    }
}
