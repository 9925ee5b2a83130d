//! Value validation engine.
//!
//! [`ValueValidator::validate`] runs every value through the same gate:
//! URL rewriting and payload checks first, then CSS-wide keywords and custom
//! properties, then the registry rule for the property. The rule's
//! [`ValueType`] picks one of the category validators in the submodules.
//! Every branch returns the value in canonical form, so validating an
//! already-validated value yields it unchanged.

pub mod color;
pub mod content;
pub mod filter;
pub mod font;
pub mod function;
pub mod length;
pub mod shadow;
pub mod shorthand;

use crate::config::{GenerateOptions, SecurityConfig};
use crate::errors::TokenError;
use crate::parser::ParsedClass;
use crate::registry::{registry, Multiplicity, PropertyRule, ValueType, CSS_WIDE_KEYWORDS};
use crate::security::{rewrite_urls, PatternGuard, UrlPolicy};
use crate::tokenizer::{parse_function_call, split_commas, split_components, split_list};
use log::trace;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::sync::OnceLock;

/// What kind of value was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Typed(ValueType),
    /// `inherit`, `initial`, `unset`, `revert` or `revert-layer`
    GlobalKeyword,
    CustomProperty,
    /// Unknown property accepted by the permissive fallback
    Permissive,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Typed(value_type) => value_type.name(),
            ValueKind::GlobalKeyword => "global-keyword",
            ValueKind::CustomProperty => "custom-property",
            ValueKind::Permissive => "permissive",
        }
    }
}

impl Serialize for ValueKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// An accepted value, ready to be written into a declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedValue {
    pub value: String,
    pub kind: ValueKind,
    /// Top-level components, each already normalized
    pub components: Vec<String>,
}

impl ValidatedValue {
    fn new(value: String, kind: ValueKind) -> Self {
        Self {
            components: vec![value.clone()],
            value,
            kind,
        }
    }
}

pub type ValidationResult = Result<ValidatedValue, TokenError>;

fn permissive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^[a-zA-Z0-9#%.,()'"+*/_\s-]+$"#).expect("permissive value pattern is valid")
    })
}

/// Validates values against the property registry and the security gate
#[derive(Debug, Clone)]
pub struct ValueValidator {
    options: GenerateOptions,
    guard: PatternGuard,
    url_policy: UrlPolicy,
}

impl Default for ValueValidator {
    fn default() -> Self {
        Self::new(&GenerateOptions::default(), &SecurityConfig::default())
    }
}

impl ValueValidator {
    pub fn new(options: &GenerateOptions, security: &SecurityConfig) -> Self {
        Self {
            options: options.clone(),
            guard: PatternGuard::from_config(security),
            url_policy: UrlPolicy::from_config(security),
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn guard(&self) -> &PatternGuard {
        &self.guard
    }

    /// Validate the payload of a parsed class against its property.
    pub fn validate_class(&self, parsed: &ParsedClass) -> ValidationResult {
        self.validate(&parsed.raw_value, &parsed.property)
    }

    /// Validate `value` for `property` and return its canonical form.
    pub fn validate(&self, value: &str, property: &str) -> ValidationResult {
        let value = value.trim();
        if value.is_empty() {
            return Err(TokenError::validation("empty value"));
        }

        let rewrite = rewrite_urls(value, &self.url_policy)?;
        self.guard.check_payload(&rewrite.masked)?;
        let value = rewrite.rewritten.as_str();

        let lower = value.to_ascii_lowercase();
        if CSS_WIDE_KEYWORDS.contains(&lower.as_str()) {
            return Ok(ValidatedValue::new(lower, ValueKind::GlobalKeyword));
        }

        if lower.contains("var(") && !self.options.allow_custom_properties {
            return Err(TokenError::validation("custom properties are disabled"));
        }

        let Some(rule) = registry().get(property) else {
            return self.validate_unknown(value, property);
        };

        if is_var_call(value) {
            let rendered = self.validate_custom_property(value, |fallback| {
                self.validate_with_rule(fallback, property, rule).map(|v| v.value)
            })?;
            return Ok(ValidatedValue::new(rendered, ValueKind::CustomProperty));
        }

        let validated = self.validate_with_rule(value, property, rule)?;
        trace!("{}: '{}' -> '{}'", property, value, validated.value);
        Ok(validated)
    }

    fn validate_unknown(&self, value: &str, property: &str) -> ValidationResult {
        if self.options.strict {
            return Err(TokenError::UnknownProperty(property.to_string()));
        }

        if !self.guard.is_match(permissive_pattern(), value)? {
            return Err(TokenError::validation(format!(
                "value for unknown property '{}' contains unsupported characters",
                property
            )));
        }

        let parts = split_components(value);
        let normalized = parts.join(" ");
        Ok(ValidatedValue {
            value: normalized,
            kind: ValueKind::Permissive,
            components: parts.into_iter().map(str::to_string).collect(),
        })
    }

    fn validate_with_rule(&self, value: &str, property: &str, rule: &PropertyRule) -> ValidationResult {
        let kind = ValueKind::Typed(rule.value_type);

        match rule.multiplicity {
            Multiplicity::Single => {
                let rendered = self.validate_typed(value, property, rule)?;
                Ok(ValidatedValue::new(rendered, kind))
            }
            Multiplicity::SpaceList { max } => {
                let parts = split_components(value);
                if parts.is_empty() {
                    return Err(TokenError::validation(format!("empty {} value", property)));
                }
                if parts.len() > max {
                    return Err(TokenError::validation(format!(
                        "{} accepts at most {} values, got {}",
                        property,
                        max,
                        parts.len()
                    )));
                }
                let components = self.validate_each(&parts, property, rule)?;
                Ok(ValidatedValue {
                    value: components.join(" "),
                    kind,
                    components,
                })
            }
            Multiplicity::CommaList => {
                let parts = split_commas(value);
                let components = self.validate_each(&parts, property, rule)?;
                Ok(ValidatedValue {
                    value: components.join(", "),
                    kind,
                    components,
                })
            }
        }
    }

    fn validate_each(&self, parts: &[&str], property: &str, rule: &PropertyRule) -> Result<Vec<String>, TokenError> {
        let element = rule.single();
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            if part.is_empty() {
                return Err(TokenError::validation(format!("empty list element in {}", property)));
            }
            out.push(self.validate_part(part, |p| self.validate_typed(p, property, &element))?);
        }
        Ok(out)
    }

    /// Validate one element of a value: `var()` references pass through with
    /// their fallback checked by `validate`, anything else goes to `validate`.
    pub fn validate_part<F>(&self, part: &str, validate: F) -> Result<String, TokenError>
    where
        F: Fn(&str) -> Result<String, TokenError>,
    {
        if is_var_call(part) {
            if !self.options.allow_custom_properties {
                return Err(TokenError::validation("custom properties are disabled"));
            }
            return self.validate_custom_property(part, validate);
        }
        validate(part)
    }

    /// `var(--name)` or `var(--name, fallback)`.
    pub fn validate_custom_property<F>(&self, call: &str, fallback: F) -> Result<String, TokenError>
    where
        F: Fn(&str) -> Result<String, TokenError>,
    {
        if !self.options.allow_custom_properties {
            return Err(TokenError::validation("custom properties are disabled"));
        }

        let (_, args) = parse_function_call(call)
            .ok_or_else(|| TokenError::validation(format!("malformed var() reference '{}'", call)))?;

        let (name, rest) = match args.find(',') {
            Some(idx) => (args[..idx].trim(), Some(args[idx + 1..].trim())),
            None => (args.trim(), None),
        };

        if !is_custom_property_name(name) {
            return Err(TokenError::validation(format!("'{}' is not a custom property name", name)));
        }

        match rest {
            None => Ok(format!("var({})", name)),
            Some("") => Err(TokenError::validation("empty var() fallback")),
            Some(fallback_value) => Ok(format!("var({}, {})", name, fallback(fallback_value)?)),
        }
    }

    /// `var()` inside math expressions, where the fallback is itself math.
    pub fn validate_custom_property_ref(&self, call: &str) -> Result<String, TokenError> {
        self.validate_custom_property(call, |fallback| Ok(split_list(fallback).join(" ")))
    }

    fn validate_typed(&self, value: &str, property: &str, rule: &PropertyRule) -> Result<String, TokenError> {
        match rule.value_type {
            ValueType::Length => length::validate_length(value, rule, self),
            ValueType::Color if rule.has_keyword(value) => Ok(value.to_ascii_lowercase()),
            ValueType::Color => color::validate_color(value, self),
            ValueType::Number => length::validate_number(value, rule),
            ValueType::Integer => length::validate_integer(value, rule),
            ValueType::Time => length::validate_time(value, rule),
            ValueType::Angle if rule.has_keyword(value) => Ok(value.to_ascii_lowercase()),
            ValueType::Angle => length::validate_angle(value, false),
            ValueType::Keyword => validate_keyword(value, rule),
            ValueType::Function | ValueType::KeywordOrFunction if rule.has_keyword(value) => {
                Ok(value.to_ascii_lowercase())
            }
            ValueType::Function | ValueType::KeywordOrFunction => {
                function::validate_function(value, rule.functions, self)
            }
            ValueType::Font => font::validate_font(value, self),
            ValueType::FontFamily => font::validate_family_list(value),
            ValueType::SpecialShorthand => shorthand::validate_border(value, property, self),
            ValueType::Background => shorthand::validate_background(value, self),
            ValueType::Transition if rule.has_keyword(value) => Ok(value.to_ascii_lowercase()),
            ValueType::Transition => shorthand::validate_transition(value, self),
            ValueType::Animation if rule.has_keyword(value) => Ok(value.to_ascii_lowercase()),
            ValueType::Animation => shorthand::validate_animation(value, self),
            ValueType::Content => content::validate_content(value, rule, self),
            ValueType::String => content::validate_string(value, rule),
            ValueType::Shadow => shadow::validate_shadow(value, property, rule, self),
            ValueType::Filter => filter::validate_filter(value, rule, self),
            ValueType::BorderRadius => length::validate_border_radius(value, rule, self),
            ValueType::Complex => function::validate_complex(value, rule, self),
            ValueType::Image => function::validate_image(value, rule, self),
            ValueType::AspectRatio => length::validate_aspect_ratio(value, rule),
        }
    }
}

fn validate_keyword(value: &str, rule: &PropertyRule) -> Result<String, TokenError> {
    if rule.has_keyword(value) {
        return Ok(value.to_ascii_lowercase());
    }
    if rule.allow_custom_ident && is_custom_ident(value) {
        return Ok(value.to_string());
    }
    Err(TokenError::validation(format!("'{}' is not an accepted keyword", value)))
}

fn is_var_call(value: &str) -> bool {
    parse_function_call(value).is_some_and(|(name, _)| name.eq_ignore_ascii_case("var"))
}

fn is_custom_property_name(name: &str) -> bool {
    name.len() > 2
        && name.starts_with("--")
        && name[2..].bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Author-defined identifier such as an animation or transition name.
pub fn is_custom_ident(value: &str) -> bool {
    let body = value.strip_prefix('-').unwrap_or(value);
    let mut bytes = body.bytes();
    let first_ok = bytes.next().is_some_and(|b| b.is_ascii_alphabetic() || b == b'_');
    first_ok
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        && !CSS_WIDE_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_class;

    fn check(value: &str, property: &str) -> ValidationResult {
        ValueValidator::default().validate(value, property)
    }

    fn value_of(value: &str, property: &str) -> String {
        check(value, property).unwrap().value
    }

    #[test]
    fn test_space_lists() {
        assert_eq!(value_of("2rem", "padding"), "2rem");
        assert_eq!(value_of("1rem,2rem,3rem,4rem", "margin"), "1rem 2rem 3rem 4rem");
        assert_eq!(value_of("1rem 2rem", "padding"), "1rem 2rem");
        assert_eq!(value_of("1rem_2rem", "padding"), "1rem 2rem");
        assert!(check("_", "margin").is_err());
        let err = check("1px,2px,3px,4px,5px", "padding").unwrap_err();
        assert!(err.to_string().contains("at most 4"));
    }

    #[test]
    fn test_comma_lists() {
        assert_eq!(value_of("opacity,transform", "transition-property"), "opacity, transform");
        assert_eq!(value_of("100ms,1s", "transition-duration"), "100ms, 1s");
        assert!(check("100ms,1px", "transition-duration").is_err());
    }

    #[test]
    fn test_global_keywords() {
        let validated = check("INHERIT", "padding").unwrap();
        assert_eq!(validated.value, "inherit");
        assert_eq!(validated.kind, ValueKind::GlobalKeyword);
        assert_eq!(value_of("revert-layer", "color"), "revert-layer");
    }

    #[test]
    fn test_custom_properties() {
        let validated = check("var(--gap)", "padding").unwrap();
        assert_eq!(validated.value, "var(--gap)");
        assert_eq!(validated.kind, ValueKind::CustomProperty);
        assert_eq!(value_of("var(--gap,1rem)", "padding"), "var(--gap, 1rem)");
        assert_eq!(value_of("var(--x),2rem", "margin"), "var(--x) 2rem");
        assert!(check("var(--gap,red)", "padding").is_err());
        assert!(check("var(gap)", "padding").is_err());

        let options = GenerateOptions {
            allow_custom_properties: false,
            ..GenerateOptions::default()
        };
        let strict = ValueValidator::new(&options, &SecurityConfig::default());
        assert!(strict.validate("var(--gap)", "padding").is_err());
    }

    #[test]
    fn test_unknown_properties() {
        let validated = check("10px,auto", "made-up-prop").unwrap();
        assert_eq!(validated.value, "10px auto");
        assert_eq!(validated.kind, ValueKind::Permissive);
        assert_eq!(check("x_mandatory", "made-up-prop").unwrap().value, "x mandatory");
        assert!(check("a|b", "made-up-prop").is_err());

        let options = GenerateOptions {
            strict: true,
            ..GenerateOptions::default()
        };
        let strict = ValueValidator::new(&options, &SecurityConfig::default());
        assert!(matches!(
            strict.validate("10px", "made-up-prop"),
            Err(TokenError::UnknownProperty(_))
        ));
    }

    #[test]
    fn test_keywords_and_custom_idents() {
        assert_eq!(value_of("FLEX", "display"), "flex");
        assert!(check("flexbox", "display").is_err());
        assert_eq!(value_of("slide-in", "animation-name"), "slide-in");
        assert!(check("1slide", "animation-name").is_err());
    }

    #[test]
    fn test_security_runs_before_validation() {
        let err = check("u(javascript:alert(1))", "background-image").unwrap_err();
        assert!(err.is_security());
        let err = check("red;}body{x:y", "made-up-prop").unwrap_err();
        assert!(err.is_security());
        let err = check("expression(alert(1))", "width").unwrap_err();
        assert!(err.is_security());
    }

    #[test]
    fn test_validate_class() {
        let parsed = parse_class("m-[1rem,2rem,3rem,4rem]").unwrap();
        let validated = ValueValidator::default().validate_class(&parsed).unwrap();
        assert_eq!(validated.value, "1rem 2rem 3rem 4rem");
        assert_eq!(validated.components.len(), 4);
    }

    #[test]
    fn test_validated_values_are_fixed_points() {
        let cases = [
            ("2rem", "padding"),
            ("1rem,2rem", "margin"),
            ("RGB(255,0,0)", "color"),
            ("bold,18px,Open-Sans", "font"),
            ("2px,solid,red", "border"),
            ("calc(100%-1rem)", "width"),
            ("0_1px_2px_rgba(0,0,0,0.5)", "box-shadow"),
            ("blur(2px),brightness(1.2)", "filter"),
            ("translateX(10px),rotate(45deg)", "transform"),
            ("u(https://example.com/a.png)", "background-image"),
            ("16/9", "aspect-ratio"),
        ];
        let validator = ValueValidator::default();
        for (value, property) in cases {
            let first = validator.validate(value, property).unwrap().value;
            let second = validator.validate(&first, property).unwrap().value;
            assert_eq!(first, second, "{} for {}", value, property);
        }
    }

    #[test]
    fn test_is_custom_ident() {
        assert!(is_custom_ident("fade"));
        assert!(is_custom_ident("-webkit-thing"));
        assert!(is_custom_ident("_private"));
        assert!(!is_custom_ident("9lives"));
        assert!(!is_custom_ident("inherit"));
        assert!(!is_custom_ident(""));
    }
}
