use thiserror::Error;

/// Whole-call error type for the bracket-css crate
#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid input shape: {0}")]
    InputShape(String),

    #[error("Security violation in token '{token}': {violation}")]
    SecurityPolicy {
        token: String,
        violation: SecurityViolation,
    },

    #[error("Failed to write output to {path}: {message}")]
    OutputError { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, CompilerError>;

/// Syntax problems with a single class token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty class token")]
    Empty,

    #[error("class token exceeds {max} bytes")]
    TooLong { max: usize },

    #[error("missing bracketed value")]
    MissingBracket,

    #[error("unbalanced brackets")]
    UnbalancedBrackets,

    #[error("nested brackets are not allowed")]
    NestedBrackets,

    #[error("empty bracketed value")]
    EmptyValue,

    #[error("empty value segment at position {0}")]
    EmptySegment(usize),

    #[error("unexpected characters after closing bracket: '{0}'")]
    TrailingCharacters(String),

    #[error("missing property name")]
    MissingProperty,

    #[error("invalid property name '{0}'")]
    InvalidProperty(String),

    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("modifier '{0}' is out of order or repeated")]
    ModifierOrder(String),
}

/// Payloads rejected by the security gate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityViolation {
    #[error("URL scheme '{0}' is banned")]
    BannedScheme(String),

    #[error("URL scheme '{0}' is not allowed")]
    SchemeNotAllowed(String),

    #[error("data URL MIME type '{0}' is not allowed")]
    DisallowedMimeType(String),

    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    #[error("value is {len} bytes, limit is {max}")]
    InputTooLong { len: usize, max: usize },

    #[error("nesting depth exceeds {max}")]
    NestingTooDeep { max: usize },

    #[error("character '{ch}' repeated more than {max} times")]
    RepeatedRun { ch: char, max: usize },

    #[error("forbidden sequence '{0}'")]
    ForbiddenSequence(String),

    #[error("pattern check exceeded its {budget_ms}ms budget")]
    PatternBudgetExceeded { budget_ms: u64 },
}

/// Per-token failure, collected by the compiler instead of aborting the batch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid value: {0}")]
    Validation(String),

    #[error("security violation: {0}")]
    Security(#[from] SecurityViolation),

    #[error("unknown property '{0}'")]
    UnknownProperty(String),
}

impl TokenError {
    pub fn validation(reason: impl Into<String>) -> Self {
        TokenError::Validation(reason.into())
    }

    /// Short category name used in stats reports
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Parse(_) => "parse",
            TokenError::Validation(_) => "validation",
            TokenError::Security(_) => "security",
            TokenError::UnknownProperty(_) => "unknown-property",
        }
    }

    pub fn is_security(&self) -> bool {
        matches!(self, TokenError::Security(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_kinds() {
        assert_eq!(TokenError::from(ParseError::Empty).kind(), "parse");
        assert_eq!(TokenError::validation("bad").kind(), "validation");
        assert_eq!(
            TokenError::from(SecurityViolation::BannedScheme("javascript".into())).kind(),
            "security"
        );
        assert_eq!(TokenError::UnknownProperty("foo".into()).kind(), "unknown-property");
    }

    #[test]
    fn test_error_messages() {
        let err = TokenError::from(SecurityViolation::BannedScheme("javascript".into()));
        assert_eq!(err.to_string(), "security violation: URL scheme 'javascript' is banned");
        assert!(err.is_security());

        let err = CompilerError::InputShape("expected a list of strings".into());
        assert!(err.to_string().contains("Invalid input shape"));
    }
}
