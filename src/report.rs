use crate::errors::TokenError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A token that produced no CSS, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedToken {
    pub token: String,
    /// `parse`, `validation`, `security` or `unknown-property`
    pub kind: String,
    pub reason: String,
}

impl RejectedToken {
    pub fn new(token: impl Into<String>, error: &TokenError) -> Self {
        Self {
            token: token.into(),
            kind: error.kind().to_string(),
            reason: error.to_string(),
        }
    }

    pub fn is_security(&self) -> bool {
        self.kind == "security"
    }
}

/// Statistics reported with every generate call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub valid_classes: usize,
    pub invalid_classes: usize,
    pub from_cache: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedToken>,
    pub rule_count: usize,
    pub group_count: usize,
    pub css_bytes: usize,
    pub processing_time_ms: u64,
    pub generated_at: DateTime<Utc>,
}

impl GenerationStats {
    /// Distinct tokens seen by the call
    pub fn total_classes(&self) -> usize {
        self.valid_classes + self.invalid_classes
    }

    pub fn security_rejections(&self) -> usize {
        self.rejected.iter().filter(|r| r.is_security()).count()
    }

    /// Copy of cached stats, marked as served from the cache
    pub fn cached(&self, processing_time_ms: u64) -> Self {
        Self {
            from_cache: true,
            processing_time_ms,
            ..self.clone()
        }
    }
}

impl Default for GenerationStats {
    fn default() -> Self {
        Self {
            valid_classes: 0,
            invalid_classes: 0,
            from_cache: false,
            rejected: Vec::new(),
            rule_count: 0,
            group_count: 0,
            css_bytes: 0,
            processing_time_ms: 0,
            generated_at: Utc::now(),
        }
    }
}

/// Builder pattern for assembling stats while a call runs
pub struct ReportBuilder {
    stats: GenerationStats,
    start_time: Option<Instant>,
}

impl ReportBuilder {
    /// Create a builder; the processing clock starts now
    pub fn new() -> Self {
        Self {
            stats: GenerationStats::default(),
            start_time: Some(Instant::now()),
        }
    }

    pub fn with_valid_classes(mut self, count: usize) -> Self {
        self.stats.valid_classes = count;
        self
    }

    /// Record rejected tokens; also sets the invalid count
    pub fn with_rejected(mut self, rejected: Vec<RejectedToken>) -> Self {
        self.stats.invalid_classes = rejected.len();
        self.stats.rejected = rejected;
        self
    }

    pub fn with_rule_count(mut self, count: usize) -> Self {
        self.stats.rule_count = count;
        self
    }

    pub fn with_group_count(mut self, count: usize) -> Self {
        self.stats.group_count = count;
        self
    }

    /// Build the final stats for the generated CSS
    pub fn build(mut self, css: &str) -> GenerationStats {
        self.stats.css_bytes = css.len();
        self.stats.processing_time_ms = self
            .start_time
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or_default();
        self.stats.generated_at = Utc::now();
        self.stats
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ParseError, SecurityViolation};

    #[test]
    fn test_report_builder() {
        let rejected = vec![
            RejectedToken::new("p-2", &TokenError::from(ParseError::MissingBracket)),
            RejectedToken::new(
                "bg-[u(javascript:x)]",
                &TokenError::from(SecurityViolation::BannedScheme("javascript".into())),
            ),
        ];
        let stats = ReportBuilder::new()
            .with_valid_classes(3)
            .with_rejected(rejected)
            .with_rule_count(3)
            .with_group_count(2)
            .build(".a{b:c}");

        assert_eq!(stats.valid_classes, 3);
        assert_eq!(stats.invalid_classes, 2);
        assert_eq!(stats.total_classes(), 5);
        assert_eq!(stats.css_bytes, 7);
        assert_eq!(stats.security_rejections(), 1);
        assert!(!stats.from_cache);
    }

    #[test]
    fn test_camel_case_json() {
        let stats = ReportBuilder::new().with_valid_classes(1).build("");
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["validClasses"], 1);
        assert_eq!(json["invalidClasses"], 0);
        assert_eq!(json["fromCache"], false);
        assert!(json["generatedAt"].is_string());
        assert!(json.get("rejected").is_none());
    }

    #[test]
    fn test_cached_copy() {
        let stats = ReportBuilder::new().with_valid_classes(2).build("x");
        let cached = stats.cached(0);
        assert!(cached.from_cache);
        assert_eq!(cached.valid_classes, 2);
        assert_eq!(cached.css_bytes, 1);
    }
}
