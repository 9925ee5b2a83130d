use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use crate::errors::{CompilerError, Result};

/// Top-level generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Options that shape the generated CSS
    pub options: GenerateOptions,

    /// Security gate settings
    pub security: SecurityConfig,

    /// Result cache settings
    pub cache: CacheConfig,
}

/// Options accepted by every generate call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Omit structural whitespace
    pub minify: bool,

    /// Merge rules with identical declarations in the same context
    #[serde(alias = "groupSelectors")]
    pub group_selectors: bool,

    /// Emit a header comment and breakpoint markers
    #[serde(alias = "includeComments")]
    pub include_comments: bool,

    /// Reject unknown properties instead of accepting them permissively
    pub strict: bool,

    /// Accept `var(--x[, fallback])` wherever a value is expected
    #[serde(alias = "allowCustomProperties")]
    pub allow_custom_properties: bool,

    /// Fail the whole call when any token trips the security gate
    #[serde(alias = "rejectBatchOnSecurityViolation")]
    pub reject_batch_on_security_violation: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            minify: false,
            group_selectors: true,
            include_comments: false,
            strict: false,
            allow_custom_properties: true,
            reject_batch_on_security_violation: false,
        }
    }
}

/// Security gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// URL schemes accepted inside `u(...)`
    pub allowed_schemes: Vec<String>,

    /// URL schemes always rejected, even when also allowed
    pub denied_schemes: Vec<String>,

    /// Accept `data:image/svg+xml` URLs
    pub allow_svg_data_urls: bool,

    /// Maximum length of one value payload in bytes
    pub max_value_length: usize,

    /// Maximum parenthesis nesting inside a value
    pub max_nesting_depth: usize,

    /// Maximum run of one repeated character
    pub max_repeat_run: usize,

    /// Wall-clock budget for a single pattern check
    pub pattern_time_budget_ms: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_schemes: vec![
                "http".to_string(),
                "https".to_string(),
                "data".to_string(),
                "blob".to_string(),
            ],
            denied_schemes: vec![
                "javascript".to_string(),
                "vbscript".to_string(),
                "file".to_string(),
            ],
            allow_svg_data_urls: false,
            max_value_length: 2048,
            max_nesting_depth: 8,
            max_repeat_run: 64,
            pattern_time_budget_ms: 50,
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Entries kept before the least recently used one is evicted
    pub max_entries: usize,

    /// Seconds an entry stays valid
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
            ttl_secs: 30 * 60,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompilerError::ConfigError {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        serde_yaml::from_str(&content)
            .map_err(|e| CompilerError::ConfigError {
                message: format!("Failed to parse YAML config: {}", e),
            })
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompilerError::ConfigError {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        serde_json::from_str(&content)
            .map_err(|e| CompilerError::ConfigError {
                message: format!("Failed to parse JSON config: {}", e),
            })
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CompilerError::ConfigError {
                message: format!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .json",
                    path.display()
                ),
            }),
        }
    }

    /// Merge with another configuration; `other` wins on scalar settings
    pub fn merge(mut self, other: Self) -> Self {
        self.options = other.options;

        for scheme in other.security.allowed_schemes {
            if !self.security.allowed_schemes.contains(&scheme) {
                self.security.allowed_schemes.push(scheme);
            }
        }
        for scheme in other.security.denied_schemes {
            if !self.security.denied_schemes.contains(&scheme) {
                self.security.denied_schemes.push(scheme);
            }
        }
        self.security.allow_svg_data_urls = other.security.allow_svg_data_urls;
        self.security.max_value_length = other.security.max_value_length;
        self.security.max_nesting_depth = other.security.max_nesting_depth;
        self.security.max_repeat_run = other.security.max_repeat_run;
        self.security.pattern_time_budget_ms = other.security.pattern_time_budget_ms;

        self.cache = other.cache;
        self
    }

    /// Everything that can change the CSS produced for a token set
    pub fn output_fingerprint(&self, options: &GenerateOptions) -> String {
        serde_json::to_string(&(options, &self.security)).unwrap_or_default()
    }
}
