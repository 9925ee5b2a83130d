pub mod args;
pub mod cache;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod formatter;
pub mod generator;
pub mod markup;
pub mod parser;
pub mod registry;
pub mod report;
pub mod security;
pub mod tokenizer;
pub mod validator;

pub use args::{Cli, Commands, CompileArgs, OutputArgs, PipeArgs};
pub use cache::{cache_key, CacheEntry, CacheStats, CssCache};
pub use compiler::{ClassCompiler, CompileOutput};
pub use config::{CacheConfig, GenerateOptions, GeneratorConfig, SecurityConfig};
pub use errors::{CompilerError, ParseError, Result, SecurityViolation, TokenError};
pub use formatter::{format_css, group_rules, GroupedRule};
pub use generator::{generate_rule, CssRule, RuleMetadata};
pub use markup::{extract_tokens_from_markup, extract_tokens_parallel, extract_tokens_with_locations, TokenLocation};
pub use parser::{parse_class, Breakpoint, ParsedClass};
pub use report::{GenerationStats, RejectedToken, ReportBuilder};
pub use validator::{ValidatedValue, ValidationResult, ValueKind, ValueValidator};

use indexmap::IndexSet;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// What a generate call compiles
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Input {
    /// Class tokens, one per entry
    Tokens(Vec<String>),
    /// Markup to mine class attributes from, or a whitespace-separated
    /// token string when it contains no tags
    Markup(String),
}

impl Input {
    /// Distinct, trimmed, non-empty tokens in first-seen order
    pub fn tokens(&self) -> Vec<String> {
        let raw: Vec<String> = match self {
            Input::Tokens(tokens) => tokens.clone(),
            Input::Markup(text) if text.contains('<') => extract_tokens_from_markup(text),
            Input::Markup(text) => text.split_whitespace().map(str::to_string).collect(),
        };

        let unique: IndexSet<String> = raw
            .into_iter()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .collect();
        unique.into_iter().collect()
    }
}

impl From<Vec<String>> for Input {
    fn from(tokens: Vec<String>) -> Self {
        Input::Tokens(tokens)
    }
}

impl From<Vec<&str>> for Input {
    fn from(tokens: Vec<&str>) -> Self {
        Input::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Input {
    fn from(tokens: &[&str]) -> Self {
        Input::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Markup(text)
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Markup(text.to_string())
    }
}

/// Payload of a successful call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateData {
    pub css: String,
    pub stats: GenerationStats,
}

/// Structured result of a generate call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<GenerateData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    fn from_result(result: Result<GenerateData>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Self {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Generated CSS, or an empty string for a failed call
    pub fn css(&self) -> &str {
        self.data.as_ref().map(|d| d.css.as_str()).unwrap_or_default()
    }

    pub fn stats(&self) -> Option<&GenerationStats> {
        self.data.as_ref().map(|d| &d.stats)
    }
}

/// Orchestrates token extraction, caching and compilation.
///
/// The cache is owned by the caller through an `Arc`, so several generators
/// may share one.
pub struct CssGenerator {
    config: GeneratorConfig,
    cache: Arc<CssCache>,
}

impl CssGenerator {
    /// Create a generator with its own cache
    pub fn new(config: GeneratorConfig) -> Self {
        let cache = Arc::new(CssCache::new(config.cache.clone()));
        Self { config, cache }
    }

    /// Create a generator that uses an existing cache
    pub fn with_cache(config: GeneratorConfig, cache: Arc<CssCache>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<CssCache> {
        &self.cache
    }

    /// Generate CSS with the configured options
    pub fn generate(&self, input: impl Into<Input>) -> GenerateResponse {
        let options = self.config.options.clone();
        self.generate_with_options(input, &options)
    }

    /// Generate CSS with per-call options
    pub fn generate_with_options(&self, input: impl Into<Input>, options: &GenerateOptions) -> GenerateResponse {
        GenerateResponse::from_result(self.try_generate(&input.into(), options))
    }

    /// Generate from an untyped JSON value: a string or a list of strings.
    pub fn generate_value(&self, value: &Value) -> GenerateResponse {
        match input_from_value(value) {
            Ok(input) => self.generate(input),
            Err(e) => GenerateResponse::from_result(Err(e)),
        }
    }

    /// Fallible core of every generate call
    pub fn try_generate(&self, input: &Input, options: &GenerateOptions) -> Result<GenerateData> {
        let report = ReportBuilder::new();
        let started = Instant::now();
        let tokens = input.tokens();
        let key = cache_key(tokens.as_slice(), &self.config.output_fingerprint(options));

        if let Some(entry) = self.cache.get(&key) {
            info!("Served {} classes from cache", tokens.len());
            return Ok(GenerateData {
                css: entry.css.clone(),
                stats: entry.stats.cached(started.elapsed().as_millis() as u64),
            });
        }

        let compiler = ClassCompiler::new(options, &self.config.security);
        let output = compiler.compile(tokens.as_slice())?;

        let stats = report
            .with_valid_classes(output.rules.len())
            .with_rejected(output.rejected)
            .with_rule_count(output.rules.len())
            .with_group_count(output.groups.len())
            .build(&output.css);

        info!(
            "Generated {} rules in {} groups from {} classes ({} rejected, {} bytes)",
            stats.rule_count, stats.group_count, tokens.len(), stats.invalid_classes, stats.css_bytes
        );

        self.cache.set(&key, output.css.clone(), stats.clone());
        Ok(GenerateData { css: output.css, stats })
    }
}

impl Default for CssGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

fn input_from_value(value: &Value) -> Result<Input> {
    match value {
        Value::String(text) => Ok(Input::Markup(text.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    CompilerError::InputShape(format!("expected a list of strings, found element {}", item))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Input::Tokens),
        other => Err(CompilerError::InputShape(format!(
            "expected a string or a list of strings, found {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One-shot generation with a private cache
pub fn generate(input: impl Into<Input>, options: &GenerateOptions) -> GenerateResponse {
    let config = GeneratorConfig {
        options: options.clone(),
        ..GeneratorConfig::default()
    };
    CssGenerator::new(config).generate(input)
}

/// Read markup (or tokens) from `reader`, write CSS to `writer`.
#[cfg(feature = "cli")]
pub async fn run_pipe<R, W>(generator: &CssGenerator, mut reader: R, mut writer: W) -> Result<GenerateData>
where
    R: tokio::io::AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let mut input = String::new();
    reader.read_to_string(&mut input).await?;

    let data = generator.try_generate(&Input::Markup(input), &generator.config().options)?;

    let output_error = |e: std::io::Error| CompilerError::OutputError {
        path: "stdout".to_string(),
        message: e.to_string(),
    };
    writer.write_all(data.css.as_bytes()).await.map_err(output_error)?;
    writer.flush().await.map_err(output_error)?;

    Ok(data)
}

/// Handle pipe command - read markup from stdin, output CSS to stdout
#[cfg(feature = "cli")]
pub async fn handle_pipe_command(args: PipeArgs) -> Result<()> {
    let generator = CssGenerator::new(args.output.load_config()?);
    let data = run_pipe(&generator, tokio::io::stdin(), tokio::io::stdout()).await?;
    if args.output.stats {
        eprintln!("{}", serde_json::to_string_pretty(&data.stats)?);
    }
    Ok(())
}

/// Handle compile command - compile tokens from the command line to stdout
#[cfg(feature = "cli")]
pub async fn handle_compile_command(args: CompileArgs) -> Result<()> {
    use tokio::io::AsyncWriteExt;

    args.validate().map_err(CompilerError::InputShape)?;
    let generator = CssGenerator::new(args.output.load_config()?);
    let data = generator.try_generate(&Input::Tokens(args.tokens), &generator.config().options)?;

    for rejected in &data.stats.rejected {
        eprintln!("Skipped {}: {}", rejected.token, rejected.reason);
    }

    let mut stdout = tokio::io::stdout();
    let output_error = |e: std::io::Error| CompilerError::OutputError {
        path: "stdout".to_string(),
        message: e.to_string(),
    };
    stdout.write_all(data.css.as_bytes()).await.map_err(output_error)?;
    stdout.flush().await.map_err(output_error)?;

    if args.output.stats {
        eprintln!("{}", serde_json::to_string_pretty(&data.stats)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_tokens_are_deduplicated() {
        let input = Input::from(vec!["p-[1px]", " p-[1px] ", "", "m-[2px]"]);
        assert_eq!(input.tokens(), vec!["p-[1px]", "m-[2px]"]);
    }

    #[test]
    fn test_input_string_forms() {
        assert_eq!(Input::from("p-[1px]  m-[2px]").tokens(), vec!["p-[1px]", "m-[2px]"]);
        assert_eq!(Input::from(r#"<div class="w-[3px]">p-[1px]</div>"#).tokens(), vec!["w-[3px]"]);
    }

    #[test]
    fn test_generate_response_json() {
        let response = generate(vec!["p-[2rem]"], &GenerateOptions::default());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["stats"]["validClasses"], 1);
        assert!(json["data"]["css"].as_str().unwrap().contains("padding: 2rem;"));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_generate_value_shapes() {
        let generator = CssGenerator::default();
        assert!(generator.generate_value(&json!(["p-[1px]"])).success);
        assert!(generator.generate_value(&json!("p-[1px]")).success);

        for bad in [json!(42), json!({"classes": []}), json!(null), json!(["p-[1px]", 3])] {
            let response = generator.generate_value(&bad);
            assert!(!response.success);
            assert!(response.data.is_none());
            assert!(response.error.unwrap().contains("Invalid input shape"));
        }
    }

    #[test]
    fn test_options_do_not_share_cache_entries() {
        let generator = CssGenerator::default();
        let pretty = generator.generate_with_options(vec!["p-[1px]"], &GenerateOptions::default());
        let minified = generator.generate_with_options(
            vec!["p-[1px]"],
            &GenerateOptions {
                minify: true,
                ..GenerateOptions::default()
            },
        );
        assert_ne!(pretty.css(), minified.css());
        assert!(!minified.stats().unwrap().from_cache);
    }

    #[test]
    fn test_shared_cache() {
        let cache = Arc::new(CssCache::default());
        let first = CssGenerator::with_cache(GeneratorConfig::default(), Arc::clone(&cache));
        let second = CssGenerator::with_cache(GeneratorConfig::default(), Arc::clone(&cache));
        first.generate(vec!["p-[1px]"]);
        assert!(second.generate(vec!["p-[1px]"]).stats().unwrap().from_cache);
        assert_eq!(cache.stats().cache_hits, 1);
    }
}
