//! Parse, validate, generate and format one token set.

use crate::config::{GenerateOptions, SecurityConfig};
use crate::errors::{CompilerError, Result, TokenError};
use crate::formatter::{format_css, group_rules, GroupedRule};
use crate::generator::{generate_rule, CssRule};
use crate::parser::parse_class;
use crate::report::RejectedToken;
use crate::validator::ValueValidator;
use log::{debug, warn};
use rayon::prelude::*;

/// Everything produced for one token set
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub css: String,
    pub rules: Vec<CssRule>,
    pub groups: Vec<GroupedRule>,
    pub rejected: Vec<RejectedToken>,
}

/// Per-call pipeline over already deduplicated tokens
pub struct ClassCompiler {
    validator: ValueValidator,
}

impl ClassCompiler {
    pub fn new(options: &GenerateOptions, security: &SecurityConfig) -> Self {
        Self {
            validator: ValueValidator::new(options, security),
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        self.validator.options()
    }

    /// Run one token through parse, validate and generate.
    pub fn compile_token(&self, token: &str) -> std::result::Result<CssRule, TokenError> {
        let parsed = parse_class(token)?;
        let validated = self.validator.validate_class(&parsed)?;
        generate_rule(&parsed, &validated)
            .ok_or_else(|| TokenError::validation("no declarations generated"))
    }

    /// Compile every token in parallel. Output order follows input order.
    ///
    /// Failing tokens are collected; the call only fails as a whole when
    /// batch rejection is enabled and a token trips the security gate.
    pub fn compile<S: AsRef<str> + Sync>(&self, tokens: &[S]) -> Result<CompileOutput> {
        let outcomes: Vec<(&str, std::result::Result<CssRule, TokenError>)> = tokens
            .par_iter()
            .map(|token| {
                let token = token.as_ref();
                (token, self.compile_token(token))
            })
            .collect();

        let mut rules = Vec::with_capacity(outcomes.len());
        let mut rejected = Vec::new();

        for (token, outcome) in outcomes {
            match outcome {
                Ok(rule) => rules.push(rule),
                Err(TokenError::Security(violation)) => {
                    warn!("Rejected '{}': {}", token, violation);
                    if self.options().reject_batch_on_security_violation {
                        return Err(CompilerError::SecurityPolicy {
                            token: token.to_string(),
                            violation,
                        });
                    }
                    rejected.push(RejectedToken::new(token, &TokenError::Security(violation)));
                }
                Err(error) => {
                    debug!("Rejected '{}': {}", token, error);
                    rejected.push(RejectedToken::new(token, &error));
                }
            }
        }

        let groups = group_rules(&rules, self.options().group_selectors);
        let css = format_css(&groups, self.options());

        Ok(CompileOutput {
            css,
            rules,
            groups,
            rejected,
        })
    }
}
