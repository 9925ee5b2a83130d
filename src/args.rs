use crate::config::GeneratorConfig;
use crate::errors::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bracket CSS - compiles bracket-notation utility classes into CSS
#[derive(Parser, Debug)]
#[command(name = "bracket-css")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile class tokens given on the command line
    Compile(CompileArgs),
    /// Read markup or tokens from stdin and write CSS to stdout
    Pipe(PipeArgs),
}

/// Output options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Enable CSS minification
    #[arg(
        long = "minify",
        default_value_t = false,
        help = "Omit structural whitespace from the output CSS"
    )]
    pub minify: bool,

    /// Disable selector grouping
    #[arg(
        long = "no-group",
        default_value_t = false,
        help = "Emit one rule per class instead of merging identical declarations"
    )]
    pub no_group: bool,

    /// Emit comments
    #[arg(
        long = "comments",
        default_value_t = false,
        help = "Add a generated header comment and breakpoint markers"
    )]
    pub comments: bool,

    /// Strict mode
    #[arg(
        long = "strict",
        default_value_t = false,
        help = "Reject properties without a validation rule"
    )]
    pub strict: bool,

    /// Disallow var() values
    #[arg(
        long = "no-custom-properties",
        default_value_t = false,
        help = "Reject var(--name) values"
    )]
    pub no_custom_properties: bool,

    /// Fail on any security violation
    #[arg(
        long = "reject-batch",
        default_value_t = false,
        help = "Fail the whole run when any class trips the security gate"
    )]
    pub reject_batch: bool,

    /// Configuration file path (YAML or JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        env = "BRACKET_CSS_CONFIG",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    /// Print generation stats
    #[arg(
        long = "stats",
        default_value_t = false,
        help = "Print generation stats as JSON to stderr"
    )]
    pub stats: bool,
}

impl OutputArgs {
    /// Load the configuration file, if any, then apply command-line flags on top.
    pub fn load_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::default(),
        };

        let options = &mut config.options;
        if self.minify {
            options.minify = true;
        }
        if self.no_group {
            options.group_selectors = false;
        }
        if self.comments {
            options.include_comments = true;
        }
        if self.strict {
            options.strict = true;
        }
        if self.no_custom_properties {
            options.allow_custom_properties = false;
        }
        if self.reject_batch {
            options.reject_batch_on_security_violation = true;
        }

        Ok(config)
    }
}

/// Arguments for the compile command
#[derive(Parser, Debug, Clone)]
pub struct CompileArgs {
    /// Class tokens to compile
    #[arg(
        value_name = "TOKENS",
        required = true,
        num_args = 1..,
        help = "Class tokens such as p-[2rem] or hover:bg-[#ff0000]"
    )]
    pub tokens: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl CompileArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.tokens.iter().all(|t| t.trim().is_empty()) {
            return Err("At least one non-empty token must be provided".to_string());
        }
        Ok(())
    }
}

/// Arguments for the pipe command
#[derive(Parser, Debug, Clone)]
pub struct PipeArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_defaults() {
        let args = OutputArgs {
            minify: true,
            no_group: true,
            no_custom_properties: true,
            ..OutputArgs::default()
        };
        let config = args.load_config().unwrap();
        assert!(config.options.minify);
        assert!(!config.options.group_selectors);
        assert!(!config.options.allow_custom_properties);
        assert!(!config.options.strict);
    }

    #[test]
    fn test_flags_apply_over_config_file() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "options:\n  include_comments: true\ncache:\n  max_entries: 5").unwrap();

        let args = OutputArgs {
            strict: true,
            config: Some(file.path().to_path_buf()),
            ..OutputArgs::default()
        };
        let config = args.load_config().unwrap();
        assert!(config.options.include_comments);
        assert!(config.options.strict);
        assert_eq!(config.cache.max_entries, 5);
    }

    #[test]
    fn test_compile_args_validation() {
        let args = CompileArgs {
            tokens: vec!["  ".to_string()],
            output: OutputArgs::default(),
        };
        assert!(args.validate().is_err());
    }
}
