//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{FixEncodingArgs, RunArgs, ScoreArgs};
use crate::output::OutputFormat;

/// Evaluate screenshot-to-React code generation
#[derive(Debug, Parser)]
#[command(name = "ui2code", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./ui2code.toml when present)
    #[arg(short, long, global = true, env = "UI2CODE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate, render and score every item of a dataset
    Run(RunArgs),

    /// Score one generated component against its reference
    Score(ScoreArgs),

    /// Re-encode prompt files to UTF-8 (GBK fallback)
    FixEncoding(FixEncodingArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "ui2code",
            "run",
            "--dataset",
            "data/set",
            "--limit",
            "2",
            "--renderer",
            "node",
            "render.js",
            "-o",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.output_format, OutputFormat::Json);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.dataset, Some(PathBuf::from("data/set")));
                assert_eq!(args.limit, Some(2));
                assert_eq!(args.renderer, vec!["node".to_string(), "render.js".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
