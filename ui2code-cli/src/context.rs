//! CLI execution context

use anyhow::Result;
use ui2code_sdk::SdkConfig;

use crate::cli::Cli;
use crate::config::CliConfig;
use crate::output::OutputWriter;

/// Execution context for CLI commands
pub struct Context {
    /// Layered configuration, before command flags
    pub config: CliConfig,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = CliConfig::load(cli.config.as_deref())?;
        let output = OutputWriter::new(cli.output_format, cli.no_color);

        Ok(Self {
            config,
            output,
            verbose: cli.verbose,
        })
    }

    /// Model endpoint configuration
    pub fn sdk_config(&self) -> SdkConfig {
        self.config.sdk_config(self.verbose)
    }
}
