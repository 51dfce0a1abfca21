use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod context;
mod output;

use cli::{Cli, Commands};
use context::Context;

const DEFAULT_FILTER: &str =
    "ui2code=info,ui2code_workflow=warn,ui2code_sdk=warn,ui2code_metrics=warn";
const VERBOSE_FILTER: &str =
    "ui2code=debug,ui2code_workflow=debug,ui2code_sdk=debug,ui2code_metrics=debug";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let ctx = Context::new(&cli)?;
    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(&ctx, args).await,
        Commands::Score(args) => commands::score::execute(&ctx, args),
        Commands::FixEncoding(args) => commands::fix_encoding::execute(&ctx, args),
    };

    if let Err(e) = &result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
