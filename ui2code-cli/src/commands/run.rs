//! Batch evaluation command

use anyhow::{Context as _, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use ui2code_core::EvaluationConfig;
use ui2code_sdk::VisionModelClient;
use ui2code_workflow::{BatchEngine, ProcessRenderer};

use crate::context::Context;

/// Overrides for a batch run. Anything left unset comes from configuration.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Dataset root containing item_* directories
    #[arg(long, value_name = "DIR")]
    pub dataset: Option<PathBuf>,

    /// Directory that receives run_<timestamp> folders
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// System prompt file
    #[arg(long, value_name = "FILE")]
    pub system_prompt: Option<PathBuf>,

    /// User prompt template file
    #[arg(long, value_name = "FILE")]
    pub user_template: Option<PathBuf>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Completion token limit
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Renderer program and leading arguments
    #[arg(long, num_args = 1.., value_name = "CMD")]
    pub renderer: Vec<String>,

    /// Renderer timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub render_timeout: Option<u64>,

    /// Ground truth file name inside each item directory
    #[arg(long, value_name = "NAME")]
    pub ground_truth: Option<String>,

    /// List assets by name only
    #[arg(long)]
    pub no_asset_dimensions: bool,

    /// Process only the first N items
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl RunArgs {
    /// Apply flags on top of the loaded configuration.
    pub fn apply(&self, config: &mut EvaluationConfig) {
        if let Some(dataset) = &self.dataset {
            config.dataset_root = dataset.clone();
        }
        if let Some(output) = &self.output {
            config.results_root = output.clone();
        }
        if let Some(system) = &self.system_prompt {
            config.prompts.system = system.clone();
        }
        if let Some(user) = &self.user_template {
            config.prompts.user_template = user.clone();
        }
        if let Some(model) = &self.model {
            config.model.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.model.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.model.max_tokens = max_tokens;
        }
        if !self.renderer.is_empty() {
            config.renderer.command = self.renderer.clone();
        }
        if let Some(secs) = self.render_timeout {
            config.renderer.timeout_secs = Some(secs);
        }
        if let Some(name) = &self.ground_truth {
            config.ground_truth_file = name.clone();
        }
        if self.no_asset_dimensions {
            config.annotate_asset_dimensions = false;
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
    }
}

/// Execute a batch run
pub async fn execute(ctx: &Context, args: RunArgs) -> Result<()> {
    let mut evaluation = ctx.config.evaluation.clone();
    args.apply(&mut evaluation);

    let sdk_config = ctx.sdk_config();
    if !sdk_config.auth.is_configured() {
        ctx.output
            .warning("OPENAI_API_KEY is not set; the model endpoint will likely reject requests");
    }

    let generator = VisionModelClient::new(sdk_config, evaluation.model.model.clone())
        .context("Failed to create model client")?;
    let renderer = ProcessRenderer::from_settings(&evaluation.renderer)
        .context("Invalid renderer command")?;

    let engine = BatchEngine::new(evaluation, Arc::new(generator), Arc::new(renderer))
        .context("Invalid evaluation configuration")?;

    ctx.output.info(&format!(
        "Evaluating {} with {}",
        engine.config().dataset_root.display(),
        engine.config().model.model
    ));
    let progress = ctx.output.run_progress();
    let report = engine.run_with_observer(&progress).await;
    progress.finish();
    let report = report.context("Evaluation run failed")?;

    ctx.output.write_report(&report)?;
    ctx.output.success(&format!(
        "Evaluated {} of {} item(s)",
        report.summary.processed_items, report.summary.total_items
    ));
    Ok(())
}
