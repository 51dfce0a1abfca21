//! Ad hoc scoring of a single generated component

use anyhow::{Context as _, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use std::path::PathBuf;
use ui2code_metrics::{CodeSimilarityCalculator, VisualSimilarityCalculator};

use crate::context::Context;
use crate::output::{format_score, print_field, print_optional_field, print_section, TableDisplay};

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Generated JSX file
    #[arg(long, value_name = "FILE")]
    pub generated: PathBuf,

    /// Reference JSX file
    #[arg(long, value_name = "FILE")]
    pub reference: PathBuf,

    /// Rendered screenshot of the generated component
    #[arg(long, value_name = "IMG", requires = "screenshot")]
    pub rendered: Option<PathBuf>,

    /// Original UI screenshot
    #[arg(long, value_name = "IMG", requires = "rendered")]
    pub screenshot: Option<PathBuf>,
}

/// Scores for one generated/reference pair
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub generated: String,
    pub reference: String,
    pub code_similarity_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_similarity_ssim_score: Option<f64>,
}

impl TableDisplay for ScoreReport {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.generated),
            Cell::new(&self.reference),
            Cell::new(format_score(self.code_similarity_score)),
            Cell::new(
                self.visual_similarity_ssim_score
                    .map(format_score)
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }

    fn display_single(&self) {
        print_section("Scores");
        print_field("Generated", &self.generated);
        print_field("Reference", &self.reference);
        print_field("Code similarity", &format_score(self.code_similarity_score));
        print_optional_field(
            "Visual similarity (SSIM)",
            self.visual_similarity_ssim_score.map(format_score).as_deref(),
        );
    }
}

/// Compute code similarity and, when both images are given, SSIM.
pub fn score(args: &ScoreArgs) -> Result<ScoreReport> {
    let generated = std::fs::read_to_string(&args.generated)
        .with_context(|| format!("Failed to read {:?}", args.generated))?;
    let reference = std::fs::read_to_string(&args.reference)
        .with_context(|| format!("Failed to read {:?}", args.reference))?;

    let code_similarity_score =
        CodeSimilarityCalculator::new().similarity(generated.trim(), reference.trim());

    let visual_similarity_ssim_score = match (&args.screenshot, &args.rendered) {
        (Some(screenshot), Some(rendered)) => Some(
            VisualSimilarityCalculator::new()
                .similarity(screenshot, rendered)
                .context("Failed to compute visual similarity")?,
        ),
        _ => None,
    };

    Ok(ScoreReport {
        generated: args.generated.display().to_string(),
        reference: args.reference.display().to_string(),
        code_similarity_score,
        visual_similarity_ssim_score,
    })
}

/// Execute the score command
pub fn execute(ctx: &Context, args: ScoreArgs) -> Result<()> {
    let report = score(&args)?;
    ctx.output.write(&report)
}
