use std::path::Path;
use tracing::debug;
use ui2code_core::MetricCalculator;
use ui2code_metrics::{CodePair, CodeSimilarityCalculator, ImagePair, VisualSimilarityCalculator};

use crate::error::StageError;

/// Runs both similarity metrics for one item.
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    code: CodeSimilarityCalculator,
    visual: VisualSimilarityCalculator,
}

impl SimilarityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares generated JSX with the ground-truth file.
    pub async fn code_similarity(&self, generated: &str, ground_truth: &Path) -> Result<f64, StageError> {
        let reference = tokio::fs::read_to_string(ground_truth).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StageError::GroundTruthMissing(ground_truth.to_path_buf())
            } else {
                StageError::GroundTruthUnreadable {
                    path: ground_truth.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let output = self
            .code
            .calculate(CodePair::new(generated, reference.trim()))
            .await
            .unwrap_or_else(|never| match never {});
        debug!(score = output.score, metadata = %output.metadata, "Code similarity");
        Ok(output.score)
    }

    /// SSIM of the rendered screenshot against the input screenshot.
    pub async fn visual_similarity(&self, screenshot: &Path, rendered: &Path) -> Result<f64, StageError> {
        let output = self
            .visual
            .calculate(ImagePair::new(screenshot, rendered))
            .await?;
        debug!(score = output.score, "Visual similarity");
        Ok(output.score)
    }
}
