use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::debug;
use ui2code_core::MetricCalculator;

use super::{dynamic_range, MetricOutput, Ssim};
use crate::error::{ScoreError, ScoreResult};

/// Ground-truth screenshot and the candidate rendering it is compared with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePair {
    pub reference: PathBuf,
    pub candidate: PathBuf,
}

impl ImagePair {
    pub fn new(reference: impl Into<PathBuf>, candidate: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            candidate: candidate.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisualSimilarityCalculator {
    pub ssim: Ssim,
}

impl VisualSimilarityCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an image and converts it to 8-bit luma with ITU-R 601 weights,
    /// rounded to nearest in 16-bit fixed point.
    pub fn load_grayscale(path: &Path) -> ScoreResult<GrayImage> {
        let rgb = image::open(path)
            .map_err(|source| ScoreError::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();

        Ok(GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            let luma = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
            Luma([luma as u8])
        }))
    }

    /// SSIM of two grayscale images after resizing both to the smaller
    /// width and height. Dynamic range comes from `reference`.
    pub fn compare_images(&self, reference: &GrayImage, candidate: &GrayImage) -> ScoreResult<f64> {
        let width = reference.width().min(candidate.width());
        let height = reference.height().min(candidate.height());

        let fit = |img: &GrayImage| {
            if img.dimensions() == (width, height) {
                img.clone()
            } else {
                imageops::resize(img, width, height, FilterType::CatmullRom)
            }
        };
        let reference = fit(reference);
        let candidate = fit(candidate);

        self.ssim.compare(&reference, &candidate, dynamic_range(&reference))
    }

    pub fn similarity(&self, reference: &Path, candidate: &Path) -> ScoreResult<f64> {
        let reference_img = Self::load_grayscale(reference)?;
        let candidate_img = Self::load_grayscale(candidate)?;
        debug!(
            reference = %reference.display(),
            candidate = %candidate.display(),
            reference_size = ?reference_img.dimensions(),
            candidate_size = ?candidate_img.dimensions(),
            "Comparing screenshots"
        );
        self.compare_images(&reference_img, &candidate_img)
    }
}

#[async_trait]
impl MetricCalculator for VisualSimilarityCalculator {
    type Input = ImagePair;
    type Output = MetricOutput;
    type Error = ScoreError;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        let score = self.similarity(&input.reference, &input.candidate)?;

        Ok(MetricOutput {
            score,
            metadata: json!({
                "metric": "ssim",
                "window": self.ssim.window,
                "k1": self.ssim.k1,
                "k2": self.ssim.k2,
            }),
        })
    }
}
