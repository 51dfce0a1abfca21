pub mod code_similarity;
pub mod sequence_matcher;
pub mod ssim;
pub mod visual_similarity;

pub use code_similarity::*;
pub use sequence_matcher::*;
pub use ssim::*;
pub use visual_similarity::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricOutput {
    pub score: f64,
    pub metadata: serde_json::Value,
}
