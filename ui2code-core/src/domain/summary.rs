use serde::{Deserialize, Serialize};

/// Aggregate statistics for a whole run.
///
/// Rates are fractions of `total_items` (every `item_*` directory found,
/// including skipped ones). Means only cover items whose stage succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_items: usize,
    pub processed_items: usize,
    pub skipped_items: usize,
    pub generation_successes: usize,
    pub rendering_successes: usize,
    pub generation_success_rate: f64,
    pub rendering_success_rate: f64,
    pub mean_code_similarity: f64,
    pub mean_visual_similarity: f64,
}

