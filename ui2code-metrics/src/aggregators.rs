use ui2code_core::{ItemResult, RunSummary};

/// Run-level statistics over item results.
pub struct MetricAggregator;

impl MetricAggregator {
    /// Arithmetic mean; 0.0 for an empty slice.
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// `count / total`; 0.0 when `total` is zero.
    pub fn rate(count: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        count as f64 / total as f64
    }

    /// Code similarity of every item whose generation succeeded.
    pub fn code_scores(results: &[ItemResult]) -> Vec<f64> {
        results
            .iter()
            .filter(|r| r.metrics.generation_success)
            .map(|r| r.metrics.code_similarity_score)
            .collect()
    }

    /// SSIM of every item whose rendering succeeded.
    pub fn visual_scores(results: &[ItemResult]) -> Vec<f64> {
        results
            .iter()
            .filter(|r| r.metrics.rendering_success)
            .map(|r| r.metrics.visual_similarity_ssim_score)
            .collect()
    }

    /// Builds the run summary. `total_items` counts every item directory
    /// found, including those skipped for a missing screenshot.
    pub fn summarize(results: &[ItemResult], total_items: usize) -> RunSummary {
        let code_scores = Self::code_scores(results);
        let visual_scores = Self::visual_scores(results);

        RunSummary {
            total_items,
            processed_items: results.len(),
            skipped_items: total_items.saturating_sub(results.len()),
            generation_successes: code_scores.len(),
            rendering_successes: visual_scores.len(),
            generation_success_rate: Self::rate(code_scores.len(), total_items),
            rendering_success_rate: Self::rate(visual_scores.len(), total_items),
            mean_code_similarity: Self::mean(&code_scores),
            mean_visual_similarity: Self::mean(&visual_scores),
        }
    }
}
