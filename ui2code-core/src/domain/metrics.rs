use serde::{Deserialize, Serialize};

/// Per-item scores and stage outcomes.
///
/// Starts at zeros/false/empty and is filled in as stages complete. This is
/// the only place stage failures turn into default values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub code_similarity_score: f64,
    pub visual_similarity_ssim_score: f64,
    pub generation_success: bool,
    pub rendering_success: bool,
    pub error_details: String,
}

impl EvaluationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a note as `"<note>. "`; earlier notes are never overwritten.
    pub fn append_error(&mut self, note: impl AsRef<str>) {
        let note = note.as_ref().trim().trim_end_matches('.');
        self.error_details.push_str(note);
        self.error_details.push_str(". ");
    }

    pub fn has_errors(&self) -> bool {
        !self.error_details.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Success,
    Error,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Success => "success",
            ItemStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of `summary_metrics.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    pub status: ItemStatus,
    pub message: String,
    pub metrics: EvaluationMetrics,
    pub item_id: String,
}

impl ItemResult {
    pub fn new(
        item_id: impl Into<String>,
        status: ItemStatus,
        message: impl Into<String>,
        metrics: EvaluationMetrics,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            metrics,
            item_id: item_id.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ItemStatus::Success
    }
}
