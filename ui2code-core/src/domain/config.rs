use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::error::Result;

pub const DEFAULT_DATASET_ROOT: &str = "data/processed/ui2code_dataset";
pub const DEFAULT_RESULTS_ROOT: &str = "data/generated_results";
pub const DEFAULT_SYSTEM_PROMPT: &str = "prompts/ui2code_system_prompt.txt";
pub const DEFAULT_USER_TEMPLATE: &str = "prompts/ui2code_user_template.txt";
pub const DEFAULT_GROUND_TRUTH_FILE: &str = "index.jsx";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const SUMMARY_FILE: &str = "summary_metrics.json";

// ===== Model Settings =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(default)]
pub struct ModelSettings {
    #[validate(length(min = 1, max = 255))]
    pub model: String,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

// ===== Prompt Files =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct PromptPaths {
    #[validate(custom(function = "non_empty_path"))]
    pub system: PathBuf,
    #[validate(custom(function = "non_empty_path"))]
    pub user_template: PathBuf,
}

impl Default for PromptPaths {
    fn default() -> Self {
        Self {
            system: PathBuf::from(DEFAULT_SYSTEM_PROMPT),
            user_template: PathBuf::from(DEFAULT_USER_TEMPLATE),
        }
    }
}

// ===== Renderer =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct RendererSettings {
    /// Program followed by its leading arguments, e.g. `["node", "renderer/render_jsx.js"]`.
    #[validate(length(min = 1))]
    pub command: Vec<String>,
    /// Unset means the process may run as long as it likes.
    pub timeout_secs: Option<u64>,
}

impl RendererSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            command: vec!["node".to_string(), "renderer/render_jsx.js".to_string()],
            timeout_secs: None,
        }
    }
}

// ===== Evaluation Run =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(default)]
pub struct EvaluationConfig {
    #[validate(custom(function = "non_empty_path"))]
    pub dataset_root: PathBuf,
    #[validate(custom(function = "non_empty_path"))]
    pub results_root: PathBuf,
    #[validate(nested)]
    pub prompts: PromptPaths,
    #[validate(nested)]
    pub model: ModelSettings,
    #[validate(nested)]
    pub renderer: RendererSettings,
    #[validate(length(min = 1))]
    pub ground_truth_file: String,
    pub annotate_asset_dimensions: bool,
    /// Process only the first N items in sorted order.
    pub limit: Option<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from(DEFAULT_DATASET_ROOT),
            results_root: PathBuf::from(DEFAULT_RESULTS_ROOT),
            prompts: PromptPaths::default(),
            model: ModelSettings::default(),
            renderer: RendererSettings::default(),
            ground_truth_file: DEFAULT_GROUND_TRUTH_FILE.to_string(),
            annotate_asset_dimensions: true,
            limit: None,
        }
    }
}

impl EvaluationConfig {
    /// Runs field validation and maps failures to [`crate::CoreError::Validation`].
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }

    /// `<results_root>/run_<YYYYmmdd_HHMMSS>`. A run claims this name, or the
    /// first free `_N` variant of it, when it starts.
    pub fn run_dir(&self, started_at: DateTime<Local>) -> PathBuf {
        self.results_root
            .join(format!("run_{}", started_at.format("%Y%m%d_%H%M%S")))
    }

    pub fn summary_path(run_dir: &Path) -> PathBuf {
        run_dir.join(SUMMARY_FILE)
    }
}

fn non_empty_path(path: &PathBuf) -> std::result::Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("empty_path"));
    }
    Ok(())
}
