use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use ui2code_core::{
    CodeGenerator, ComponentRenderer, CoreError, DatasetItem, EvaluationConfig, ItemResult,
    Result, RunSummary, ITEM_DIR_PREFIX,
};
use ui2code_metrics::MetricAggregator;

use crate::assets::AssetInspector;
use crate::pipeline::{ItemOutcome, ItemPipeline};
use crate::prompts::PromptSet;
use crate::tasks::ResultPersister;

/// Hooks for reporting batch progress. All methods default to no-ops.
pub trait RunObserver: Send + Sync {
    fn run_started(&self, _total: usize, _run_dir: &Path) {}
    fn item_started(&self, _index: usize, _total: usize, _item: &DatasetItem) {}
    fn item_skipped(&self, _item: &DatasetItem) {}
    fn item_finished(&self, _index: usize, _total: usize, _outcome: &ItemOutcome) {}
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Result of a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_dir: PathBuf,
    pub summary_path: PathBuf,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub summary: RunSummary,
    pub results: Vec<ItemResult>,
}

/// Drives a full evaluation run over the dataset, one item at a time.
pub struct BatchEngine {
    config: EvaluationConfig,
    generator: Arc<dyn CodeGenerator>,
    renderer: Arc<dyn ComponentRenderer>,
    prompts: PromptSet,
}

impl BatchEngine {
    /// Validates the configuration and loads both prompts.
    ///
    /// Fails with [`CoreError::Configuration`] when either prompt is empty or
    /// unreadable.
    pub fn new(
        config: EvaluationConfig,
        generator: Arc<dyn CodeGenerator>,
        renderer: Arc<dyn ComponentRenderer>,
    ) -> Result<Self> {
        config.ensure_valid()?;
        let prompts = PromptSet::load(&config.prompts)?;
        Ok(Self {
            config,
            generator,
            renderer,
            prompts,
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    /// `item_*` directories of the dataset root in name order, truncated to
    /// the configured limit.
    pub fn discover_items(&self) -> Result<Vec<DatasetItem>> {
        let root = &self.config.dataset_root;
        if !root.is_dir() {
            return Err(CoreError::NotFound(format!(
                "dataset root {} does not exist",
                root.display()
            )));
        }

        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            let is_item = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(ITEM_DIR_PREFIX));
            if is_item && entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();

        if let Some(limit) = self.config.limit {
            dirs.truncate(limit);
        }

        Ok(dirs.into_iter().map(DatasetItem::from_dir).collect())
    }

    pub async fn run(&self) -> Result<RunReport> {
        self.run_with_observer(&NoopObserver).await
    }

    pub async fn run_with_observer(&self, observer: &dyn RunObserver) -> Result<RunReport> {
        let items = self.discover_items()?;
        let started_at = Local::now();
        let persister = ResultPersister::create_fresh(self.config.run_dir(started_at))
            .map_err(|e| CoreError::Io(e.to_string()))?;
        let run_dir = persister.run_dir().to_path_buf();

        let total = items.len();
        info!(
            dataset = %self.config.dataset_root.display(),
            run_dir = %run_dir.display(),
            items = total,
            "Starting evaluation run"
        );
        observer.run_started(total, &run_dir);

        let pipeline = ItemPipeline::new(
            self.generator.clone(),
            self.renderer.clone(),
            self.prompts.clone(),
            self.config.model.clone(),
            persister.clone(),
        )
        .with_asset_inspector(AssetInspector::new(self.config.annotate_asset_dimensions))
        .with_ground_truth_file(&self.config.ground_truth_file);

        let mut results = Vec::with_capacity(total);
        for (index, item) in items.iter().enumerate() {
            observer.item_started(index + 1, total, item);

            if !item.has_screenshot() {
                warn!(item_id = %item.id, "Skipping item without {}", ui2code_core::SCREENSHOT_FILE);
                observer.item_skipped(item);
                continue;
            }

            info!(item_id = %item.id, "Processing item {}/{}", index + 1, total);
            let outcome = pipeline.process(item).await;
            observer.item_finished(index + 1, total, &outcome);
            results.push(outcome.result);
        }

        let summary_path = persister.write_summary(&results).map_err(|e| {
            error!(error = %e, "Failed to write summary");
            CoreError::Io(e.to_string())
        })?;

        let summary = MetricAggregator::summarize(&results, total);
        info!(
            processed = summary.processed_items,
            skipped = summary.skipped_items,
            generation_rate = summary.generation_success_rate,
            rendering_rate = summary.rendering_success_rate,
            "Evaluation run finished"
        );

        Ok(RunReport {
            run_dir,
            summary_path,
            started_at,
            finished_at: Local::now(),
            summary,
            results,
        })
    }
}
