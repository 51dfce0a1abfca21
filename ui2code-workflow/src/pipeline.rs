use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use ui2code_core::{
    CodeGenerator, ComponentRenderer, DatasetItem, EvaluationMetrics, GenerationRequest,
    GenerationResult, ItemResult, ItemStatus, ModelSettings, RenderError,
};

use crate::assets::AssetInspector;
use crate::error::StageError;
use crate::prompts::PromptSet;
use crate::tasks::{parse_model_output, ItemRecord, ResultPersister, SimilarityScorer};

pub const SUCCESS_MESSAGE: &str = "generation and evaluation succeeded";
pub const NO_JSX_MESSAGE: &str = "no JSX code block in model output";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStage {
    Pending,
    Generating,
    Parsing,
    Rendering,
    Scoring,
    Persisted,
    Errored,
}

impl ItemStage {
    pub fn can_transition_to(self, next: ItemStage) -> bool {
        use ItemStage::*;
        matches!(
            (self, next),
            (Pending, Generating)
                | (Generating, Parsing)
                | (Generating, Errored)
                | (Parsing, Rendering)
                | (Parsing, Persisted)
                | (Parsing, Errored)
                | (Rendering, Scoring)
                | (Scoring, Persisted)
                | (Scoring, Errored)
                | (Errored, Persisted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStage::Persisted)
    }
}

/// Stage progression of one item, with the stages visited so far.
#[derive(Debug, Clone)]
pub struct StageTracker {
    item_id: String,
    current: ItemStage,
    history: Vec<ItemStage>,
}

impl StageTracker {
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            current: ItemStage::Pending,
            history: vec![ItemStage::Pending],
        }
    }

    pub fn current(&self) -> ItemStage {
        self.current
    }

    pub fn history(&self) -> &[ItemStage] {
        &self.history
    }

    fn advance(&mut self, next: ItemStage) {
        if !self.current.can_transition_to(next) {
            warn!(
                item_id = %self.item_id,
                from = ?self.current,
                to = ?next,
                "Unexpected stage transition"
            );
        }
        debug!(item_id = %self.item_id, from = ?self.current, to = ?next, "Stage transition");
        self.current = next;
        self.history.push(next);
    }
}

/// What processing one item produced.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub result: ItemResult,
    pub generation: GenerationResult,
    pub stages: StageTracker,
    pub output_dir: PathBuf,
}

/// Runs one dataset item through generation, parsing, rendering, scoring and
/// persistence. Stage failures are recorded in the item's metrics; nothing
/// here aborts the batch.
pub struct ItemPipeline {
    generator: Arc<dyn CodeGenerator>,
    renderer: Arc<dyn ComponentRenderer>,
    prompts: PromptSet,
    model: ModelSettings,
    assets: AssetInspector,
    scorer: SimilarityScorer,
    persister: ResultPersister,
    ground_truth_file: String,
}

impl ItemPipeline {
    pub fn new(
        generator: Arc<dyn CodeGenerator>,
        renderer: Arc<dyn ComponentRenderer>,
        prompts: PromptSet,
        model: ModelSettings,
        persister: ResultPersister,
    ) -> Self {
        Self {
            generator,
            renderer,
            prompts,
            model,
            assets: AssetInspector::default(),
            scorer: SimilarityScorer::new(),
            persister,
            ground_truth_file: ui2code_core::DEFAULT_GROUND_TRUTH_FILE.to_string(),
        }
    }

    pub fn with_asset_inspector(mut self, assets: AssetInspector) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_ground_truth_file(mut self, file_name: impl Into<String>) -> Self {
        self.ground_truth_file = file_name.into();
        self
    }

    pub fn persister(&self) -> &ResultPersister {
        &self.persister
    }

    pub async fn process(&self, item: &DatasetItem) -> ItemOutcome {
        let mut stages = StageTracker::new(&item.id);
        let mut metrics = EvaluationMetrics::new();
        let mut failure: Option<String> = None;

        if !item.is_identified() {
            warn!(
                screenshot = %item.screenshot.display(),
                "Screenshot is not inside an item_* directory, using '{}'",
                item.id
            );
        }

        match self.persister.copy_assets(&item.id, &item.assets_dir()) {
            Ok(0) => {}
            Ok(count) => debug!(item_id = %item.id, count, "Copied assets"),
            Err(e) => warn!(item_id = %item.id, error = %e, "Failed to copy assets"),
        }

        let assets_info = self.assets.describe(&item.screenshot);
        let user_prompt = self.prompts.user_prompt(&assets_info);

        // Generating
        stages.advance(ItemStage::Generating);
        let generation = match self.generate(item, &user_prompt).await {
            Ok(raw) => {
                stages.advance(ItemStage::Parsing);
                let parsed = parse_model_output(&raw);
                if parsed.has_jsx() {
                    metrics.generation_success = true;
                } else {
                    metrics.append_error("No JSX code block found in model output");
                    failure = Some(NO_JSX_MESSAGE.to_string());
                }
                parsed
            }
            Err(e) => {
                error!(item_id = %item.id, error = %e, "Generation failed");
                metrics.append_error(format!("Generation failed: {}", e));
                failure = Some(format!("generation failed: {}", e));
                stages.advance(ItemStage::Errored);
                GenerationResult::default()
            }
        };

        let mut rendered_path = None;
        if generation.has_jsx() {
            let output = self.persister.rendered_path(&item.id);

            stages.advance(ItemStage::Rendering);
            let render = self.render(&generation, &output).await;
            metrics.rendering_success = render.is_ok();

            stages.advance(ItemStage::Scoring);
            self.score(item, &generation, &output, render, &mut metrics).await;
            rendered_path = Some(output);
        }

        let record = ItemRecord {
            item_id: &item.id,
            model_used: self.generator.model_id(),
            input_screenshot: &item.screenshot,
            rendered_screenshot: rendered_path.as_deref(),
            assets_info: &assets_info,
            system_prompt: &self.prompts.system,
            user_prompt: &user_prompt,
            generation: &generation,
            metrics: &metrics,
        };
        let output_dir = match self.persister.persist(&record) {
            Ok(dir) => {
                stages.advance(ItemStage::Persisted);
                dir
            }
            Err(e) => {
                error!(item_id = %item.id, error = %e, "Failed to persist results");
                metrics.append_error(format!("Persisting results failed: {}", e));
                if stages.current() != ItemStage::Errored {
                    stages.advance(ItemStage::Errored);
                }
                self.persister.item_dir(&item.id)
            }
        };

        let result = match failure {
            None => ItemResult::new(&item.id, ItemStatus::Success, SUCCESS_MESSAGE, metrics),
            Some(message) => ItemResult::new(&item.id, ItemStatus::Error, message, metrics),
        };
        info!(
            item_id = %item.id,
            status = %result.status,
            code_similarity = result.metrics.code_similarity_score,
            ssim = result.metrics.visual_similarity_ssim_score,
            "Item finished"
        );

        ItemOutcome {
            result,
            generation,
            stages,
            output_dir,
        }
    }

    async fn generate(&self, item: &DatasetItem, user_prompt: &str) -> Result<String, StageError> {
        let bytes = tokio::fs::read(&item.screenshot)
            .await
            .map_err(|source| StageError::Screenshot {
                path: item.screenshot.clone(),
                source,
            })?;

        let request = GenerationRequest::new(
            &self.prompts.system,
            user_prompt,
            STANDARD.encode(bytes),
            self.model.clone(),
        );

        info!(item_id = %item.id, model = %self.model.model, "Generating code");
        Ok(self.generator.generate(&request).await?)
    }

    async fn render(&self, generation: &GenerationResult, output: &std::path::Path) -> Result<(), RenderError> {
        self.renderer
            .render(&generation.jsx, generation.scss(), output)
            .await
    }

    /// Code similarity first, then visual similarity if the render worked.
    async fn score(
        &self,
        item: &DatasetItem,
        generation: &GenerationResult,
        rendered: &std::path::Path,
        render: Result<(), RenderError>,
        metrics: &mut EvaluationMetrics,
    ) {
        let ground_truth = item.ground_truth_path(&self.ground_truth_file);
        match self.scorer.code_similarity(&generation.jsx, &ground_truth).await {
            Ok(score) => metrics.code_similarity_score = score,
            Err(StageError::GroundTruthMissing(path)) => {
                warn!(path = %path.display(), "Ground truth not found, skipping code similarity");
                metrics.append_error("Original JSX not found");
            }
            Err(e) => {
                error!(item_id = %item.id, error = %e, "Code similarity failed");
                metrics.append_error(format!("Code similarity failed: {}", e));
            }
        }

        match render {
            Ok(()) => match self.scorer.visual_similarity(&item.screenshot, rendered).await {
                Ok(score) => metrics.visual_similarity_ssim_score = score,
                Err(e) => {
                    error!(item_id = %item.id, error = %e, "Visual similarity failed");
                    metrics.append_error(format!("Visual similarity failed: {}", e));
                }
            },
            Err(e) => {
                error!(item_id = %item.id, error = %e, "Rendering failed");
                metrics.append_error(format!("Rendering failed: {}", e));
            }
        }
    }
}
