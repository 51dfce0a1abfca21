use async_trait::async_trait;
use std::path::Path;

use crate::domain::GenerationRequest;
use crate::error::{GenerationError, RenderError};

#[async_trait]
pub trait MetricCalculator {
    type Input;
    type Output;
    type Error;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;
}

/// Turns a screenshot plus prompts into raw model text.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Identifier recorded in item metadata.
    fn model_id(&self) -> &str;
}

/// Rasterizes generated component source into an image at `output`.
#[async_trait]
pub trait ComponentRenderer: Send + Sync {
    async fn render(&self, jsx: &str, scss: Option<&str>, output: &Path) -> Result<(), RenderError>;
}
