//! UI2Code model SDK
//!
//! A small client for OpenAI-compatible chat completion APIs, used to send a
//! UI screenshot plus prompts to a vision model and read back the generated
//! component source.
//!
//! # Features
//!
//! - **Multimodal requests**: text and `data:` URL image parts in one message
//! - **Optional retries**: exponential backoff on 429, 5xx and connect errors
//! - **Bearer auth**: from configuration or `OPENAI_API_KEY`
//! - **Distinguishable errors**: transport, API and empty-response failures
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ui2code_sdk::{SdkConfig, VisionModelClient};
//! use ui2code_core::{CodeGenerator, GenerationRequest, ModelSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VisionModelClient::new(SdkConfig::from_env(), "gpt-4o")?;
//!
//!     let request = GenerationRequest::new(
//!         "You write React components.",
//!         "Recreate this UI.",
//!         "iVBORw0KGgo...",
//!         ModelSettings::default(),
//!     );
//!     let text = client.generate(&request).await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod resources;

pub use client::HttpClient;
pub use config::{AuthConfig, SdkConfig, API_BASE_ENV, API_KEY_ENV, DEFAULT_BASE_URL};
pub use error::{SdkError, SdkResult};
pub use resources::chat::{
    ChatClient, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, ContentPart,
    ImageDetail, ImageUrl, MessageContent, ResponseMessage, Role, Usage,
};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use ui2code_core::{CodeGenerator, GenerationError, GenerationRequest};

/// [`CodeGenerator`] backed by a chat completions endpoint.
///
/// Each call sends the system prompt as a system message and a single user
/// message holding the filled template text and the screenshot at high
/// detail.
#[derive(Debug, Clone)]
pub struct VisionModelClient {
    chat: ChatClient,
    model: String,
}

impl VisionModelClient {
    pub fn new(config: SdkConfig, model: impl Into<String>) -> SdkResult<Self> {
        let http = Arc::new(HttpClient::new(config)?);
        Ok(Self {
            chat: ChatClient::new(http),
            model: model.into(),
        })
    }

    /// Access the underlying chat client
    pub fn chat(&self) -> &ChatClient {
        &self.chat
    }

    pub fn build_request(request: &GenerationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest::new(&request.model.model)
            .message(ChatMessage::system(&request.system_prompt))
            .message(ChatMessage::user_parts(vec![
                ContentPart::text(&request.user_prompt),
                ContentPart::image(request.image_data_url(), ImageDetail::High),
            ]))
            .with_temperature(request.model.temperature)
            .with_max_tokens(request.model.max_tokens)
    }
}

#[async_trait]
impl CodeGenerator for VisionModelClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        info!(model = %request.model.model, "Requesting code generation");

        let chat_request = Self::build_request(request);
        match self.chat.complete(&chat_request).await {
            Ok(text) => {
                debug!(chars = text.len(), "Received model output");
                Ok(text)
            }
            Err(SdkError::EmptyResponse) => Err(GenerationError::EmptyResponse),
            Err(e) => Err(GenerationError::request(e)),
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
