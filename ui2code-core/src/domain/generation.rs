use serde::{Deserialize, Serialize};

use super::config::ModelSettings;

/// Everything sent to the model for one item. Built fresh per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Base64 of the PNG screenshot, without a `data:` prefix.
    pub image_base64: String,
    pub model: ModelSettings,
}

impl GenerationRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        image_base64: impl Into<String>,
        model: ModelSettings,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            image_base64: image_base64.into(),
            model,
        }
    }

    pub fn image_data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.image_base64)
    }
}

/// Raw model text plus the code blocks extracted from it.
///
/// Empty `jsx` or `scss` means the block was absent, which is a valid state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub raw_output: String,
    pub jsx: String,
    pub scss: String,
}

impl GenerationResult {
    pub fn has_jsx(&self) -> bool {
        !self.jsx.is_empty()
    }

    pub fn has_scss(&self) -> bool {
        !self.scss.is_empty()
    }

    pub fn scss(&self) -> Option<&str> {
        if self.has_scss() {
            Some(&self.scss)
        } else {
            None
        }
    }
}
