#![allow(dead_code)]

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use ui2code_core::{
    CodeGenerator, ComponentRenderer, EvaluationConfig, GenerationError, GenerationRequest,
    PromptPaths, RenderError,
};

pub const GROUND_TRUTH: &str = "import React from 'react';\n\nexport default function Hero() {\n  return <h1>Hello</h1>;\n}\n";

pub fn model_reply(jsx: &str, scss: Option<&str>) -> String {
    let mut reply = format!("Here is the component:\n\n```jsx\n{}\n```\n", jsx);
    if let Some(scss) = scss {
        reply.push_str(&format!("\n```scss\n{}\n```\n", scss));
    }
    reply
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x * y) % 256) as u8])
    });
    img.save(path).unwrap();
}

/// `<root>/item_<n>/screenshot.png` plus `index.jsx` and one asset.
pub fn write_item(dataset: &Path, name: &str) -> PathBuf {
    let dir = dataset.join(name);
    write_png(&dir.join("screenshot.png"), 32, 32);
    std::fs::write(dir.join("index.jsx"), GROUND_TRUTH).unwrap();
    write_png(&dir.join("assets").join("logo.png"), 8, 4);
    dir
}

pub fn write_prompts(dir: &Path) -> PromptPaths {
    std::fs::create_dir_all(dir).unwrap();
    let system = dir.join("system.txt");
    let user = dir.join("user.txt");
    std::fs::write(&system, "You convert screenshots into React components.\n").unwrap();
    std::fs::write(&user, "Available assets:\n{image_assets_list}\n").unwrap();
    PromptPaths {
        system,
        user_template: user,
    }
}

pub fn config(root: &Path) -> EvaluationConfig {
    EvaluationConfig {
        dataset_root: root.join("dataset"),
        results_root: root.join("results"),
        prompts: write_prompts(&root.join("prompts")),
        ..Default::default()
    }
}

pub struct StubGenerator {
    reply: Result<String, String>,
    pub calls: AtomicUsize,
    pub last_user_prompt: Mutex<Option<String>>,
}

impl StubGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
            last_user_prompt: Mutex::new(None),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
            last_user_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeGenerator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user_prompt.lock().unwrap() = Some(request.user_prompt.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(GenerationError::request(std::io::Error::new(
                std::io::ErrorKind::Other,
                message.clone(),
            ))),
        }
    }

    fn model_id(&self) -> &str {
        "stub-model"
    }
}

pub enum RenderBehavior {
    /// Copy the given image to the output path.
    CopyFrom(PathBuf),
    /// Copy the item's own screenshot (the output's sibling in the dataset).
    CopyScreenshotOf(PathBuf),
    Fail(i32),
}

pub struct StubRenderer {
    behavior: RenderBehavior,
    pub calls: Mutex<Vec<(String, Option<String>, PathBuf)>>,
}

impl StubRenderer {
    pub fn new(behavior: RenderBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ComponentRenderer for StubRenderer {
    async fn render(&self, jsx: &str, scss: Option<&str>, output: &Path) -> Result<(), RenderError> {
        self.calls.lock().unwrap().push((
            jsx.to_string(),
            scss.map(str::to_string),
            output.to_path_buf(),
        ));
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        match &self.behavior {
            RenderBehavior::CopyFrom(source) | RenderBehavior::CopyScreenshotOf(source) => {
                std::fs::copy(source, output)?;
                Ok(())
            }
            RenderBehavior::Fail(code) => Err(RenderError::NonZeroExit {
                code: Some(*code),
                stderr: "SyntaxError: Unexpected token".to_string(),
            }),
        }
    }
}
