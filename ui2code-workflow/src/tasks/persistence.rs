use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use ui2code_core::{EvaluationMetrics, GenerationResult, ItemResult, SUMMARY_FILE};

use crate::error::PersistError;

pub const CODE_FILE: &str = "generated_code.jsx";
pub const STYLE_FILE: &str = "generated_style.scss";
pub const RENDERED_FILE: &str = "rendered_screenshot.png";
pub const SCREENSHOT_PATH_FILE: &str = "input_screenshot_path.txt";
pub const ASSETS_INFO_FILE: &str = "input_image_assets.txt";
pub const METADATA_FILE: &str = "metadata.json";

/// Everything recorded for one processed item.
#[derive(Debug, Clone, Copy)]
pub struct ItemRecord<'a> {
    pub item_id: &'a str,
    pub model_used: &'a str,
    pub input_screenshot: &'a Path,
    /// `None` when rendering was never attempted.
    pub rendered_screenshot: Option<&'a Path>,
    pub assets_info: &'a str,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub generation: &'a GenerationResult,
    pub metrics: &'a EvaluationMetrics,
}

#[derive(Debug, Serialize)]
struct ItemMetadata<'a> {
    timestamp: String,
    item_id: &'a str,
    model_used: &'a str,
    input_screenshot_path: String,
    generated_screenshot_path: String,
    input_image_assets_info: &'a str,
    system_prompt_used: &'a str,
    user_prompt_content_sent: &'a str,
    generated_code_filepath: String,
    generated_style_filepath: String,
    raw_model_output: &'a str,
    metrics: &'a EvaluationMetrics,
}

/// Writes item artifacts and the run summary under one run directory.
#[derive(Debug, Clone)]
pub struct ResultPersister {
    run_dir: PathBuf,
}

impl ResultPersister {
    pub fn new(run_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_dir: run_dir.into(),
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn item_dir(&self, item_id: &str) -> PathBuf {
        self.run_dir.join(item_id)
    }

    pub fn rendered_path(&self, item_id: &str) -> PathBuf {
        self.item_dir(item_id).join(RENDERED_FILE)
    }

    /// Claims a run directory that did not exist before this call.
    ///
    /// `base` is tried first, then `base_1`, `base_2`, and so on, so two runs
    /// started within the same second never share a directory.
    pub fn create_fresh(base: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let base = base.into();
        if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent)?;
        }

        let mut candidate = base.clone();
        let mut suffix = 0u32;
        loop {
            match fs::create_dir(&candidate) {
                Ok(()) => {
                    debug!(run_dir = %candidate.display(), "Created run directory");
                    return Ok(Self::new(candidate));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    suffix += 1;
                    let mut name = base.file_name().unwrap_or_default().to_os_string();
                    name.push(format!("_{}", suffix));
                    candidate = base.with_file_name(name);
                }
                Err(source) => {
                    return Err(PersistError::CreateDir {
                        path: candidate,
                        source,
                    })
                }
            }
        }
    }

    /// Writes the source files, input records and `metadata.json`.
    /// Returns the item directory.
    pub fn persist(&self, record: &ItemRecord<'_>) -> Result<PathBuf, PersistError> {
        let dir = self.item_dir(record.item_id);
        create_dir(&dir)?;

        write_file(&dir.join(CODE_FILE), &record.generation.jsx)?;
        write_file(&dir.join(STYLE_FILE), &record.generation.scss)?;
        write_file(
            &dir.join(SCREENSHOT_PATH_FILE),
            &record.input_screenshot.display().to_string(),
        )?;
        write_file(&dir.join(ASSETS_INFO_FILE), record.assets_info)?;

        let relative = |file: &str| Path::new(record.item_id).join(file).display().to_string();
        let metadata = ItemMetadata {
            timestamp: Local::now().to_rfc3339(),
            item_id: record.item_id,
            model_used: record.model_used,
            input_screenshot_path: record.input_screenshot.display().to_string(),
            generated_screenshot_path: record
                .rendered_screenshot
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            input_image_assets_info: record.assets_info,
            system_prompt_used: record.system_prompt,
            user_prompt_content_sent: record.user_prompt,
            generated_code_filepath: relative(CODE_FILE),
            generated_style_filepath: relative(STYLE_FILE),
            raw_model_output: &record.generation.raw_output,
            metrics: record.metrics,
        };
        write_file(&dir.join(METADATA_FILE), &to_pretty_json(&metadata, "item metadata")?)?;

        debug!(item_id = record.item_id, dir = %dir.display(), "Persisted item");
        Ok(dir)
    }

    /// Recursively copies `source` into `<item dir>/assets`.
    /// A missing source is not an error. Returns the number of files copied.
    pub fn copy_assets(&self, item_id: &str, source: &Path) -> Result<usize, PersistError> {
        if !source.is_dir() {
            return Ok(0);
        }
        let dest = self.item_dir(item_id).join(ui2code_core::ASSETS_DIR);
        copy_tree(source, &dest).map_err(|e| PersistError::CopyAssets {
            path: source.to_path_buf(),
            source: e,
        })
    }

    /// Writes all item results to `summary_metrics.json`.
    pub fn write_summary(&self, results: &[ItemResult]) -> Result<PathBuf, PersistError> {
        create_dir(&self.run_dir)?;
        let path = self.run_dir.join(SUMMARY_FILE);
        write_file(&path, &to_pretty_json(&results, "summary")?)?;
        info!(path = %path.display(), items = results.len(), "Wrote summary");
        Ok(path)
    }
}

/// Four-space indented JSON; non-ASCII text is written as-is.
fn to_pretty_json<T: Serialize + ?Sized>(value: &T, what: &'static str) -> Result<String, PersistError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|source| PersistError::Serialize { what, source })?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn create_dir(path: &Path) -> Result<(), PersistError> {
    fs::create_dir_all(path).map_err(|source| PersistError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), PersistError> {
    fs::write(path, contents).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn copy_tree(source: &Path, dest: &Path) -> std::io::Result<usize> {
    fs::create_dir_all(dest)?;
    let mut copied = 0;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
