//! Prompt file re-encoding
//!
//! Prompt files saved by some editors are GBK rather than UTF-8. This command
//! leaves UTF-8 files alone and rewrites anything else as UTF-8, decoding it
//! as GBK with replacement characters for invalid sequences.

use anyhow::{Context as _, Result};
use clap::Args;
use comfy_table::Cell;
use encoding_rs::GBK;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::context::Context;
use crate::output::{print_field, TableDisplay};

#[derive(Debug, Args)]
pub struct FixEncodingArgs {
    /// Files to check (defaults to the configured prompt files)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingOutcome {
    Missing,
    AlreadyUtf8,
    Converted,
    /// Converted, but some bytes were not valid GBK either
    ConvertedLossy,
}

impl EncodingOutcome {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Missing => "not found, skipped",
            Self::AlreadyUtf8 => "already UTF-8",
            Self::Converted => "converted from GBK",
            Self::ConvertedLossy => "converted from GBK with replacements",
        }
    }
}

/// Re-encode `path` as UTF-8 if it is not already.
pub fn convert_to_utf8(path: &Path) -> Result<EncodingOutcome> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "File not found, skipping");
            return Ok(EncodingOutcome::Missing);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", path)),
    };

    if std::str::from_utf8(&bytes).is_ok() {
        info!(path = %path.display(), "Already UTF-8");
        return Ok(EncodingOutcome::AlreadyUtf8);
    }

    let (text, had_errors) = GBK.decode_without_bom_handling(&bytes);
    std::fs::write(path, text.as_bytes())
        .with_context(|| format!("Failed to write {:?}", path))?;

    info!(path = %path.display(), lossy = had_errors, "Converted to UTF-8");
    Ok(if had_errors {
        EncodingOutcome::ConvertedLossy
    } else {
        EncodingOutcome::Converted
    })
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    outcome: EncodingOutcome,
}

impl TableDisplay for FileReport {
    fn to_row(&self) -> Vec<Cell> {
        vec![Cell::new(&self.path), Cell::new(self.outcome.describe())]
    }

    fn display_single(&self) {
        print_field(&self.path, self.outcome.describe());
    }
}

/// Execute the fix-encoding command
pub fn execute(ctx: &Context, args: FixEncodingArgs) -> Result<()> {
    let files = if args.files.is_empty() {
        let prompts = &ctx.config.evaluation.prompts;
        vec![prompts.system.clone(), prompts.user_template.clone()]
    } else {
        args.files
    };

    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let outcome = convert_to_utf8(&path)?;
        if outcome == EncodingOutcome::Missing {
            ctx.output
                .warning(&format!("{} not found, skipped", path.display()));
        }
        reports.push(FileReport {
            path: path.display().to_string(),
            outcome,
        });
    }

    ctx.output.write_list(&reports, &["File", "Result"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_utf8_file_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "你好, prompt").unwrap();

        assert_eq!(convert_to_utf8(&path).unwrap(), EncodingOutcome::AlreadyUtf8);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "你好, prompt");
    }

    #[test]
    fn test_gbk_file_converted() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prompt.txt");
        // "你好" in GBK
        std::fs::write(&path, [0xC4, 0xE3, 0xBA, 0xC3]).unwrap();

        assert_eq!(convert_to_utf8(&path).unwrap(), EncodingOutcome::Converted);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "你好");
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, [b'a', 0xFF, b'b']).unwrap();

        assert_eq!(convert_to_utf8(&path).unwrap(), EncodingOutcome::ConvertedLossy);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn test_missing_file_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        let outcome = convert_to_utf8(&dir.path().join("missing.txt")).unwrap();
        assert_eq!(outcome, EncodingOutcome::Missing);
    }
}
