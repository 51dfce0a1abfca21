use std::path::PathBuf;
use thiserror::Error;
use ui2code_core::{GenerationError, RenderError};
use ui2code_metrics::ScoreError;

/// Failure writing an item's artifacts or the run summary.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy assets from {}: {source}", .path.display())]
    CopyAssets {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },
}

/// Failure of a single pipeline stage for one item.
///
/// None of these stop the batch; the pipeline records them in the item's
/// metrics and moves on.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("could not read screenshot {}: {source}", .path.display())]
    Screenshot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("ground truth not found at {}", .0.display())]
    GroundTruthMissing(PathBuf),

    #[error("could not read ground truth {}: {source}", .path.display())]
    GroundTruthUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}
