use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("failed to load image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("image of {width}x{height} is smaller than the {window}x{window} SSIM window")]
    ImageTooSmall {
        width: u32,
        height: u32,
        window: usize,
    },

    #[error("images differ in size: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (u32, u32),
        right: (u32, u32),
    },

    #[error("SSIM evaluated to a non-finite value")]
    NonFinite,
}

pub type ScoreResult<T> = std::result::Result<T, ScoreError>;
