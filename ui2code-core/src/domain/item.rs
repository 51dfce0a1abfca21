use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ITEM_DIR_PREFIX: &str = "item_";
pub const SCREENSHOT_FILE: &str = "screenshot.png";
pub const ASSETS_DIR: &str = "assets";
pub const UNKNOWN_ITEM_ID: &str = "unknown_item";

/// One dataset unit: `item_<id>/{screenshot.png, assets/*, index.jsx?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetItem {
    pub id: String,
    pub root: PathBuf,
    pub screenshot: PathBuf,
}

impl DatasetItem {
    /// Item rooted at an `item_*` directory.
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let screenshot = root.join(SCREENSHOT_FILE);
        Self {
            id: Self::id_for_dir(&root),
            root,
            screenshot,
        }
    }

    /// Item owning the given screenshot; the item root is its parent directory.
    pub fn from_screenshot(screenshot: impl Into<PathBuf>) -> Self {
        let screenshot = screenshot.into();
        let root = screenshot
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            id: Self::id_for_dir(&root),
            root,
            screenshot,
        }
    }

    /// Directories not named `item_*` map to [`UNKNOWN_ITEM_ID`].
    fn id_for_dir(root: &Path) -> String {
        match root.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with(ITEM_DIR_PREFIX) => name.to_string(),
            _ => UNKNOWN_ITEM_ID.to_string(),
        }
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(ASSETS_DIR)
    }

    pub fn ground_truth_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn has_screenshot(&self) -> bool {
        self.screenshot.is_file()
    }

    pub fn is_identified(&self) -> bool {
        self.id != UNKNOWN_ITEM_ID
    }
}
