use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use ui2code_core::ASSETS_DIR;

/// Asset list text used when an item has no image assets.
pub const NO_ASSETS: &str = "None.";

/// Extensions (lowercase) treated as image assets.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "svg"];

/// Describes the reference images next to a screenshot for the user prompt.
#[derive(Debug, Clone)]
pub struct AssetInspector {
    annotate_dimensions: bool,
}

impl Default for AssetInspector {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AssetInspector {
    pub fn new(annotate_dimensions: bool) -> Self {
        Self {
            annotate_dimensions,
        }
    }

    /// One `- <name>` line per image in `<screenshot dir>/assets`, sorted by
    /// name, or [`NO_ASSETS`].
    pub fn describe(&self, screenshot: &Path) -> String {
        let dir = screenshot
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(ASSETS_DIR);

        let images = match list_images(&dir) {
            Ok(images) => images,
            Err(e) => {
                if dir.exists() {
                    warn!(dir = %dir.display(), error = %e, "Could not list assets");
                }
                return NO_ASSETS.to_string();
            }
        };

        if images.is_empty() {
            debug!(dir = %dir.display(), "No image assets");
            return NO_ASSETS.to_string();
        }

        images
            .iter()
            .map(|path| self.describe_image(path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn describe_image(&self, path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !self.annotate_dimensions {
            return format!("- {}", name);
        }

        if has_extension(path, "svg") {
            return format!("- {} (dimensions unavailable: SVG is not decoded)", name);
        }

        match image::image_dimensions(path) {
            Ok((width, height)) => format!("- {} (Width: {}px, Height: {}px)", name, width, height),
            Err(e) => format!("- {} (dimensions unavailable: {})", name, e),
        }
    }
}

/// Image files directly inside `dir`, sorted by file name.
pub fn list_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

pub fn is_image(path: &Path) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
