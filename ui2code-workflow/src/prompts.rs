use std::path::Path;
use tracing::{debug, warn};
use ui2code_core::{CoreError, PromptPaths, Result};

/// Placeholder in the user template replaced by the asset list.
pub const ASSETS_PLACEHOLDER: &str = "{image_assets_list}";

/// Reads a prompt file and trims it.
///
/// Any failure (missing file, invalid UTF-8) is logged and yields an empty
/// string.
pub fn load_prompt(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            debug!(path = %path.display(), chars = text.len(), "Loaded prompt");
            text.trim().to_string()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Prompt file not found");
            String::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load prompt file");
            String::new()
        }
    }
}

/// Substitutes the asset list into the user template.
///
/// `{{` and `}}` collapse to single braces. Other `{...}` sequences are left
/// as written.
pub fn fill_user_template(template: &str, assets: &str) -> String {
    let mut out = String::with_capacity(template.len() + assets.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with(ASSETS_PLACEHOLDER) {
            out.push_str(assets);
            rest = &tail[ASSETS_PLACEHOLDER.len()..];
        } else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

fn unusable(what: &str, path: &Path) -> CoreError {
    CoreError::Configuration(format!("{} is empty or unreadable: {}", what, path.display()))
}

/// The system prompt and user template for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub system: String,
    pub user_template: String,
}

impl PromptSet {
    pub fn new(system: impl Into<String>, user_template: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user_template: user_template.into(),
        }
    }

    /// Loads both prompts. Either being empty is a configuration error.
    pub fn load(paths: &PromptPaths) -> Result<Self> {
        let system = load_prompt(&paths.system);
        if system.is_empty() {
            return Err(unusable("system prompt", &paths.system));
        }
        let user_template = load_prompt(&paths.user_template);
        if user_template.is_empty() {
            return Err(unusable("user prompt template", &paths.user_template));
        }
        Ok(Self::new(system, user_template))
    }

    pub fn user_prompt(&self, assets: &str) -> String {
        fill_user_template(&self.user_template, assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_placeholder() {
        let filled = fill_user_template("Assets:\n{image_assets_list}\nEnd", "- a.png");
        assert_eq!(filled, "Assets:\n- a.png\nEnd");
    }

    #[test]
    fn test_fill_collapses_doubled_braces() {
        let filled = fill_user_template("style={{ color: 'red' }} {image_assets_list}", "None.");
        assert_eq!(filled, "style={ color: 'red' } None.");
    }

    #[test]
    fn test_fill_keeps_unknown_fields() {
        assert_eq!(fill_user_template("{other} }", "x"), "{other} }");
    }

    #[test]
    fn test_fill_non_ascii() {
        assert_eq!(
            fill_user_template("图片：{image_assets_list}。", "- 标志.png"),
            "图片：- 标志.png。"
        );
    }

    #[test]
    fn test_missing_prompt_is_empty() {
        assert_eq!(load_prompt(Path::new("/no/such/prompt.txt")), "");
    }
}
