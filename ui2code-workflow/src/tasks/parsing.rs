use regex::Regex;
use tracing::warn;
use ui2code_core::GenerationResult;

/// Content of the first fenced block tagged `tag` (case-insensitive), trimmed.
///
/// The opening fence must be followed by the tag and a line break, so
/// `jsx` does not match a `jsxs` block.
pub fn extract_fenced_block(raw: &str, tag: &str) -> Option<String> {
    let pattern = format!(r"(?is)```{}[ \t]*\r?\n(.*?)```", regex::escape(tag));
    let re = Regex::new(&pattern).ok()?;
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Splits raw model output into JSX and SCSS.
///
/// A missing block becomes an empty string and a warning.
pub fn parse_model_output(raw: &str) -> GenerationResult {
    let jsx = extract_fenced_block(raw, "jsx").unwrap_or_else(|| {
        warn!("No ```jsx block in model output");
        String::new()
    });
    let scss = extract_fenced_block(raw, "scss").unwrap_or_else(|| {
        warn!("No ```scss block in model output");
        String::new()
    });

    GenerationResult {
        raw_output: raw.to_string(),
        jsx,
        scss,
    }
}
