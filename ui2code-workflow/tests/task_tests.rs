//! Tests for the individual item stages: prompts, assets, parsing,
//! rendering, scoring and persistence.

mod common;

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;
use tempfile::TempDir;
use ui2code_core::{
    ComponentRenderer, EvaluationMetrics, GenerationResult, ItemResult, ItemStatus, PromptPaths,
    RenderError, SUMMARY_FILE,
};
use ui2code_workflow::{
    fill_user_template, parse_model_output, AssetInspector, ItemRecord, ProcessRenderer,
    PromptSet, ResultPersister, SimilarityScorer, StageError, NO_ASSETS,
};

// ===== Prompt Tests =====

#[rstest]
#[case("Assets:\n{image_assets_list}", "- a.png", "Assets:\n- a.png")]
#[case("Use {{className}} and {image_assets_list}", "None.", "Use {className} and None.")]
#[case("{unrelated} stays", "x", "{unrelated} stays")]
fn test_fill_user_template(#[case] template: &str, #[case] assets: &str, #[case] expected: &str) {
    assert_eq!(fill_user_template(template, assets), expected);
}

#[test]
fn test_prompt_set_load_trims_files() {
    let dir = TempDir::new().unwrap();
    let paths = common::write_prompts(dir.path());

    let prompts = PromptSet::load(&paths).unwrap();

    assert_eq!(prompts.system, "You convert screenshots into React components.");
    assert_eq!(prompts.user_prompt("- logo.png"), "Available assets:\n- logo.png");
}

#[test]
fn test_prompt_set_rejects_missing_system_prompt() {
    let dir = TempDir::new().unwrap();
    let mut paths = common::write_prompts(dir.path());
    paths.system = dir.path().join("missing.txt");

    let err = PromptSet::load(&paths).unwrap_err();
    assert!(matches!(err, ui2code_core::CoreError::Configuration(_)));
}

#[test]
fn test_prompt_set_rejects_blank_user_template() {
    let dir = TempDir::new().unwrap();
    let system = dir.path().join("system.txt");
    let user = dir.path().join("user.txt");
    std::fs::write(&system, "system").unwrap();
    std::fs::write(&user, "   \n").unwrap();

    let err = PromptSet::load(&PromptPaths {
        system,
        user_template: user,
    })
    .unwrap_err();
    assert!(matches!(err, ui2code_core::CoreError::Configuration(_)));
}

// ===== Asset Tests =====

#[test]
fn test_assets_listed_by_name_without_dimensions() {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets");
    std::fs::create_dir_all(&assets).unwrap();
    std::fs::write(assets.join("logo.png"), b"not decoded").unwrap();
    std::fs::write(assets.join("b.jpg"), b"not decoded").unwrap();
    std::fs::write(assets.join("a.txt"), b"ignored").unwrap();

    let info = AssetInspector::new(false).describe(&dir.path().join("screenshot.png"));

    assert_eq!(info, "- b.jpg\n- logo.png");
}

#[test]
fn test_missing_assets_dir_is_none() {
    let dir = TempDir::new().unwrap();
    let info = AssetInspector::default().describe(&dir.path().join("screenshot.png"));
    assert_eq!(info, NO_ASSETS);
}

#[test]
fn test_assets_dir_without_images_is_none() {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets");
    std::fs::create_dir_all(assets.join("nested")).unwrap();
    std::fs::write(assets.join("readme.md"), b"# assets").unwrap();

    let info = AssetInspector::default().describe(&dir.path().join("screenshot.png"));
    assert_eq!(info, "None.");
}

#[test]
fn test_assets_annotated_with_dimensions() {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets");
    common::write_png(&assets.join("logo.png"), 8, 4);
    std::fs::write(assets.join("icon.svg"), "<svg/>").unwrap();
    std::fs::write(assets.join("broken.png"), b"garbage").unwrap();

    let info = AssetInspector::new(true).describe(&dir.path().join("screenshot.png"));
    let lines: Vec<&str> = info.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("- broken.png (dimensions unavailable: "));
    assert_eq!(lines[1], "- icon.svg (dimensions unavailable: SVG is not decoded)");
    assert_eq!(lines[2], "- logo.png (Width: 8px, Height: 4px)");
}

// ===== Parsing Tests =====

#[test]
fn test_parse_jsx_and_scss() {
    let result = parse_model_output("```jsx\nconst X=1;\n```\n```scss\n.a{}\n```");

    assert_eq!(result.jsx, "const X=1;");
    assert_eq!(result.scss, ".a{}");
    assert!(result.has_jsx());
    assert!(result.has_scss());
}

#[test]
fn test_parse_without_blocks() {
    let result = parse_model_output("I cannot help with that.");

    assert_eq!(result.jsx, "");
    assert_eq!(result.scss, "");
    assert_eq!(result.raw_output, "I cannot help with that.");
    assert!(!result.has_jsx());
}

#[test]
fn test_parse_jsx_only() {
    let raw = common::model_reply("export default () => <div/>;", None);
    let result = parse_model_output(&raw);

    assert_eq!(result.jsx, "export default () => <div/>;");
    assert_eq!(result.scss(), None);
}

// ===== Rendering Tests =====

#[cfg(unix)]
fn shell(script: &str) -> ProcessRenderer {
    ProcessRenderer::new(
        vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        Some(std::time::Duration::from_secs(10)),
    )
    .unwrap()
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_renderer_passes_output_and_encoded_sources() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("nested").join("rendered.png");

    // $0 is the output path, $1 the base64 JSX, $2 the base64 SCSS.
    let renderer = shell(r#"printf '%s %s' "$1" "$2" > "$0""#);
    renderer
        .render("<div/>", Some(".a{}"), &output)
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "PGRpdi8+ LmF7fQ==");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_renderer_non_zero_exit() {
    let dir = TempDir::new().unwrap();
    let renderer = shell("echo 'render blew up' >&2; exit 3");

    let err = renderer
        .render("<div/>", None, &dir.path().join("out.png"))
        .await
        .unwrap_err();

    match err {
        RenderError::NonZeroExit { code, stderr } => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr, "render blew up");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_renderer_timeout() {
    let dir = TempDir::new().unwrap();
    let renderer = ProcessRenderer::new(
        vec!["sh".to_string(), "-c".to_string(), "sleep 5".to_string()],
        Some(std::time::Duration::from_millis(100)),
    )
    .unwrap();

    let err = renderer
        .render("<div/>", None, &dir.path().join("out.png"))
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Timeout(_)));
}

#[tokio::test]
async fn test_process_renderer_missing_executable() {
    let dir = TempDir::new().unwrap();
    let renderer =
        ProcessRenderer::new(vec!["ui2code-no-such-renderer".to_string()], None).unwrap();

    let err = renderer
        .render("<div/>", None, &dir.path().join("out.png"))
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::ExecutableNotFound(ref p) if p == "ui2code-no-such-renderer"));
}

// ===== Scoring Tests =====

#[tokio::test]
async fn test_code_similarity_against_ground_truth() {
    let dir = TempDir::new().unwrap();
    let truth = dir.path().join("index.jsx");
    std::fs::write(&truth, format!("\n{}\n\n", common::GROUND_TRUTH)).unwrap();

    let score = SimilarityScorer::new()
        .code_similarity(common::GROUND_TRUTH.trim(), &truth)
        .await
        .unwrap();

    assert_relative_eq!(score, 1.0);
}

#[tokio::test]
async fn test_code_similarity_missing_ground_truth() {
    let dir = TempDir::new().unwrap();
    let err = SimilarityScorer::new()
        .code_similarity("const A = 1;", &dir.path().join("index.jsx"))
        .await
        .unwrap_err();

    assert!(matches!(err, StageError::GroundTruthMissing(_)));
}

#[tokio::test]
async fn test_visual_similarity_identical_screenshots() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    common::write_png(&a, 32, 32);
    common::write_png(&b, 32, 32);

    let score = SimilarityScorer::new().visual_similarity(&a, &b).await.unwrap();

    assert_relative_eq!(score, 1.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_visual_similarity_missing_render() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.png");
    common::write_png(&a, 32, 32);

    let err = SimilarityScorer::new()
        .visual_similarity(&a, &dir.path().join("missing.png"))
        .await
        .unwrap_err();

    assert!(matches!(err, StageError::Score(_)));
}

// ===== Persistence Tests =====

fn sample_generation() -> GenerationResult {
    GenerationResult {
        raw_output: "```jsx\n<div/>\n```".to_string(),
        jsx: "<div/>".to_string(),
        scss: String::new(),
    }
}

#[test]
fn test_persist_writes_item_artifacts() {
    let dir = TempDir::new().unwrap();
    let persister = ResultPersister::new(dir.path().join("run"));
    let generation = sample_generation();
    let mut metrics = EvaluationMetrics::new();
    metrics.generation_success = true;
    metrics.code_similarity_score = 0.5;
    let screenshot = Path::new("/data/item_001/screenshot.png");
    let rendered = persister.rendered_path("item_001");

    let item_dir = persister
        .persist(&ItemRecord {
            item_id: "item_001",
            model_used: "gpt-4o",
            input_screenshot: screenshot,
            rendered_screenshot: Some(&rendered),
            assets_info: "None.",
            system_prompt: "system",
            user_prompt: "user 图",
            generation: &generation,
            metrics: &metrics,
        })
        .unwrap();

    assert_eq!(item_dir, dir.path().join("run").join("item_001"));
    assert_eq!(std::fs::read_to_string(item_dir.join("generated_code.jsx")).unwrap(), "<div/>");
    assert_eq!(std::fs::read_to_string(item_dir.join("generated_style.scss")).unwrap(), "");
    assert_eq!(
        std::fs::read_to_string(item_dir.join("input_screenshot_path.txt")).unwrap(),
        "/data/item_001/screenshot.png"
    );
    assert_eq!(
        std::fs::read_to_string(item_dir.join("input_image_assets.txt")).unwrap(),
        "None."
    );

    let raw = std::fs::read_to_string(item_dir.join("metadata.json")).unwrap();
    assert!(raw.contains("user 图"));
    let metadata: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(metadata["item_id"], "item_001");
    assert_eq!(metadata["model_used"], "gpt-4o");
    assert_eq!(metadata["user_prompt_content_sent"], "user 图");
    assert_eq!(metadata["raw_model_output"], "```jsx\n<div/>\n```");
    assert_eq!(
        metadata["generated_code_filepath"],
        Path::new("item_001").join("generated_code.jsx").display().to_string()
    );
    assert_eq!(
        metadata["generated_screenshot_path"],
        rendered.display().to_string()
    );
    assert_eq!(metadata["metrics"]["code_similarity_score"], 0.5);
    assert_eq!(metadata["metrics"]["generation_success"], true);
    assert!(metadata["timestamp"].is_string());
}

#[test]
fn test_create_fresh_never_reuses_existing_dir() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("results").join("run_20250628_150558");

    let first = ResultPersister::create_fresh(&base).unwrap();
    let second = ResultPersister::create_fresh(&base).unwrap();
    let third = ResultPersister::create_fresh(&base).unwrap();

    assert_eq!(first.run_dir(), base.as_path());
    assert_eq!(
        second.run_dir(),
        dir.path().join("results").join("run_20250628_150558_1").as_path()
    );
    assert_eq!(
        third.run_dir(),
        dir.path().join("results").join("run_20250628_150558_2").as_path()
    );
    assert!(third.run_dir().is_dir());
}

#[test]
fn test_copy_assets_recursive() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("src_assets");
    std::fs::create_dir_all(source.join("icons")).unwrap();
    std::fs::write(source.join("logo.png"), b"png").unwrap();
    std::fs::write(source.join("icons").join("x.svg"), b"<svg/>").unwrap();

    let persister = ResultPersister::new(dir.path().join("run"));
    let copied = persister.copy_assets("item_001", &source).unwrap();

    assert_eq!(copied, 2);
    let dest = persister.item_dir("item_001").join("assets");
    assert!(dest.join("logo.png").is_file());
    assert!(dest.join("icons").join("x.svg").is_file());
}

#[test]
fn test_copy_assets_missing_source() {
    let dir = TempDir::new().unwrap();
    let persister = ResultPersister::new(dir.path().join("run"));
    assert_eq!(persister.copy_assets("item_001", &dir.path().join("none")).unwrap(), 0);
    assert!(!persister.item_dir("item_001").exists());
}

#[test]
fn test_write_summary_lists_results() {
    let dir = TempDir::new().unwrap();
    let persister = ResultPersister::new(dir.path().join("run"));
    let results = vec![
        ItemResult::new("item_001", ItemStatus::Success, "ok", EvaluationMetrics::new()),
        ItemResult::new("item_002", ItemStatus::Error, "generation failed: boom", EvaluationMetrics::new()),
    ];

    let path = persister.write_summary(&results).unwrap();

    assert_eq!(path, dir.path().join("run").join(SUMMARY_FILE));
    let parsed: Vec<ItemResult> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, results);
}
