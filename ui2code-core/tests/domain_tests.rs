use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use ui2code_core::domain::*;

// ===== DatasetItem Tests =====

#[test]
fn test_item_from_dir_uses_directory_name() {
    let item = DatasetItem::from_dir("data/ui2code_dataset/item_001");

    assert_eq!(item.id, "item_001");
    assert_eq!(
        item.screenshot,
        PathBuf::from("data/ui2code_dataset/item_001/screenshot.png")
    );
    assert_eq!(
        item.assets_dir(),
        PathBuf::from("data/ui2code_dataset/item_001/assets")
    );
    assert!(item.is_identified());
}

#[test]
fn test_item_from_screenshot_derives_root() {
    let item = DatasetItem::from_screenshot("dataset/item_042/screenshot.png");

    assert_eq!(item.id, "item_042");
    assert_eq!(item.root, PathBuf::from("dataset/item_042"));
    assert_eq!(
        item.ground_truth_path("index.jsx"),
        PathBuf::from("dataset/item_042/index.jsx")
    );
}

#[test]
fn test_item_outside_item_dir_is_unknown() {
    let item = DatasetItem::from_screenshot(Path::new("misc/page/screenshot.png"));

    assert_eq!(item.id, UNKNOWN_ITEM_ID);
    assert!(!item.is_identified());
}

#[test]
fn test_item_missing_screenshot() {
    let item = DatasetItem::from_dir("/definitely/not/here/item_1");
    assert!(!item.has_screenshot());
}

// ===== GenerationResult Tests =====

#[test]
fn test_generation_result_default_is_absent() {
    let result = GenerationResult::default();

    assert!(!result.has_jsx());
    assert!(!result.has_scss());
    assert_eq!(result.scss(), None);
}

#[test]
fn test_generation_result_scss_accessor() {
    let result = GenerationResult {
        raw_output: "...".to_string(),
        jsx: "export default () => null;".to_string(),
        scss: ".a { color: red; }".to_string(),
    };

    assert!(result.has_jsx());
    assert_eq!(result.scss(), Some(".a { color: red; }"));
}

#[test]
fn test_generation_request_data_url() {
    let request = GenerationRequest::new("sys", "user", "aGVsbG8=", ModelSettings::default());
    assert_eq!(request.image_data_url(), "data:image/png;base64,aGVsbG8=");
}

// ===== EvaluationMetrics Tests =====

#[test]
fn test_metrics_defaults() {
    let metrics = EvaluationMetrics::new();

    assert_eq!(metrics.code_similarity_score, 0.0);
    assert_eq!(metrics.visual_similarity_ssim_score, 0.0);
    assert!(!metrics.generation_success);
    assert!(!metrics.rendering_success);
    assert!(metrics.error_details.is_empty());
    assert!(!metrics.has_errors());
}

#[test]
fn test_metrics_error_details_append_only() {
    let mut metrics = EvaluationMetrics::new();
    metrics.append_error("Original JSX not found");
    metrics.append_error("Rendering failed: exit 1.");

    assert_eq!(
        metrics.error_details,
        "Original JSX not found. Rendering failed: exit 1. "
    );
    assert!(metrics.has_errors());
}

#[test]
fn test_metrics_serialization_field_names() {
    let metrics = EvaluationMetrics {
        code_similarity_score: 0.5,
        visual_similarity_ssim_score: 0.25,
        generation_success: true,
        rendering_success: false,
        error_details: "Rendering failed. ".to_string(),
    };

    let value = serde_json::to_value(&metrics).unwrap();
    assert_eq!(value["code_similarity_score"], 0.5);
    assert_eq!(value["visual_similarity_ssim_score"], 0.25);
    assert_eq!(value["generation_success"], true);
    assert_eq!(value["rendering_success"], false);
    assert_eq!(value["error_details"], "Rendering failed. ");
}

#[test]
fn test_item_result_status_serializes_lowercase() {
    let result = ItemResult::new("item_001", ItemStatus::Error, "boom", EvaluationMetrics::new());

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["item_id"], "item_001");
    assert!(!result.is_success());
    assert_eq!(ItemStatus::Success.to_string(), "success");
}

// ===== RunSummary Tests =====

#[test]
fn test_summary_serializes_flat_keys() {
    let summary = RunSummary {
        total_items: 3,
        processed_items: 2,
        skipped_items: 1,
        generation_successes: 2,
        rendering_successes: 1,
        generation_success_rate: 2.0 / 3.0,
        rendering_success_rate: 1.0 / 3.0,
        mean_code_similarity: 0.75,
        mean_visual_similarity: 0.5,
    };

    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["total_items"], 3);
    assert_eq!(value["skipped_items"], 1);
    assert_eq!(value["mean_code_similarity"], 0.75);
    assert_eq!(value.as_object().unwrap().len(), 9);

    let back: RunSummary = serde_json::from_value(value).unwrap();
    assert_eq!(back, summary);
}
