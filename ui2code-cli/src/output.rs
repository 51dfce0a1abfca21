//! Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use ui2code_core::{DatasetItem, ItemResult, RunSummary};
use ui2code_workflow::{ItemOutcome, RunObserver, RunReport};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tables and progress on the terminal (default)
    #[default]
    Table,
    /// Machine-readable JSON on stdout
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Output writer that handles different formats
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    /// Write a single item
    pub fn write<T: Serialize + TableDisplay>(&self, item: &T) -> Result<()> {
        match self.format {
            OutputFormat::Table => item.display_single(),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        }
        Ok(())
    }

    /// Write a list of items
    pub fn write_list<T: Serialize + TableDisplay>(&self, items: &[T], headers: &[&str]) -> Result<()> {
        match self.format {
            OutputFormat::Table => {
                if items.is_empty() {
                    println!("{}", "No items found.".dimmed());
                    return Ok(());
                }

                let mut table = new_table(headers);
                for item in items {
                    table.add_row(item.to_row());
                }

                println!("{table}");
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items)?);
            }
        }
        Ok(())
    }

    /// Print the per-item table and the run summary.
    pub fn write_report(&self, report: &RunReport) -> Result<()> {
        if self.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }

        let rows: Vec<ItemRow<'_>> = report.results.iter().map(ItemRow).collect();
        print_section("Items");
        self.write_list(
            &rows,
            &["Item", "Status", "Generated", "Rendered", "Code Sim", "SSIM", "Errors"],
        )?;

        print_section("Summary");
        print_field("Run directory", &report.run_dir.display().to_string());
        print_field("Summary file", &report.summary_path.display().to_string());
        let elapsed = report.finished_at.signed_duration_since(report.started_at);
        print_field(
            "Duration",
            &format_duration(elapsed.to_std().unwrap_or_default()),
        );
        println!("{}", summary_table(&report.summary));
        Ok(())
    }

    /// Write a success message
    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "✓".green(), message);
        } else {
            eprintln!("{}", message);
        }
    }

    /// Write an error message
    pub fn error(&self, message: &str) {
        if self.format == OutputFormat::Table {
            eprintln!("{} {}", "✗".red(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    /// Write a warning message
    pub fn warning(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "⚠".yellow(), message);
        } else {
            eprintln!("Warning: {}", message);
        }
    }

    /// Write an info message
    pub fn info(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "ℹ".blue(), message);
        } else {
            eprintln!("{}", message);
        }
    }

    /// Progress reporting for a batch run. Silent in JSON mode so stdout
    /// stays parseable.
    pub fn run_progress(&self) -> RunProgress {
        RunProgress {
            bar: (self.format == OutputFormat::Table).then(progress_bar),
        }
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("█▉▊▋▌▍▎▏ "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Progress bar plus the per-item console summary.
pub struct RunProgress {
    bar: Option<ProgressBar>,
}

impl RunProgress {
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl RunObserver for RunProgress {
    fn run_started(&self, total: usize, run_dir: &Path) {
        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
            bar.println(format!(
                "{} Writing results to {}",
                "ℹ".blue(),
                run_dir.display()
            ));
        }
    }

    fn item_started(&self, _index: usize, _total: usize, item: &DatasetItem) {
        if let Some(bar) = &self.bar {
            bar.set_message(item.id.clone());
        }
    }

    fn item_skipped(&self, item: &DatasetItem) {
        if let Some(bar) = &self.bar {
            bar.println(format!(
                "{} {} skipped: no {}",
                "⚠".yellow(),
                item.id,
                ui2code_core::SCREENSHOT_FILE
            ));
            bar.inc(1);
        }
    }

    fn item_finished(&self, index: usize, total: usize, outcome: &ItemOutcome) {
        if let Some(bar) = &self.bar {
            bar.println(item_line(index, total, &outcome.result));
            bar.inc(1);
        }
    }
}

/// One console line per processed item, plus its error notes if any.
pub fn item_line(index: usize, total: usize, result: &ItemResult) -> String {
    let m = &result.metrics;
    let mark = if result.is_success() {
        "✓".green()
    } else {
        "✗".red()
    };
    let mut line = format!(
        "{} [{}/{}] {}  generated: {}  rendered: {}  code: {}  ssim: {}",
        mark,
        index,
        total,
        result.item_id.bold(),
        yes_no(m.generation_success),
        yes_no(m.rendering_success),
        format_score(m.code_similarity_score),
        format_score(m.visual_similarity_ssim_score),
    );
    if m.has_errors() {
        line.push_str(&format!("\n    {} {}", "errors:".dimmed(), m.error_details.trim_end()));
    }
    line
}

/// Report row for one item.
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ItemRow<'a>(&'a ItemResult);

impl TableDisplay for ItemRow<'_> {
    fn to_row(&self) -> Vec<Cell> {
        let r = self.0;
        let m = &r.metrics;
        vec![
            Cell::new(&r.item_id),
            Cell::new(status_badge(r.status.as_str())),
            Cell::new(yes_no(m.generation_success)),
            Cell::new(yes_no(m.rendering_success)),
            Cell::new(format_score(m.code_similarity_score)),
            Cell::new(format_score(m.visual_similarity_ssim_score)),
            Cell::new(if m.has_errors() { m.error_details.trim_end() } else { "-" }),
        ]
    }

    fn display_single(&self) {
        let r = self.0;
        print_section(&r.item_id);
        print_field("Status", &status_badge(r.status.as_str()));
        print_field("Message", &r.message);
    }
}

fn summary_table(summary: &RunSummary) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    let rows = [
        ("Items found", summary.total_items.to_string()),
        ("Processed", summary.processed_items.to_string()),
        ("Skipped", summary.skipped_items.to_string()),
        (
            "Generation success",
            format!(
                "{}/{} ({})",
                summary.generation_successes,
                summary.total_items,
                format_percent(summary.generation_success_rate)
            ),
        ),
        (
            "Rendering success",
            format!(
                "{}/{} ({})",
                summary.rendering_successes,
                summary.total_items,
                format_percent(summary.rendering_success_rate)
            ),
        ),
        ("Mean code similarity", format_score(summary.mean_code_similarity)),
        ("Mean visual similarity (SSIM)", format_score(summary.mean_visual_similarity)),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    table
}

/// Trait for displaying items in a table
pub trait TableDisplay {
    /// Convert item to a table row
    fn to_row(&self) -> Vec<Cell>;

    /// Display a single item in detail
    fn display_single(&self);
}

/// Print a key-value pair in detail format
pub fn print_field(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// Print an optional key-value pair
pub fn print_optional_field(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        print_field(key, v);
    }
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", title.bold().underline());
}

pub fn format_score(score: f64) -> String {
    format!("{:.4}", score)
}

pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

fn yes_no(flag: bool) -> String {
    if flag {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

/// Status badge with color
pub fn status_badge(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "success" => status.to_string().green().to_string(),
        "error" => status.to_string().red().to_string(),
        _ => status.to_string(),
    }
}
