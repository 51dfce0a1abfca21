use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use ui2code_core::MetricCalculator;

use super::{MetricOutput, SequenceMatcher};

/// Generated source paired with the ground truth it is compared against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodePair {
    pub generated: String,
    pub reference: String,
}

impl CodePair {
    pub fn new(generated: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            generated: generated.into(),
            reference: reference.into(),
        }
    }
}

/// Line-level similarity of two source texts.
///
/// Lines are whitespace-stripped and blank lines dropped before matching, so
/// indentation and spacing changes do not count against the score.
#[derive(Debug, Clone, Default)]
pub struct CodeSimilarityCalculator;

impl CodeSimilarityCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Stripped, non-blank lines. A `\r\n` pair yields an empty piece
    /// between its halves, which the blank filter drops.
    fn significant_lines(text: &str) -> Vec<&str> {
        text.split(is_line_break)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Returns a ratio in `[0, 1]`.
    pub fn similarity(&self, generated: &str, reference: &str) -> f64 {
        let a = Self::significant_lines(generated);
        let b = Self::significant_lines(reference);

        match (a.is_empty(), b.is_empty()) {
            (true, true) => 1.0,
            (true, false) | (false, true) => 0.0,
            (false, false) => SequenceMatcher::new(&a, &b).ratio(),
        }
    }
}

/// Every line boundary `str.splitlines` recognises, not just `\n`.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

#[async_trait]
impl MetricCalculator for CodeSimilarityCalculator {
    type Input = CodePair;
    type Output = MetricOutput;
    type Error = Infallible;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        let score = self.similarity(&input.generated, &input.reference);

        Ok(MetricOutput {
            score,
            metadata: json!({
                "metric": "code_similarity",
                "generated_lines": Self::significant_lines(&input.generated).len(),
                "reference_lines": Self::significant_lines(&input.reference).len(),
            }),
        })
    }
}
