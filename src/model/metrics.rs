//! Classification evaluation: accuracy and per-class precision/recall/F1.

use ndarray::ArrayView1;
use serde::Serialize;

/// Precision, recall, F1, and support for one class.
///
/// Undefined ratios (zero denominators) report as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true samples of this class in the evaluated table.
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(true_pos: usize, pred_pos: usize, support: usize) -> Self {
        let precision = ratio(true_pos, pred_pos);
        let recall = ratio(true_pos, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
            support,
        }
    }
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Held-out evaluation results for a binary classifier.
///
/// `Display` renders a compact classification report suitable for console or
/// log output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Overall fraction of correct predictions.
    pub accuracy: f64,
    /// Metrics for the negative (non-foraging) class.
    pub negative: ClassMetrics,
    /// Metrics for the positive (foraging) class.
    pub positive: ClassMetrics,
    /// Total evaluated samples.
    pub n_samples: usize,
}

impl EvaluationReport {
    /// Compute the report from probability scores and true labels.
    ///
    /// Scores at or above `threshold` predict positive.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `scores` and `labels` have equal length.
    pub fn from_scores(
        scores: ArrayView1<'_, f32>,
        labels: ArrayView1<'_, f32>,
        threshold: f32,
    ) -> Self {
        debug_assert_eq!(
            scores.len(),
            labels.len(),
            "scores and labels must be aligned"
        );
        let n = scores.len();

        let mut tp = 0usize; // predicted 1, true 1
        let mut fp = 0usize; // predicted 1, true 0
        let mut tn = 0usize; // predicted 0, true 0
        let mut fn_ = 0usize; // predicted 0, true 1
        for (&s, &l) in scores.iter().zip(labels.iter()) {
            let predicted_positive = s >= threshold;
            let actually_positive = l == 1.0;
            match (predicted_positive, actually_positive) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, false) => tn += 1,
                (false, true) => fn_ += 1,
            }
        }

        Self {
            accuracy: ratio(tp + tn, n),
            negative: ClassMetrics::from_counts(tn, tn + fn_, tn + fp),
            positive: ClassMetrics::from_counts(tp, tp + fp, tp + fn_),
            n_samples: n,
        }
    }
}

impl std::fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "accuracy: {:.2} ({} samples)", self.accuracy, self.n_samples)?;
        writeln!(
            f,
            "{:>10} {:>10} {:>10} {:>10} {:>10}",
            "class", "precision", "recall", "f1", "support"
        )?;
        for (name, m) in [("0", &self.negative), ("1", &self.positive)] {
            writeln!(
                f,
                "{:>10} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}
