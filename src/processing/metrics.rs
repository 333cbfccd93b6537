//! Binary classification metrics for the evaluation harness

use serde::{Deserialize, Serialize};
use std::fmt;

pub const CLASS_NAMES: [&str; 2] = ["Not Relevant", "Relevant"];

/// 2x2 confusion matrix for labels {0, 1}, laid out as `[[TN, FP], [FN, TP]]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_positives: usize,
}

impl ConfusionMatrix {
    pub fn from_labels(y_true: &[bool], y_pred: &[bool]) -> Self {
        let mut matrix = Self::default();
        for (&truth, &predicted) in y_true.iter().zip(y_pred) {
            match (truth, predicted) {
                (false, false) => matrix.true_negatives += 1,
                (false, true) => matrix.false_positives += 1,
                (true, false) => matrix.false_negatives += 1,
                (true, true) => matrix.true_positives += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> usize {
        self.true_negatives + self.false_positives + self.false_negatives + self.true_positives
    }

    pub fn rows(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negatives, self.false_positives],
            [self.false_negatives, self.true_positives],
        ]
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let width = rows.iter().flatten().map(|v| v.to_string().len()).max().unwrap_or(1);
        writeln!(f, "[[{:>w$} {:>w$}]", rows[0][0], rows[0][1], w = width)?;
        write!(f, " [{:>w$} {:>w$}]]", rows[1][0], rows[1][1], w = width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class precision/recall/F1 with accuracy and averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Indexed by label: 0 = not relevant, 1 = relevant
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn class_metrics(tp: usize, fp: usize, fn_: usize) -> ClassMetrics {
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    ClassMetrics {
        precision,
        recall,
        f1,
        support: tp + fn_,
    }
}

impl ClassificationReport {
    /// `None` when the ground truth holds fewer than two classes.
    pub fn compute(matrix: &ConfusionMatrix) -> Option<Self> {
        let negatives = matrix.true_negatives + matrix.false_positives;
        let positives = matrix.true_positives + matrix.false_negatives;
        if negatives == 0 || positives == 0 {
            return None;
        }

        let not_relevant = class_metrics(
            matrix.true_negatives,
            matrix.false_negatives,
            matrix.false_positives,
        );
        let relevant = class_metrics(
            matrix.true_positives,
            matrix.false_positives,
            matrix.false_negatives,
        );
        let total = matrix.total();

        let macro_avg = ClassMetrics {
            precision: (not_relevant.precision + relevant.precision) / 2.0,
            recall: (not_relevant.recall + relevant.recall) / 2.0,
            f1: (not_relevant.f1 + relevant.f1) / 2.0,
            support: total,
        };

        let weight = |a: f64, b: f64| {
            (a * not_relevant.support as f64 + b * relevant.support as f64) / total as f64
        };
        let weighted_avg = ClassMetrics {
            precision: weight(not_relevant.precision, relevant.precision),
            recall: weight(not_relevant.recall, relevant.recall),
            f1: weight(not_relevant.f1, relevant.f1),
            support: total,
        };

        Some(Self {
            classes: [not_relevant, relevant],
            accuracy: ratio(matrix.true_negatives + matrix.true_positives, total),
            macro_avg,
            weighted_avg,
        })
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>14} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for (name, metrics) in CLASS_NAMES.iter().zip(&self.classes) {
            write_row(f, name, metrics)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, label: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        label, m.precision, m.recall, m.f1, m.support
    )
}
