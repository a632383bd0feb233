//! Binary confusion matrix

use serde::{Deserialize, Serialize};

/// Counts of a binary classification, positive class = 1 (unhealthy)
///
/// Laid out like a 2×2 matrix with true labels as rows:
///
/// ```text
///            pred 0   pred 1
/// true 0       tn       fp
/// true 1       fn       tp
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_positives: usize,
}

impl ConfusionMatrix {
    /// Tally paired true and predicted class labels
    pub fn from_labels(y_true: &[u8], y_pred: &[u8]) -> Self {
        assert_eq!(y_true.len(), y_pred.len(), "label lists must have same length");
        let mut cm = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            cm.record(t, p);
        }
        cm
    }

    pub fn record(&mut self, truth: u8, predicted: u8) {
        match (truth != 0, predicted != 0) {
            (false, false) => self.true_negatives += 1,
            (false, true) => self.false_positives += 1,
            (true, false) => self.false_negatives += 1,
            (true, true) => self.true_positives += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_negatives + self.false_positives + self.false_negatives + self.true_positives
    }

    /// `tp / (tp + fp)`, 0 when nothing was predicted positive
    pub fn precision(&self) -> f32 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// `tp / (tp + fn)`, 0 when there are no positives
    pub fn recall(&self) -> f32 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// `2tp / (2tp + fp + fn)`, 0 when undefined
    pub fn f1(&self) -> f32 {
        ratio(
            2 * self.true_positives,
            2 * self.true_positives + self.false_positives + self.false_negatives,
        )
    }

    pub fn accuracy(&self) -> f32 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Rows as `[[tn, fp], [fn, tp]]`
    pub fn rows(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negatives, self.false_positives],
            [self.false_negatives, self.true_positives],
        ]
    }

    /// Two comma-separated rows: `tn,fp` then `fn,tp`
    pub fn to_csv(&self) -> String {
        self.rows()
            .iter()
            .map(|[a, b]| format!("{a},{b}\n"))
            .collect()
    }
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}
