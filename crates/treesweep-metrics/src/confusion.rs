//! Confusion matrix and per-class classification metrics.

use std::fmt;

use crate::error::MetricError;

/// A confusion matrix over arbitrary integer class ids.
///
/// The class set is the sorted union of the ids found in the ground truth and
/// the predictions. Entry `counts[t][p]` counts samples whose true class is
/// `classes[t]` and whose predicted class is `classes[p]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    classes: Vec<i64>,
    counts: Vec<Vec<usize>>,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    /// The class id.
    pub class: i64,
    /// Precision: TP / (TP + FP). 0.0 if the class was never predicted.
    pub precision: f64,
    /// Recall: TP / (TP + FN). 0.0 if the class never occurs in the truth.
    pub recall: f64,
    /// F1: 2 * precision * recall / (precision + recall). 0.0 if both are zero.
    pub f1: f64,
    /// Number of ground-truth samples in this class.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Build a confusion matrix from aligned ground-truth and predicted labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::LengthMismatch`] | `truth.len() != predicted.len()` |
    /// | [`MetricError::EmptyLabels`] | Zero labels provided |
    pub fn from_labels(truth: &[i64], predicted: &[i64]) -> Result<Self, MetricError> {
        if truth.len() != predicted.len() {
            return Err(MetricError::LengthMismatch {
                truth: truth.len(),
                predicted: predicted.len(),
            });
        }
        if truth.is_empty() {
            return Err(MetricError::EmptyLabels);
        }

        let mut classes: Vec<i64> = truth.iter().chain(predicted).copied().collect();
        classes.sort_unstable();
        classes.dedup();

        let n = classes.len();
        let mut counts = vec![vec![0usize; n]; n];
        let position = |label: &i64| classes.binary_search(label).unwrap_or_default();
        for (t, p) in truth.iter().zip(predicted) {
            counts[position(t)][position(p)] += 1;
        }

        Ok(Self { classes, counts })
    }

    /// Overall accuracy: proportion of correct predictions.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.n_classes()).map(|i| self.counts[i][i]).sum();
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }

    /// Per-class precision, recall, F1, and support, in class-id order.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        let n = self.n_classes();
        (0..n)
            .map(|c| {
                let tp = self.counts[c][c];
                let predicted_as_c: usize = (0..n).map(|t| self.counts[t][c]).sum();
                let support: usize = self.counts[c].iter().sum();
                let precision = ratio(tp, predicted_as_c);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: self.classes[c],
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Return the sorted class ids labelling rows and columns.
    #[must_use]
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Return the matrix rows (true class by predicted class).
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Return the number of scored samples.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// `num / den`, or 0.0 when `den` is zero.
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}", "")?;
        for class in &self.classes {
            write!(f, " pred_{class:>4}")?;
        }
        writeln!(f)?;

        for (class, row) in self.classes.iter().zip(&self.counts) {
            write!(f, "true_{class:>5}")?;
            for count in row {
                write!(f, " {count:>9}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let labels = vec![1, 1, 4, 4, 6, 6];
        let cm = ConfusionMatrix::from_labels(&labels, &labels).unwrap();
        assert!((cm.accuracy() - 1.0).abs() < f64::EPSILON);
        for m in cm.class_metrics() {
            assert!((m.precision - 1.0).abs() < f64::EPSILON);
            assert!((m.recall - 1.0).abs() < f64::EPSILON);
            assert!((m.f1 - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn known_confusion_matrix() {
        let truth = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
        let predicted = vec![0, 0, 1, 1, 1, 2, 2, 2, 0];
        let cm = ConfusionMatrix::from_labels(&truth, &predicted).unwrap();

        // Every class: TP=2, FP=1, FN=1.
        for m in cm.class_metrics() {
            assert!((m.precision - 2.0 / 3.0).abs() < 1e-10);
            assert!((m.recall - 2.0 / 3.0).abs() < 1e-10);
            assert_eq!(m.support, 3);
        }
        assert!((cm.accuracy() - 6.0 / 9.0).abs() < 1e-10);
        assert_eq!(cm.total(), 9);
    }

    #[test]
    fn classes_are_union_of_truth_and_predictions() {
        // Class 9 only appears as a (wrong) prediction.
        let cm = ConfusionMatrix::from_labels(&[3, 3, 5], &[3, 9, 5]).unwrap();
        assert_eq!(cm.classes(), &[3, 5, 9]);
        assert_eq!(cm.as_rows()[0], vec![1, 0, 1]);
        assert_eq!(cm.as_rows()[2], vec![0, 0, 0]);

        let metrics = cm.class_metrics();
        assert_eq!(metrics[2].class, 9);
        assert_eq!(metrics[2].support, 0);
        assert!(metrics[2].precision.abs() < f64::EPSILON);
        assert!(metrics[2].recall.abs() < f64::EPSILON);
        assert!(metrics[2].f1.abs() < f64::EPSILON);
    }

    #[test]
    fn never_predicted_class_has_zero_precision() {
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 0]).unwrap();
        let metrics = cm.class_metrics();
        assert_eq!(metrics[1].class, 1);
        assert!(metrics[1].precision.abs() < f64::EPSILON);
        assert!(metrics[1].recall.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_labels_error() {
        let err = ConfusionMatrix::from_labels(&[], &[]).unwrap_err();
        assert_eq!(err, MetricError::EmptyLabels);
    }

    #[test]
    fn length_mismatch_error() {
        let err = ConfusionMatrix::from_labels(&[0, 1, 1], &[0, 1]).unwrap_err();
        assert_eq!(err, MetricError::LengthMismatch { truth: 3, predicted: 2 });
    }

    #[test]
    fn display_formatting() {
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 1]).unwrap();
        let output = format!("{cm}");
        assert!(output.contains("pred_"));
        assert!(output.contains("true_"));
        assert_eq!(output.lines().count(), 3);
    }
}
