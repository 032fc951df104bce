//! Accuracy and macro-averaged precision, recall and F1.

use std::fmt;

use crate::confusion::{ClassMetrics, ConfusionMatrix};
use crate::error::MetricError;

/// The four scalar metrics tracked across a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Fraction of correctly classified samples.
    Accuracy,
    /// Macro-averaged precision.
    Precision,
    /// Macro-averaged recall.
    Recall,
    /// Macro-averaged F1 score.
    F1,
}

impl Metric {
    /// All metrics, in reporting order.
    pub const ALL: [Metric; 4] = [Metric::Accuracy, Metric::Precision, Metric::Recall, Metric::F1];

    /// Machine-friendly name used in JSON output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::Precision => "precision",
            Metric::Recall => "recall",
            Metric::F1 => "f1_score",
        }
    }

    /// Human-readable label used in charts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Accuracy => "Accuracy",
            Metric::Precision => "Precision",
            Metric::Recall => "Recall",
            Metric::F1 => "F1-Score",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scores of one set of aligned predictions.
///
/// Precision, recall and F1 are macro averages: computed per class, then
/// averaged without weighting, with undefined ratios counted as 0.0.
#[derive(Debug, Clone)]
pub struct ClassificationScores {
    accuracy: f64,
    precision: f64,
    recall: f64,
    f1: f64,
    per_class: Vec<ClassMetrics>,
    confusion: ConfusionMatrix,
}

impl ClassificationScores {
    /// Score predictions against ground truth.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::LengthMismatch`] | `truth.len() != predicted.len()` |
    /// | [`MetricError::EmptyLabels`] | Zero labels provided |
    pub fn from_labels(truth: &[i64], predicted: &[i64]) -> Result<Self, MetricError> {
        let confusion = ConfusionMatrix::from_labels(truth, predicted)?;
        let per_class = confusion.class_metrics();
        let n = per_class.len() as f64;
        let (mut precision, mut recall, mut f1) = (0.0, 0.0, 0.0);
        for m in &per_class {
            precision += m.precision;
            recall += m.recall;
            f1 += m.f1;
        }

        Ok(Self {
            accuracy: confusion.accuracy(),
            precision: precision / n,
            recall: recall / n,
            f1: f1 / n,
            per_class,
            confusion,
        })
    }

    /// Return the value of one metric.
    #[must_use]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
            Metric::F1 => self.f1,
        }
    }

    /// Fraction of correct predictions.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Macro-averaged precision.
    #[must_use]
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Macro-averaged recall.
    #[must_use]
    pub fn recall(&self) -> f64 {
        self.recall
    }

    /// Macro-averaged F1 score.
    #[must_use]
    pub fn f1(&self) -> f64 {
        self.f1
    }

    /// Return the per-class breakdown the macro averages were taken over.
    #[must_use]
    pub fn per_class(&self) -> &[ClassMetrics] {
        &self.per_class
    }

    /// Return the underlying confusion matrix.
    #[must_use]
    pub fn confusion_matrix(&self) -> &ConfusionMatrix {
        &self.confusion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn binary_reference_values() {
        let scores = ClassificationScores::from_labels(&[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap();
        assert!(close(scores.accuracy(), 0.75));
        // Class 0: P=2/3 R=1 F1=0.8; class 1: P=1 R=0.5 F1=2/3.
        assert!(close(scores.precision(), 5.0 / 6.0));
        assert!(close(scores.recall(), 0.75));
        assert!(close(scores.f1(), (0.8 + 2.0 / 3.0) / 2.0));
    }

    #[test]
    fn zero_division_counts_as_zero() {
        // Class 2 is predicted but never true; class 1 is true but never predicted.
        let scores = ClassificationScores::from_labels(&[0, 0, 1], &[0, 0, 2]).unwrap();
        assert!(close(scores.accuracy(), 2.0 / 3.0));
        assert!(close(scores.precision(), 1.0 / 3.0));
        assert!(close(scores.recall(), 1.0 / 3.0));
        assert!(close(scores.f1(), 1.0 / 3.0));
    }

    #[test]
    fn get_matches_accessors() {
        let scores = ClassificationScores::from_labels(&[1, 2, 3, 3], &[1, 3, 3, 2]).unwrap();
        assert!(close(scores.get(Metric::Accuracy), scores.accuracy()));
        assert!(close(scores.get(Metric::Precision), scores.precision()));
        assert!(close(scores.get(Metric::Recall), scores.recall()));
        assert!(close(scores.get(Metric::F1), scores.f1()));
    }

    #[test]
    fn metrics_stay_in_unit_interval() {
        let cases: [(&[i64], &[i64]); 4] = [
            (&[0], &[1]),
            (&[0, 1, 2, 3], &[3, 2, 1, 0]),
            (&[5, 5, 5, 5, 5], &[5, 5, 5, 5, 5]),
            (&[1, 2, 1, 2, 7, 7], &[2, 2, 1, 7, 7, 1]),
        ];
        for (truth, predicted) in cases {
            let scores = ClassificationScores::from_labels(truth, predicted).unwrap();
            for metric in Metric::ALL {
                let v = scores.get(metric);
                assert!((0.0..=1.0).contains(&v), "{metric} = {v} for {truth:?} / {predicted:?}");
            }
        }
    }

    #[test]
    fn unequal_lengths_fail_instead_of_truncating() {
        let err = ClassificationScores::from_labels(&[0, 1, 1, 0], &[0, 1, 0]).unwrap_err();
        assert_eq!(err, MetricError::LengthMismatch { truth: 4, predicted: 3 });
    }

    #[test]
    fn metric_names_and_labels() {
        let names: Vec<&str> = Metric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["accuracy", "precision", "recall", "f1_score"]);
        assert_eq!(Metric::F1.label(), "F1-Score");
    }
}
