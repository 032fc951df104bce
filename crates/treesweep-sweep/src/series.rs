//! Per-metric series aligned with the sweep.

use treesweep_metrics::{ClassificationScores, Metric};

/// Four metric series index-aligned with the tree counts that produced them.
///
/// [`MetricSeries::push`] is the only mutation and extends every series at
/// once, so all of them always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    tree_counts: Vec<usize>,
    accuracy: Vec<f64>,
    precision: Vec<f64>,
    recall: Vec<f64>,
    f1: Vec<f64>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the scores of one tree count.
    pub fn push(&mut self, n_trees: usize, scores: &ClassificationScores) {
        self.tree_counts.push(n_trees);
        self.accuracy.push(scores.accuracy());
        self.precision.push(scores.precision());
        self.recall.push(scores.recall());
        self.f1.push(scores.f1());
    }

    #[must_use]
    pub fn tree_counts(&self) -> &[usize] {
        &self.tree_counts
    }

    /// Values of one metric, aligned with [`MetricSeries::tree_counts`].
    #[must_use]
    pub fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Accuracy => &self.accuracy,
            Metric::Precision => &self.precision,
            Metric::Recall => &self.recall,
            Metric::F1 => &self.f1,
        }
    }

    /// `(tree count, value)` pairs of one metric.
    pub fn points(&self, metric: Metric) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.tree_counts
            .iter()
            .copied()
            .zip(self.values(metric).iter().copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree_counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree_counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_series_aligned() {
        let mut series = MetricSeries::new();
        let a = ClassificationScores::from_labels(&[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap();
        let b = ClassificationScores::from_labels(&[0, 1], &[0, 1]).unwrap();
        series.push(10, &a);
        series.push(50, &b);

        assert_eq!(series.len(), 2);
        assert_eq!(series.tree_counts(), &[10, 50]);
        for metric in Metric::ALL {
            assert_eq!(series.values(metric).len(), 2);
        }
        assert_eq!(series.values(Metric::Accuracy), &[0.75, 1.0]);
        assert_eq!(
            series.points(Metric::Recall).collect::<Vec<_>>(),
            vec![(10, 0.75), (50, 1.0)]
        );
    }
}
