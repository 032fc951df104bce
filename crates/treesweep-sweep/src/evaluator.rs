//! The sweep evaluator: one train/classify/reduce/score round per tree count.

use tracing::{debug, info, instrument};
use treesweep_engine::Engine;
use treesweep_io::{ClassRecord, EvaluationRecord};
use treesweep_metrics::ClassificationScores;

use crate::loader::Assets;
use crate::series::MetricSeries;
use crate::settings::{EvaluationSettings, TreeCounts};
use crate::SweepError;

/// Scores of the classifier trained with one tree count.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Accuracy and macro scores over the aligned labels.
    pub scores: ClassificationScores,
    /// Points dropped during the spatial reduction.
    pub n_dropped: usize,
}

impl Evaluation {
    /// Flatten into the artifact record written by the result writer.
    #[must_use]
    pub fn to_record(&self) -> EvaluationRecord {
        let confusion = self.scores.confusion_matrix();
        EvaluationRecord {
            n_trees: self.n_trees,
            accuracy: self.scores.accuracy(),
            precision: self.scores.precision(),
            recall: self.scores.recall(),
            f1_score: self.scores.f1(),
            n_samples: confusion.total(),
            n_dropped: self.n_dropped,
            classes: confusion.classes().to_vec(),
            confusion_matrix: confusion.as_rows().to_vec(),
            per_class: self
                .scores
                .per_class()
                .iter()
                .map(|m| ClassRecord {
                    class: m.class,
                    precision: m.precision,
                    recall: m.recall,
                    f1: m.f1,
                    support: m.support,
                })
                .collect(),
        }
    }
}

/// Result of a full sweep.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    /// The four metric series, aligned with the tree counts.
    pub series: MetricSeries,
    /// Per-tree-count detail, in sweep order.
    pub evaluations: Vec<Evaluation>,
}

/// Drives the engine through one evaluation per tree count.
///
/// Evaluations run sequentially; the first failure ends the sweep.
pub struct SweepEvaluator<'e, E: Engine + ?Sized> {
    engine: &'e mut E,
    settings: EvaluationSettings,
}

impl<'e, E: Engine + ?Sized> SweepEvaluator<'e, E> {
    pub fn new(engine: &'e mut E, settings: EvaluationSettings) -> Self {
        Self { engine, settings }
    }

    /// Train with `n_trees` trees, classify, reduce and score.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SweepError::Engine`] | Training, classification or reduction fails |
    /// | [`SweepError::Metric`] | The aligned labels are empty or differ in length |
    #[instrument(skip(self, assets))]
    pub fn evaluate(&mut self, assets: &Assets, n_trees: usize) -> Result<Evaluation, SweepError> {
        let settings = &self.settings;
        let predicted = self.engine.train_and_classify(
            &assets.image,
            &assets.points,
            n_trees,
            settings.label(),
            settings.inputs(),
        )?;
        let aligned = self.engine.reduce_to_aligned(
            &predicted,
            &assets.points,
            settings.label(),
            settings.scale(),
        )?;

        let scores = ClassificationScores::from_labels(&aligned.truth, &aligned.predicted)
            .map_err(|source| SweepError::Metric { n_trees, source })?;

        info!(
            n_trees,
            accuracy = scores.accuracy(),
            precision = scores.precision(),
            recall = scores.recall(),
            f1_score = scores.f1(),
            n_samples = aligned.truth.len(),
            n_dropped = aligned.n_dropped,
            "evaluation complete"
        );
        debug!("confusion matrix\n{}", scores.confusion_matrix());

        Ok(Evaluation {
            n_trees,
            scores,
            n_dropped: aligned.n_dropped,
        })
    }

    /// Evaluate every tree count in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`SweepEvaluator::evaluate`].
    #[instrument(skip_all, fields(n_counts = tree_counts.len()))]
    pub fn run(&mut self, assets: &Assets, tree_counts: &TreeCounts) -> Result<SweepOutcome, SweepError> {
        let mut series = MetricSeries::new();
        let mut evaluations = Vec::with_capacity(tree_counts.len());
        for &n_trees in tree_counts.as_slice() {
            let evaluation = self.evaluate(assets, n_trees)?;
            series.push(n_trees, &evaluation.scores);
            evaluations.push(evaluation);
        }
        info!(n_evaluations = evaluations.len(), "sweep complete");
        Ok(SweepOutcome {
            series,
            evaluations,
        })
    }
}
