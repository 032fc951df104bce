//! Forest training with parallel tree construction, and majority-vote prediction.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::ForestConfig;
use crate::error::ForestError;
use crate::tree::{DecisionTree, GrowthLimits, majority};

/// A fitted Random Forest.
///
/// Class ids seen at training time are kept sorted in `classes`; trees vote
/// with dense indices into that table.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    classes: Vec<i64>,
    n_variables: usize,
}

impl RandomForest {
    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the number of input variables the forest was trained on.
    #[must_use]
    pub fn n_variables(&self) -> usize {
        self.n_variables
    }

    /// Return the sorted class ids seen during training.
    #[must_use]
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Predict the class id of one sample by majority vote.
    ///
    /// Ties go to the smallest class id.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionLengthMismatch`] when
    /// `sample.len() != n_variables`.
    pub fn predict(&self, sample: &[f64]) -> Result<i64, ForestError> {
        if sample.len() != self.n_variables {
            return Err(ForestError::PredictionLengthMismatch {
                expected: self.n_variables,
                got: sample.len(),
            });
        }
        let mut votes = vec![0usize; self.classes.len()];
        for tree in &self.trees {
            votes[tree.vote(sample)] += 1;
        }
        Ok(self.classes[majority(&votes)])
    }

    /// Predict every sample in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionLengthMismatch`] for the first
    /// sample with the wrong length.
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<i64>, ForestError> {
        samples.par_iter().map(|s| self.predict(s)).collect()
    }
}

/// Draw `draw_count` sample indices with replacement.
fn bag(n_samples: usize, draw_count: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..draw_count).map(|_| rng.gen_range(0..n_samples)).collect()
}

fn validate_samples(samples: &[Vec<f64>], labels: &[i64]) -> Result<usize, ForestError> {
    let Some(first) = samples.first() else {
        return Err(ForestError::EmptyTrainingSet);
    };
    if labels.len() != samples.len() {
        return Err(ForestError::LabelCountMismatch {
            n_samples: samples.len(),
            n_labels: labels.len(),
        });
    }
    let n_variables = first.len();
    if n_variables == 0 {
        return Err(ForestError::NoInputVariables);
    }
    for (sample_index, row) in samples.iter().enumerate() {
        if row.len() != n_variables {
            return Err(ForestError::RowLengthMismatch {
                expected: n_variables,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(variable_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(ForestError::NonFiniteValue {
                sample_index,
                variable_index,
            });
        }
    }
    Ok(n_variables)
}

/// Train the forest described by `config`.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = samples.len()))]
pub(crate) fn train(
    config: &ForestConfig,
    samples: &[Vec<f64>],
    labels: &[i64],
) -> Result<RandomForest, ForestError> {
    let n_variables = validate_samples(samples, labels)?;
    let variables_per_split = config.resolve_variables_per_split(n_variables)?;

    if !(config.bag_fraction > 0.0 && config.bag_fraction <= 1.0) {
        return Err(ForestError::InvalidBagFraction {
            fraction: config.bag_fraction,
        });
    }
    if config.min_leaf_population == 0 {
        return Err(ForestError::InvalidMinLeafPopulation {
            min_leaf_population: 0,
        });
    }
    if let Some(max_nodes) = config.max_nodes
        && max_nodes < 2
    {
        return Err(ForestError::InvalidMaxNodes { max_nodes });
    }

    // Dense class indices over the sorted distinct ids.
    let mut classes = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();
    let dense: Vec<usize> = labels
        .iter()
        .map(|l| classes.binary_search(l).unwrap_or_default())
        .collect();

    let n_samples = samples.len();
    let draw_count = ((n_samples as f64) * config.bag_fraction).ceil().max(1.0) as usize;
    let columns: Vec<Vec<f64>> = (0..n_variables)
        .map(|v| samples.iter().map(|row| row[v]).collect())
        .collect();
    let limits = GrowthLimits {
        variables_per_split,
        min_leaf_population: config.min_leaf_population,
        max_nodes: config.max_nodes,
    };

    info!(
        n_samples,
        n_variables,
        n_classes = classes.len(),
        variables_per_split,
        draw_count,
        "training random forest"
    );

    let mut master = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master.r#gen()).collect();

    let trees: Vec<DecisionTree> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let indices = bag(n_samples, draw_count, &mut rng);
            DecisionTree::grow(&columns, &dense, indices, classes.len(), limits, &mut rng)
        })
        .collect();

    debug!(
        n_trees = trees.len(),
        mean_leaves = trees.iter().map(DecisionTree::n_leaves).sum::<usize>() as f64 / trees.len() as f64,
        "random forest trained"
    );

    Ok(RandomForest {
        trees,
        classes,
        n_variables,
    })
}
