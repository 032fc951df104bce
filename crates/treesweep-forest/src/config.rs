//! Configuration builder for local Random Forest training.

use crate::error::ForestError;
use crate::forest::RandomForest;

/// Configuration for Random Forest training.
///
/// Construct via [`ForestConfig::new`], then chain `with_*` methods. The
/// parameters and defaults follow the hosted `smileRandomForest` classifier
/// so that a local run behaves like a remote one.
///
/// # Defaults
///
/// | Parameter             | Default                      |
/// |-----------------------|------------------------------|
/// | `variables_per_split` | `None` (ceil of sqrt inputs) |
/// | `min_leaf_population` | 1                            |
/// | `bag_fraction`        | 0.5                          |
/// | `max_nodes`           | `None` (unlimited)           |
/// | `seed`                | 0                            |
#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) variables_per_split: Option<usize>,
    pub(crate) min_leaf_population: usize,
    pub(crate) bag_fraction: f64,
    pub(crate) max_nodes: Option<usize>,
    pub(crate) seed: u64,
}

impl ForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, ForestError> {
        if n_trees == 0 {
            return Err(ForestError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            variables_per_split: None,
            min_leaf_population: 1,
            bag_fraction: 0.5,
            max_nodes: None,
            seed: 0,
        })
    }

    /// Set the number of variables tried at each split. `None` means sqrt.
    #[must_use]
    pub fn with_variables_per_split(mut self, variables_per_split: Option<usize>) -> Self {
        self.variables_per_split = variables_per_split;
        self
    }

    /// Set the minimum number of training samples in each leaf.
    #[must_use]
    pub fn with_min_leaf_population(mut self, min_leaf_population: usize) -> Self {
        self.min_leaf_population = min_leaf_population;
        self
    }

    /// Set the fraction of the training set drawn for each tree.
    #[must_use]
    pub fn with_bag_fraction(mut self, bag_fraction: f64) -> Self {
        self.bag_fraction = bag_fraction;
        self
    }

    /// Set the maximum number of leaves per tree. `None` means unlimited.
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: Option<usize>) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the configured variables per split, if set.
    #[must_use]
    pub fn variables_per_split(&self) -> Option<usize> {
        self.variables_per_split
    }

    /// Return the minimum leaf population.
    #[must_use]
    pub fn min_leaf_population(&self) -> usize {
        self.min_leaf_population
    }

    /// Return the bag fraction.
    #[must_use]
    pub fn bag_fraction(&self) -> f64 {
        self.bag_fraction
    }

    /// Return the leaf limit, if any.
    #[must_use]
    pub fn max_nodes(&self) -> Option<usize> {
        self.max_nodes
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Resolve `variables_per_split` against the number of input variables.
    pub(crate) fn resolve_variables_per_split(&self, n_variables: usize) -> Result<usize, ForestError> {
        let resolved = self
            .variables_per_split
            .unwrap_or_else(|| (n_variables as f64).sqrt().ceil() as usize);
        if resolved == 0 || resolved > n_variables {
            return Err(ForestError::InvalidVariablesPerSplit {
                variables_per_split: resolved,
                n_variables,
            });
        }
        Ok(resolved)
    }

    /// Train a forest on the provided samples.
    ///
    /// `samples[sample_idx][variable_idx]` is row-major. `labels[sample_idx]`
    /// is the class id of each sample; class ids need not be contiguous.
    ///
    /// # Errors
    ///
    /// | Variant                                    | When                                          |
    /// |--------------------------------------------|-----------------------------------------------|
    /// | [`ForestError::EmptyTrainingSet`]          | `samples` is empty                            |
    /// | [`ForestError::LabelCountMismatch`]        | `labels.len() != samples.len()`               |
    /// | [`ForestError::NoInputVariables`]          | samples have zero values                      |
    /// | [`ForestError::RowLengthMismatch`]         | samples have inconsistent lengths             |
    /// | [`ForestError::NonFiniteValue`]            | any value is NaN or infinite                  |
    /// | [`ForestError::InvalidVariablesPerSplit`]  | resolved value outside [1, n_variables]       |
    /// | [`ForestError::InvalidBagFraction`]        | bag_fraction not in (0.0, 1.0]                |
    /// | [`ForestError::InvalidMinLeafPopulation`]  | min_leaf_population is zero                   |
    /// | [`ForestError::InvalidMaxNodes`]           | max_nodes is `Some(n)` with n < 2             |
    pub fn fit(&self, samples: &[Vec<f64>], labels: &[i64]) -> Result<RandomForest, ForestError> {
        crate::forest::train(self, samples, labels)
    }
}
