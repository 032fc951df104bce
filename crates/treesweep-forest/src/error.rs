/// Errors from local Random Forest training and prediction.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when bag_fraction is not in (0.0, 1.0].
    #[error("bag_fraction must be in (0.0, 1.0], got {fraction}")]
    InvalidBagFraction {
        /// The invalid bag_fraction value provided.
        fraction: f64,
    },

    /// Returned when variables_per_split resolves to 0 or exceeds the input count.
    #[error("variables_per_split resolved to {variables_per_split}, but must be in [1, {n_variables}]")]
    InvalidVariablesPerSplit {
        /// The resolved variables_per_split value.
        variables_per_split: usize,
        /// The number of input variables in the training set.
        n_variables: usize,
    },

    /// Returned when min_leaf_population is zero.
    #[error("min_leaf_population must be at least 1, got {min_leaf_population}")]
    InvalidMinLeafPopulation {
        /// The invalid min_leaf_population value provided.
        min_leaf_population: usize,
    },

    /// Returned when max_nodes is below 2.
    #[error("max_nodes must be at least 2, got {max_nodes}")]
    InvalidMaxNodes {
        /// The invalid max_nodes value provided.
        max_nodes: usize,
    },

    /// Returned when the training set has zero samples.
    #[error("training set has zero samples")]
    EmptyTrainingSet,

    /// Returned when the training samples have zero input variables.
    #[error("training samples have zero input variables")]
    NoInputVariables,

    /// Returned when the number of labels differs from the number of samples.
    #[error("{n_labels} labels supplied for {n_samples} samples")]
    LabelCountMismatch {
        /// Number of training samples.
        n_samples: usize,
        /// Number of labels.
        n_labels: usize,
    },

    /// Returned when a sample has a different number of values than the first one.
    #[error("sample {sample_index} has {got} values, expected {expected}")]
    RowLengthMismatch {
        /// The expected number of values.
        expected: usize,
        /// The actual number of values in the sample.
        got: usize,
        /// The zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when a training value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, variable {variable_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The zero-based index of the offending variable.
        variable_index: usize,
    },

    /// Returned when a prediction input has the wrong number of values.
    #[error("prediction input has {got} values, expected {expected}")]
    PredictionLengthMismatch {
        /// The expected number of values.
        expected: usize,
        /// The actual number of values supplied.
        got: usize,
    },
}
