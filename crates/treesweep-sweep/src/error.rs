//! Error types for treesweep-sweep.

use std::path::PathBuf;

use treesweep_engine::{AssetKind, EngineError};
use treesweep_metrics::MetricError;

/// Errors from sweep configuration, evaluation, and reporting.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// Returned when the label attribute name is empty.
    #[error("label attribute must not be empty")]
    EmptyLabel,

    /// Returned when no input attributes are given.
    #[error("at least one input attribute is required")]
    NoInputs,

    /// Returned when an input attribute name is empty.
    #[error("input attribute {index} is empty")]
    EmptyInput {
        /// Position in the input list.
        index: usize,
    },

    /// Returned when an input attribute is listed twice.
    #[error("input attribute \"{input}\" is listed more than once")]
    DuplicateInput {
        /// The repeated attribute.
        input: String,
    },

    /// Returned when the label attribute is also used as an input.
    #[error("label attribute \"{label}\" cannot also be an input")]
    LabelAmongInputs {
        /// The label attribute.
        label: String,
    },

    /// Returned when the reduction scale is not a positive finite number.
    #[error("invalid scale {scale}: must be positive and finite")]
    InvalidScale {
        /// The rejected scale.
        scale: f64,
    },

    /// Returned when the sweep has no tree counts.
    #[error("tree counts must not be empty")]
    EmptyTreeCounts,

    /// Returned when a tree count is zero.
    #[error("tree count at position {index} is zero")]
    ZeroTreeCount {
        /// Position in the sweep.
        index: usize,
    },

    /// Returned when tree counts are not strictly increasing.
    #[error("tree counts must be strictly increasing: {previous} is followed by {value}")]
    UnorderedTreeCounts {
        /// The earlier count.
        previous: usize,
        /// The count that does not exceed it.
        value: usize,
    },

    /// Returned when an asset resolves to the wrong kind.
    #[error("asset \"{id}\" is of kind {found}, expected {expected}")]
    UnexpectedAssetKind {
        /// The asset id.
        id: String,
        /// Kind the sweep needs.
        expected: AssetKind,
        /// Kind the engine reported.
        found: AssetKind,
    },

    /// Returned when an engine call fails.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Returned when scoring one tree count fails.
    #[error("cannot score the {n_trees}-tree classifier")]
    Metric {
        /// The tree count being evaluated.
        n_trees: usize,
        /// Underlying metric error.
        source: MetricError,
    },

    /// Returned when the report cannot be rendered.
    #[error("cannot render report to {path}")]
    Report {
        /// Output path.
        path: PathBuf,
        /// Underlying drawing error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
