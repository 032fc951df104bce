/// Errors from classification metric computation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MetricError {
    /// Returned when both label sequences are empty.
    #[error("cannot score an empty label sequence")]
    EmptyLabels,

    /// Returned when ground truth and predictions differ in length.
    ///
    /// The sequences are never truncated to a common length: a mismatch
    /// means the two are not aligned sample by sample.
    #[error("ground truth has {truth} labels but predictions have {predicted}")]
    LengthMismatch {
        /// Number of ground-truth labels.
        truth: usize,
        /// Number of predicted labels.
        predicted: usize,
    },
}
