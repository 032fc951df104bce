//! Classification metrics: confusion matrix, accuracy, and macro-averaged
//! precision, recall and F1 with zero-division counted as zero.

mod confusion;
mod error;
mod scores;

pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use error::MetricError;
pub use scores::{ClassificationScores, Metric};
