//! Random Forest tree-count sweep: load assets, evaluate the classifier at
//! each tree count, and report the metric curves.

mod error;
mod evaluator;
mod loader;
mod pipeline;
mod report;
mod series;
mod settings;

pub use error::SweepError;
pub use evaluator::{Evaluation, SweepEvaluator, SweepOutcome};
pub use loader::{Assets, load_assets};
pub use pipeline::{AssetIds, run_sweep};
pub use report::{ChartReporter, Reporter};
pub use series::MetricSeries;
pub use settings::{DEFAULT_SCALE, DEFAULT_TREE_COUNTS, EvaluationSettings, TreeCounts};
