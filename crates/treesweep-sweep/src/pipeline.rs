//! The full sweep: load, evaluate every tree count, report once.

use tracing::instrument;
use treesweep_engine::Engine;

use crate::evaluator::{SweepEvaluator, SweepOutcome};
use crate::loader::load_assets;
use crate::report::Reporter;
use crate::settings::{EvaluationSettings, TreeCounts};
use crate::SweepError;

/// Identifiers of the two assets a sweep runs on.
#[derive(Debug, Clone, Copy)]
pub struct AssetIds<'a> {
    /// The raster to classify.
    pub image: &'a str,
    /// The labelled ground-truth points.
    pub points: &'a str,
}

/// Run a complete sweep and hand the series to `reporter`.
///
/// Nothing is rendered if any evaluation fails.
///
/// # Errors
///
/// Returns the first error from [`load_assets`], [`SweepEvaluator::run`] or
/// [`Reporter::render`].
#[instrument(skip_all, fields(image = ids.image, points = ids.points))]
pub fn run_sweep<E, R>(
    engine: &mut E,
    reporter: &mut R,
    ids: AssetIds<'_>,
    settings: EvaluationSettings,
    tree_counts: &TreeCounts,
) -> Result<SweepOutcome, SweepError>
where
    E: Engine + ?Sized,
    R: Reporter + ?Sized,
{
    let assets = load_assets(engine, ids.image, ids.points)?;
    let outcome = SweepEvaluator::new(engine, settings).run(&assets, tree_counts)?;
    reporter.render(&outcome.series)?;
    Ok(outcome)
}
