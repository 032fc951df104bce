//! Asset loading: resolve the raster and the ground-truth points.

use tracing::{info, instrument};
use treesweep_engine::{AssetHandle, AssetKind, Engine};

use crate::SweepError;

/// The two assets a sweep works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    /// The raster to classify.
    pub image: AssetHandle,
    /// Labelled ground-truth points.
    pub points: AssetHandle,
}

/// Resolve `image_id` and `points_id` through `engine`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SweepError::Engine`] | Either id cannot be resolved |
/// | [`SweepError::UnexpectedAssetKind`] | `image_id` is not an image, or `points_id` not a feature collection |
#[instrument(skip(engine))]
pub fn load_assets<E: Engine + ?Sized>(
    engine: &mut E,
    image_id: &str,
    points_id: &str,
) -> Result<Assets, SweepError> {
    let image = engine.resolve(image_id)?;
    check_kind(&image, AssetKind::Image)?;
    let points = engine.resolve(points_id)?;
    check_kind(&points, AssetKind::FeatureCollection)?;

    info!(image = %image.id(), points = %points.id(), "assets loaded");
    Ok(Assets { image, points })
}

fn check_kind(handle: &AssetHandle, expected: AssetKind) -> Result<(), SweepError> {
    if handle.kind() != expected {
        return Err(SweepError::UnexpectedAssetKind {
            id: handle.id().to_string(),
            expected,
            found: handle.kind(),
        });
    }
    Ok(())
}
