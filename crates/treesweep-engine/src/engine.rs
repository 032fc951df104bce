//! The engine collaborator: asset handles and the operations the sweep needs.

use std::fmt;

use treesweep_io::AssetId;

use crate::EngineError;

/// Name of the band holding predicted classes on a classified surface.
pub const CLASSIFICATION_BAND: &str = "classification";

/// What an asset is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// A gridded multi-band surface.
    Image,
    /// A set of geolocated samples with properties.
    FeatureCollection,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => f.write_str("image"),
            AssetKind::FeatureCollection => f.write_str("feature collection"),
        }
    }
}

/// Reference to an asset held by an engine session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    id: AssetId,
    kind: AssetKind,
}

impl AssetHandle {
    pub fn new(id: AssetId, kind: AssetKind) -> Self {
        Self { id, kind }
    }

    #[must_use]
    pub fn id(&self) -> &AssetId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Fail with [`EngineError::WrongAssetKind`] unless this handle is `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WrongAssetKind`] on a kind mismatch.
    pub fn expect_kind(&self, expected: AssetKind) -> Result<(), EngineError> {
        if self.kind != expected {
            return Err(EngineError::WrongAssetKind {
                id: self.id.to_string(),
                expected,
                found: self.kind,
            });
        }
        Ok(())
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)
    }
}

/// Predicted and true labels of the same points, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignedLabels {
    /// Class read from the predicted surface at each kept point.
    pub predicted: Vec<i64>,
    /// Label attribute of each kept point.
    pub truth: Vec<i64>,
    /// Points dropped because they fell outside the surface or on masked cells.
    pub n_dropped: usize,
}

/// Service-side operations used by the sweep.
///
/// Implementations own whatever session state they need; every call may
/// fail, and errors are returned unchanged to the caller.
pub trait Engine {
    /// Look up an asset by identifier.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EngineError::InvalidAssetId`] | `id` is not a valid asset id |
    /// | [`EngineError::AssetNotFound`] | No asset with this id exists |
    /// | [`EngineError::Asset`] | The asset exists but cannot be loaded |
    fn resolve(&mut self, id: &str) -> Result<AssetHandle, EngineError>;

    /// Train a Random Forest with `n_trees` trees on `points` and classify
    /// `image` with it, returning a handle to the predicted surface.
    ///
    /// The surface carries one band, [`CLASSIFICATION_BAND`].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EngineError::WrongAssetKind`] / [`EngineError::UnknownHandle`] | Bad handles |
    /// | [`EngineError::MissingProperty`] | `label` or an input is not a point property |
    /// | [`EngineError::MissingBand`] | An input is not an image band |
    /// | [`EngineError::NonIntegerLabel`] | A label value is not an integer |
    /// | [`EngineError::Forest`] | Training failed |
    fn train_and_classify(
        &mut self,
        image: &AssetHandle,
        points: &AssetHandle,
        n_trees: usize,
        label: &str,
        inputs: &[String],
    ) -> Result<AssetHandle, EngineError>;

    /// Sample the predicted surface at every point at resolution `scale`,
    /// pairing each sample with the point's `label`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EngineError::InvalidScale`] | `scale` is not positive and finite |
    /// | [`EngineError::WrongAssetKind`] / [`EngineError::UnknownHandle`] | Bad handles |
    /// | [`EngineError::MissingBand`] | `predicted` has no [`CLASSIFICATION_BAND`] |
    /// | [`EngineError::MissingProperty`] | `label` is not a point property |
    /// | [`EngineError::NonIntegerLabel`] / [`EngineError::NonIntegerClass`] | Non-integer classes |
    fn reduce_to_aligned(
        &mut self,
        predicted: &AssetHandle,
        points: &AssetHandle,
        label: &str,
        scale: f64,
    ) -> Result<AlignedLabels, EngineError>;
}
