//! Error types for treesweep-engine.

use std::path::PathBuf;

use treesweep_forest::ForestError;
use treesweep_io::IoError;

use crate::engine::AssetKind;

/// Errors raised by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Returned when the asset root is missing or not a directory.
    #[error("asset root {path} is not a directory")]
    InvalidRoot {
        /// The configured root.
        path: PathBuf,
    },

    /// Returned when an identifier is not a valid asset id.
    #[error(transparent)]
    InvalidAssetId(IoError),

    /// Returned when no asset with this id exists under the root.
    #[error("asset \"{id}\" not found under {root}")]
    AssetNotFound {
        /// The requested id.
        id: String,
        /// The asset root that was searched.
        root: PathBuf,
    },

    /// Returned when an asset exists but cannot be loaded.
    #[error("cannot load asset \"{id}\"")]
    Asset {
        /// The asset id.
        id: String,
        /// Underlying read or validation error.
        source: IoError,
    },

    /// Returned when a handle was not issued by this engine session.
    #[error("unknown asset handle \"{id}\"")]
    UnknownHandle {
        /// The handle's id.
        id: String,
    },

    /// Returned when an operation receives a handle of the wrong kind.
    #[error("asset \"{id}\" is of kind {found}, expected {expected}")]
    WrongAssetKind {
        /// The handle's id.
        id: String,
        /// Kind the operation needs.
        expected: AssetKind,
        /// Kind of the handle.
        found: AssetKind,
    },

    /// Returned when an image lacks a required band.
    #[error("image \"{image}\" has no band \"{band}\"")]
    MissingBand {
        /// The image id.
        image: String,
        /// The missing band name.
        band: String,
    },

    /// Returned when a feature collection lacks a required property.
    #[error("feature collection \"{points}\" has no property \"{property}\"")]
    MissingProperty {
        /// The feature collection id.
        points: String,
        /// The missing property name.
        property: String,
    },

    /// Returned when a label value is not an integer class id.
    #[error("label \"{label}\" of point {point_index} in \"{points}\" is {value}, expected an integer class")]
    NonIntegerLabel {
        /// The feature collection id.
        points: String,
        /// The label property.
        label: String,
        /// Zero-based point index.
        point_index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a classified surface holds a non-integer class value.
    #[error("band \"{band}\" of \"{image}\" holds {value} at pixel {index}, expected an integer class")]
    NonIntegerClass {
        /// The image id.
        image: String,
        /// The band read as classes.
        band: String,
        /// Row-major pixel index.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when the reduction scale is not a positive finite number.
    #[error("invalid scale {scale}: must be positive and finite")]
    InvalidScale {
        /// The rejected scale.
        scale: f64,
    },

    /// Returned when classifier training fails.
    #[error("classifier training failed")]
    Forest(#[from] ForestError),
}
