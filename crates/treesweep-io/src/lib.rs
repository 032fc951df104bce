//! Asset files, validation, and result serialization for the treesweep pipeline.

mod domain;
mod error;
mod points;
mod raster;
mod writer;

pub use domain::{AssetId, ExperimentName};
pub use error::IoError;
pub use points::{Point, PointCollection, PointReader};
pub use raster::{Band, GridGeometry, Raster, RasterReader};
pub use writer::{ClassRecord, EvaluationRecord, ResultWriter, SweepContext};
