//! I/O error types for treesweep-io.

use std::path::PathBuf;

/// Errors from asset parsing, validation, and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a raster file is not valid JSON for the expected layout.
    #[error("malformed raster JSON in {path}")]
    RasterParse {
        /// Path to the raster file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when the raster geometry is unusable.
    #[error("invalid raster geometry: {reason}")]
    InvalidGeometry {
        /// What is wrong with the geometry.
        reason: String,
    },

    /// Returned when a raster has no bands.
    #[error("raster has no bands")]
    NoBands,

    /// Returned when a band's value count differs from `width * height`.
    #[error("band \"{band}\" has {got} values, expected {expected}")]
    BandLength {
        /// Name of the offending band.
        band: String,
        /// `width * height`.
        expected: usize,
        /// Actual number of values.
        got: usize,
    },

    /// Returned when the same band name appears twice in one raster.
    #[error("duplicate band \"{band}\"")]
    DuplicateBand {
        /// The duplicated band name.
        band: String,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the point CSV header does not start with `x,y`.
    #[error("point file {path} must start with columns x,y, found \"{found}\"")]
    MissingCoordinates {
        /// Path to the CSV file.
        path: PathBuf,
        /// The first two header cells, comma-joined.
        found: String,
    },

    /// Returned when the point CSV has coordinates but no property columns.
    #[error("no property columns in {path} (only x,y found)")]
    NoPropertyColumns {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when the same property name appears twice in the header.
    #[error("duplicate property \"{property}\" in {path}")]
    DuplicateProperty {
        /// Path to the CSV file.
        path: PathBuf,
        /// The duplicated property name.
        property: String,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell value is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {path}: row {row_index}, column \"{column}\", raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Header name of the offending column.
        column: String,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when an asset identifier is empty or has an unusable segment.
    #[error("invalid asset id \"{id}\": segments must match [A-Za-z0-9_.-]+ and may not be . or ..")]
    InvalidAssetId {
        /// The invalid identifier.
        id: String,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
