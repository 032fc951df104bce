//! Labelled ground-truth points and their CSV reader.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;

/// A geolocated sample with numeric properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Map x coordinate.
    pub x: f64,
    /// Map y coordinate.
    pub y: f64,
    /// Property values, index-aligned with [`PointCollection::properties`].
    pub values: Vec<f64>,
}

/// A feature collection of points sharing one property schema.
#[derive(Debug, Clone)]
pub struct PointCollection {
    properties: Vec<String>,
    points: Vec<Point>,
}

impl PointCollection {
    /// Property names in column order.
    #[must_use]
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Column index of a property.
    #[must_use]
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p == name)
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn validate(path: &Path, properties: &[String]) -> Result<(), IoError> {
    let mut seen = HashSet::new();
    for property in properties {
        if !seen.insert(property.as_str()) {
            return Err(IoError::DuplicateProperty {
                path: path.to_path_buf(),
                property: property.clone(),
            });
        }
    }
    Ok(())
}

/// Reads a point feature collection from a CSV file.
///
/// Expected CSV format:
/// - Header row required: `x,y,property1,...,propertyN`
/// - One row per point, all rows with the same number of columns
/// - Every cell a finite number (labels included)
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingCoordinates`] | Header does not start with `x,y` |
/// | [`IoError::NoPropertyColumns`] | Only `x,y` columns |
/// | [`IoError::DuplicateProperty`] | Property name repeated in header |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
pub struct PointReader {
    path: PathBuf,
}

impl PointReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`PointCollection`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<PointCollection, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that our own InconsistentRowLength check fires
        // instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;
        let columns: Vec<String> = header.iter().map(String::from).collect();
        debug!(expected_cols = columns.len(), "read CSV header");

        if columns.len() < 2 || columns[0] != "x" || columns[1] != "y" {
            return Err(IoError::MissingCoordinates {
                path: self.path.clone(),
                found: columns.iter().take(2).cloned().collect::<Vec<_>>().join(","),
            });
        }
        if columns.len() == 2 {
            return Err(IoError::NoPropertyColumns {
                path: self.path.clone(),
            });
        }
        let properties = columns[2..].to_vec();
        validate(&self.path, &properties)?;

        let mut points = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            if record.len() != columns.len() {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: columns.len(),
                    got: record.len(),
                });
            }

            let mut cells = Vec::with_capacity(columns.len());
            for (raw, column) in record.iter().zip(&columns) {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        column: column.clone(),
                        raw: raw.to_string(),
                    })?;
                cells.push(value);
            }

            let values = cells.split_off(2);
            points.push(Point {
                x: cells[0],
                y: cells[1],
                values,
            });
        }

        if points.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_points = points.len(),
            n_properties = properties.len(),
            "points loaded"
        );

        Ok(PointCollection { properties, points })
    }
}
