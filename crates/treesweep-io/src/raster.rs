//! North-up multi-band rasters and their JSON reader.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::IoError;

/// Placement of a north-up pixel grid in map coordinates.
///
/// `origin_x`/`origin_y` is the top-left corner; rows grow southward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    origin_x: f64,
    origin_y: f64,
    pixel_size: f64,
    width: usize,
    height: usize,
    n_pixels: usize,
}

impl GridGeometry {
    /// Create a validated grid geometry.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidGeometry`] if the origin is not finite, the
    /// pixel size is not a positive finite number, either dimension is zero,
    /// or the pixel count overflows `usize`.
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        pixel_size: f64,
        width: usize,
        height: usize,
    ) -> Result<Self, IoError> {
        let invalid = |reason: String| Err(IoError::InvalidGeometry { reason });
        if !origin_x.is_finite() || !origin_y.is_finite() {
            return invalid(format!("origin ({origin_x}, {origin_y}) is not finite"));
        }
        if !(pixel_size.is_finite() && pixel_size > 0.0) {
            return invalid(format!("pixel size {pixel_size} must be positive and finite"));
        }
        let n_pixels = match width.checked_mul(height) {
            Some(0) => return invalid(format!("dimensions {width}x{height} must be non-zero")),
            Some(n) => n,
            None => return invalid(format!("dimensions {width}x{height} overflow the pixel count")),
        };
        Ok(Self {
            origin_x,
            origin_y,
            pixel_size,
            width,
            height,
            n_pixels,
        })
    }

    /// Column and row of the pixel containing `(x, y)`, if inside the grid.
    ///
    /// Pixels are half-open: the left and top edges belong to the pixel.
    #[must_use]
    pub fn pixel_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = ((x - self.origin_x) / self.pixel_size).floor();
        let row = ((self.origin_y - y) / self.pixel_size).floor();
        if col < 0.0 || row < 0.0 || !col.is_finite() || !row.is_finite() {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.width && row < self.height).then_some((col, row))
    }

    /// Map coordinates of the center of pixel `(col, row)`.
    #[must_use]
    pub fn pixel_center(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.pixel_size,
            self.origin_y - (row as f64 + 0.5) * self.pixel_size,
        )
    }

    /// Row-major index of pixel `(col, row)`.
    #[must_use]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    #[must_use]
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    #[must_use]
    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels.
    #[must_use]
    pub fn n_pixels(&self) -> usize {
        self.n_pixels
    }
}

/// One named band; `None` marks a masked pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    name: String,
    values: Vec<Option<f64>>,
}

impl Band {
    /// Create a band from row-major values.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Row-major pixel values.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Value at a row-major index, `None` if masked or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

/// A gridded multi-band surface.
#[derive(Debug, Clone)]
pub struct Raster {
    geometry: GridGeometry,
    bands: Vec<Band>,
}

impl Raster {
    /// Assemble a raster, checking every band against the grid.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::NoBands`] | `bands` is empty |
    /// | [`IoError::BandLength`] | A band does not hold `width * height` values |
    /// | [`IoError::DuplicateBand`] | Two bands share a name |
    pub fn new(geometry: GridGeometry, bands: Vec<Band>) -> Result<Self, IoError> {
        if bands.is_empty() {
            return Err(IoError::NoBands);
        }
        let mut seen = HashSet::new();
        for band in &bands {
            if band.values.len() != geometry.n_pixels() {
                return Err(IoError::BandLength {
                    band: band.name.clone(),
                    expected: geometry.n_pixels(),
                    got: band.values.len(),
                });
            }
            if !seen.insert(band.name.as_str()) {
                return Err(IoError::DuplicateBand {
                    band: band.name.clone(),
                });
            }
        }
        Ok(Self { geometry, bands })
    }

    #[must_use]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Look up a band by name.
    #[must_use]
    pub fn band(&self, name: &str) -> Option<&Band> {
        self.bands.iter().find(|b| b.name == name)
    }

    #[must_use]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Band names in file order.
    pub fn band_names(&self) -> impl Iterator<Item = &str> {
        self.bands.iter().map(|b| b.name.as_str())
    }
}

#[derive(Deserialize)]
struct RasterFile {
    origin_x: f64,
    origin_y: f64,
    pixel_size: f64,
    width: usize,
    height: usize,
    #[serde(default)]
    nodata: Option<f64>,
    bands: Vec<BandFile>,
}

#[derive(Deserialize)]
struct BandFile {
    name: String,
    values: Vec<Option<f64>>,
}

/// Reads a raster exported as JSON.
///
/// Expected layout:
/// `{"origin_x", "origin_y", "pixel_size", "width", "height", "nodata"?, "bands": [{"name", "values"}]}`
/// with `values` row-major. `null` entries and entries equal to `nodata` are
/// masked.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::RasterParse`] | Not valid JSON for the layout above |
/// | [`IoError::InvalidGeometry`] | Non-finite origin, bad pixel size, zero or oversized dimensions |
/// | [`IoError::NoBands`] | Empty `bands` array |
/// | [`IoError::BandLength`] | Band length differs from `width * height` |
/// | [`IoError::DuplicateBand`] | Band name repeated |
pub struct RasterReader {
    path: PathBuf,
}

impl RasterReader {
    /// Create a new reader for the given JSON file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the raster.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Raster, IoError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let file: RasterFile =
            serde_json::from_str(&content).map_err(|e| IoError::RasterParse {
                path: self.path.clone(),
                source: e,
            })?;

        let geometry = GridGeometry::new(
            file.origin_x,
            file.origin_y,
            file.pixel_size,
            file.width,
            file.height,
        )?;
        let nodata = file.nodata;
        debug!(width = file.width, height = file.height, ?nodata, "read raster header");

        let bands = file
            .bands
            .into_iter()
            .map(|b| {
                let values = b
                    .values
                    .into_iter()
                    .map(|v| v.filter(|v| nodata != Some(*v)))
                    .collect();
                Band::new(b.name, values)
            })
            .collect();
        let raster = Raster::new(geometry, bands)?;

        info!(
            width = geometry.width(),
            height = geometry.height(),
            n_bands = raster.bands().len(),
            "raster loaded"
        );
        Ok(raster)
    }
}
