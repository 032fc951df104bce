//! Class surfaces and point sampling at a coarser reduction scale.

use std::collections::BTreeMap;

use treesweep_io::{Band, GridGeometry, IoError};

use crate::EngineError;

/// Interpret `value` as an integer class id.
pub(crate) fn as_class(value: f64) -> Option<i64> {
    // Beyond 2^53 an f64 no longer represents every integer.
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    (value.fract() == 0.0 && value.abs() <= LIMIT).then_some(value as i64)
}

/// Per-pixel class ids over a grid; `None` is masked.
#[derive(Debug, Clone)]
pub struct ClassSurface {
    geometry: GridGeometry,
    classes: Vec<Option<i64>>,
}

impl ClassSurface {
    /// Wrap row-major classes already known to match `geometry`.
    pub(crate) fn new(geometry: GridGeometry, classes: Vec<Option<i64>>) -> Self {
        debug_assert_eq!(classes.len(), geometry.n_pixels());
        Self { geometry, classes }
    }

    /// Read `band` as integer classes.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EngineError::Asset`] | `band` does not hold one value per pixel |
    /// | [`EngineError::NonIntegerClass`] | An unmasked value has a fractional part |
    pub fn from_band(image: &str, geometry: GridGeometry, band: &Band) -> Result<Self, EngineError> {
        if band.values().len() != geometry.n_pixels() {
            return Err(EngineError::Asset {
                id: image.to_string(),
                source: IoError::BandLength {
                    band: band.name().to_string(),
                    expected: geometry.n_pixels(),
                    got: band.values().len(),
                },
            });
        }
        let classes = band
            .values()
            .iter()
            .enumerate()
            .map(|(index, value)| match value {
                None => Ok(None),
                Some(v) => as_class(*v).map(Some).ok_or_else(|| EngineError::NonIntegerClass {
                    image: image.to_string(),
                    band: band.name().to_string(),
                    index,
                    value: *v,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { geometry, classes })
    }

    /// Class at `(x, y)` when the surface is reduced to cells of size `scale`.
    ///
    /// At or below the native pixel size the pixel containing the point is
    /// used. Above it, the point is snapped to the `scale` cell (anchored at
    /// the grid origin) containing it, and the cell's class is the mode of
    /// the unmasked pixels whose centers fall inside, ties going to the
    /// smallest class. Returns `None` outside the grid or on an all-masked
    /// cell.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64, scale: f64) -> Option<i64> {
        let g = &self.geometry;
        let (col, row) = g.pixel_at(x, y)?;
        if scale <= g.pixel_size() {
            return self.classes[g.index(col, row)];
        }

        let (origin_x, origin_y) = g.origin();
        let cell_col = ((x - origin_x) / scale).floor();
        let cell_row = ((origin_y - y) / scale).floor();
        let cols = self.covered(cell_col, scale, g.width());
        let rows = self.covered(cell_row, scale, g.height());

        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for r in rows {
            for c in cols.clone() {
                if let Some(class) = self.classes[g.index(c, r)] {
                    *counts.entry(class).or_default() += 1;
                }
            }
        }

        let mut best: Option<(i64, usize)> = None;
        for (class, count) in counts {
            if best.is_none_or(|(_, n)| count > n) {
                best = Some((class, count));
            }
        }
        best.map(|(class, _)| class)
    }

    /// Native pixel indices along one axis whose centers lie in cell `cell`.
    fn covered(&self, cell: f64, scale: f64, len: usize) -> std::ops::Range<usize> {
        let pixel = self.geometry.pixel_size();
        let first = (cell * scale / pixel - 0.5).ceil().max(0.0) as usize;
        let end = ((cell + 1.0) * scale / pixel - 0.5).ceil().max(0.0) as usize;
        first.min(len)..end.min(len)
    }

    /// Number of unmasked pixels.
    #[must_use]
    pub fn n_classified(&self) -> usize {
        self.classes.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 grid of unit pixels with top-left corner at (0, 4).
    fn surface(classes: [Option<i64>; 16]) -> ClassSurface {
        let geometry = GridGeometry::new(0.0, 4.0, 1.0, 4, 4).unwrap();
        let band = Band::new(
            "classification",
            classes.iter().map(|c| c.map(|c| c as f64)).collect(),
        );
        ClassSurface::from_band("img", geometry, &band).unwrap()
    }

    #[test]
    fn native_scale_reads_containing_pixel() {
        let s = surface([
            Some(1), Some(2), Some(3), Some(4),
            Some(5), Some(6), Some(7), Some(8),
            None, Some(1), Some(1), Some(1),
            Some(1), Some(1), Some(1), Some(1),
        ]);
        assert_eq!(s.sample(0.5, 3.5, 1.0), Some(1));
        assert_eq!(s.sample(3.5, 2.5, 0.5), Some(8));
        assert_eq!(s.sample(0.5, 1.5, 1.0), None);
        assert_eq!(s.sample(4.5, 3.5, 1.0), None);
    }

    #[test]
    fn coarse_scale_takes_mode_of_cell() {
        // Top-left 2x2 cell holds 3, 3, 3, 1.
        let s = surface([
            Some(3), Some(3), Some(2), Some(2),
            Some(3), Some(1), Some(2), Some(7),
            Some(1), Some(1), Some(4), Some(4),
            Some(1), Some(5), Some(4), Some(4),
        ]);
        assert_eq!(s.sample(1.5, 2.5, 2.0), Some(3));
        assert_eq!(s.sample(2.5, 3.9, 2.0), Some(2));
        assert_eq!(s.sample(0.1, 0.1, 2.0), Some(1));
        assert_eq!(s.sample(3.9, 0.1, 2.0), Some(4));
    }

    #[test]
    fn coarse_scale_breaks_ties_toward_smaller_class() {
        let s = surface([
            Some(9), Some(2), None, None,
            Some(2), Some(9), None, None,
            None, None, None, None,
            None, None, None, None,
        ]);
        assert_eq!(s.sample(0.5, 3.5, 2.0), Some(2));
        assert_eq!(s.sample(2.5, 3.5, 2.0), None, "all-masked cell");
    }

    #[test]
    fn coarse_cell_clipped_at_grid_edge() {
        // A 3-unit cell anchored at the origin covers columns 3..6, of which
        // only column 3 exists.
        let s = surface([
            Some(1), Some(1), Some(1), Some(6),
            Some(1), Some(1), Some(1), Some(6),
            Some(1), Some(1), Some(1), Some(1),
            Some(1), Some(1), Some(1), Some(1),
        ]);
        assert_eq!(s.sample(3.5, 3.5, 3.0), Some(6));
        assert_eq!(s.sample(0.5, 3.5, 3.0), Some(1));
    }

    #[test]
    fn rejects_fractional_classes() {
        let geometry = GridGeometry::new(0.0, 1.0, 1.0, 1, 1).unwrap();
        let band = Band::new("classification", vec![Some(1.5)]);
        let err = ClassSurface::from_band("img", geometry, &band).unwrap_err();
        assert!(matches!(err, EngineError::NonIntegerClass { index: 0, .. }));
    }

    #[test]
    fn rejects_band_of_wrong_length() {
        let geometry = GridGeometry::new(0.0, 2.0, 1.0, 2, 2).unwrap();
        let band = Band::new("classification", vec![Some(1.0)]);
        let err = ClassSurface::from_band("img", geometry, &band).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Asset { source: IoError::BandLength { expected: 4, got: 1, .. }, .. }
        ));
    }

    #[test]
    fn class_conversion() {
        assert_eq!(as_class(3.0), Some(3));
        assert_eq!(as_class(-2.0), Some(-2));
        assert_eq!(as_class(0.5), None);
        assert_eq!(as_class(f64::NAN), None);
        assert_eq!(as_class(1e300), None);
    }
}
