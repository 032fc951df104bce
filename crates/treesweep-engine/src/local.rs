//! Engine backend over assets exported to a local directory.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use treesweep_forest::ForestConfig;
use treesweep_io::{AssetId, PointCollection, PointReader, Raster, RasterReader};
use tracing::{debug, info, instrument, warn};

use crate::engine::{AlignedLabels, AssetHandle, AssetKind, CLASSIFICATION_BAND, Engine};
use crate::surface::{ClassSurface, as_class};
use crate::EngineError;

/// Usage counters reported when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionUsage {
    /// Assets read from the root.
    pub assets_loaded: usize,
    /// Classified surfaces produced.
    pub surfaces_derived: usize,
    /// Reductions performed.
    pub reductions: usize,
}

/// An engine session rooted at a directory of exported assets.
///
/// Asset `a/b/c` is the image `<root>/a/b/c.json` or the feature collection
/// `<root>/a/b/c.csv`. Loaded assets are cached for the session. Classified
/// surfaces live only in memory, and only the most recent one is kept: a new
/// `train_and_classify` invalidates the previous predicted handle.
pub struct LocalEngine {
    root: PathBuf,
    seed: u64,
    images: HashMap<AssetId, Raster>,
    tables: HashMap<AssetId, PointCollection>,
    surface: Option<(AssetId, ClassSurface)>,
    usage: SessionUsage,
}

impl LocalEngine {
    /// Open a session over `root`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRoot`] if `root` is not a directory.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn initialize(root: &Path) -> Result<Self, EngineError> {
        if !root.is_dir() {
            return Err(EngineError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }
        info!("engine session started");
        Ok(Self {
            root: root.to_path_buf(),
            seed: 0,
            images: HashMap::new(),
            tables: HashMap::new(),
            surface: None,
            usage: SessionUsage::default(),
        })
    }

    /// Set the seed used for every forest trained in this session (default 0).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// End the session, dropping cached and derived assets.
    #[instrument(skip_all)]
    pub fn shutdown(self) -> SessionUsage {
        info!(
            assets_loaded = self.usage.assets_loaded,
            surfaces_derived = self.usage.surfaces_derived,
            reductions = self.usage.reductions,
            "engine session closed"
        );
        self.usage
    }

    fn image(&self, handle: &AssetHandle) -> Result<&Raster, EngineError> {
        handle.expect_kind(AssetKind::Image)?;
        self.images
            .get(handle.id())
            .ok_or_else(|| EngineError::UnknownHandle {
                id: handle.id().to_string(),
            })
    }

    /// Classes of `handle`: the derived surface it names, or the
    /// classification band of a loaded image.
    fn class_surface(&self, handle: &AssetHandle) -> Result<Cow<'_, ClassSurface>, EngineError> {
        handle.expect_kind(AssetKind::Image)?;
        if let Some((id, surface)) = &self.surface
            && id == handle.id()
        {
            return Ok(Cow::Borrowed(surface));
        }
        let raster = self.image(handle)?;
        let band = raster
            .band(CLASSIFICATION_BAND)
            .ok_or_else(|| EngineError::MissingBand {
                image: handle.id().to_string(),
                band: CLASSIFICATION_BAND.to_string(),
            })?;
        let surface = ClassSurface::from_band(handle.id().as_str(), *raster.geometry(), band)?;
        Ok(Cow::Owned(surface))
    }

    fn table(&self, handle: &AssetHandle) -> Result<&PointCollection, EngineError> {
        handle.expect_kind(AssetKind::FeatureCollection)?;
        self.tables
            .get(handle.id())
            .ok_or_else(|| EngineError::UnknownHandle {
                id: handle.id().to_string(),
            })
    }

    fn asset_path(&self, id: &AssetId, extension: &str) -> PathBuf {
        self.root.join(format!("{id}.{extension}"))
    }
}

/// Column of `property` in `table`.
fn property_index(
    handle: &AssetHandle,
    table: &PointCollection,
    property: &str,
) -> Result<usize, EngineError> {
    table
        .property_index(property)
        .ok_or_else(|| EngineError::MissingProperty {
            points: handle.id().to_string(),
            property: property.to_string(),
        })
}

/// Integer label of every point.
fn labels(
    handle: &AssetHandle,
    table: &PointCollection,
    label: &str,
) -> Result<Vec<i64>, EngineError> {
    let column = property_index(handle, table, label)?;
    table
        .points()
        .iter()
        .enumerate()
        .map(|(point_index, p)| {
            let value = p.values[column];
            as_class(value).ok_or_else(|| EngineError::NonIntegerLabel {
                points: handle.id().to_string(),
                label: label.to_string(),
                point_index,
                value,
            })
        })
        .collect()
}

impl Engine for LocalEngine {
    #[instrument(skip(self))]
    fn resolve(&mut self, id: &str) -> Result<AssetHandle, EngineError> {
        let id = AssetId::new(id).map_err(EngineError::InvalidAssetId)?;
        let derived = self.surface.as_ref().is_some_and(|(current, _)| *current == id);
        if derived || self.images.contains_key(&id) {
            return Ok(AssetHandle::new(id, AssetKind::Image));
        }
        if self.tables.contains_key(&id) {
            return Ok(AssetHandle::new(id, AssetKind::FeatureCollection));
        }

        let image_path = self.asset_path(&id, "json");
        let table_path = self.asset_path(&id, "csv");
        let kind = match (image_path.is_file(), table_path.is_file()) {
            (true, also_table) => {
                if also_table {
                    warn!(%id, "both image and table exist, resolving as image");
                }
                let raster = RasterReader::new(&image_path)
                    .read()
                    .map_err(|source| EngineError::Asset {
                        id: id.to_string(),
                        source,
                    })?;
                self.images.insert(id.clone(), raster);
                AssetKind::Image
            }
            (false, true) => {
                let table = PointReader::new(&table_path)
                    .read()
                    .map_err(|source| EngineError::Asset {
                        id: id.to_string(),
                        source,
                    })?;
                self.tables.insert(id.clone(), table);
                AssetKind::FeatureCollection
            }
            (false, false) => {
                return Err(EngineError::AssetNotFound {
                    id: id.to_string(),
                    root: self.root.clone(),
                });
            }
        };

        self.usage.assets_loaded += 1;
        info!(%id, %kind, "asset resolved");
        Ok(AssetHandle::new(id, kind))
    }

    #[instrument(skip_all, fields(image = %image.id(), points = %points.id(), n_trees = n_trees))]
    fn train_and_classify(
        &mut self,
        image: &AssetHandle,
        points: &AssetHandle,
        n_trees: usize,
        label: &str,
        inputs: &[String],
    ) -> Result<AssetHandle, EngineError> {
        let raster = self.image(image)?;
        let table = self.table(points)?;

        let columns = inputs
            .iter()
            .map(|name| property_index(points, table, name))
            .collect::<Result<Vec<_>, _>>()?;
        let bands = inputs
            .iter()
            .map(|name| {
                raster.band(name).ok_or_else(|| EngineError::MissingBand {
                    image: image.id().to_string(),
                    band: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let truth = labels(points, table, label)?;
        let samples: Vec<Vec<f64>> = table
            .points()
            .iter()
            .map(|p| columns.iter().map(|&c| p.values[c]).collect())
            .collect();

        let forest = ForestConfig::new(n_trees)?
            .with_seed(self.seed)
            .fit(&samples, &truth)?;
        debug!(n_samples = samples.len(), classes = ?forest.classes(), "forest trained");

        // Pixels with any masked input stay masked.
        let geometry = *raster.geometry();
        let mut pixels = Vec::new();
        let mut features = Vec::new();
        for index in 0..geometry.n_pixels() {
            let row: Option<Vec<f64>> = bands.iter().map(|b| b.get(index)).collect();
            if let Some(row) = row {
                pixels.push(index);
                features.push(row);
            }
        }
        let predicted = forest.predict_batch(&features)?;

        let mut classes = vec![None; geometry.n_pixels()];
        for (&index, &class) in pixels.iter().zip(&predicted) {
            classes[index] = Some(class);
        }
        let surface = ClassSurface::new(geometry, classes);

        self.usage.surfaces_derived += 1;
        let id = image
            .id()
            .child(&format!(
                "classified_{n_trees}t_{}",
                self.usage.surfaces_derived
            ))
            .map_err(EngineError::InvalidAssetId)?;
        info!(
            %id,
            n_trees,
            n_classified = pixels.len(),
            n_masked = geometry.n_pixels() - pixels.len(),
            "image classified"
        );
        if let Some((previous, _)) = self.surface.replace((id.clone(), surface)) {
            debug!(%previous, "released previous classified surface");
        }
        Ok(AssetHandle::new(id, AssetKind::Image))
    }

    #[instrument(skip_all, fields(predicted = %predicted.id(), points = %points.id(), scale = scale))]
    fn reduce_to_aligned(
        &mut self,
        predicted: &AssetHandle,
        points: &AssetHandle,
        label: &str,
        scale: f64,
    ) -> Result<AlignedLabels, EngineError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(EngineError::InvalidScale { scale });
        }
        let surface = self.class_surface(predicted)?;
        let table = self.table(points)?;
        let truth = labels(points, table, label)?;
        debug!(n_classified = surface.n_classified(), n_points = truth.len(), "sampling surface");

        let mut aligned = AlignedLabels::default();
        for (point, &class) in table.points().iter().zip(&truth) {
            match surface.sample(point.x, point.y, scale) {
                Some(prediction) => {
                    aligned.predicted.push(prediction);
                    aligned.truth.push(class);
                }
                None => aligned.n_dropped += 1,
            }
        }

        if aligned.n_dropped > 0 {
            warn!(
                n_dropped = aligned.n_dropped,
                n_points = table.len(),
                "points outside the surface or on masked cells were dropped"
            );
        }
        debug!(n_aligned = aligned.truth.len(), "reduction complete");
        self.usage.reductions += 1;
        Ok(aligned)
    }
}
