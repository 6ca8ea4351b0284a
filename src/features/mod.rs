//! Feature engineering: observations, covariates, and the feature pipeline.
//!
//! [`FeaturePipeline`] joins observation records with raster-sampled
//! covariates and nearest-reference distances into a [`FeatureTable`]. The
//! same pipeline featurizes arbitrary coordinate sets (e.g. a prediction
//! grid) so that training and inference see identical feature semantics.

mod distance;

pub use distance::ReferenceFeatureSet;

use std::collections::BTreeMap;

use ndarray::{Array1, Array2};

use crate::data::FeatureTable;
use crate::error::{Error, Result};
use crate::geo::LonLat;
use crate::raster::RasterField;
use crate::utils::Parallelism;

/// Name of the nearest-reference distance feature appended to every table.
pub const DISTANCE_FEATURE: &str = "min_distance_to_eddy";

/// A labeled telemetry point record.
///
/// Immutable once constructed. Covariates are free-form named numeric fields
/// as delivered by the tag; the feeding-event field is the raw free-form
/// string the label is derived from.
#[derive(Debug, Clone)]
pub struct Observation {
    coord: LonLat,
    covariates: Vec<(String, f64)>,
    feeding_event: Option<String>,
}

impl Observation {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            coord: LonLat::new(lon, lat),
            covariates: Vec::new(),
            feeding_event: None,
        }
    }

    /// Attach a named numeric covariate.
    pub fn with_covariate(mut self, name: impl Into<String>, value: f64) -> Self {
        self.covariates.push((name.into(), value));
        self
    }

    /// Attach the raw feeding-event indicator string.
    pub fn with_feeding_event(mut self, raw: impl Into<String>) -> Self {
        self.feeding_event = Some(raw.into());
        self
    }

    pub fn coord(&self) -> LonLat {
        self.coord
    }

    /// Look up a covariate by name.
    pub fn covariate(&self, name: &str) -> Option<f64> {
        self.covariates
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }

    /// The raw feeding-event field, if recorded.
    pub fn feeding_event(&self) -> Option<&str> {
        self.feeding_event.as_deref()
    }

    /// Binary label for this observation. See [`derive_label`].
    pub fn label(&self) -> f32 {
        derive_label(self.feeding_event())
    }
}

/// Derive the binary foraging label from the raw feeding-event field.
///
/// An observation is positive exactly when the field's string value contains
/// the case-sensitive token `"YES"`; every other value, including a missing
/// field, maps to negative. This reproduces the upstream data contract
/// verbatim. The rule is known to be fragile (free-form substring matching on
/// tag text), but it is a contract boundary: neither case-insensitivity nor
/// an enumerated value set is authorized by the data producer.
pub fn derive_label(feeding_event: Option<&str>) -> f32 {
    match feeding_event {
        Some(raw) if raw.contains("YES") => 1.0,
        _ => 0.0,
    }
}

/// Joins observations, rasters, and reference features into feature tables.
///
/// Covariate resolution per configured name, in order:
///
/// 1. a raster registered under that name is sampled at the record's
///    coordinate;
/// 2. otherwise the observation's own covariate of that name is used;
/// 3. otherwise featurization fails with [`Error::MissingCovariate`].
///
/// The nearest-reference distance is appended as the final feature, named
/// [`DISTANCE_FEATURE`].
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    covariates: Vec<String>,
    rasters: BTreeMap<String, RasterField>,
    eddies: ReferenceFeatureSet,
    parallelism: Parallelism,
}

impl FeaturePipeline {
    /// Create a pipeline with the configured covariate order and reference set.
    pub fn new(covariates: Vec<String>, eddies: ReferenceFeatureSet) -> Self {
        Self {
            covariates,
            rasters: BTreeMap::new(),
            eddies,
            parallelism: Parallelism::default(),
        }
    }

    /// Register a raster as the source for a covariate name.
    pub fn with_raster(mut self, name: impl Into<String>, raster: RasterField) -> Self {
        self.rasters.insert(name.into(), raster);
        self
    }

    /// Allow or forbid data-parallel featurization. Results are identical
    /// either way.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// The reference feature set shared by all distance computations.
    pub fn eddies(&self) -> &ReferenceFeatureSet {
        &self.eddies
    }

    /// Feature names in table order: configured covariates, then the
    /// distance feature.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.covariates.clone();
        names.push(DISTANCE_FEATURE.to_string());
        names
    }

    /// Featurize labeled observations into a training-ready table.
    ///
    /// Sample ordering matches the input observation ordering exactly
    /// (position-stable join).
    pub fn featurize_observations(&self, observations: &[Observation]) -> Result<FeatureTable> {
        let coords: Vec<LonLat> = observations.iter().map(|o| o.coord()).collect();
        let n_samples = coords.len();
        let n_features = self.covariates.len() + 1;

        let mut features = Array2::<f32>::zeros((n_features, n_samples));
        for (row, name) in self.covariates.iter().enumerate() {
            let column = match self.rasters.get(name) {
                Some(raster) => raster.sample_many(&coords),
                None => observations
                    .iter()
                    .map(|o| {
                        o.covariate(name)
                            .map(|v| v as f32)
                            .ok_or_else(|| Error::MissingCovariate {
                                name: name.clone(),
                                place: "raster set or observation record",
                            })
                    })
                    .collect::<Result<Vec<f32>>>()?,
            };
            features
                .row_mut(row)
                .assign(&Array1::from_vec(column));
        }

        let distances = self
            .eddies
            .nearest_distances(&coords, self.parallelism)?;
        features
            .row_mut(n_features - 1)
            .assign(&Array1::from_iter(distances.iter().map(|&d| d as f32)));

        let labels = Array1::from_iter(observations.iter().map(|o| o.label()));

        log::debug!(
            "featurized {} observations into {} features",
            n_samples,
            n_features
        );
        Ok(FeatureTable::new(
            self.feature_names(),
            features,
            coords,
            Some(labels),
        ))
    }

    /// Featurize bare coordinates (no labels), e.g. a prediction grid.
    ///
    /// Every configured covariate must have a registered raster here, since
    /// bare coordinates carry no covariates of their own.
    pub fn featurize_coords(&self, coords: &[LonLat]) -> Result<FeatureTable> {
        let n_samples = coords.len();
        let n_features = self.covariates.len() + 1;

        let mut features = Array2::<f32>::zeros((n_features, n_samples));
        for (row, name) in self.covariates.iter().enumerate() {
            let raster = self
                .rasters
                .get(name)
                .ok_or_else(|| Error::MissingCovariate {
                    name: name.clone(),
                    place: "raster set",
                })?;
            features
                .row_mut(row)
                .assign(&Array1::from_vec(raster.sample_many(coords)));
        }

        let distances = self.eddies.nearest_distances(coords, self.parallelism)?;
        features
            .row_mut(n_features - 1)
            .assign(&Array1::from_iter(distances.iter().map(|&d| d as f32)));

        log::debug!(
            "featurized {} grid coordinates into {} features",
            n_samples,
            n_features
        );
        Ok(FeatureTable::new(
            self.feature_names(),
            features,
            coords.to_vec(),
            None,
        ))
    }
}
