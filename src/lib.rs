//! foragecast: foraging-probability prediction for tagged marine predators.
//!
//! Fuses point-observation telemetry with environmental raster layers and
//! point-like vector features (mesoscale eddies), trains a bagged-tree
//! binary classifier, and produces a dense spatial probability surface.
//!
//! # Pipeline
//!
//! 1. [`raster::RasterField`] - sample continuous raster fields at
//!    arbitrary coordinates (nearest-cell, out-of-bounds policy documented
//!    there)
//! 2. [`features::ReferenceFeatureSet`] - nearest-feature distances
//! 3. [`features::FeaturePipeline`] - assemble the feature-major
//!    [`data::FeatureTable`]
//! 4. [`model::RandomForest`] - train, evaluate, and probability-score
//! 5. [`surface::predict_surface`] - score a regular grid into a
//!    [`surface::ProbabilitySurface`]
//!
//! # Example
//!
//! ```
//! use foragecast::data::train_test_split;
//! use foragecast::features::FeaturePipeline;
//! use foragecast::model::{ForestConfig, RandomForest};
//! use foragecast::surface::{predict_surface, GridSpec};
//! use foragecast::testing;
//!
//! let pipeline = FeaturePipeline::new(
//!     vec!["sst".into(), "chlorophyll".into()],
//!     testing::fixture_eddies(),
//! )
//! .with_raster("sst", testing::sst_raster())
//! .with_raster("chlorophyll", testing::chlorophyll_raster());
//!
//! let observations = testing::synthetic_observations(60, 42);
//! let table = pipeline.featurize_observations(&observations).unwrap();
//!
//! let (train_idx, test_idx) = train_test_split(table.n_samples(), 0.3, 42);
//! let forest =
//!     RandomForest::train(&table.select(&train_idx), ForestConfig::default()).unwrap();
//! let report = forest.evaluate(&table.select(&test_idx)).unwrap();
//! assert!(report.accuracy > 0.9);
//!
//! let grid = GridSpec::new((-120.0, -60.0), 20, (10.0, 50.0), 20);
//! let surface = predict_surface(&pipeline, &forest, &grid).unwrap();
//! assert_eq!(surface.len(), 400);
//! ```

pub mod data;
pub mod features;
pub mod geo;
pub mod model;
pub mod raster;
pub mod surface;
pub mod testing;
pub mod utils;

mod error;

pub use error::{Error, Result};

// Convenience re-exports for the common pipeline path.
pub use data::{train_test_split, FeatureTable};
pub use features::{FeaturePipeline, Observation, ReferenceFeatureSet};
pub use geo::{AffineTransform, LonLat};
pub use model::{EvaluationReport, ForestConfig, RandomForest};
pub use raster::RasterField;
pub use surface::{predict_surface, GridSpec, ProbabilitySurface};
pub use utils::Parallelism;
