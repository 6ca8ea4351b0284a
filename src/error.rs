//! Crate-wide error type.
//!
//! Every pipeline stage validates its own preconditions and fails fast with a
//! specific variant rather than producing silently wrong downstream results.
//! The surface generator introduces no variants of its own; it inherits
//! failures from the stages it composes.
//!
//! Out-of-bounds raster reads are deliberately *not* an error: they resolve
//! to a default sample of `0.0` (see [`crate::raster::RasterField`]).

use thiserror::Error;

/// Errors produced by the feature-engineering and inference pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required point set (query or reference) is empty.
    #[error("{context}: point set is empty, at least one point is required")]
    EmptyPointSet {
        /// Which point set was empty (e.g. "reference features", "query coordinates").
        context: &'static str,
    },

    /// The affine transform cannot be inverted.
    #[error("affine transform is not invertible (determinant = {determinant})")]
    SingularTransform { determinant: f64 },

    /// Raster dimensions do not match the supplied sample buffer.
    #[error("raster declared {rows}x{cols} cells but {len} samples were supplied")]
    RasterShape {
        rows: usize,
        cols: usize,
        len: usize,
    },

    /// A configured covariate was found neither in the raster set nor on the record.
    #[error("covariate `{name}` not found in {place}")]
    MissingCovariate {
        name: String,
        /// Where the covariate was looked for.
        place: &'static str,
    },

    /// A table that must carry labels does not.
    #[error("feature table has no labels")]
    MissingLabels,

    /// A feature table does not match the schema the model was trained on.
    #[error("model was trained on {expected} features but the table has {got}")]
    FeatureArity { expected: usize, got: usize },

    /// One of the two label classes has no samples in the training partition.
    #[error("class {class} has no samples in the training partition")]
    DegenerateClass { class: u8 },

    /// The training configuration requests an empty ensemble.
    #[error("ensemble size must be at least 1, got {n_trees}")]
    InvalidEnsembleSize { n_trees: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
