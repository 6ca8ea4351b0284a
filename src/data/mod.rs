//! Feature tables and partitioning.
//!
//! The assembled feature matrix lives in a [`FeatureTable`]: feature-major
//! `f32` storage with named features, per-sample coordinates, and optional
//! binary labels. [`train_test_split`] produces reproducible train/held-out
//! partitions.

mod split;
mod table;

pub use split::train_test_split;
pub use table::FeatureTable;
