//! The binary classifier: a bagged decision-tree ensemble.
//!
//! - [`tree`]: SoA decision-tree storage and CART growth
//! - [`RandomForest`] / [`ForestConfig`]: the trained ensemble with
//!   train / evaluate / probability-score operations
//! - [`EvaluationReport`]: accuracy plus per-class precision/recall/F1

mod forest;
mod metrics;
pub mod tree;

pub use forest::{ForestConfig, MaxFeatures, RandomForest};
pub use metrics::{ClassMetrics, EvaluationReport};
