//! Bagged random-forest classifier.

use bon::Builder;
use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::data::FeatureTable;
use crate::error::{Error, Result};
use crate::model::metrics::EvaluationReport;
use crate::model::tree::{Tree, TreeGrower};
use crate::utils::Parallelism;

/// How many features each split considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxFeatures {
    /// `ceil(sqrt(n_features))`, the usual bagging default.
    #[default]
    Sqrt,
    /// Every feature at every split (no per-split subsampling).
    All,
    /// An exact count, clamped to `[1, n_features]`.
    Exact(usize),
}

impl MaxFeatures {
    fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Exact(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Training configuration for [`RandomForest`].
///
/// # Example
///
/// ```
/// use foragecast::model::ForestConfig;
///
/// // Defaults: 100 trees, unbounded depth, seed 42.
/// let config = ForestConfig::builder().build();
///
/// let config = ForestConfig::builder()
///     .n_trees(250)
///     .max_depth(12)
///     .seed(7)
///     .build();
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ForestConfig {
    /// Ensemble size. Default: 100.
    #[builder(default = 100)]
    pub n_trees: usize,

    /// Depth limit per tree. `None` grows until pure or leaf-limited.
    pub max_depth: Option<u32>,

    /// Minimum samples per leaf. Default: 1.
    #[builder(default = 1)]
    pub min_samples_leaf: usize,

    /// Per-split feature subsampling. Default: `Sqrt`.
    #[builder(default)]
    pub max_features: MaxFeatures,

    /// Random seed for bootstrap resampling and feature subsampling.
    /// Training is a pure function of (data, config); the seed is always
    /// explicit, never process-global state. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Thread count: 0 = auto, 1 = sequential, >1 = parallel. Default: 0.
    #[builder(default = 0)]
    pub n_threads: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A trained bagged-tree binary classifier.
///
/// Holds the grown trees and the feature schema it was trained on; no raw
/// training data is retained after fitting. Immutable and freely shareable
/// across threads.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<Tree>,
    feature_names: Vec<String>,
    config: ForestConfig,
}

impl RandomForest {
    /// Train an ensemble on a labeled feature table.
    ///
    /// Each tree is grown on a bootstrap resample (drawn with replacement,
    /// same size as the table) with its own RNG stream derived from
    /// `config.seed`, so results are reproducible for a given seed and
    /// independent of thread scheduling.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEnsembleSize`] when `config.n_trees` is zero; an
    ///   empty ensemble has no vote to take a fraction of.
    /// - [`Error::MissingLabels`] when the table carries no labels.
    /// - [`Error::DegenerateClass`] when either class has zero training
    ///   samples; a one-class forest is degenerate.
    pub fn train(table: &FeatureTable, config: ForestConfig) -> Result<Self> {
        if config.n_trees == 0 {
            return Err(Error::InvalidEnsembleSize { n_trees: 0 });
        }
        let labels = table.labels().ok_or(Error::MissingLabels)?;
        let n_samples = table.n_samples();

        let n_pos = labels.iter().filter(|&&l| l == 1.0).count();
        if n_pos == 0 {
            return Err(Error::DegenerateClass { class: 1 });
        }
        if n_pos == n_samples {
            return Err(Error::DegenerateClass { class: 0 });
        }

        let parallelism = Parallelism::from_threads(config.n_threads);
        let grower = TreeGrower {
            features: table.features(),
            labels,
            max_depth: config.max_depth.unwrap_or(u32::MAX),
            min_samples_leaf: config.min_samples_leaf.max(1),
            n_split_features: config.max_features.resolve(table.n_features()),
        };

        let grow_one = |tree_idx: usize| -> Tree {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(tree_seed(config.seed, tree_idx));
            let mut indices: Vec<u32> = (0..n_samples)
                .map(|_| rng.gen_range(0..n_samples) as u32)
                .collect();
            grower.grow(&mut indices, &mut rng)
        };

        let trees: Vec<Tree> = if parallelism.is_parallel() {
            (0..config.n_trees).into_par_iter().map(grow_one).collect()
        } else {
            (0..config.n_trees).map(grow_one).collect()
        };

        log::info!(
            "trained random forest: {} trees, {} features, {}/{} positive samples",
            trees.len(),
            table.n_features(),
            n_pos,
            n_samples
        );

        Ok(Self {
            trees,
            feature_names: table.names().to_vec(),
            config,
        })
    }

    /// Ensemble size.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature schema (names, in order) this forest was trained on.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// The configuration this forest was trained with.
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Probability score for one feature vector: the fraction of trees
    /// voting positive, in `[0, 1]`. Not a hard label; callers binarize.
    #[inline]
    pub fn score_sample(&self, sample: ndarray::ArrayView1<'_, f32>) -> f32 {
        let votes: f32 = self.trees.iter().map(|t| t.vote_for(sample)).sum();
        votes / self.trees.len() as f32
    }

    /// Probability scores for every sample of a table, position-aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FeatureArity`] when the table's feature count does
    /// not match the training schema.
    pub fn predict_proba(&self, table: &FeatureTable) -> Result<Array1<f32>> {
        if table.n_features() != self.feature_names.len() {
            return Err(Error::FeatureArity {
                expected: self.feature_names.len(),
                got: table.n_features(),
            });
        }

        let parallelism = Parallelism::from_threads(self.config.n_threads);
        let scores: Vec<f32> = if parallelism.is_parallel() {
            (0..table.n_samples())
                .into_par_iter()
                .map(|i| self.score_sample(table.sample(i)))
                .collect()
        } else {
            (0..table.n_samples())
                .map(|i| self.score_sample(table.sample(i)))
                .collect()
        };
        Ok(Array1::from_vec(scores))
    }

    /// Hard 0/1 predictions at the 0.5 probability threshold.
    pub fn predict(&self, table: &FeatureTable) -> Result<Array1<f32>> {
        Ok(self
            .predict_proba(table)?
            .mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    /// Evaluate on a labeled (held-out) table: accuracy plus per-class
    /// precision/recall/F1 at threshold 0.5.
    ///
    /// # Errors
    ///
    /// [`Error::MissingLabels`] when the table has no labels, plus the
    /// [`predict_proba`](Self::predict_proba) errors.
    pub fn evaluate(&self, table: &FeatureTable) -> Result<EvaluationReport> {
        let labels = table.labels().ok_or(Error::MissingLabels)?;
        let probabilities = self.predict_proba(table)?;
        Ok(EvaluationReport::from_scores(
            probabilities.view(),
            labels,
            0.5,
        ))
    }
}

/// Deterministic per-tree seed stream.
#[inline]
fn tree_seed(seed: u64, tree_idx: usize) -> u64 {
    seed ^ (tree_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
