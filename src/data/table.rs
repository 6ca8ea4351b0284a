//! The assembled feature table.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::geo::LonLat;

/// A uniform table of featurized point records.
///
/// # Storage layout
///
/// Features are stored **feature-major**: `[n_features, n_samples]`. Each
/// feature's values across all samples are contiguous, which is the access
/// pattern tree training wants. Per-sample access is strided.
///
/// Sample ordering is position-stable: row `i` of the table corresponds to
/// the `i`-th input record, always.
///
/// Labels, when present, are `0.0` / `1.0`.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    /// Feature names, one per row of `features`, in configured order.
    names: Vec<String>,
    /// Feature data: `[n_features, n_samples]`.
    features: Array2<f32>,
    /// Source coordinate of each sample.
    coords: Vec<LonLat>,
    /// Binary labels, length = n_samples. `None` for inference-only tables.
    labels: Option<Array1<f32>>,
}

impl FeatureTable {
    /// Create a table from feature-major data.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `names`, `coords`, and `labels` agree with the
    /// feature matrix dimensions.
    pub fn new(
        names: Vec<String>,
        features: Array2<f32>,
        coords: Vec<LonLat>,
        labels: Option<Array1<f32>>,
    ) -> Self {
        debug_assert_eq!(
            names.len(),
            features.nrows(),
            "one name per feature row required"
        );
        debug_assert_eq!(
            coords.len(),
            features.ncols(),
            "one coordinate per sample required"
        );
        if let Some(ref l) = labels {
            debug_assert_eq!(
                l.len(),
                features.ncols(),
                "labels must have same sample count as features"
            );
        }
        Self {
            names,
            features,
            coords,
            labels,
        }
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.ncols()
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.nrows()
    }

    /// Feature names in table order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Source coordinates, one per sample.
    pub fn coords(&self) -> &[LonLat] {
        &self.coords
    }

    /// Whether the table carries labels.
    pub fn has_labels(&self) -> bool {
        self.labels.is_some()
    }

    /// Labels, if present.
    pub fn labels(&self) -> Option<ArrayView1<'_, f32>> {
        self.labels.as_ref().map(|l| l.view())
    }

    /// Full feature matrix, `[n_features, n_samples]`.
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// All samples of one feature (contiguous).
    pub fn feature(&self, idx: usize) -> ArrayView1<'_, f32> {
        self.features.row(idx)
    }

    /// One sample's feature vector, in table feature order (strided view).
    pub fn sample(&self, idx: usize) -> ArrayView1<'_, f32> {
        self.features.column(idx)
    }

    /// Gather a subset of samples, preserving the order of `indices`.
    ///
    /// Used to materialize train/held-out partitions.
    pub fn select(&self, indices: &[usize]) -> FeatureTable {
        let features = self.features.select(Axis(1), indices);
        let coords = indices.iter().map(|&i| self.coords[i]).collect();
        let labels = self
            .labels
            .as_ref()
            .map(|l| l.select(Axis(0), indices));
        FeatureTable {
            names: self.names.clone(),
            features,
            coords,
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_table() -> FeatureTable {
        // 2 features, 4 samples.
        let features = array![[1.0, 2.0, 3.0, 4.0], [10.0, 20.0, 30.0, 40.0]];
        let coords = (0..4).map(|i| LonLat::new(i as f64, -(i as f64))).collect();
        let labels = array![0.0, 1.0, 0.0, 1.0];
        FeatureTable::new(
            vec!["sst".into(), "chlorophyll".into()],
            features,
            coords,
            Some(labels),
        )
    }

    #[test]
    fn dimensions_and_views() {
        let t = sample_table();
        assert_eq!(t.n_samples(), 4);
        assert_eq!(t.n_features(), 2);
        assert_eq!(t.names(), &["sst".to_string(), "chlorophyll".to_string()]);
        assert_eq!(t.feature(0).to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(t.sample(2).to_vec(), vec![3.0, 30.0]);
        assert!(t.has_labels());
    }

    #[test]
    fn select_gathers_in_index_order() {
        let t = sample_table();
        let sub = t.select(&[3, 0]);
        assert_eq!(sub.n_samples(), 2);
        assert_eq!(sub.sample(0).to_vec(), vec![4.0, 40.0]);
        assert_eq!(sub.sample(1).to_vec(), vec![1.0, 10.0]);
        assert_eq!(sub.labels().unwrap().to_vec(), vec![1.0, 0.0]);
        assert_eq!(sub.coords()[0], LonLat::new(3.0, -3.0));
    }

    #[test]
    fn inference_table_has_no_labels() {
        let features = array![[1.0, 2.0]];
        let coords = vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0)];
        let t = FeatureTable::new(vec!["sst".into()], features, coords, None);
        assert!(!t.has_labels());
        assert!(t.labels().is_none());
    }
}
