//! Nearest-feature distance engine.
//!
//! For each query coordinate, the minimum planar Euclidean distance to any
//! point of a reference feature set (e.g. mesoscale eddy centers). The
//! semantics are those of a full N×M pairwise distance matrix reduced by row
//! minimum; the implementation folds the minimum per query without
//! materializing the matrix.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::geo::LonLat;
use crate::utils::Parallelism;

/// An ordered, non-empty collection of point-like environmental features.
///
/// Immutable after construction; shared by distance computations for both
/// training and grid inference.
#[derive(Debug, Clone)]
pub struct ReferenceFeatureSet {
    points: Vec<LonLat>,
}

impl ReferenceFeatureSet {
    /// Create a reference set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPointSet`] when `points` is empty: a distance
    /// engine over zero reference points is undefined.
    pub fn new(points: Vec<LonLat>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyPointSet {
                context: "reference features",
            });
        }
        Ok(Self { points })
    }

    /// Number of reference points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; the non-empty invariant is enforced at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The reference coordinates, in insertion order.
    pub fn points(&self) -> &[LonLat] {
        &self.points
    }

    /// Distance from one query point to its nearest reference point.
    #[inline]
    pub fn nearest(&self, query: LonLat) -> f64 {
        // Minimize on squared distance; one sqrt at the end.
        self.points
            .iter()
            .map(|&p| query.dist_sq(p))
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    /// Nearest-reference distance for each query point.
    ///
    /// Deterministic and position-aligned with `queries` in both sequential
    /// and parallel modes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPointSet`] when `queries` is empty.
    pub fn nearest_distances(
        &self,
        queries: &[LonLat],
        parallelism: Parallelism,
    ) -> Result<Vec<f64>> {
        if queries.is_empty() {
            return Err(Error::EmptyPointSet {
                context: "query coordinates",
            });
        }

        let distances = if parallelism.is_parallel() {
            queries.par_iter().map(|&q| self.nearest(q)).collect()
        } else {
            queries.iter().map(|&q| self.nearest(q)).collect()
        };
        Ok(distances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn reference() -> ReferenceFeatureSet {
        ReferenceFeatureSet::new(vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(10.0, 0.0),
            LonLat::new(0.0, 10.0),
        ])
        .unwrap()
    }

    /// Brute-force oracle: full pairwise matrix, row minimum.
    fn brute_force(queries: &[LonLat], refs: &[LonLat]) -> Vec<f64> {
        queries
            .iter()
            .map(|&q| {
                refs.iter()
                    .map(|&r| q.dist(r))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect()
    }

    #[test]
    fn empty_reference_set_is_rejected() {
        let err = ReferenceFeatureSet::new(vec![]).unwrap_err();
        assert_eq!(
            err,
            Error::EmptyPointSet {
                context: "reference features"
            }
        );
    }

    #[test]
    fn empty_query_set_is_rejected() {
        let refs = reference();
        let err = refs
            .nearest_distances(&[], Parallelism::Sequential)
            .unwrap_err();
        assert_eq!(
            err,
            Error::EmptyPointSet {
                context: "query coordinates"
            }
        );
    }

    #[test]
    fn matches_brute_force_reduction() {
        let refs = reference();
        let queries = vec![
            LonLat::new(1.0, 1.0),
            LonLat::new(9.0, 1.0),
            LonLat::new(-2.0, 11.0),
            LonLat::new(5.0, 5.0),
        ];
        let expected = brute_force(&queries, refs.points());
        let got = refs
            .nearest_distances(&queries, Parallelism::Sequential)
            .unwrap();
        assert_eq!(got.len(), queries.len());
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!(*g >= 0.0);
            assert_abs_diff_eq!(g, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn query_on_a_reference_point_has_zero_distance() {
        let refs = reference();
        let d = refs
            .nearest_distances(&[LonLat::new(10.0, 0.0)], Parallelism::Sequential)
            .unwrap();
        assert_abs_diff_eq!(d[0], 0.0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let refs = reference();
        let queries: Vec<LonLat> = (0..64)
            .map(|i| LonLat::new(i as f64 * 0.37 - 5.0, i as f64 * 0.21 - 3.0))
            .collect();
        let seq = refs
            .nearest_distances(&queries, Parallelism::Sequential)
            .unwrap();
        let par = refs
            .nearest_distances(&queries, Parallelism::Parallel)
            .unwrap();
        assert_eq!(seq, par);
    }
}
