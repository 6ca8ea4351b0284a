//! Regular prediction grids and the probability surface.
//!
//! # Grid ordering contract
//!
//! [`GridSpec::points`] is row-major with **latitude ascending in the outer
//! loop and longitude ascending in the inner loop**: the first point is
//! `(lat_min, lon_min)`, the next `lon_steps - 1` points walk east along the
//! southernmost row, and so on northward. [`ProbabilitySurface`] preserves
//! this ordering, and downstream rendering relies on it.

use serde::Serialize;

use crate::data::FeatureTable;
use crate::error::Result;
use crate::features::FeaturePipeline;
use crate::geo::LonLat;
use crate::model::RandomForest;

/// A regular rectangular grid of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub lon_min: f64,
    pub lon_max: f64,
    /// Grid points along the longitude axis.
    pub lon_steps: usize,
    pub lat_min: f64,
    pub lat_max: f64,
    /// Grid points along the latitude axis.
    pub lat_steps: usize,
}

impl GridSpec {
    pub fn new(
        lon_range: (f64, f64),
        lon_steps: usize,
        lat_range: (f64, f64),
        lat_steps: usize,
    ) -> Self {
        Self {
            lon_min: lon_range.0,
            lon_max: lon_range.1,
            lon_steps,
            lat_min: lat_range.0,
            lat_max: lat_range.1,
            lat_steps,
        }
    }

    /// Total number of grid points, `lon_steps * lat_steps`.
    pub fn n_points(&self) -> usize {
        self.lon_steps * self.lat_steps
    }

    /// Materialize the grid coordinates in the documented ordering.
    pub fn points(&self) -> Vec<LonLat> {
        let lons = linspace(self.lon_min, self.lon_max, self.lon_steps);
        let lats = linspace(self.lat_min, self.lat_max, self.lat_steps);
        let mut points = Vec::with_capacity(self.n_points());
        for &lat in &lats {
            for &lon in &lons {
                points.push(LonLat::new(lon, lat));
            }
        }
        points
    }
}

/// Inclusive linear spacing; a single-step axis degenerates to `min`.
fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (steps - 1) as f64;
            (0..steps).map(|i| min + step * i as f64).collect()
        }
    }
}

/// One grid point with its model probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfacePoint {
    pub lat: f64,
    pub lon: f64,
    /// Foraging probability in `[0, 1]`.
    pub probability: f32,
}

/// A dense probability surface over a regular grid.
///
/// One point per grid cell, no gaps, in [`GridSpec::points`] ordering.
/// Consumed by the external visualization collaborator (heat-map rendering).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilitySurface {
    pub points: Vec<SurfacePoint>,
}

impl ProbabilitySurface {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Highest-probability point, if any.
    pub fn hotspot(&self) -> Option<&SurfacePoint> {
        self.points.iter().max_by(|a, b| {
            a.probability
                .partial_cmp(&b.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

/// Featurize a grid and score it with a trained classifier.
///
/// The grid is featurized exactly as observations are (raster sampling plus
/// nearest-reference distance, no labels) and scored per point. Introduces
/// no error kinds of its own; failures come from the composed stages.
pub fn predict_surface(
    pipeline: &FeaturePipeline,
    forest: &RandomForest,
    grid: &GridSpec,
) -> Result<ProbabilitySurface> {
    let coords = grid.points();
    let table: FeatureTable = pipeline.featurize_coords(&coords)?;
    let probabilities = forest.predict_proba(&table)?;

    let points = coords
        .iter()
        .zip(probabilities.iter())
        .map(|(c, &p)| SurfacePoint {
            lat: c.lat,
            lon: c.lon,
            probability: p,
        })
        .collect();

    log::info!(
        "scored probability surface: {}x{} grid",
        grid.lon_steps,
        grid.lat_steps
    );
    Ok(ProbabilitySurface { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linspace_endpoints_are_inclusive() {
        let v = linspace(-80.0, -60.0, 5);
        assert_eq!(v.len(), 5);
        assert_abs_diff_eq!(v[0], -80.0);
        assert_abs_diff_eq!(v[4], -60.0);
        assert_abs_diff_eq!(v[1], -75.0);
    }

    #[test]
    fn linspace_degenerate_axes() {
        assert_eq!(linspace(1.0, 2.0, 0), Vec::<f64>::new());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn grid_has_exactly_w_times_h_points() {
        let grid = GridSpec::new((-80.0, -60.0), 50, (30.0, 45.0), 40);
        assert_eq!(grid.n_points(), 2000);
        assert_eq!(grid.points().len(), 2000);
    }

    #[test]
    fn grid_ordering_is_lat_outer_lon_inner_ascending() {
        let grid = GridSpec::new((0.0, 2.0), 3, (10.0, 11.0), 2);
        let pts = grid.points();
        assert_eq!(pts.len(), 6);
        // Southern row first, walking east.
        assert_eq!(pts[0], LonLat::new(0.0, 10.0));
        assert_eq!(pts[1], LonLat::new(1.0, 10.0));
        assert_eq!(pts[2], LonLat::new(2.0, 10.0));
        // Then the northern row.
        assert_eq!(pts[3], LonLat::new(0.0, 11.0));
        assert_eq!(pts[5], LonLat::new(2.0, 11.0));
    }

    #[test]
    fn hotspot_picks_the_maximum() {
        let surface = ProbabilitySurface {
            points: vec![
                SurfacePoint {
                    lat: 0.0,
                    lon: 0.0,
                    probability: 0.2,
                },
                SurfacePoint {
                    lat: 1.0,
                    lon: 1.0,
                    probability: 0.9,
                },
                SurfacePoint {
                    lat: 2.0,
                    lon: 2.0,
                    probability: 0.5,
                },
            ],
        };
        assert_eq!(surface.hotspot().unwrap().lat, 1.0);
    }

    #[test]
    fn surface_serializes_as_triples() {
        let surface = ProbabilitySurface {
            points: vec![SurfacePoint {
                lat: 37.0,
                lon: -70.0,
                probability: 0.25,
            }],
        };
        let json = serde_json::to_string(&surface).unwrap();
        assert!(json.contains("\"lat\":37.0"));
        assert!(json.contains("\"probability\":0.25"));
    }
}
