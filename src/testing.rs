//! Synthetic fixtures for tests, benchmarks, and the demo binary.
//!
//! The raster fixtures mirror the upstream synthetic inputs this system was
//! validated against: a 100x100 grid over lon -120..-60 / lat 10..50 with a
//! high-chlorophyll block at rows 70-79 x cols 20-29 and a south-to-north SST
//! gradient. Observation fixtures place half the records near eddy centers
//! (positive feeding events) and half far away, so the labels are learnable
//! from the engineered features for any seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::features::{Observation, ReferenceFeatureSet};
use crate::geo::{AffineTransform, LonLat};
use crate::raster::RasterField;

/// Fixture raster extent and resolution.
pub const WIDTH: usize = 100;
pub const HEIGHT: usize = 100;
pub const NODATA: f32 = -9999.0;
pub const CRS: &str = "EPSG:4326";

/// Value of the high-chlorophyll block at rows 70-79 x cols 20-29.
pub const CHLOROPHYLL_BLOCK_VALUE: f32 = 3.5;

/// The fixture affine transform: 100x100 over lon -120..-60, lat 10..50.
pub fn fixture_transform() -> AffineTransform {
    AffineTransform::from_bounds(-120.0, 10.0, -60.0, 50.0, WIDTH, HEIGHT)
        .expect("fixture bounds are non-degenerate")
}

/// Chlorophyll raster: zero background with one high block.
pub fn chlorophyll_raster() -> RasterField {
    let mut values = vec![0.0f32; WIDTH * HEIGHT];
    for row in 70..80 {
        for col in 20..30 {
            values[row * WIDTH + col] = CHLOROPHYLL_BLOCK_VALUE;
        }
    }
    RasterField::from_vec(values, HEIGHT, WIDTH, fixture_transform(), NODATA, CRS)
        .expect("fixture raster shape is consistent")
}

/// Sea-surface temperature raster: warmer toward the southern rows,
/// `10 + 0.2 * row`.
pub fn sst_raster() -> RasterField {
    let values: Vec<f32> = (0..HEIGHT)
        .flat_map(|row| std::iter::repeat(10.0 + row as f32 * 0.2).take(WIDTH))
        .collect();
    RasterField::from_vec(values, HEIGHT, WIDTH, fixture_transform(), NODATA, CRS)
        .expect("fixture raster shape is consistent")
}

/// Fixed eddy centers, all in the western half of the fixture extent so the
/// eastern band stays eddy-free for negative observations.
pub fn fixture_eddies() -> ReferenceFeatureSet {
    ReferenceFeatureSet::new(vec![
        LonLat::new(-112.0, 18.0),
        LonLat::new(-108.0, 30.0),
        LonLat::new(-103.0, 42.0),
        LonLat::new(-98.0, 24.0),
        LonLat::new(-96.0, 36.0),
    ])
    .expect("fixture eddy set is non-empty")
}

/// Generate `n` labeled telemetry observations.
///
/// Even-indexed observations are jittered around a random eddy center and
/// tagged `"YES - prey capture"`; odd-indexed observations land in the
/// eddy-free eastern band and are tagged `"no activity"`. Covariates are the
/// fixture rasters sampled at the point plus small sensor noise, so the
/// tag-reported values and the satellite layers agree.
pub fn synthetic_observations(n: usize, seed: u64) -> Vec<Observation> {
    let mut rng = StdRng::seed_from_u64(seed);
    let eddies = fixture_eddies();
    let sst = sst_raster();
    let chlorophyll = chlorophyll_raster();

    (0..n)
        .map(|i| {
            let (coord, event) = if i % 2 == 0 {
                let center = eddies.points()[rng.gen_range(0..eddies.len())];
                let coord = LonLat::new(
                    center.lon + rng.gen_range(-1.5..1.5),
                    center.lat + rng.gen_range(-1.5..1.5),
                );
                (coord, "YES - prey capture")
            } else {
                let coord = LonLat::new(rng.gen_range(-70.0..-62.0), rng.gen_range(12.0..48.0));
                (coord, "no activity")
            };

            let noise = rng.gen_range(-0.2..0.2);
            Observation::new(coord.lon, coord.lat)
                .with_covariate("sst", sst.sample(coord) as f64 + noise)
                .with_covariate("chlorophyll", chlorophyll.sample(coord) as f64)
                .with_feeding_event(event)
        })
        .collect()
}
