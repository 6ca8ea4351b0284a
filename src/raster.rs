//! Raster fields and coordinate sampling.
//!
//! A [`RasterField`] is a rectangular grid of `f32` samples plus the affine
//! transform that places it in coordinate space. Sampling is nearest-cell:
//! the inverse transform yields a fractional `(row, col)` which is floored to
//! the containing cell. No interpolation is performed.
//!
//! # Out-of-bounds policy
//!
//! Coordinates that land outside the grid sample as exactly `0.0`, **not**
//! the raster's no-data sentinel. Most raster libraries propagate no-data
//! here; this crate intentionally does not. Do not "fix" this into a
//! sentinel without revisiting every downstream consumer: the classifier and
//! the probability surface both rely on out-of-range cells contributing a
//! zero covariate rather than a large-magnitude sentinel.

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::geo::{AffineTransform, LonLat};

/// Default value returned for coordinates outside the raster extent.
pub const OUT_OF_BOUNDS_VALUE: f32 = 0.0;

/// An immutable 2D raster with georeferencing.
///
/// Loaded once per pipeline run and shared read-only thereafter.
#[derive(Debug, Clone)]
pub struct RasterField {
    /// Cell values, `[height, width]` (row-major, row 0 northernmost).
    values: Array2<f32>,
    transform: AffineTransform,
    /// Reserved value marking cells with no valid measurement.
    nodata: f32,
    /// Coordinate reference system tag. Carried through, never validated.
    crs: String,
}

impl RasterField {
    /// Create a raster from a row-major sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RasterShape`] when `values.len() != height * width`.
    pub fn from_vec(
        values: Vec<f32>,
        height: usize,
        width: usize,
        transform: AffineTransform,
        nodata: f32,
        crs: impl Into<String>,
    ) -> Result<Self> {
        let len = values.len();
        let values = Array2::from_shape_vec((height, width), values).map_err(|_| {
            Error::RasterShape {
                rows: height,
                cols: width,
                len,
            }
        })?;
        Ok(Self {
            values,
            transform,
            nodata,
            crs: crs.into(),
        })
    }

    /// Create a raster directly from an `Array2` (shape is inherent).
    pub fn from_array(
        values: Array2<f32>,
        transform: AffineTransform,
        nodata: f32,
        crs: impl Into<String>,
    ) -> Self {
        Self {
            values,
            transform,
            nodata,
            crs: crs.into(),
        }
    }

    /// Grid height (number of rows).
    #[inline]
    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    /// Grid width (number of columns).
    #[inline]
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    /// The affine transform placing this raster in coordinate space.
    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    /// The no-data sentinel declared for this raster.
    ///
    /// Note that out-of-bounds sampling does *not* return this value; see the
    /// module docs.
    pub fn nodata(&self) -> f32 {
        self.nodata
    }

    /// The CRS tag this raster was declared with.
    pub fn crs(&self) -> &str {
        &self.crs
    }

    /// Raw cell access.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[[row, col]]
    }

    /// Sample the raster at a single coordinate.
    ///
    /// Returns [`OUT_OF_BOUNDS_VALUE`] for coordinates outside the extent.
    #[inline]
    pub fn sample(&self, coord: LonLat) -> f32 {
        let (row, col) = self.transform.inverse(coord);
        let (row, col) = (row.floor(), col.floor());
        if row < 0.0
            || col < 0.0
            || row >= self.height() as f64
            || col >= self.width() as f64
        {
            return OUT_OF_BOUNDS_VALUE;
        }
        self.values[[row as usize, col as usize]]
    }

    /// Sample the raster at each coordinate.
    ///
    /// The result is always full length and position-aligned with `coords`;
    /// out-of-bounds coordinates contribute [`OUT_OF_BOUNDS_VALUE`]. Pure
    /// function of `(coords, self)`.
    pub fn sample_many(&self, coords: &[LonLat]) -> Vec<f32> {
        coords.iter().map(|&c| self.sample(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_raster() -> RasterField {
        // 4x5 raster over lon 0..5, lat 0..4; cell value = row * 10 + col.
        let transform = AffineTransform::from_bounds(0.0, 0.0, 5.0, 4.0, 5, 4).unwrap();
        let values: Vec<f32> = (0..4)
            .flat_map(|r| (0..5).map(move |c| (r * 10 + c) as f32))
            .collect();
        RasterField::from_vec(values, 4, 5, transform, -9999.0, "EPSG:4326").unwrap()
    }

    #[test]
    fn shape_mismatch_rejected() {
        let transform = AffineTransform::from_bounds(0.0, 0.0, 5.0, 4.0, 5, 4).unwrap();
        let err = RasterField::from_vec(vec![0.0; 7], 4, 5, transform, -9999.0, "EPSG:4326")
            .unwrap_err();
        assert_eq!(
            err,
            Error::RasterShape {
                rows: 4,
                cols: 5,
                len: 7
            }
        );
    }

    #[test]
    fn in_bounds_sampling_hits_the_containing_cell() {
        let raster = gradient_raster();
        // Row 0 is the northern edge (lat just below 4.0), col 0 is lon just
        // above 0.0.
        assert_eq!(raster.sample(LonLat::new(0.5, 3.5)), 0.0);
        assert_eq!(raster.sample(LonLat::new(1.5, 3.5)), 1.0);
        assert_eq!(raster.sample(LonLat::new(0.5, 2.5)), 10.0);
        // South-east corner cell.
        assert_eq!(raster.sample(LonLat::new(4.5, 0.5)), 34.0);
    }

    #[test]
    fn out_of_bounds_samples_zero_not_nodata() {
        let raster = gradient_raster();
        for coord in [
            LonLat::new(-1.0, 2.0),
            LonLat::new(6.0, 2.0),
            LonLat::new(2.0, -0.5),
            LonLat::new(2.0, 4.5),
        ] {
            assert_eq!(raster.sample(coord), OUT_OF_BOUNDS_VALUE);
        }
    }

    #[test]
    fn sample_many_is_full_length_and_aligned() {
        let raster = gradient_raster();
        let coords = vec![
            LonLat::new(0.5, 3.5),  // in bounds -> 0.0 (cell value)
            LonLat::new(-10.0, 0.0), // out of bounds -> 0.0 (policy)
            LonLat::new(1.5, 3.5),  // in bounds -> 1.0
        ];
        let values = raster.sample_many(&coords);
        assert_eq!(values, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn nodata_is_carried_but_not_used_for_oob() {
        let raster = gradient_raster();
        assert_eq!(raster.nodata(), -9999.0);
        assert_eq!(raster.crs(), "EPSG:4326");
        assert_ne!(raster.sample(LonLat::new(-1.0, -1.0)), raster.nodata());
    }
}
