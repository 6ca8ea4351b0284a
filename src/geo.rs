//! Geographic primitives: coordinates and affine pixel transforms.

use crate::error::{Error, Result};

/// A geographic coordinate in degrees: `(longitude, latitude)`.
///
/// Distances over `LonLat` are planar Euclidean on the raw degree values.
/// This is a stated approximation valid for the coordinate system and
/// datasets this crate is built for; no geodesic correction is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Squared planar Euclidean distance to another coordinate.
    #[inline]
    pub fn dist_sq(&self, other: LonLat) -> f64 {
        let dx = self.lon - other.lon;
        let dy = self.lat - other.lat;
        dx * dx + dy * dy
    }

    /// Planar Euclidean distance to another coordinate.
    #[inline]
    pub fn dist(&self, other: LonLat) -> f64 {
        self.dist_sq(other).sqrt()
    }
}

impl From<(f64, f64)> for LonLat {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// Six-coefficient affine transform between pixel space and coordinate space.
///
/// Uses the GDAL/rasterio coefficient order `(a, b, c, d, e, f)`:
///
/// ```text
/// lon = a * col + b * row + c
/// lat = d * col + e * row + f
/// ```
///
/// The inverse mapping (`coordinate -> fractional (row, col)`) is
/// precomputed at construction; a transform with a zero determinant is
/// rejected, so every constructed transform is invertible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
    /// Determinant of the 2x2 linear part, cached for inversion.
    det: f64,
}

impl AffineTransform {
    /// Create a transform from its six coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SingularTransform`] when `a * e - b * d == 0`.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<Self> {
        let det = a * e - b * d;
        if det == 0.0 {
            return Err(Error::SingularTransform { determinant: det });
        }
        Ok(Self {
            a,
            b,
            c,
            d,
            e,
            f,
            det,
        })
    }

    /// Axis-aligned transform covering a bounding box with a pixel grid.
    ///
    /// Mirrors `rasterio.transform.from_bounds`: row 0 is the *northern* edge
    /// and latitude decreases with increasing row.
    pub fn from_bounds(
        west: f64,
        south: f64,
        east: f64,
        north: f64,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        let xres = (east - west) / width as f64;
        let yres = (south - north) / height as f64;
        Self::new(xres, 0.0, west, 0.0, yres, north)
    }

    /// Map a pixel position (fractional column/row) to a coordinate.
    #[inline]
    pub fn forward(&self, col: f64, row: f64) -> LonLat {
        LonLat {
            lon: self.a * col + self.b * row + self.c,
            lat: self.d * col + self.e * row + self.f,
        }
    }

    /// Map a coordinate to a fractional `(row, col)` pixel position.
    #[inline]
    pub fn inverse(&self, coord: LonLat) -> (f64, f64) {
        let x = coord.lon - self.c;
        let y = coord.lat - self.f;
        let col = (self.e * x - self.b * y) / self.det;
        let row = (self.a * y - self.d * x) / self.det;
        (row, col)
    }
}
