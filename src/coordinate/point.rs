//! Pixel and world positions

use std::fmt;
use std::ops::{Add, Sub};

/// A position on the pixel grid, zero-based, in array order
///
/// Integer values are pixel centers. `row` indexes the slow (second FITS)
/// axis, `col` the fast (first FITS) axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPosition {
    /// Row coordinate (FITS y - 1)
    pub row: f64,
    /// Column coordinate (FITS x - 1)
    pub col: f64,
}

impl PixelPosition {
    /// Create a new pixel position
    pub fn new(row: f64, col: f64) -> Self {
        PixelPosition { row, col }
    }

    /// Check that both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.row.is_finite() && self.col.is_finite()
    }

    /// Round to the nearest pixel center, ties to even
    pub fn round_ties_even(&self) -> (i64, i64) {
        (self.row.round_ties_even() as i64, self.col.round_ties_even() as i64)
    }
}

impl Add for PixelPosition {
    type Output = PixelPosition;

    fn add(self, other: PixelPosition) -> PixelPosition {
        PixelPosition::new(self.row + other.row, self.col + other.col)
    }
}

impl Sub for PixelPosition {
    type Output = PixelPosition;

    fn sub(self, other: PixelPosition) -> PixelPosition {
        PixelPosition::new(self.row - other.row, self.col - other.col)
    }
}

impl From<(f64, f64)> for PixelPosition {
    fn from((row, col): (f64, f64)) -> Self {
        PixelPosition::new(row, col)
    }
}

impl fmt::Display for PixelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

/// A point in world coordinates, in degrees for celestial systems
///
/// `lon` is the first world axis (e.g. RA), `lat` the second (e.g. Dec).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub lon: f64,
    pub lat: f64,
}

impl WorldPoint {
    /// Create a new world point
    pub fn new(lon: f64, lat: f64) -> Self {
        WorldPoint { lon, lat }
    }

    /// Angular separation to another point in degrees
    ///
    /// Only meaningful for celestial coordinates.
    pub fn separation(&self, other: &WorldPoint) -> f64 {
        let (lon1, lat1) = (self.lon.to_radians(), self.lat.to_radians());
        let (lon2, lat2) = (other.lon.to_radians(), other.lat.to_radians());
        let dlon = lon2 - lon1;
        let y = ((lat2.cos() * dlon.sin()).powi(2)
            + (lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos()).powi(2))
            .sqrt();
        let x = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlon.cos();
        y.atan2(x).to_degrees()
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.8}, {:.8})", self.lon, self.lat)
    }
}
