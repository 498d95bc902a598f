//! Custom error types for FITS processing and cutout extraction

use std::fmt;
use std::io;

/// Error types for FITS I/O, coordinate maps and cutouts
#[derive(Debug)]
pub enum FitsError {
    /// I/O error
    IoError(io::Error),
    /// Requested cutout size has a non-positive dimension
    InvalidSize { height: i64, width: i64 },
    /// Requested cutout center is not a finite pixel position
    InvalidCenter { row: f64, col: f64 },
    /// Requested box does not overlap the raster at all
    OutOfBounds {
        row0: i64,
        col0: i64,
        height: i64,
        width: i64,
        raster_height: usize,
        raster_width: usize,
    },
    /// World position the coordinate map cannot place on the pixel grid
    WorldOutOfBounds { lon: f64, lat: f64 },
    /// Coordinate map is missing required parameters or is singular
    DegenerateMap(String),
    /// Malformed header record or block
    InvalidHeader(String),
    /// Mandatory keyword not found
    MissingKeyword(String),
    /// BITPIX value not handled
    UnsupportedBitpix(i64),
    /// HDU is not a two-dimensional image
    UnsupportedDimensions(String),
    /// Requested HDU index does not exist in the file
    HduNotFound(usize),
    /// Raster buffer does not match its declared shape
    InvalidRaster(String),
    /// Malformed command line value
    InvalidArgument(String),
    /// Generic error with message
    GenericError(String),
}

impl FitsError {
    /// Process exit code used by the command line tool for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            FitsError::InvalidSize { .. }
            | FitsError::InvalidCenter { .. }
            | FitsError::InvalidArgument(_) => 2,
            FitsError::OutOfBounds { .. } | FitsError::WorldOutOfBounds { .. } => 3,
            FitsError::DegenerateMap(_) => 4,
            _ => 1,
        }
    }
}

impl fmt::Display for FitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitsError::IoError(e) => write!(f, "I/O error: {}", e),
            FitsError::InvalidSize { height, width } => {
                write!(f, "Invalid cutout size {}x{}: dimensions must be positive", height, width)
            },
            FitsError::InvalidCenter { row, col } => {
                write!(f, "Invalid cutout center ({}, {}): coordinates must be finite", row, col)
            },
            FitsError::OutOfBounds { row0, col0, height, width, raster_height, raster_width } => write!(
                f,
                "Cutout box rows [{}, {}) x cols [{}, {}) does not overlap the {}x{} image",
                row0, row0.saturating_add(*height), col0, col0.saturating_add(*width), raster_height, raster_width
            ),
            FitsError::WorldOutOfBounds { lon, lat } => write!(
                f,
                "World position ({}, {}) cannot be placed on the pixel grid", lon, lat
            ),
            FitsError::DegenerateMap(msg) => write!(f, "Degenerate coordinate map: {}", msg),
            FitsError::InvalidHeader(msg) => write!(f, "Invalid FITS header: {}", msg),
            FitsError::MissingKeyword(k) => write!(f, "Missing required keyword: {}", k),
            FitsError::UnsupportedBitpix(b) => write!(f, "Unsupported BITPIX: {}", b),
            FitsError::UnsupportedDimensions(msg) => write!(f, "Unsupported image dimensions: {}", msg),
            FitsError::HduNotFound(index) => write!(f, "HDU {} not found in file", index),
            FitsError::InvalidRaster(msg) => write!(f, "Invalid raster: {}", msg),
            FitsError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            FitsError::GenericError(msg) => write!(f, "FITS error: {}", msg),
        }
    }
}

impl std::error::Error for FitsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FitsError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FitsError {
    fn from(error: io::Error) -> Self {
        FitsError::IoError(error)
    }
}

impl From<String> for FitsError {
    fn from(msg: String) -> Self {
        FitsError::GenericError(msg)
    }
}

/// Result type for FITS and cutout operations
pub type FitsResult<T> = Result<T, FitsError>;
