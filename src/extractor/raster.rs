//! In-memory 2D rasters
//!
//! [`Raster`] is a row-major array of any copyable sample. [`ImageData`]
//! tags a raster with its FITS sample type so that a cutout keeps the exact
//! stored values of the source.

use std::io::{self, Write};

use crate::extractor::region::Region;
use crate::fits::errors::{FitsError, FitsResult};
use crate::io::Sample;

/// Data that can be cut into a rectangular sub-block
pub trait Croppable: Sized {
    /// Shape as (height, width)
    fn shape(&self) -> (usize, usize);

    /// Copy a region lying entirely inside the data into a new value
    fn crop(&self, region: &Region) -> FitsResult<Self>;
}

/// Row-major 2D array addressed by `(row, col)`
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T: Copy> {
    height: usize,
    width: usize,
    data: Vec<T>,
}

impl<T: Copy> Raster<T> {
    /// Create a raster from a row-major buffer
    ///
    /// # Arguments
    /// * `height` - Number of rows, at least 1
    /// * `width` - Number of columns, at least 1
    /// * `data` - Samples in row-major order, `height * width` of them
    pub fn new(height: usize, width: usize, data: Vec<T>) -> FitsResult<Self> {
        if height == 0 || width == 0 {
            return Err(FitsError::InvalidRaster(format!("empty raster {}x{}", height, width)));
        }
        if height.checked_mul(width) != Some(data.len()) {
            return Err(FitsError::InvalidRaster(format!(
                "buffer holds {} samples, expected {}x{}",
                data.len(), height, width)));
        }
        Ok(Raster { height, width, data })
    }

    /// Create a raster by evaluating `f(row, col)` for every pixel
    pub fn from_fn(height: usize, width: usize, mut f: impl FnMut(usize, usize) -> T) -> FitsResult<Self> {
        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Raster::new(height, width, data)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Sample at `(row, col)`, `None` outside the raster
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// One row of samples
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.data[start..start + self.width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.width)
    }

    /// Rows as nested vectors, mainly for comparisons
    pub fn to_nested(&self) -> Vec<Vec<T>> {
        self.rows().map(<[T]>::to_vec).collect()
    }
}

impl<T: Copy> Croppable for Raster<T> {
    fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    fn crop(&self, region: &Region) -> FitsResult<Self> {
        let inside = region.clip_to(self.height, self.width);
        if inside != Some(*region) {
            return Err(FitsError::InvalidRaster(format!(
                "crop {} is not inside the {}x{} raster", region, self.height, self.width)));
        }

        let (row0, col0) = (region.row as usize, region.col as usize);
        let (height, width) = (region.height as usize, region.width as usize);

        let mut data = Vec::with_capacity(height * width);
        for row in row0..row0 + height {
            let start = row * self.width + col0;
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Raster::new(height, width, data)
    }
}

impl<T: Sample> Raster<T> {
    /// Write all samples big-endian, row by row
    pub fn write_be<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for &value in &self.data {
            value.write_be(writer)?;
        }
        Ok(())
    }

    /// Minimum and maximum of the finite samples
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data.iter()
            .map(|v| v.to_f64())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Raster tagged with its FITS sample type
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    U8(Raster<u8>),
    I16(Raster<i16>),
    I32(Raster<i32>),
    I64(Raster<i64>),
    F32(Raster<f32>),
    F64(Raster<f64>),
}

macro_rules! dispatch {
    ($value:expr, $raster:ident => $body:expr) => {
        match $value {
            ImageData::U8($raster) => $body,
            ImageData::I16($raster) => $body,
            ImageData::I32($raster) => $body,
            ImageData::I64($raster) => $body,
            ImageData::F32($raster) => $body,
            ImageData::F64($raster) => $body,
        }
    };
}

macro_rules! image_data_from {
    ($ty:ty, $variant:ident) => {
        impl From<Raster<$ty>> for ImageData {
            fn from(raster: Raster<$ty>) -> Self {
                ImageData::$variant(raster)
            }
        }
    };
}

image_data_from!(u8, U8);
image_data_from!(i16, I16);
image_data_from!(i32, I32);
image_data_from!(i64, I64);
image_data_from!(f32, F32);
image_data_from!(f64, F64);

impl ImageData {
    /// FITS BITPIX code of the samples
    pub fn bitpix(&self) -> i64 {
        fn bitpix_of<T: Sample>(_: &Raster<T>) -> i64 {
            T::BITPIX
        }
        dispatch!(self, r => bitpix_of(r))
    }

    /// NumPy descriptor of the big-endian samples
    pub fn npy_descr(&self) -> &'static str {
        fn descr_of<T: Sample>(_: &Raster<T>) -> &'static str {
            T::NPY_DESCR
        }
        dispatch!(self, r => descr_of(r))
    }

    pub fn height(&self) -> usize {
        dispatch!(self, r => r.height())
    }

    pub fn width(&self) -> usize {
        dispatch!(self, r => r.width())
    }

    /// Sample at `(row, col)` widened to f64
    pub fn get_f64(&self, row: usize, col: usize) -> Option<f64> {
        dispatch!(self, r => r.get(row, col).map(Sample::to_f64))
    }

    /// Formatted sample at `(row, col)`
    pub fn get_string(&self, row: usize, col: usize) -> Option<String> {
        dispatch!(self, r => r.get(row, col).map(|v| v.to_string()))
    }

    pub fn min_max(&self) -> Option<(f64, f64)> {
        dispatch!(self, r => r.min_max())
    }

    /// Write the samples big-endian
    pub fn write_be<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        dispatch!(self, r => r.write_be(writer))
    }

    /// Size of the samples in bytes
    pub fn byte_len(&self) -> usize {
        self.height() * self.width() * (self.bitpix().unsigned_abs() as usize / 8)
    }
}

impl Croppable for ImageData {
    fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    fn crop(&self, region: &Region) -> FitsResult<Self> {
        Ok(dispatch!(self, r => ImageData::from(r.crop(region)?)))
    }
}
