//! Export of cutout samples as plain arrays
//!
//! This module writes the raw sample values of an image as CSV, JSON or
//! NumPy NPY so they can be inspected without a FITS reader.

use byteorder::{LittleEndian, WriteBytesExt};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::extractor::raster::ImageData;
use crate::fits::errors::{FitsError, FitsResult};

/// NPY magic string
const NPY_MAGIC: &[u8] = b"\x93NUMPY";

/// NPY headers are padded to a multiple of this many bytes
const NPY_ALIGNMENT: usize = 64;

/// Array output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayFormat {
    Csv,
    Json,
    Npy,
}

impl FromStr for ArrayFormat {
    type Err = FitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ArrayFormat::Csv),
            "json" => Ok(ArrayFormat::Json),
            "npy" => Ok(ArrayFormat::Npy),
            _ => Err(FitsError::InvalidArgument(format!("Unsupported array format: {}", s))),
        }
    }
}

impl fmt::Display for ArrayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrayFormat::Csv => "csv",
            ArrayFormat::Json => "json",
            ArrayFormat::Npy => "npy",
        };
        write!(f, "{}", name)
    }
}

/// Save image samples to a file in the specified format
///
/// # Arguments
/// * `data` - Samples to export
/// * `path` - Path to save the file
/// * `format` - Output format
///
/// # Returns
/// Result indicating success or an error
pub fn save_array(data: &ImageData, path: &Path, format: ArrayFormat) -> FitsResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_array(data, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Write image samples to any writer in the specified format
pub fn write_array<W: Write>(data: &ImageData, writer: &mut W, format: ArrayFormat) -> FitsResult<()> {
    match format {
        ArrayFormat::Csv => write_csv(data, writer),
        ArrayFormat::Json => write_json(data, writer),
        ArrayFormat::Npy => write_npy(data, writer),
    }
}

/// CSV with a header row of column numbers and the row number first
fn write_csv<W: Write>(data: &ImageData, writer: &mut W) -> FitsResult<()> {
    write!(writer, "row/col")?;
    for col in 0..data.width() {
        write!(writer, ",{}", col)?;
    }
    writeln!(writer)?;

    for row in 0..data.height() {
        write!(writer, "{}", row)?;
        for col in 0..data.width() {
            match data.get_string(row, col) {
                Some(value) => write!(writer, ",{}", value)?,
                None => write!(writer, ",")?,
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// JSON object with the shape and nested rows; non-finite values are null
fn write_json<W: Write>(data: &ImageData, writer: &mut W) -> FitsResult<()> {
    let (height, width) = (data.height(), data.width());

    writeln!(writer, "{{")?;
    writeln!(writer, "  \"width\": {},", width)?;
    writeln!(writer, "  \"height\": {},", height)?;
    writeln!(writer, "  \"data\": [")?;

    for row in 0..height {
        write!(writer, "    [")?;
        for col in 0..width {
            let finite = data.get_f64(row, col).map_or(false, f64::is_finite);
            match data.get_string(row, col) {
                Some(value) if finite => write!(writer, "{}", value)?,
                _ => write!(writer, "null")?,
            }
            if col + 1 < width {
                write!(writer, ", ")?;
            }
        }
        if row + 1 < height {
            writeln!(writer, "],")?;
        } else {
            writeln!(writer, "]")?;
        }
    }

    writeln!(writer, "  ]")?;
    writeln!(writer, "}}")?;

    Ok(())
}

/// NPY version 1.0 with the samples in FITS (big-endian) byte order
fn write_npy<W: Write>(data: &ImageData, writer: &mut W) -> FitsResult<()> {
    let dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': ({}, {}), }}",
        data.npy_descr(), data.height(), data.width()
    );

    // magic + version + length field + dict + newline, padded with spaces
    let unpadded = NPY_MAGIC.len() + 2 + 2 + dict.len() + 1;
    let padding = (NPY_ALIGNMENT - unpadded % NPY_ALIGNMENT) % NPY_ALIGNMENT;
    let header = format!("{}{}\n", dict, " ".repeat(padding));

    let header_len = u16::try_from(header.len())
        .map_err(|_| FitsError::GenericError("NPY header too long".to_string()))?;

    writer.write_all(NPY_MAGIC)?;
    writer.write_all(&[0x01, 0x00])?;
    writer.write_u16::<LittleEndian>(header_len)?;
    writer.write_all(header.as_bytes())?;
    data.write_be(writer)?;

    Ok(())
}
