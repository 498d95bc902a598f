//! FITS file reader implementation
//!
//! This module reads header-data units sequentially: headers are parsed
//! block by block until `END`, data blocks of HDUs before the requested one
//! are skipped, and the requested image is decoded row by row.

use log::{debug, info, warn};
use std::io::{self, Read};
use std::path::Path;

use crate::coordinate::Wcs;
use crate::extractor::{ImageData, Raster};
use crate::fits::constants::{keywords, layout};
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::header::{Card, Header};
use crate::fits::types::{FitsImage, HduSummary};
use crate::io::{open_input, Sample};
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Reader for FITS image files
pub struct FitsReader<'a> {
    /// Logger instance
    logger: &'a Logger,
    /// Whether to draw a progress bar while decoding data
    show_progress: bool,
}

impl<'a> FitsReader<'a> {
    /// Creates a new FITS reader
    pub fn new(logger: &'a Logger) -> Self {
        FitsReader {
            logger,
            show_progress: false,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Loads an image HDU from the given path
    ///
    /// This is the main entry point for loading a FITS file. Gzip-compressed
    /// files are decompressed on the fly.
    ///
    /// # Arguments
    /// * `filepath` - Path to the FITS file to load
    /// * `hdu` - Index of the HDU to read, 0 for the primary HDU
    ///
    /// # Returns
    /// The image header and its decoded samples
    pub fn load(&self, filepath: &str, hdu: usize) -> FitsResult<FitsImage> {
        info!("Loading FITS file: {} (HDU {})", filepath, hdu);
        let mut reader = open_input(Path::new(filepath))?;
        let image = self.read(&mut reader, hdu)?;
        let _ = self.logger.log(&format!("Loaded HDU {} of {}", hdu, filepath));
        Ok(image)
    }

    /// Reads an image HDU from a sequential reader
    ///
    /// # Arguments
    /// * `reader` - Stream positioned at the start of the file
    /// * `hdu` - Index of the HDU to read
    ///
    /// # Returns
    /// The image, `HduNotFound` when the file has fewer HDUs, or
    /// `UnsupportedDimensions` when the HDU is not a 2D image
    pub fn read<R: Read + ?Sized>(&self, reader: &mut R, hdu: usize) -> FitsResult<FitsImage> {
        debug!("FitsReader::read starting");

        for index in 0..=hdu {
            let header = read_header(reader)?.ok_or(FitsError::HduNotFound(hdu))?;
            if index == 0 {
                check_primary(&header)?;
            }

            if index < hdu {
                let size = padded(data_size(&header)?)?;
                debug!("Skipping HDU {} data ({} bytes)", index, size);
                skip(reader, size)?;
                continue;
            }

            let (height, width) = image_shape(&header, index)?;
            data_size(&header)?;
            let bitpix = required_i64(&header, keywords::BITPIX)?;
            info!("Reading {}x{} image, BITPIX {}", width, height, bitpix);

            let progress = ProgressTracker::new(height as u64, "Reading image rows", self.show_progress);
            let data = read_image_data(reader, bitpix, height, width, &progress)?;
            progress.finish();

            return Ok(FitsImage::new(header, data));
        }

        Err(FitsError::HduNotFound(hdu))
    }

    /// Summarise every HDU in a file without decoding data
    pub fn scan(&self, filepath: &str) -> FitsResult<Vec<HduSummary>> {
        info!("Scanning FITS file: {}", filepath);
        let mut reader = open_input(Path::new(filepath))?;
        self.scan_reader(&mut reader)
    }

    /// Summarise every HDU from a sequential reader
    pub fn scan_reader<R: Read + ?Sized>(&self, reader: &mut R) -> FitsResult<Vec<HduSummary>> {
        let mut summaries = Vec::new();

        while let Some(header) = read_header(reader)? {
            let index = summaries.len();
            if index == 0 {
                check_primary(&header)?;
            }

            let kind = if index == 0 {
                "PRIMARY".to_string()
            } else {
                header.get_str(keywords::XTENSION).unwrap_or("UNKNOWN").trim().to_string()
            };
            let summary = HduSummary {
                index,
                kind,
                bitpix: required_i64(&header, keywords::BITPIX)?,
                axes: axis_lengths(&header)?,
                has_wcs: matches!(Wcs::detect(&header), Ok(Some(_)) | Err(_)),
                header,
            };
            debug!("{}", summary);

            let size = padded(data_size(&summary.header)?)?;
            summaries.push(summary);
            if skip(reader, size)? < size {
                break;
            }
        }

        Ok(summaries)
    }
}

/// Read one header, `Ok(None)` at a clean end of file
fn read_header<R: Read + ?Sized>(reader: &mut R) -> FitsResult<Option<Header>> {
    let mut cards = Vec::new();
    let mut block = vec![0u8; layout::BLOCK_SIZE];
    let mut first = true;

    loop {
        let filled = fill_block(reader, &mut block)?;
        if filled == 0 && first {
            return Ok(None);
        }
        if filled < layout::BLOCK_SIZE {
            return Err(FitsError::InvalidHeader(format!(
                "truncated header block ({} of {} bytes)", filled, layout::BLOCK_SIZE)));
        }
        first = false;

        for record in block.chunks(layout::CARD_LENGTH) {
            let card = Card::parse(record)?;
            if card.keyword == keywords::END {
                return Ok(Some(Header::from_cards(cards)));
            }
            cards.push(card);
        }
    }
}

/// Read until the buffer is full or the stream ends
fn fill_block<R: Read + ?Sized>(reader: &mut R, block: &mut [u8]) -> FitsResult<usize> {
    let mut filled = 0;
    while filled < block.len() {
        match reader.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Skip bytes, returning how many were actually available
fn skip<R: Read + ?Sized>(reader: &mut R, size: u64) -> FitsResult<u64> {
    let skipped = io::copy(&mut Read::take(&mut *reader, size), &mut io::sink())?;
    Ok(skipped)
}

fn check_primary(header: &Header) -> FitsResult<()> {
    match header.cards().first() {
        Some(card) if card.keyword == keywords::SIMPLE => Ok(()),
        _ => Err(FitsError::InvalidHeader("not a FITS file: first keyword is not SIMPLE".to_string())),
    }
}

fn required_i64(header: &Header, keyword: &str) -> FitsResult<i64> {
    match header.get(keyword) {
        None => Err(FitsError::MissingKeyword(keyword.to_string())),
        Some(value) => value.as_i64()
            .ok_or_else(|| FitsError::InvalidHeader(format!("{} is not an integer: {}", keyword, value))),
    }
}

/// Lengths of all axes, NAXIS1 first
fn axis_lengths(header: &Header) -> FitsResult<Vec<usize>> {
    let naxis = required_i64(header, keywords::NAXIS)?;
    if !(0..=999).contains(&naxis) {
        return Err(FitsError::InvalidHeader(format!("NAXIS out of range: {}", naxis)));
    }

    (1..=naxis)
        .map(|n| {
            let key = format!("{}{}", keywords::NAXIS, n);
            let length = required_i64(header, &key)?;
            usize::try_from(length)
                .map_err(|_| FitsError::InvalidHeader(format!("{} is negative: {}", key, length)))
        })
        .collect()
}

/// Size in bytes of the data following a header, without padding
fn data_size(header: &Header) -> FitsResult<u64> {
    let bitpix = required_i64(header, keywords::BITPIX)?;
    let axes = axis_lengths(header)?;
    if axes.is_empty() {
        return Ok(0);
    }

    let pcount = header.get_i64(keywords::PCOUNT).unwrap_or(0).max(0) as u64;
    let gcount = header.get_i64(keywords::GCOUNT).unwrap_or(1).max(0) as u64;
    let too_large = || FitsError::InvalidHeader(format!("data size of axes {:?} overflows", axes));

    let samples = axes.iter().try_fold(1u64, |acc, &n| acc.checked_mul(n as u64)).ok_or_else(too_large)?;
    pcount
        .checked_add(samples)
        .and_then(|n| n.checked_mul(gcount))
        .and_then(|n| n.checked_mul(bitpix.unsigned_abs() / 8))
        .ok_or_else(too_large)
}

/// Round a size up to a whole number of blocks
fn padded(size: u64) -> FitsResult<u64> {
    let block = layout::BLOCK_SIZE as u64;
    size.div_ceil(block)
        .checked_mul(block)
        .ok_or_else(|| FitsError::InvalidHeader(format!("data size {} overflows", size)))
}

/// Shape (height, width) of an image HDU
fn image_shape(header: &Header, index: usize) -> FitsResult<(usize, usize)> {
    if index > 0 {
        let xtension = header.get_str(keywords::XTENSION).unwrap_or("").trim();
        if xtension != "IMAGE" {
            return Err(FitsError::UnsupportedDimensions(format!(
                "HDU {} is a '{}' extension, not an image", index, xtension)));
        }
    }

    let axes = axis_lengths(header)?;
    if axes.len() < 2 {
        return Err(FitsError::UnsupportedDimensions(format!(
            "HDU {} has {} axes, a 2D image is required", index, axes.len())));
    }
    if axes[2..].iter().any(|&n| n != 1) {
        return Err(FitsError::UnsupportedDimensions(format!(
            "HDU {} has axes {:?}; only degenerate extra axes are supported", index, axes)));
    }
    if axes[0] == 0 || axes[1] == 0 {
        return Err(FitsError::UnsupportedDimensions(format!("HDU {} has an empty axis", index)));
    }
    if axes.len() > 2 {
        warn!("Ignoring {} degenerate axes beyond NAXIS2", axes.len() - 2);
    }

    Ok((axes[1], axes[0]))
}

/// Decode the data block for the given BITPIX
fn read_image_data<R: Read + ?Sized>(
    reader: &mut R,
    bitpix: i64,
    height: usize,
    width: usize,
    progress: &ProgressTracker,
) -> FitsResult<ImageData> {
    let data = match bitpix {
        8 => ImageData::from(read_raster::<u8, R>(reader, height, width, progress)?),
        16 => ImageData::from(read_raster::<i16, R>(reader, height, width, progress)?),
        32 => ImageData::from(read_raster::<i32, R>(reader, height, width, progress)?),
        64 => ImageData::from(read_raster::<i64, R>(reader, height, width, progress)?),
        -32 => ImageData::from(read_raster::<f32, R>(reader, height, width, progress)?),
        -64 => ImageData::from(read_raster::<f64, R>(reader, height, width, progress)?),
        other => return Err(FitsError::UnsupportedBitpix(other)),
    };
    Ok(data)
}

/// Decode `height` rows of `width` big-endian samples
///
/// Padding after the last row is not read, so a file missing its final
/// padding still loads.
fn read_raster<T: Sample, R: Read + ?Sized>(
    reader: &mut R,
    height: usize,
    width: usize,
    progress: &ProgressTracker,
) -> FitsResult<Raster<T>> {
    // Sized by the samples read, never by NAXISn alone
    let mut data = Vec::new();

    for row in 0..height {
        for _ in 0..width {
            let sample = T::read_be(reader).map_err(|e| match e.kind() {
                io::ErrorKind::UnexpectedEof => FitsError::InvalidRaster(format!(
                    "data block ends in row {} of {}", row, height)),
                _ => FitsError::IoError(e),
            })?;
            data.push(sample);
        }
        progress.increment(1);
    }

    Raster::new(height, width, data)
}
