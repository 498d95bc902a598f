//! Opening FITS input, plain or gzip-compressed

use flate2::read::GzDecoder;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::fits::constants::layout;
use crate::fits::errors::FitsResult;

/// Open a file for sequential reading, decompressing gzip transparently
///
/// Compression is detected from the stream's magic bytes, not the extension.
pub fn open_input(path: &Path) -> FitsResult<Box<dyn Read>> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(1024 * 1024, file);

    let is_gzip = reader.fill_buf()?.starts_with(&layout::GZIP_MAGIC);
    if is_gzip {
        debug!("{} is gzip-compressed", path.display());
        Ok(Box::new(BufReader::new(GzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}
