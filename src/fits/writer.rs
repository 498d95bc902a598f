//! FITS file writer
//!
//! Writes a single primary image HDU: the mandatory keywords derived from
//! the data, then the remaining header cards in order, then the big-endian
//! samples, each part padded to whole 2880-byte blocks.

use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::fits::constants::{keywords, layout};
use crate::fits::errors::FitsResult;
use crate::fits::header::{Card, Header};
use crate::fits::types::FitsImage;
use crate::utils::logger::Logger;

/// Writer for FITS image files
pub struct FitsWriter<'a> {
    /// Logger instance
    logger: &'a Logger,
}

impl<'a> FitsWriter<'a> {
    /// Creates a new FITS writer
    pub fn new(logger: &'a Logger) -> Self {
        FitsWriter { logger }
    }

    /// Save an image to a file, replacing any existing file
    ///
    /// # Arguments
    /// * `image` - Image to write
    /// * `filepath` - Destination path
    pub fn save(&self, image: &FitsImage, filepath: &str) -> FitsResult<()> {
        info!("Writing FITS file: {}", filepath);
        let file = File::create(filepath)?;
        let mut writer = BufWriter::new(file);
        self.write(image, &mut writer)?;
        writer.flush()?;

        let (height, width) = (image.data.height(), image.data.width());
        let _ = self.logger.log(&format!("Wrote {}x{} image to {}", width, height, filepath));
        Ok(())
    }

    /// Write an image to any byte sink
    pub fn write<W: Write + ?Sized>(&self, image: &FitsImage, writer: &mut W) -> FitsResult<()> {
        let header = output_header(image);
        debug!("Output header has {} cards", header.len());

        let mut written = 0usize;
        for card in header.iter().chain(std::iter::once(&Card::commentary(keywords::END, ""))) {
            writer.write_all(card.to_record().as_bytes())?;
            written += layout::CARD_LENGTH;
        }
        write_padding(writer, written, b' ')?;

        image.data.write_be(writer)?;
        write_padding(writer, image.data.byte_len(), 0)?;

        Ok(())
    }
}

/// Header as it will be written for an image
///
/// `SIMPLE`, `BITPIX`, `NAXIS`, `NAXIS1` and `NAXIS2` come first and follow
/// the data; structural keywords of the source (extension keywords, extra
/// axes, `EXTEND`) are dropped and everything else is kept in order.
pub fn output_header(image: &FitsImage) -> Header {
    let comment = |keyword: &str, default: &str| {
        image.header.card(keyword)
            .and_then(|card| card.comment.clone())
            .unwrap_or_else(|| default.to_string())
    };

    let mut cards = vec![
        Card::new(keywords::SIMPLE, true).with_comment("conforms to FITS standard"),
        Card::new(keywords::BITPIX, image.data.bitpix())
            .with_comment(&comment(keywords::BITPIX, "array data type")),
        Card::new(keywords::NAXIS, 2usize).with_comment("number of array dimensions"),
        Card::new(keywords::NAXIS1, image.data.width()).with_comment("length of data axis 1"),
        Card::new(keywords::NAXIS2, image.data.height()).with_comment("length of data axis 2"),
    ];

    cards.extend(image.header.iter()
        .filter(|card| card.is_commentary() || !is_structural(&card.keyword))
        .cloned());

    Header::from_cards(cards)
}

fn is_structural(keyword: &str) -> bool {
    matches!(
        keyword,
        keywords::SIMPLE | keywords::XTENSION | keywords::BITPIX | keywords::PCOUNT
            | keywords::GCOUNT | keywords::EXTEND | keywords::END
    ) || keyword.strip_prefix(keywords::NAXIS)
        .map_or(false, |rest| rest.is_empty() || rest.chars().all(|c| c.is_ascii_digit()))
}

/// Pad the current block out to its full size
fn write_padding<W: Write + ?Sized>(writer: &mut W, written: usize, fill: u8) -> FitsResult<()> {
    let remainder = written % layout::BLOCK_SIZE;
    if remainder != 0 {
        writer.write_all(&vec![fill; layout::BLOCK_SIZE - remainder])?;
    }
    Ok(())
}
