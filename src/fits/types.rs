//! Core FITS data structures

use std::fmt;

use crate::coordinate::{CoordinateMap, Wcs};
use crate::extractor::{Croppable, Cutout, ImageData};
use crate::fits::constants::keywords;
use crate::fits::errors::FitsResult;
use crate::fits::header::Header;
use crate::fits::keywords as definitions;

/// A two-dimensional image HDU: header plus decoded samples
#[derive(Debug, Clone, PartialEq)]
pub struct FitsImage {
    /// Header cards as read, without `END`
    pub header: Header,
    /// Decoded samples, raw stored values
    pub data: ImageData,
}

impl FitsImage {
    pub fn new(header: Header, data: ImageData) -> Self {
        FitsImage { header, data }
    }

    /// Shape of the data as (height, width)
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// World coordinate system of the image, `None` when the header has none
    pub fn coordinate_map(&self) -> FitsResult<Option<Wcs>> {
        Wcs::detect(&self.header)
    }

    /// Build the image to write for a cutout
    ///
    /// The source header is kept and the cutout's coordinate map keywords are
    /// merged into it: keys already present are overwritten in place, new ones
    /// appended. The axis lengths and sample type follow the cutout data.
    ///
    /// # Arguments
    /// * `source_header` - Header of the image the cutout was taken from
    /// * `cutout` - The extracted cutout
    pub fn from_cutout(source_header: &Header, cutout: &Cutout<ImageData, Wcs>) -> Self {
        let mut header = source_header.clone();
        if let Some(map) = cutout.coordinate_map() {
            header.merge(&map.to_header());
        }

        let data = cutout.data().clone();
        header.set(keywords::BITPIX, data.bitpix());
        header.set(keywords::NAXIS1, data.width());
        header.set(keywords::NAXIS2, data.height());

        FitsImage { header, data }
    }
}

impl fmt::Display for FitsImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (height, width) = self.shape();
        writeln!(f, "FITS image:")?;
        writeln!(f, "  Size: {} x {} (width x height)", width, height)?;
        writeln!(f, "  BITPIX: {} ({})", self.data.bitpix(), definitions::bitpix_name(self.data.bitpix()))?;
        write!(f, "  Header cards: {}", self.header.len())
    }
}

/// Summary of one HDU found while scanning a file
#[derive(Debug, Clone, PartialEq)]
pub struct HduSummary {
    /// Position in the file, primary = 0
    pub index: usize,
    /// `PRIMARY` or the `XTENSION` value
    pub kind: String,
    pub bitpix: i64,
    /// Axis lengths, NAXIS1 first
    pub axes: Vec<usize>,
    /// Whether the header carries WCS keywords
    pub has_wcs: bool,
    /// Full header
    pub header: Header,
}

impl HduSummary {
    /// Whether the HDU can be opened as a 2D image
    pub fn is_image(&self) -> bool {
        let is_image_kind = self.kind == "PRIMARY" || self.kind == "IMAGE";
        is_image_kind && self.axes.len() >= 2 && self.axes[2..].iter().all(|&n| n == 1)
    }
}

impl fmt::Display for HduSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axes = if self.axes.is_empty() {
            "no data".to_string()
        } else {
            self.axes.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" x ")
        };
        write!(
            f,
            "HDU {}: {:<8} BITPIX={:<3} ({}) axes={} WCS={}",
            self.index,
            self.kind,
            self.bitpix,
            definitions::bitpix_name(self.bitpix),
            axes,
            if self.has_wcs { "yes" } else { "no" }
        )
    }
}
