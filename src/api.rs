use log::info;
use std::path::Path;

use crate::coordinate::{PixelPosition, Wcs, WorldPoint};
use crate::extractor::{save_array, ArrayFormat, Cutout, CutoutExtractor, CutoutSize, ImageData};
use crate::fits::constants::defaults;
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::{FitsImage, FitsReader, FitsWriter};
use crate::utils::logger::Logger;

/// Main interface to the fitscut library
pub struct FitsCut {
    logger: Logger,
}

impl FitsCut {
    /// Create a new FitsCut instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "fitscut.log"
    ///
    /// # Returns
    /// A FitsCut instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> FitsResult<Self> {
        let log_path = log_file.unwrap_or(defaults::LOG_FILE);
        let logger = Logger::new(log_path)?;
        Ok(FitsCut { logger })
    }

    /// Create an instance that writes no log file
    pub fn without_log() -> Self {
        FitsCut { logger: Logger::disabled() }
    }

    /// Analyze a FITS file and return a description of its HDUs
    ///
    /// # Arguments
    /// * `input_path` - Path to the FITS file to analyze
    ///
    /// # Returns
    /// String containing one line per HDU or an error
    pub fn analyze(&self, input_path: &str) -> FitsResult<String> {
        let reader = FitsReader::new(&self.logger);
        let summaries = reader.scan(input_path)?;

        let mut result = "FITS Analysis Results:\n".to_string();
        result.push_str(&format!("  Number of HDUs: {}\n", summaries.len()));
        for summary in &summaries {
            result.push_str(&format!("  {}\n", summary));
        }

        Ok(result)
    }

    /// Load an image HDU
    pub fn load(&self, input_path: &str, hdu: usize) -> FitsResult<FitsImage> {
        FitsReader::new(&self.logger).load(input_path, hdu)
    }

    /// Cut a loaded image around a pixel position
    ///
    /// The image's WCS, if any, is re-referenced to the cutout.
    pub fn cutout(&self, image: &FitsImage, center: PixelPosition, size: CutoutSize) -> FitsResult<Cutout<ImageData, Wcs>> {
        let wcs = image.coordinate_map()?;
        CutoutExtractor::extract(&image.data, wcs.as_ref(), center, size)
    }

    /// Cut a FITS file around a pixel position and write the cutout
    ///
    /// The output keeps the source header with the cutout's WCS merged in
    /// and is overwritten if it exists.
    ///
    /// # Arguments
    /// * `input_path` - Path to the source FITS file
    /// * `output_path` - Path of the FITS file to write
    /// * `center` - Cutout center, zero-based pixel position
    /// * `size` - Cutout size
    /// * `hdu` - Index of the image HDU
    ///
    /// # Returns
    /// The cutout that was written
    pub fn cutout_file(&self,
                       input_path: &str,
                       output_path: &str,
                       center: PixelPosition,
                       size: CutoutSize,
                       hdu: usize) -> FitsResult<Cutout<ImageData, Wcs>> {
        info!("Cutting {} around {} from {} into {}", size, center, input_path, output_path);

        let image = self.load(input_path, hdu)?;
        let cutout = self.cutout(&image, center, size)?;
        self.write_cutout(&image, &cutout, output_path)?;

        Ok(cutout)
    }

    /// Cut a FITS file around a world coordinate and write the cutout
    ///
    /// The source image must carry a WCS.
    pub fn cutout_file_at_world(&self,
                                input_path: &str,
                                output_path: &str,
                                world: WorldPoint,
                                size: CutoutSize,
                                hdu: usize) -> FitsResult<Cutout<ImageData, Wcs>> {
        info!("Cutting {} around world {} from {} into {}", size, world, input_path, output_path);

        let image = self.load(input_path, hdu)?;
        let wcs = image.coordinate_map()?.ok_or_else(|| FitsError::DegenerateMap(
            "a world-coordinate center needs a WCS in the header".to_string()))?;
        let cutout = CutoutExtractor::extract_at_world(&image.data, &wcs, world, size)?;
        self.write_cutout(&image, &cutout, output_path)?;

        Ok(cutout)
    }

    /// Save the samples of a cutout as an array file
    pub fn save_cutout_array(&self, cutout: &Cutout<ImageData, Wcs>, output_path: &str, format: ArrayFormat) -> FitsResult<()> {
        info!("Saving cutout array to {} as {}", output_path, format);
        save_array(cutout.data(), Path::new(output_path), format)
    }

    fn write_cutout(&self, image: &FitsImage, cutout: &Cutout<ImageData, Wcs>, output_path: &str) -> FitsResult<()> {
        let output = FitsImage::from_cutout(&image.header, cutout);
        FitsWriter::new(&self.logger).save(&output, output_path)
    }
}
