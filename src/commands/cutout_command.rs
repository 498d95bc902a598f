//! Cutout command
//!
//! This module implements the command that cuts a box out of a FITS image
//! and writes it, with its re-referenced WCS, to a new FITS file. The
//! cutout samples can also be exported as an array or a PNG preview.

use clap::ArgMatches;
use log::{debug, info, warn};
use std::path::Path;

use crate::commands::command_traits::Command;
use crate::coordinate::{CoordinateMap, PixelPosition, Wcs, WorldPoint};
use crate::extractor::{save_array, save_preview, ArrayFormat, Cutout, CutoutExtractor, CutoutSize, ImageData};
use crate::fits::constants::defaults;
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::{FitsImage, FitsReader, FitsWriter};
use crate::utils::logger::Logger;

/// Command for extracting a cutout from a FITS file
pub struct CutoutCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Path to the output FITS file
    output_file: String,
    /// First center coordinate: row, or longitude with `world`
    center_a: f64,
    /// Second center coordinate: column, or latitude with `world`
    center_b: f64,
    /// Requested cutout size
    size: CutoutSize,
    /// Index of the HDU to cut from
    hdu: usize,
    /// Whether the center is given in world coordinates
    world: bool,
    /// Optional path for an array export of the cutout
    array_output: Option<String>,
    /// Format of the array export
    array_format: ArrayFormat,
    /// Optional path for a PNG preview
    preview: Option<String>,
    /// Whether to show a progress bar while reading
    progress: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> CutoutCommand<'a> {
    /// Create a new cutout command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new CutoutCommand instance or an error for malformed values
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> FitsResult<Self> {
        info!("Creating new cutout command from arguments");

        let input_file = required_string(args, "source_path")?;
        info!("Input file: {}", input_file);

        let output_file = args.get_one::<String>("output")
            .cloned()
            .unwrap_or_else(|| defaults::OUTPUT_FILE.to_string());
        info!("Output file: {}", output_file);

        let center_a = parse_number(args, "center_row")?;
        let center_b = parse_number(args, "center_col")?;
        let world = args.get_flag("world");
        info!("Center: ({}, {}){}", center_a, center_b, if world { " world" } else { " pixel" });

        let size = required_string(args, "size")?.parse::<CutoutSize>()?;
        info!("Size: {}", size);

        let hdu = match args.get_one::<String>("hdu") {
            Some(value) => value.parse::<usize>()
                .map_err(|_| FitsError::InvalidArgument(format!("Invalid HDU index: {}", value)))?,
            None => 0,
        };

        let array_output = args.get_one::<String>("array-output").cloned();
        let array_format = args.get_one::<String>("array-format")
            .map(|f| f.parse::<ArrayFormat>())
            .transpose()?
            .unwrap_or(ArrayFormat::Csv);
        let preview = args.get_one::<String>("preview").cloned();
        debug!("Array output: {:?} ({}), preview: {:?}", array_output, array_format, preview);

        Ok(CutoutCommand {
            input_file,
            output_file,
            center_a,
            center_b,
            size,
            hdu,
            world,
            array_output,
            array_format,
            preview,
            progress: args.get_flag("progress"),
            logger,
        })
    }

    /// Run the extractor on the loaded image
    fn extract(&self, image: &FitsImage, wcs: Option<&Wcs>) -> FitsResult<Cutout<ImageData, Wcs>> {
        if self.world {
            let wcs = wcs.ok_or_else(|| FitsError::DegenerateMap(
                "a world-coordinate center needs a WCS in the header".to_string()))?;
            let world = WorldPoint::new(self.center_a, self.center_b);
            info!("Cutting {} around world position {}", self.size, world);
            CutoutExtractor::extract_at_world(&image.data, wcs, world, self.size)
        } else {
            let center = PixelPosition::new(self.center_a, self.center_b);
            info!("Cutting {} around pixel position {}", self.size, center);
            CutoutExtractor::extract(&image.data, wcs, center, self.size)
        }
    }

    /// Report where the cutout landed in the source image
    fn report(&self, cutout: &Cutout<ImageData, Wcs>) {
        let (row0, col0) = cutout.origin();
        let (height, width) = cutout.shape();
        info!("Cutout origin: row {}, col {}; shape {}x{}", row0, col0, height, width);

        if cutout.bbox_original() != cutout.requested_region() {
            warn!("Requested box {} clipped to {}", cutout.requested_region(), cutout.bbox_original());
        }

        if let Some(map) = cutout.coordinate_map() {
            let reference = map.reference_pixel();
            info!("Cutout reference pixel: {}", reference);
            if let Some(world) = map.pixel_to_world(cutout.center_cutout()) {
                info!("World coordinate at requested center: {}", world);
            }
        }
    }

    /// Write the optional array export and preview
    fn write_extras(&self, data: &ImageData) -> FitsResult<()> {
        if let Some(path) = &self.array_output {
            info!("Saving cutout array to {} as {}", path, self.array_format);
            save_array(data, Path::new(path), self.array_format)?;
        }
        if let Some(path) = &self.preview {
            info!("Saving cutout preview to {}", path);
            save_preview(data, Path::new(path))?;
        }
        Ok(())
    }
}

impl<'a> Command for CutoutCommand<'a> {
    fn name(&self) -> &'static str {
        "cutout"
    }

    fn execute(&self) -> FitsResult<()> {
        info!("Executing cutout command");

        let reader = FitsReader::new(self.logger).with_progress(self.progress);
        let image = reader.load(&self.input_file, self.hdu)?;
        info!("{}", image);

        let wcs = image.coordinate_map()?;
        match &wcs {
            Some(wcs) => info!("WCS: {}", wcs),
            None => warn!("No WCS found in HDU {}; the cutout will carry no coordinate map", self.hdu),
        }

        let cutout = self.extract(&image, wcs.as_ref())?;
        self.report(&cutout);

        let output = FitsImage::from_cutout(&image.header, &cutout);
        FitsWriter::new(self.logger).save(&output, &self.output_file)?;

        self.write_extras(cutout.data())?;

        info!("Cutout written to {}", self.output_file);
        Ok(())
    }
}

fn required_string(args: &ArgMatches, id: &str) -> FitsResult<String> {
    args.get_one::<String>(id)
        .cloned()
        .ok_or_else(|| FitsError::InvalidArgument(format!("Missing argument: {}", id)))
}

fn parse_number(args: &ArgMatches, id: &str) -> FitsResult<f64> {
    let value = required_string(args, id)?;
    value.trim()
        .parse::<f64>()
        .map_err(|_| FitsError::InvalidArgument(format!("{} is not a number: {}", id, value)))
}
