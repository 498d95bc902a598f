//! FITS structure analysis command
//!
//! This module implements the command for listing the HDUs of a FITS file
//! and describing the image and WCS of each one.

use clap::ArgMatches;
use log::{debug, info, warn};

use crate::commands::command_traits::Command;
use crate::coordinate::{CoordinateMap, PixelPosition, Wcs};
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::{FitsReader, HduSummary};
use crate::utils::logger::Logger;

/// Command for analyzing FITS file structure
pub struct AnalyzeCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Whether to dump every header card to the log
    verbose: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> AnalyzeCommand<'a> {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new AnalyzeCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> FitsResult<Self> {
        let input_file = args.get_one::<String>("source_path")
            .ok_or_else(|| FitsError::InvalidArgument("Missing input file".to_string()))?
            .clone();

        let verbose = args.get_flag("verbose");

        Ok(AnalyzeCommand {
            input_file,
            verbose,
            logger,
        })
    }

    /// Describe the WCS of an HDU
    ///
    /// Shows the projection, reference point and the world coordinates of
    /// the image corners.
    fn display_wcs(&self, summary: &HduSummary) {
        let wcs = match Wcs::detect(&summary.header) {
            Ok(Some(wcs)) => wcs,
            Ok(None) => return,
            Err(e) => {
                warn!("HDU {} has an unusable WCS: {}", summary.index, e);
                println!("    WCS: unusable ({})", e);
                return;
            },
        };

        println!("    WCS: {}", wcs);
        if summary.axes.len() < 2 {
            return;
        }

        let (height, width) = (summary.axes[1] as f64, summary.axes[0] as f64);
        let corners = [(0.0, 0.0), (0.0, width - 1.0), (height - 1.0, 0.0), (height - 1.0, width - 1.0)];
        for (row, col) in corners {
            let pixel = PixelPosition::new(row, col);
            match wcs.pixel_to_world(pixel) {
                Some(world) => println!("      {} -> {}", pixel, world),
                None => println!("      {} -> not evaluable", pixel),
            }
        }
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn execute(&self) -> FitsResult<()> {
        info!("Analyzing FITS file: {}", self.input_file);

        let reader = FitsReader::new(self.logger);
        let summaries = reader.scan(&self.input_file)?;

        println!("FITS Analysis Results: {}", self.input_file);
        println!("  Number of HDUs: {}", summaries.len());

        for summary in &summaries {
            println!("  {}", summary);
            if summary.is_image() {
                self.display_wcs(summary);
            }

            if self.verbose {
                debug!("Dumping {} header cards of HDU {}", summary.header.len(), summary.index);
                self.logger.print_header(&summary.header)?;
            }
        }

        info!("Analysis complete");
        Ok(())
    }
}
