pub mod io;
pub mod fits;
pub mod utils;
pub mod extractor;
pub mod coordinate;
pub mod commands;
pub mod api;

pub use crate::api::FitsCut;

pub use fits::{FitsError, FitsImage, FitsReader, FitsResult, FitsWriter, Header};
pub use extractor::{Cutout, CutoutExtractor, CutoutSize, ImageData, Raster, Region};
pub use coordinate::{CoordinateMap, PixelPosition, Wcs, WorldPoint};
