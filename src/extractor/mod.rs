//! Cutout extraction from 2D rasters
//!
//! This module provides the cutout extractor together with the raster
//! types it crops and the exporters for the resulting samples.

mod region;
mod size;
mod raster;
mod cutout;
pub mod array_export;
pub mod preview;

#[cfg(test)]
mod tests;

// Public exports
pub use region::Region;
pub use size::CutoutSize;
pub use raster::{Croppable, ImageData, Raster};
pub use cutout::{Cutout, CutoutExtractor};
pub use array_export::{save_array, write_array, ArrayFormat};
pub use preview::{render_preview, save_preview};
