//! FITS file format module
//!
//! This module provides structures and functions for reading and writing
//! FITS image files and their headers.

pub mod errors;
pub mod header;
pub mod keywords;
pub mod constants;
pub mod types;
pub mod reader;
pub mod writer;

#[cfg(test)]
mod tests;

pub use errors::{FitsError, FitsResult};
pub use header::{Card, Header, HeaderValue};
pub use reader::FitsReader;
pub use types::{FitsImage, HduSummary};
pub use writer::{output_header, FitsWriter};
