//! Coordinate handling for astronomical images
//!
//! This module provides pixel and world positions and the world coordinate
//! systems that map between them.

mod linear;
mod point;
mod projection;
mod sip;
mod wcs;

#[cfg(test)]
mod tests;

// Re-export key types
pub use self::linear::LinearTransform;
pub use self::point::{PixelPosition, WorldPoint};
pub use self::projection::Projection;
pub use self::sip::{SipDistortion, SipPolynomial};
pub use self::wcs::{CoordinateMap, Wcs};
