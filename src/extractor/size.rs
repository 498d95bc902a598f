//! Requested cutout size

use std::fmt;
use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;

use crate::fits::errors::{FitsError, FitsResult};

lazy_static! {
    static ref SIZE_PATTERN: Regex =
        Regex::new(r"^\s*(-?\d+)\s*(?:[,xX]\s*(-?\d+)\s*)?$").expect("valid size regex");
}

/// Cutout size in pixels, height (rows) by width (columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoutSize {
    pub height: i64,
    pub width: i64,
}

impl CutoutSize {
    pub fn new(height: i64, width: i64) -> Self {
        CutoutSize { height, width }
    }

    /// Square cutout of side `size`
    pub fn square(size: i64) -> Self {
        CutoutSize::new(size, size)
    }

    /// Check that both dimensions are positive
    pub fn validate(&self) -> FitsResult<()> {
        if self.height <= 0 || self.width <= 0 {
            return Err(FitsError::InvalidSize { height: self.height, width: self.width });
        }
        Ok(())
    }
}

impl From<i64> for CutoutSize {
    fn from(size: i64) -> Self {
        CutoutSize::square(size)
    }
}

impl FromStr for CutoutSize {
    type Err = FitsError;

    /// Parse `"s"`, `"h,w"` or `"hxw"`
    ///
    /// Only the syntax is checked here; non-positive values parse and are
    /// rejected by [`CutoutSize::validate`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = SIZE_PATTERN.captures(s)
            .ok_or_else(|| FitsError::InvalidArgument(format!("cannot parse cutout size '{}'", s)))?;

        let parse = |text: &str| text.parse::<i64>()
            .map_err(|e| FitsError::InvalidArgument(format!("cutout size '{}': {}", s, e)));

        let height = parse(&captures[1])?;
        let width = match captures.get(2) {
            Some(m) => parse(m.as_str())?,
            None => height,
        };
        Ok(CutoutSize::new(height, width))
    }
}

impl fmt::Display for CutoutSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}
