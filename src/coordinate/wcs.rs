//! World coordinate system attached to an image
//!
//! [`CoordinateMap`] is the capability the cutout extractor relies on;
//! [`Wcs`] implements it for FITS celestial and linear axes.

use std::fmt;

use crate::coordinate::linear::LinearTransform;
use crate::coordinate::point::{PixelPosition, WorldPoint};
use crate::coordinate::projection::Projection;
use crate::coordinate::sip::SipDistortion;
use crate::fits::constants::wcs_keys;
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::header::{Card, Header};

/// Mapping between pixel positions and world coordinates
///
/// Pixel positions are zero-based array coordinates. Implementations must
/// keep the reference pixel attached to the same world point when the pixel
/// grid is re-originated.
pub trait CoordinateMap {
    /// Convert a pixel position to world coordinates
    fn pixel_to_world(&self, pixel: PixelPosition) -> Option<WorldPoint>;

    /// Convert world coordinates to a pixel position
    fn world_to_pixel(&self, world: WorldPoint) -> Option<PixelPosition>;

    /// Pixel position at which the reference world coordinate is defined
    fn reference_pixel(&self) -> PixelPosition;

    fn set_reference_pixel(&mut self, pixel: PixelPosition);

    /// Move the grid origin to `(row0, col0)` of the current grid
    ///
    /// After the shift, the pixel that was at `(row0, col0)` is at `(0, 0)`.
    fn shift_origin(&mut self, row0: f64, col0: f64) {
        let reference = self.reference_pixel();
        self.set_reference_pixel(reference - PixelPosition::new(row0, col0));
    }

    /// Check that the map is usable, `DegenerateMap` otherwise
    fn validate(&self) -> FitsResult<()>;

    /// Header keywords describing the map
    fn to_header(&self) -> Header;

    /// Build the map from header keywords
    fn from_header(header: &Header) -> FitsResult<Self>
    where
        Self: Sized;
}

/// Read an optional numeric keyword
///
/// A keyword that is present but not numeric makes the map degenerate.
pub(crate) fn optional_f64(header: &Header, key: &str) -> FitsResult<Option<f64>> {
    match header.get(key) {
        None => Ok(None),
        Some(value) => value.as_f64()
            .map(Some)
            .ok_or_else(|| FitsError::DegenerateMap(format!("{} is not numeric: {}", key, value))),
    }
}

/// Read a mandatory numeric keyword
pub(crate) fn required_f64(header: &Header, key: &str) -> FitsResult<f64> {
    optional_f64(header, key)?
        .ok_or_else(|| FitsError::DegenerateMap(format!("{} is missing", key)))
}

/// FITS world coordinate system for the two image axes
#[derive(Debug, Clone, PartialEq)]
pub struct Wcs {
    ctype: [Option<String>; 2],
    cunit: [Option<String>; 2],
    crval: [f64; 2],
    /// Reference pixel, 1-based FITS convention (x, y)
    crpix: [f64; 2],
    linear: LinearTransform,
    projection: Projection,
    sip: Option<SipDistortion>,
    /// Keywords carried through unchanged
    auxiliary: Vec<Card>,
}

impl Wcs {
    /// Create a linear WCS without axis types
    ///
    /// # Arguments
    /// * `crpix` - Reference pixel, 1-based FITS (x, y)
    /// * `crval` - World coordinate at the reference pixel
    /// * `linear` - Pixel to intermediate world transform
    pub fn new(crpix: [f64; 2], crval: [f64; 2], linear: LinearTransform) -> Self {
        Wcs {
            ctype: [None, None],
            cunit: [None, None],
            crval,
            crpix,
            linear,
            projection: Projection::Linear,
            sip: None,
            auxiliary: Vec::new(),
        }
    }

    /// Create an equatorial gnomonic WCS (`RA---TAN`, `DEC--TAN`) from a CD matrix
    pub fn tan(crpix: [f64; 2], crval: [f64; 2], cd: [[f64; 2]; 2]) -> Self {
        Wcs::new(crpix, crval, LinearTransform::Cd(cd)).with_ctype(["RA---TAN", "DEC--TAN"])
    }

    /// Set the axis types; the projection follows the first axis
    pub fn with_ctype(mut self, ctype: [&str; 2]) -> Self {
        self.projection = Projection::from_ctype(Some(ctype[0]));
        self.ctype = [Some(ctype[0].to_string()), Some(ctype[1].to_string())];
        self
    }

    /// Attach SIP distortion, marking the axis types with `-SIP`
    pub fn with_sip(mut self, sip: SipDistortion) -> Self {
        for ctype in self.ctype.iter_mut().flatten() {
            if !ctype.ends_with(wcs_keys::SIP_SUFFIX) {
                ctype.push_str(wcs_keys::SIP_SUFFIX);
            }
        }
        self.sip = Some(sip);
        self
    }

    /// Find a WCS in a header
    ///
    /// # Returns
    /// `Ok(None)` when the header carries no WCS keywords at all, the parsed
    /// WCS when it does, or `DegenerateMap` when they are incomplete
    pub fn detect(header: &Header) -> FitsResult<Option<Wcs>> {
        let has_wcs = wcs_keys::CTYPE.iter()
            .chain(wcs_keys::CRPIX.iter())
            .chain(wcs_keys::CRVAL.iter())
            .chain(wcs_keys::CDELT.iter())
            .chain(wcs_keys::CD.iter().flatten())
            .chain(wcs_keys::PC.iter().flatten())
            .any(|key| header.contains(key));

        if has_wcs {
            <Wcs as CoordinateMap>::from_header(header).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn crpix(&self) -> [f64; 2] {
        self.crpix
    }

    pub fn crval(&self) -> [f64; 2] {
        self.crval
    }

    pub fn ctype(&self, axis: usize) -> Option<&str> {
        self.ctype.get(axis).and_then(|c| c.as_deref())
    }

    pub fn cunit(&self, axis: usize) -> Option<&str> {
        self.cunit.get(axis).and_then(|c| c.as_deref())
    }

    pub fn linear(&self) -> &LinearTransform {
        &self.linear
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn sip(&self) -> Option<&SipDistortion> {
        self.sip.as_ref()
    }

    pub fn auxiliary(&self) -> &[Card] {
        &self.auxiliary
    }

    /// Native longitude of the celestial pole in degrees
    ///
    /// Zenithal projections default to 180 unless the reference point is the
    /// north pole.
    pub fn lonpole(&self) -> f64 {
        self.auxiliary.iter()
            .find(|card| card.keyword == wcs_keys::LONPOLE)
            .and_then(|card| card.value.as_ref())
            .and_then(|value| value.as_f64())
            .unwrap_or(if self.crval[1] < 90.0 { 180.0 } else { 0.0 })
    }
}

impl CoordinateMap for Wcs {
    fn pixel_to_world(&self, pixel: PixelPosition) -> Option<WorldPoint> {
        let mut u = pixel.col + 1.0 - self.crpix[0];
        let mut v = pixel.row + 1.0 - self.crpix[1];
        if let Some(sip) = &self.sip {
            (u, v) = sip.apply_forward(u, v);
        }

        let m = self.linear.matrix();
        let x = m[0][0] * u + m[0][1] * v;
        let y = m[1][0] * u + m[1][1] * v;
        self.projection.to_world(x, y, self.crval, self.lonpole())
    }

    fn world_to_pixel(&self, world: WorldPoint) -> Option<PixelPosition> {
        let (x, y) = self.projection.to_intermediate(world, self.crval, self.lonpole())?;
        let inv = self.linear.inverse()?;
        let mut u = inv[0][0] * x + inv[0][1] * y;
        let mut v = inv[1][0] * x + inv[1][1] * y;
        if let Some(sip) = &self.sip {
            (u, v) = sip.apply_inverse(u, v)?;
        }

        let pixel = PixelPosition::new(v + self.crpix[1] - 1.0, u + self.crpix[0] - 1.0);
        pixel.is_finite().then_some(pixel)
    }

    fn reference_pixel(&self) -> PixelPosition {
        PixelPosition::new(self.crpix[1] - 1.0, self.crpix[0] - 1.0)
    }

    fn set_reference_pixel(&mut self, pixel: PixelPosition) {
        self.crpix = [pixel.col + 1.0, pixel.row + 1.0];
    }

    // Subtract directly so integer offsets stay exact
    fn shift_origin(&mut self, row0: f64, col0: f64) {
        self.crpix[0] -= col0;
        self.crpix[1] -= row0;
    }

    fn validate(&self) -> FitsResult<()> {
        if !self.crpix.iter().chain(self.crval.iter()).all(|v| v.is_finite()) {
            return Err(FitsError::DegenerateMap("CRPIX and CRVAL must be finite".to_string()));
        }
        if !self.linear.is_finite() {
            return Err(FitsError::DegenerateMap("linear transform has non-finite terms".to_string()));
        }
        if self.linear.inverse().is_none() {
            return Err(FitsError::DegenerateMap("linear transform is singular".to_string()));
        }
        if let Some(sip) = &self.sip {
            if !sip.is_finite() {
                return Err(FitsError::DegenerateMap("SIP coefficients must be finite".to_string()));
            }
        }
        Ok(())
    }

    fn to_header(&self) -> Header {
        let mut cards = Vec::new();

        for (key, value) in wcs_keys::CTYPE.iter().zip(self.ctype.iter()) {
            if let Some(value) = value {
                cards.push(Card::new(key, value.as_str()));
            }
        }
        for (key, value) in wcs_keys::CUNIT.iter().zip(self.cunit.iter()) {
            if let Some(value) = value {
                cards.push(Card::new(key, value.as_str()));
            }
        }
        for (key, value) in wcs_keys::CRVAL.iter().zip(self.crval.iter()) {
            cards.push(Card::new(key, *value));
        }
        for (key, value) in wcs_keys::CRPIX.iter().zip(self.crpix.iter()) {
            cards.push(Card::new(key, *value).with_comment("Pixel coordinate of reference point"));
        }

        cards.extend(self.linear.to_cards());
        if let Some(sip) = &self.sip {
            cards.extend(sip.to_cards());
        }
        cards.extend(self.auxiliary.iter().cloned());

        Header::from_cards(cards)
    }

    fn from_header(header: &Header) -> FitsResult<Self> {
        let crpix = [
            required_f64(header, wcs_keys::CRPIX[0])?,
            required_f64(header, wcs_keys::CRPIX[1])?,
        ];
        let crval = [
            required_f64(header, wcs_keys::CRVAL[0])?,
            required_f64(header, wcs_keys::CRVAL[1])?,
        ];
        let linear = LinearTransform::from_header(header)?;

        let text = |key: &str| header.get_str(key).map(|s| s.trim().to_string());
        let ctype = [text(wcs_keys::CTYPE[0]), text(wcs_keys::CTYPE[1])];
        let cunit = [text(wcs_keys::CUNIT[0]), text(wcs_keys::CUNIT[1])];

        let projection = Projection::from_ctype(ctype[0].as_deref());
        let has_sip = ctype.iter()
            .flatten()
            .any(|c| c.ends_with(wcs_keys::SIP_SUFFIX));
        let sip = if has_sip {
            Some(SipDistortion::from_header(header)?)
        } else {
            None
        };

        let auxiliary = wcs_keys::AUXILIARY.iter()
            .filter_map(|key| header.card(key).cloned())
            .collect();

        let wcs = Wcs { ctype, cunit, crval, crpix, linear, projection, sip, auxiliary };
        wcs.validate()?;
        Ok(wcs)
    }
}

impl fmt::Display for Wcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} projection, CRPIX=({}, {}), CRVAL=({}, {}), scale={:.6e} deg/pixel",
            self.projection,
            self.crpix[0], self.crpix[1],
            self.crval[0], self.crval[1],
            self.linear.pixel_scale()
        )?;
        if let Some(sip) = &self.sip {
            write!(f, ", SIP order {}", sip.a.order())?;
        }
        Ok(())
    }
}
