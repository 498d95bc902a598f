//! Sky projections between intermediate and celestial coordinates
//!
//! Zenithal projections place the native pole at the reference world
//! coordinate. All angles are in degrees.

use std::fmt;

use crate::coordinate::point::WorldPoint;
use crate::fits::keywords;

/// Projection named by the last three characters of `CTYPEi`
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// No projection: world = reference value + intermediate offset
    Linear,
    /// Gnomonic
    Tan,
    /// Slant orthographic
    Sin,
    /// Any other code; cropping works but the map cannot be evaluated
    Other(String),
}

impl Projection {
    /// Determine the projection from a CTYPE value such as `RA---TAN-SIP`
    ///
    /// Values without a `-` separated algorithm code in characters 6-8 are
    /// linear axes.
    pub fn from_ctype(ctype: Option<&str>) -> Self {
        let ctype = match ctype {
            Some(value) => value.trim(),
            None => return Projection::Linear,
        };

        if ctype.len() < 8 || !ctype.is_char_boundary(8) || ctype.as_bytes()[4] != b'-' {
            return Projection::Linear;
        }

        match ctype[5..8].trim_matches('-').trim() {
            "" => Projection::Linear,
            "TAN" => Projection::Tan,
            "SIN" => Projection::Sin,
            code => Projection::Other(code.to_string()),
        }
    }

    /// Three-letter algorithm code
    pub fn code(&self) -> &str {
        match self {
            Projection::Linear => "",
            Projection::Tan => "TAN",
            Projection::Sin => "SIN",
            Projection::Other(code) => code,
        }
    }

    /// Whether the map can be evaluated with this projection
    pub fn is_supported(&self) -> bool {
        !matches!(self, Projection::Other(_))
    }

    /// Intermediate coordinates to a world point
    ///
    /// # Arguments
    /// * `x`, `y` - Intermediate world coordinates in degrees
    /// * `crval` - Reference world coordinate
    /// * `lonpole` - Native longitude of the celestial pole
    ///
    /// # Returns
    /// The world point, or `None` when the offset lies outside the
    /// projection's domain
    pub fn to_world(&self, x: f64, y: f64, crval: [f64; 2], lonpole: f64) -> Option<WorldPoint> {
        let (phi, theta) = match self {
            Projection::Linear => return Some(WorldPoint::new(crval[0] + x, crval[1] + y)),
            Projection::Other(_) => return None,
            Projection::Tan | Projection::Sin => {
                let r = x.hypot(y);
                let phi = if r == 0.0 { 0.0 } else { x.atan2(-y) };
                let theta = if *self == Projection::Tan {
                    (180.0 / std::f64::consts::PI).atan2(r)
                } else {
                    let s = r.to_radians();
                    if s > 1.0 {
                        return None;
                    }
                    s.acos()
                };
                (phi, theta)
            },
        };

        let (lon, lat) = native_to_celestial(phi, theta, crval, lonpole.to_radians());
        let point = WorldPoint::new(lon.to_degrees().rem_euclid(360.0), lat.to_degrees());
        if point.lon.is_finite() && point.lat.is_finite() {
            Some(point)
        } else {
            None
        }
    }

    /// World point to intermediate coordinates
    ///
    /// Returns `None` for points the projection cannot represent, such as
    /// the hemisphere behind a gnomonic tangent plane.
    pub fn to_intermediate(&self, world: WorldPoint, crval: [f64; 2], lonpole: f64) -> Option<(f64, f64)> {
        if !world.lon.is_finite() || !world.lat.is_finite() {
            return None;
        }

        let (radius, phi) = match self {
            Projection::Linear => return Some((world.lon - crval[0], world.lat - crval[1])),
            Projection::Other(_) => return None,
            Projection::Tan | Projection::Sin => {
                let (phi, theta) = celestial_to_native(world, crval, lonpole.to_radians());
                let r = if *self == Projection::Tan {
                    if theta <= 0.0 {
                        return None;
                    }
                    theta.cos() / theta.sin()
                } else {
                    if theta < 0.0 {
                        return None;
                    }
                    theta.cos()
                };
                (r.to_degrees(), phi)
            },
        };

        Some((radius * phi.sin(), -radius * phi.cos()))
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Linear => write!(f, "linear"),
            _ => write!(f, "{} ({})", self.code(), keywords::projection_name(self.code())),
        }
    }
}

/// Native spherical coordinates (radians) to celestial (radians)
fn native_to_celestial(phi: f64, theta: f64, crval: [f64; 2], phi_p: f64) -> (f64, f64) {
    let alpha_p = crval[0].to_radians();
    let (sin_dp, cos_dp) = crval[1].to_radians().sin_cos();
    let (sin_t, cos_t) = theta.sin_cos();
    let dphi = phi - phi_p;

    // Unit vector in the celestial frame
    let x = -cos_t * dphi.sin();
    let y = sin_t * cos_dp - cos_t * sin_dp * dphi.cos();
    let z = sin_t * sin_dp + cos_t * cos_dp * dphi.cos();

    (alpha_p + x.atan2(y), z.atan2(x.hypot(y)))
}

/// Celestial coordinates to native spherical coordinates (radians)
fn celestial_to_native(world: WorldPoint, crval: [f64; 2], phi_p: f64) -> (f64, f64) {
    let (sin_dp, cos_dp) = crval[1].to_radians().sin_cos();
    let (sin_d, cos_d) = world.lat.to_radians().sin_cos();
    let dalpha = (world.lon - crval[0]).to_radians();

    // Unit vector in the native frame
    let x = -cos_d * dalpha.sin();
    let y = sin_d * cos_dp - cos_d * sin_dp * dalpha.cos();
    let z = sin_d * sin_dp + cos_d * cos_dp * dalpha.cos();

    (phi_p + x.atan2(y), z.atan2(x.hypot(y)))
}
