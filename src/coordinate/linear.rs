//! Linear part of a WCS: pixel offsets to intermediate world coordinates
//!
//! FITS headers express the same 2x2 matrix three ways. The form read from
//! a header is kept so that writing it back touches the same keywords.

use crate::coordinate::wcs::optional_f64;
use crate::fits::constants::wcs_keys;
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::header::{Card, Header};

/// Linear transformation from pixel offsets to intermediate coordinates (degrees)
#[derive(Debug, Clone, PartialEq)]
pub enum LinearTransform {
    /// `CDi_j` matrix
    Cd([[f64; 2]; 2]),
    /// `PCi_j` matrix scaled by `CDELTi`
    Pc { pc: [[f64; 2]; 2], cdelt: [f64; 2] },
    /// `CDELTi` with the older `CROTA2` rotation angle (degrees)
    Cdelt { cdelt: [f64; 2], crota2: f64 },
}

impl LinearTransform {
    /// Read the linear transformation from a header
    ///
    /// CD takes precedence over PC, which takes precedence over CDELT/CROTA2.
    /// Missing CD elements are zero and missing PC elements default to the
    /// identity; at least one scale keyword must be present.
    ///
    /// # Arguments
    /// * `header` - Header holding the WCS keywords
    ///
    /// # Returns
    /// The transform in the form found in the header, or `DegenerateMap`
    pub fn from_header(header: &Header) -> FitsResult<Self> {
        if has_any(header, &wcs_keys::CD) {
            let mut cd = [[0.0; 2]; 2];
            for (i, row) in wcs_keys::CD.iter().enumerate() {
                for (j, key) in row.iter().enumerate() {
                    cd[i][j] = optional_f64(header, key)?.unwrap_or(0.0);
                }
            }
            return Ok(LinearTransform::Cd(cd));
        }

        let cdelt = [
            optional_f64(header, wcs_keys::CDELT[0])?,
            optional_f64(header, wcs_keys::CDELT[1])?,
        ];

        if has_any(header, &wcs_keys::PC) {
            let mut pc = [[1.0, 0.0], [0.0, 1.0]];
            for (i, row) in wcs_keys::PC.iter().enumerate() {
                for (j, key) in row.iter().enumerate() {
                    if let Some(value) = optional_f64(header, key)? {
                        pc[i][j] = value;
                    }
                }
            }
            return Ok(LinearTransform::Pc {
                pc,
                cdelt: [cdelt[0].unwrap_or(1.0), cdelt[1].unwrap_or(1.0)],
            });
        }

        if cdelt.iter().all(Option::is_none) {
            return Err(FitsError::DegenerateMap(
                "no CDi_j, PCi_j or CDELTi scale keywords".to_string()));
        }

        Ok(LinearTransform::Cdelt {
            cdelt: [cdelt[0].unwrap_or(1.0), cdelt[1].unwrap_or(1.0)],
            crota2: optional_f64(header, wcs_keys::CROTA2)?.unwrap_or(0.0),
        })
    }

    /// Effective CD matrix
    pub fn matrix(&self) -> [[f64; 2]; 2] {
        match self {
            LinearTransform::Cd(cd) => *cd,
            LinearTransform::Pc { pc, cdelt } => [
                [cdelt[0] * pc[0][0], cdelt[0] * pc[0][1]],
                [cdelt[1] * pc[1][0], cdelt[1] * pc[1][1]],
            ],
            LinearTransform::Cdelt { cdelt, crota2 } => {
                let (sin, cos) = crota2.to_radians().sin_cos();
                [
                    [cdelt[0] * cos, -cdelt[1] * sin],
                    [cdelt[0] * sin, cdelt[1] * cos],
                ]
            },
        }
    }

    pub fn determinant(&self) -> f64 {
        let m = self.matrix();
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }

    /// Inverse of the effective matrix, `None` when singular
    pub fn inverse(&self) -> Option<[[f64; 2]; 2]> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let m = self.matrix();
        Some([
            [m[1][1] / det, -m[0][1] / det],
            [-m[1][0] / det, m[0][0] / det],
        ])
    }

    /// Approximate pixel scale in world units per pixel
    pub fn pixel_scale(&self) -> f64 {
        self.determinant().abs().sqrt()
    }

    /// Whether every parameter is finite
    pub fn is_finite(&self) -> bool {
        match self {
            LinearTransform::Cd(cd) => cd.iter().flatten().all(|v| v.is_finite()),
            LinearTransform::Pc { pc, cdelt } => {
                pc.iter().flatten().chain(cdelt.iter()).all(|v| v.is_finite())
            },
            LinearTransform::Cdelt { cdelt, crota2 } => {
                cdelt.iter().all(|v| v.is_finite()) && crota2.is_finite()
            },
        }
    }

    /// Header cards for this transform, in the form it was defined
    pub fn to_cards(&self) -> Vec<Card> {
        match self {
            LinearTransform::Cd(cd) => matrix_cards(&wcs_keys::CD, cd),
            LinearTransform::Pc { pc, cdelt } => {
                let mut cards = cdelt_cards(cdelt);
                cards.extend(matrix_cards(&wcs_keys::PC, pc));
                cards
            },
            LinearTransform::Cdelt { cdelt, crota2 } => {
                let mut cards = cdelt_cards(cdelt);
                if *crota2 != 0.0 {
                    cards.push(Card::new(wcs_keys::CROTA2, *crota2));
                }
                cards
            },
        }
    }
}

fn has_any(header: &Header, keys: &[[&str; 2]; 2]) -> bool {
    keys.iter().flatten().any(|key| header.contains(key))
}

fn matrix_cards(keys: &[[&str; 2]; 2], matrix: &[[f64; 2]; 2]) -> Vec<Card> {
    keys.iter()
        .flatten()
        .zip(matrix.iter().flatten())
        .map(|(key, value)| Card::new(key, *value))
        .collect()
}

fn cdelt_cards(cdelt: &[f64; 2]) -> Vec<Card> {
    wcs_keys::CDELT.iter()
        .zip(cdelt.iter())
        .map(|(key, value)| Card::new(key, *value))
        .collect()
}
