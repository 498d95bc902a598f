//! Simple Imaging Polynomial (SIP) distortion
//!
//! SIP adds a polynomial correction to the pixel offsets from the reference
//! pixel before the linear transform is applied. The forward polynomials
//! (`A`, `B`) are mandatory; the inverse ones (`AP`, `BP`) are optional, and
//! without them the inverse is solved iteratively.

use crate::coordinate::wcs::optional_f64;
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::header::{Card, Header};

/// Iteration limit for the fixed-point inverse
const MAX_INVERSE_ITERATIONS: usize = 50;

/// Convergence threshold for the fixed-point inverse, in pixels
const INVERSE_TOLERANCE: f64 = 1e-10;

/// Highest polynomial order the SIP convention allows
pub const MAX_ORDER: i64 = 9;

/// One distortion polynomial, `sum(c_pq * u^p * v^q)` for `p + q <= order`
#[derive(Debug, Clone, PartialEq)]
pub struct SipPolynomial {
    order: usize,
    /// Non-zero terms as `(p, q, coefficient)`
    terms: Vec<(usize, usize, f64)>,
}

impl SipPolynomial {
    /// Create a polynomial from its terms
    ///
    /// Terms above the order or with a zero coefficient are dropped; the rest
    /// are kept sorted by `(p, q)`.
    pub fn new(order: usize, terms: Vec<(usize, usize, f64)>) -> Self {
        let mut terms: Vec<_> = terms.into_iter()
            .filter(|&(p, q, c)| p + q <= order && c != 0.0)
            .collect();
        terms.sort_by_key(|&(p, q, _)| (p, q));
        SipPolynomial { order, terms }
    }

    /// Read the polynomial with the given prefix (`A`, `B`, `AP` or `BP`)
    ///
    /// # Returns
    /// `Ok(None)` when `<prefix>_ORDER` is absent
    pub fn from_header(header: &Header, prefix: &str) -> FitsResult<Option<Self>> {
        let order_key = format!("{}_ORDER", prefix);
        let order = match header.get(&order_key) {
            None => return Ok(None),
            Some(value) => value.as_i64()
                .filter(|order| (0..=MAX_ORDER).contains(order))
                .ok_or_else(|| FitsError::DegenerateMap(format!(
                    "{} must be an integer from 0 to {}", order_key, MAX_ORDER)))?,
        };
        let order = order as usize;

        let mut terms = Vec::new();
        for p in 0..=order {
            for q in 0..=(order - p) {
                if let Some(c) = optional_f64(header, &format!("{}_{}_{}", prefix, p, q))? {
                    terms.push((p, q, c));
                }
            }
        }

        Ok(Some(SipPolynomial::new(order, terms)))
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn terms(&self) -> &[(usize, usize, f64)] {
        &self.terms
    }

    /// Evaluate the polynomial at an offset from the reference pixel
    pub fn eval(&self, u: f64, v: f64) -> f64 {
        self.terms.iter()
            .map(|&(p, q, c)| c * u.powi(p as i32) * v.powi(q as i32))
            .sum()
    }

    pub fn is_finite(&self) -> bool {
        self.terms.iter().all(|(_, _, c)| c.is_finite())
    }

    /// Header cards for this polynomial
    pub fn to_cards(&self, prefix: &str) -> Vec<Card> {
        let mut cards = vec![Card::new(&format!("{}_ORDER", prefix), self.order)];
        cards.extend(self.terms.iter()
            .map(|&(p, q, c)| Card::new(&format!("{}_{}_{}", prefix, p, q), c)));
        cards
    }
}

/// Complete SIP distortion model
#[derive(Debug, Clone, PartialEq)]
pub struct SipDistortion {
    pub a: SipPolynomial,
    pub b: SipPolynomial,
    pub ap: Option<SipPolynomial>,
    pub bp: Option<SipPolynomial>,
}

impl SipDistortion {
    /// Create a distortion model without inverse polynomials
    pub fn new(a: SipPolynomial, b: SipPolynomial) -> Self {
        SipDistortion { a, b, ap: None, bp: None }
    }

    /// Attach inverse polynomials
    pub fn with_inverse(mut self, ap: SipPolynomial, bp: SipPolynomial) -> Self {
        self.ap = Some(ap);
        self.bp = Some(bp);
        self
    }

    /// Read the distortion terms from a header whose CTYPE carries `-SIP`
    ///
    /// A missing `A_ORDER` or `B_ORDER` makes the map degenerate.
    pub fn from_header(header: &Header) -> FitsResult<Self> {
        let a = SipPolynomial::from_header(header, "A")?
            .ok_or_else(|| FitsError::DegenerateMap("SIP CTYPE without A_ORDER".to_string()))?;
        let b = SipPolynomial::from_header(header, "B")?
            .ok_or_else(|| FitsError::DegenerateMap("SIP CTYPE without B_ORDER".to_string()))?;

        Ok(SipDistortion {
            a,
            b,
            ap: SipPolynomial::from_header(header, "AP")?,
            bp: SipPolynomial::from_header(header, "BP")?,
        })
    }

    /// Distort offsets from the reference pixel
    pub fn apply_forward(&self, u: f64, v: f64) -> (f64, f64) {
        (u + self.a.eval(u, v), v + self.b.eval(u, v))
    }

    /// Undo the distortion
    ///
    /// Uses the inverse polynomials when both are present; otherwise solves
    /// `U = u + A(u, v)` by fixed-point iteration.
    pub fn apply_inverse(&self, u: f64, v: f64) -> Option<(f64, f64)> {
        if let (Some(ap), Some(bp)) = (&self.ap, &self.bp) {
            return Some((u + ap.eval(u, v), v + bp.eval(u, v)));
        }

        let (mut x, mut y) = (u, v);
        for _ in 0..MAX_INVERSE_ITERATIONS {
            let next_x = u - self.a.eval(x, y);
            let next_y = v - self.b.eval(x, y);
            if !next_x.is_finite() || !next_y.is_finite() {
                return None;
            }
            let step = (next_x - x).abs().max((next_y - y).abs());
            x = next_x;
            y = next_y;
            if step < INVERSE_TOLERANCE {
                break;
            }
        }
        Some((x, y))
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.ap.as_ref().map_or(true, SipPolynomial::is_finite)
            && self.bp.as_ref().map_or(true, SipPolynomial::is_finite)
    }

    pub fn to_cards(&self) -> Vec<Card> {
        let mut cards = self.a.to_cards("A");
        cards.extend(self.b.to_cards("B"));
        if let Some(ap) = &self.ap {
            cards.extend(ap.to_cards("AP"));
        }
        if let Some(bp) = &self.bp {
            cards.extend(bp.to_cards("BP"));
        }
        cards
    }
}
