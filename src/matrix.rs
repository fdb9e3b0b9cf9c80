//! Affine matrix value type
//!
//! An [`AffineMatrix`] stores the six coefficients `(a, b, c, d, e, f)` of the
//! homogeneous matrix
//!
//! ```text
//! | a  c  e |
//! | b  d  f |
//! | 0  0  1 |
//! ```
//!
//! The bottom row is implicit. Every operation returns a new matrix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use std::str::FromStr;

use crate::transforms::TransformError;

/// Tolerance used by [`AffineMatrix::equals`]
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// A 2D affine transform in homogeneous form.
///
/// # Example
///
/// ```
/// use affx::{AffineMatrix, Point};
///
/// let m = AffineMatrix::identity().translate(10.0, 5.0).scale_uniform(2.0);
/// assert_eq!(m.apply(Point::new(1.0, 1.0)), Point::new(12.0, 7.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 6]", into = "[f64; 6]")]
pub struct AffineMatrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl AffineMatrix {
    /// The identity transform
    pub const IDENTITY: AffineMatrix =
        AffineMatrix { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// Create the identity matrix
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Create a matrix from its six components.
    ///
    /// Fails with [`TransformError::InvalidArgument`] if any component is NaN or infinite.
    pub fn from_components(
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<Self, TransformError> {
        let components = [a, b, c, d, e, f];
        if let Some(idx) = components.iter().position(|v| !v.is_finite()) {
            return Err(TransformError::InvalidArgument(format!(
                "component {} must be finite, got {}",
                COMPONENT_NAMES[idx], components[idx]
            )));
        }
        Ok(Self::from_components_unchecked(a, b, c, d, e, f))
    }

    /// Create a matrix from a slice of exactly six components
    pub fn from_array(components: &[f64]) -> Result<Self, TransformError> {
        match *components {
            [a, b, c, d, e, f] => Self::from_components(a, b, c, d, e, f),
            _ => Err(TransformError::InvalidArgument(format!(
                "expected 6 components, got {}",
                components.len()
            ))),
        }
    }

    /// Build from values already known to be well formed (results of arithmetic on
    /// valid matrices)
    pub(crate) const fn from_components_unchecked(
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The components in `[a, b, c, d, e, f]` order
    pub fn to_components(self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn e(&self) -> f64 {
        self.e
    }

    pub fn f(&self) -> f64 {
        self.f
    }

    /// Compose `self ∘ other`.
    ///
    /// `other` is applied to points first, then `self`. This is what makes chained
    /// builder calls read left to right: in `m.translate(x, y).scale(s, s)` the scale
    /// happens in the frame established by the translate.
    pub fn multiply(&self, other: &AffineMatrix) -> AffineMatrix {
        let (m1, m2) = (self, other);
        AffineMatrix {
            a: m1.a * m2.a + m1.c * m2.b,
            b: m1.b * m2.a + m1.d * m2.b,
            c: m1.a * m2.c + m1.c * m2.d,
            d: m1.b * m2.c + m1.d * m2.d,
            e: m1.a * m2.e + m1.c * m2.f + m1.e,
            f: m1.b * m2.e + m1.d * m2.f + m1.f,
        }
    }

    /// Transform a point
    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }

    /// Determinant of the linear 2x2 block
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.c * self.b
    }

    /// Whether [`invert`](Self::invert) would succeed
    pub fn is_invertible(&self) -> bool {
        self.determinant() != 0.0
    }

    /// Compute the inverse transform.
    ///
    /// Only an exactly zero determinant is rejected as singular; nearly singular
    /// matrices invert to very large coefficients. An inverse too large for `f64`
    /// fails with [`TransformError::InvalidArgument`].
    pub fn invert(&self) -> Result<AffineMatrix, TransformError> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(TransformError::SingularMatrix);
        }

        let AffineMatrix { a, b, c, d, e, f } = *self;
        let inverse = AffineMatrix {
            a: d / det,
            b: -b / det,
            c: -c / det,
            d: a / det,
            e: (c * f - d * e) / det,
            f: (b * e - a * f) / det,
        };
        if !inverse.is_finite() {
            return Err(TransformError::InvalidArgument(format!(
                "inverse of {} overflows (determinant {})",
                self, det
            )));
        }
        Ok(inverse)
    }

    /// Component-wise comparison with [`DEFAULT_TOLERANCE`]
    pub fn equals(&self, other: &AffineMatrix) -> bool {
        self.equals_within(other, DEFAULT_TOLERANCE)
    }

    /// True iff every component differs by at most `tolerance`
    pub fn equals_within(&self, other: &AffineMatrix, tolerance: f64) -> bool {
        self.to_components()
            .iter()
            .zip(other.to_components().iter())
            .all(|(x, y)| (x - y).abs() <= tolerance)
    }

    /// Whether every component is finite.
    ///
    /// Always true for matrices from the checked constructors, [`invert`](Self::invert)
    /// and [`parse`](crate::transforms::parse). Unchecked builder chains can overflow.
    pub fn is_finite(&self) -> bool {
        self.to_components().iter().all(|v| v.is_finite())
    }

    /// Check if this matrix is the identity within [`DEFAULT_TOLERANCE`]
    pub fn is_identity(&self) -> bool {
        self.equals(&Self::IDENTITY)
    }

    /// `matrix(a,b,c,d,e,f)` with every component at full precision
    pub fn to_canonical_string(self) -> String {
        format!("matrix({},{},{},{},{},{})", self.a, self.b, self.c, self.d, self.e, self.f)
    }
}

const COMPONENT_NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for AffineMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl TryFrom<[f64; 6]> for AffineMatrix {
    type Error = TransformError;

    fn try_from(components: [f64; 6]) -> Result<Self, Self::Error> {
        Self::from_array(&components)
    }
}

impl TryFrom<&[f64]> for AffineMatrix {
    type Error = TransformError;

    fn try_from(components: &[f64]) -> Result<Self, Self::Error> {
        Self::from_array(components)
    }
}

impl From<AffineMatrix> for [f64; 6] {
    fn from(m: AffineMatrix) -> Self {
        m.to_components()
    }
}

impl FromStr for AffineMatrix {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::transforms::parse(s)
    }
}

impl Mul for AffineMatrix {
    type Output = AffineMatrix;

    fn mul(self, other: AffineMatrix) -> AffineMatrix {
        self.multiply(&other)
    }
}

impl Mul<Point> for AffineMatrix {
    type Output = Point;

    fn mul(self, point: Point) -> Point {
        self.apply(point)
    }
}
