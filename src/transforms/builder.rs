//! Named transform primitives
//!
//! Every operation multiplies the receiver by one canonical primitive matrix and
//! returns the product. Receivers are never modified.

use std::f64::consts::PI;

use super::types::{Primitive, TransformError};
use crate::matrix::{AffineMatrix, Point};

const DEG_TO_RAD: f64 = PI / 180.0;

impl AffineMatrix {
    /// `[1, 0, 0, 1, tx, ty]`
    ///
    /// Fails with [`TransformError::InvalidArgument`] on a non-finite offset.
    pub fn from_translation(tx: f64, ty: f64) -> Result<Self, TransformError> {
        Self::from_components(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `[sx, 0, 0, sy, 0, 0]`
    pub fn from_scale(sx: f64, sy: f64) -> Result<Self, TransformError> {
        Self::from_components(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// `[cos r, sin r, -sin r, cos r, 0, 0]`
    ///
    /// A positive angle rotates the positive X axis toward positive Y.
    pub fn from_rotation_radians(radians: f64) -> Result<Self, TransformError> {
        let (sin, cos) = radians.sin_cos();
        Self::from_components(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// `[1, 0, tan a, 1, 0, 0]`
    pub fn from_skew_x_radians(radians: f64) -> Result<Self, TransformError> {
        Self::from_components(1.0, 0.0, radians.tan(), 1.0, 0.0, 0.0)
    }

    /// `[1, tan a, 0, 1, 0, 0]`
    pub fn from_skew_y_radians(radians: f64) -> Result<Self, TransformError> {
        Self::from_components(1.0, radians.tan(), 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translate(&self, tx: f64, ty: f64) -> Self {
        self.multiply(&Self::from_components_unchecked(1.0, 0.0, 0.0, 1.0, tx, ty))
    }

    pub fn translate_x(&self, tx: f64) -> Self {
        self.translate(tx, 0.0)
    }

    pub fn translate_y(&self, ty: f64) -> Self {
        self.translate(0.0, ty)
    }

    /// Non-uniform scale about the origin
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        self.multiply(&Self::scaling(sx, sy))
    }

    pub fn scale_uniform(&self, s: f64) -> Self {
        self.scale(s, s)
    }

    pub fn scale_x(&self, sx: f64) -> Self {
        self.scale(sx, 1.0)
    }

    pub fn scale_y(&self, sy: f64) -> Self {
        self.scale(1.0, sy)
    }

    /// Scale about `pivot`, which stays fixed
    pub fn scale_about(&self, sx: f64, sy: f64, pivot: Point) -> Self {
        self.about(pivot, &Self::scaling(sx, sy))
    }

    /// Rotate by `degrees` about the origin
    pub fn rotate(&self, degrees: f64) -> Self {
        self.rotate_radians(degrees * DEG_TO_RAD)
    }

    /// Rotate by `degrees` about `pivot`
    pub fn rotate_about(&self, degrees: f64, pivot: Point) -> Self {
        self.rotate_radians_about(degrees * DEG_TO_RAD, pivot)
    }

    pub fn rotate_radians(&self, radians: f64) -> Self {
        self.multiply(&Self::rotation(radians))
    }

    pub fn rotate_radians_about(&self, radians: f64, pivot: Point) -> Self {
        self.about(pivot, &Self::rotation(radians))
    }

    /// Skew along X by `degrees`
    pub fn skew_x(&self, degrees: f64) -> Self {
        self.skew_x_radians(degrees * DEG_TO_RAD)
    }

    /// Skew along Y by `degrees`
    pub fn skew_y(&self, degrees: f64) -> Self {
        self.skew_y_radians(degrees * DEG_TO_RAD)
    }

    pub fn skew_x_radians(&self, radians: f64) -> Self {
        self.multiply(&Self::from_components_unchecked(1.0, 0.0, radians.tan(), 1.0, 0.0, 0.0))
    }

    pub fn skew_y_radians(&self, radians: f64) -> Self {
        self.multiply(&Self::from_components_unchecked(1.0, radians.tan(), 0.0, 1.0, 0.0, 0.0))
    }

    /// Mirror horizontally
    pub fn flip_x(&self) -> Self {
        self.scale(-1.0, 1.0)
    }

    /// Mirror vertically
    pub fn flip_y(&self) -> Self {
        self.scale(1.0, -1.0)
    }

    /// Apply one primitive after the current transform.
    ///
    /// This is the single dispatch point for [`Primitive`]; the string codec folds
    /// parsed primitives through its checked form, [`try_then`](Self::try_then).
    pub fn then(&self, primitive: &Primitive) -> Self {
        match *primitive {
            Primitive::Translate { x, y } => self.translate(x, y),
            Primitive::TranslateX(x) => self.translate_x(x),
            Primitive::TranslateY(y) => self.translate_y(y),
            Primitive::Scale { x, y } => self.scale(x, y),
            Primitive::ScaleX(s) => self.scale_x(s),
            Primitive::ScaleY(s) => self.scale_y(s),
            Primitive::Rotate { degrees, pivot: None } => self.rotate(degrees),
            Primitive::Rotate { degrees, pivot: Some(pivot) } => self.rotate_about(degrees, pivot),
            Primitive::SkewX { degrees } => self.skew_x(degrees),
            Primitive::SkewY { degrees } => self.skew_y(degrees),
            Primitive::Matrix(m) => self.multiply(&m),
        }
    }

    /// Like [`then`](Self::then), but fails with [`TransformError::InvalidArgument`]
    /// when the product has a non-finite component
    pub fn try_then(&self, primitive: &Primitive) -> Result<Self, TransformError> {
        let next = self.then(primitive);
        if next.is_finite() {
            Ok(next)
        } else {
            Err(TransformError::InvalidArgument(format!(
                "{}() produces a non-finite matrix",
                primitive.function_name()
            )))
        }
    }

    // translate(p) . op . translate(-p) keeps p fixed
    fn about(&self, pivot: Point, op: &AffineMatrix) -> Self {
        self.translate(pivot.x, pivot.y).multiply(op).translate(-pivot.x, -pivot.y)
    }

    fn scaling(sx: f64, sy: f64) -> Self {
        Self::from_components_unchecked(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::from_components_unchecked(cos, sin, -sin, cos, 0.0, 0.0)
    }
}

impl Primitive {
    /// The primitive on its own, applied to the identity
    pub fn to_matrix(self) -> AffineMatrix {
        AffineMatrix::identity().then(&self)
    }
}
