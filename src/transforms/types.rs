//! Core transform types and error definitions
//!
//! Contains the `Primitive` enum representing every transform function the engine
//! understands, and `TransformError` for failures during construction, inversion,
//! decomposition and parsing.

use crate::matrix::{AffineMatrix, Point};

/// Errors that can occur while building, inverting, decomposing or parsing transforms
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum TransformError {
    /// Wrong arity or non-finite value given to a constructor or transform function
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Zero determinant on invert or decompose
    #[error("singular matrix: determinant is zero")]
    SingularMatrix,

    /// A transform function argument is not a number
    #[error("cannot parse '{token}' as a number in {function}()")]
    UnparseableNumber { function: String, token: String },
}

/// A single primitive transform operation with its numeric parameters.
///
/// This is the closed set of transform functions produced by the string codec.
/// Angles are always stored in degrees; unit conversion happens while parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Translate {
        x: f64,
        y: f64,
    },
    TranslateX(f64),
    TranslateY(f64),
    Scale {
        x: f64,
        y: f64,
    },
    ScaleX(f64),
    ScaleY(f64),
    /// Rotation in degrees, optionally about a pivot point
    Rotate {
        degrees: f64,
        pivot: Option<Point>,
    },
    /// Skew along the X axis (horizontal shear)
    SkewX {
        degrees: f64,
    },
    /// Skew along the Y axis (vertical shear)
    SkewY {
        degrees: f64,
    },
    /// Explicit matrix components
    Matrix(AffineMatrix),
}

impl Primitive {
    /// Name of the transform function as written in transform strings
    pub fn function_name(&self) -> &'static str {
        match self {
            Primitive::Translate { .. } => "translate",
            Primitive::TranslateX(_) => "translateX",
            Primitive::TranslateY(_) => "translateY",
            Primitive::Scale { .. } => "scale",
            Primitive::ScaleX(_) => "scaleX",
            Primitive::ScaleY(_) => "scaleY",
            Primitive::Rotate { .. } => "rotate",
            Primitive::SkewX { .. } => "skewX",
            Primitive::SkewY { .. } => "skewY",
            Primitive::Matrix(_) => "matrix",
        }
    }
}
