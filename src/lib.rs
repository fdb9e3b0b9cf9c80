//! affx - 2D affine transform engine
//!
//! This library provides functionality to:
//! - Build and compose 2x3 affine matrices from named primitives
//! - Decompose a matrix into translate, rotate, shear and scale
//! - Parse CSS-style transform strings and render matrices back into them

pub mod cli;
pub mod config;
pub mod matrix;
pub mod transforms;

pub use matrix::{AffineMatrix, Point, DEFAULT_TOLERANCE};
pub use transforms::{
    decompose, parse, parse_primitives, serialize, DecomposedTransform, Primitive,
    TransformError, DEFAULT_PRECISION,
};
