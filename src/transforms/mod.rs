//! Transform primitives, decomposition and transform strings
//!
//! # Module Structure
//!
//! - [`types`] - The `Primitive` enum and error definitions
//! - [`builder`] - Named primitive operations on `AffineMatrix`
//! - [`decompose`] - Factoring a matrix into translate, rotate, shear and scale
//! - [`css`] - Parsing and serializing CSS-style transform strings

pub mod builder;
pub mod css;
pub mod decompose;
pub mod types;

// Re-export main types at the module level for convenience
pub use css::{parse, parse_primitives, serialize, DEFAULT_PRECISION};
pub use decompose::{decompose, DecomposedTransform};
pub use types::{Primitive, TransformError};
