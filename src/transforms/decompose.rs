//! Matrix decomposition
//!
//! Factors an affine matrix into translate, rotate, shear and scale components.
//!
//! The linear block `[X | Y]` (columns `X = (a, b)` and `Y = (c, d)`) is split with a
//! Gram-Schmidt step. `X` gives the x scale and the rotation directly. Whatever part of
//! `Y` lies along `X` is shear, and the remainder, orthogonal to `X`, is the y scale.
//! This is the factorization
//!
//! ```text
//! [X | Y] = R(θ) · [ 1  shear ] · [ sx  0  ]
//!                  [ 0    1   ]   [ 0   sy ]
//! ```
//!
//! so recomposition applies scale first, then shear, then rotation, then translation.

use log::{debug, trace};
use serde::Serialize;
use std::f64::consts::TAU;

use super::types::TransformError;
use crate::matrix::AffineMatrix;

/// How far below zero `sin θ` may fall and still count as the upper half-plane.
///
/// Without this, a rotation of exactly 0 or π whose sine picked up rounding noise of
/// the wrong sign would flip to the other branch and come out as nearly 2π.
const ROTATION_EPSILON: f64 = 1e-12;

/// The components of an affine matrix.
///
/// Produced only by [`decompose`]; [`recompose`](Self::recompose) turns it back into
/// the source matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecomposedTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Rotation in radians, in `[0, 2π)`
    pub rotation: f64,
    /// Tangent of the x skew angle (not the angle itself)
    pub shear: f64,
    pub scale_x: f64,
    /// Negative when the matrix contains a reflection
    pub scale_y: f64,
}

impl DecomposedTransform {
    /// Rotation in degrees, in `[0, 360)`
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }

    /// Skew angle in radians corresponding to [`shear`](Self::shear)
    pub fn skew_radians(&self) -> f64 {
        self.shear.atan()
    }

    /// Rebuild the matrix: translate, then rotate, then skew X, then scale
    pub fn recompose(&self) -> AffineMatrix {
        AffineMatrix::identity()
            .translate(self.translate_x, self.translate_y)
            .rotate_radians(self.rotation)
            .skew_x_radians(self.skew_radians())
            .scale(self.scale_x, self.scale_y)
    }
}

impl AffineMatrix {
    /// See [`decompose`]
    pub fn decompose(&self) -> Result<DecomposedTransform, TransformError> {
        decompose(self)
    }
}

/// Decompose a matrix into translation, rotation, shear and scale.
///
/// Fails with [`TransformError::SingularMatrix`] when the determinant is exactly zero.
pub fn decompose(m: &AffineMatrix) -> Result<DecomposedTransform, TransformError> {
    let [a, b, c, d, e, f] = m.to_components();

    let det = a * d - b * c;
    if det == 0.0 {
        debug!("cannot decompose {}: determinant is zero", m);
        return Err(TransformError::SingularMatrix);
    }

    // Translation is outermost on recomposition, so it comes straight off the matrix
    let (translate_x, translate_y) = (e, f);

    // |X| is non-zero whenever det is, barring underflow
    let scale_x = a.hypot(b);
    if scale_x == 0.0 {
        debug!("cannot decompose {}: x axis collapsed to zero length", m);
        return Err(TransformError::SingularMatrix);
    }
    let (cos, sin) = (a / scale_x, b / scale_x);

    // Projection of Y onto the unit x axis: how far Y leans toward X
    let skew = cos * c + sin * d;

    // What is left of Y is orthogonal to X
    let ortho_x = c - skew * cos;
    let ortho_y = d - skew * sin;

    // A reflection shows up as a negative determinant; carry it in the y scale so the
    // rotation stays a proper rotation
    let scale_y = ortho_x.hypot(ortho_y).copysign(det);
    if scale_y == 0.0 {
        debug!("cannot decompose {}: y axis is parallel to x axis", m);
        return Err(TransformError::SingularMatrix);
    }

    let shear = skew / scale_y;
    let rotation = rotation_from_unit(cos, sin);

    let decomposed =
        DecomposedTransform { translate_x, translate_y, rotation, shear, scale_x, scale_y };
    trace!("decomposed {} into {:?}", m, decomposed);
    Ok(decomposed)
}

/// Angle of the unit vector `(cos, sin)` in `[0, 2π)`.
///
/// `acos` only covers `[0, π]`, so the sign of the sine picks the half-plane.
fn rotation_from_unit(cos: f64, sin: f64) -> f64 {
    let angle = cos.clamp(-1.0, 1.0).acos();
    let theta = if sin >= -ROTATION_EPSILON { angle } else { TAU - angle };

    if TAU - theta <= ROTATION_EPSILON {
        0.0
    } else {
        theta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// Deterministic xorshift generator so failures are reproducible
    struct XorShift(u64);

    impl XorShift {
        fn next_f64(&mut self, lo: f64, hi: f64) -> f64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            lo + (hi - lo) * ((self.0 >> 11) as f64 / (1u64 << 53) as f64)
        }

        fn matrix(&mut self) -> AffineMatrix {
            let mut c = [0.0; 6];
            for v in c.iter_mut().take(4) {
                *v = self.next_f64(-5.0, 5.0);
            }
            c[4] = self.next_f64(-500.0, 500.0);
            c[5] = self.next_f64(-500.0, 500.0);
            AffineMatrix::from_array(&c).unwrap()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_decompose_identity() {
        let d = decompose(&AffineMatrix::identity()).unwrap();
        assert_eq!(
            d,
            DecomposedTransform {
                translate_x: 0.0,
                translate_y: 0.0,
                rotation: 0.0,
                shear: 0.0,
                scale_x: 1.0,
                scale_y: 1.0,
            }
        );
    }

    #[test]
    fn test_decompose_translation() {
        let d = AffineMatrix::identity().translate(50.0, -20.0).decompose().unwrap();
        assert_eq!((d.translate_x, d.translate_y), (50.0, -20.0));
        assert_eq!((d.scale_x, d.scale_y), (1.0, 1.0));
    }

    #[test]
    fn test_decompose_rotation_ranges() {
        for degrees in [30.0, 90.0, 179.0, 180.0, 200.0, 270.0, 359.0] {
            let d = AffineMatrix::identity().rotate(degrees).decompose().unwrap();
            let actual = d.rotation_degrees();
            assert!((actual - degrees).abs() < 1e-6, "{} -> {}", degrees, actual);
        }
    }

    #[test]
    fn test_decompose_negative_rotation_wraps() {
        let d = AffineMatrix::identity().rotate(-90.0).decompose().unwrap();
        assert_close(d.rotation, 1.5 * PI);
    }

    #[test]
    fn test_rotation_noise_near_zero_stays_zero() {
        assert_eq!(rotation_from_unit(1.0, -1e-17), 0.0);
        assert_eq!(rotation_from_unit(1.0, -1e-10), 0.0);
        assert_close(rotation_from_unit(-1.0, -1e-17), PI);
    }

    #[test]
    fn test_rotation_full_turn_is_zero() {
        let d = AffineMatrix::identity().rotate(360.0).decompose().unwrap();
        assert!(d.rotation.abs() < 1e-12);
    }

    #[test]
    fn test_decompose_scale_and_shear() {
        let m = AffineMatrix::identity().skew_x_radians(0.5f64.atan()).scale(2.0, 3.0);
        let d = m.decompose().unwrap();
        assert_close(d.scale_x, 2.0);
        assert_close(d.scale_y, 3.0);
        assert_close(d.shear, 0.5);
        assert_close(d.rotation, 0.0);
    }

    #[test]
    fn test_decompose_reflection_uses_negative_scale_y() {
        let m = AffineMatrix::identity().flip_y();
        let d = m.decompose().unwrap();
        assert_close(d.scale_x, 1.0);
        assert_close(d.scale_y, -1.0);
        assert!(d.recompose().equals(&m));

        let m = AffineMatrix::identity().flip_x();
        let d = m.decompose().unwrap();
        assert_close(d.rotation, PI);
        assert!(d.recompose().equals(&m));
    }

    #[test]
    fn test_decompose_singular() {
        let m = AffineMatrix::from_components(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(m.decompose(), Err(TransformError::SingularMatrix));

        let m = AffineMatrix::from_components(0.0, 0.0, 0.0, 0.0, 3.0, 4.0).unwrap();
        assert_eq!(m.decompose(), Err(TransformError::SingularMatrix));
    }

    #[test]
    fn test_recompose_round_trip_random() {
        let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
        let mut checked = 0;
        while checked < 500 {
            let m = rng.matrix();
            if m.determinant().abs() < 0.5 {
                continue;
            }
            let d = m.decompose().unwrap();
            assert!((0.0..TAU).contains(&d.rotation));
            let back = d.recompose();
            assert!(back.equals_within(&m, 1e-6), "{} -> {:?} -> {}", m, d, back);
            checked += 1;
        }
    }

    #[test]
    fn test_recompose_composed_transform() {
        let m = AffineMatrix::identity()
            .translate(12.0, -7.0)
            .rotate(123.0)
            .skew_x(20.0)
            .scale(1.5, 0.25);
        let d = m.decompose().unwrap();
        assert_close(d.translate_x, 12.0);
        assert_close(d.translate_y, -7.0);
        assert!((d.rotation_degrees() - 123.0).abs() < 1e-6);
        assert_close(d.skew_radians().to_degrees(), 20.0);
        assert_close(d.scale_x, 1.5);
        assert_close(d.scale_y, 0.25);
    }
}
