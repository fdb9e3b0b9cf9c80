//! CSS-style transform strings
//!
//! Parses transform strings like `translate(10, 5) rotate(90deg) scale(2)` into a
//! matrix, and renders a matrix back into the shortest equivalent string.

use log::{debug, trace};
use regex::Regex;
use std::f64::consts::PI;
use std::sync::OnceLock;

use super::types::{Primitive, TransformError};
use crate::matrix::{AffineMatrix, Point};

/// Decimal digits used by [`serialize`] when no precision is given
pub const DEFAULT_PRECISION: usize = 7;

const RAD_TO_DEG: f64 = 180.0 / PI;

/// Recognized argument suffixes and their factor to degrees (or pixels).
/// `grad` must be tried before `rad`.
const UNIT_SUFFIXES: [(&str, f64); 5] =
    [("grad", 180.0 / 200.0), ("rad", RAD_TO_DEG), ("deg", 1.0), ("turn", 360.0), ("px", 1.0)];

/// Transform functions understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Translate,
    TranslateX,
    TranslateY,
    Scale,
    ScaleX,
    ScaleY,
    Rotate,
    SkewX,
    SkewY,
    Matrix,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        let function = match name.to_ascii_lowercase().as_str() {
            "translate" => Function::Translate,
            "translatex" => Function::TranslateX,
            "translatey" => Function::TranslateY,
            "scale" => Function::Scale,
            "scalex" => Function::ScaleX,
            "scaley" => Function::ScaleY,
            "rotate" => Function::Rotate,
            "skewx" => Function::SkewX,
            "skewy" => Function::SkewY,
            "matrix" => Function::Matrix,
            _ => return None,
        };
        Some(function)
    }

    fn name(self) -> &'static str {
        match self {
            Function::Translate => "translate",
            Function::TranslateX => "translateX",
            Function::TranslateY => "translateY",
            Function::Scale => "scale",
            Function::ScaleX => "scaleX",
            Function::ScaleY => "scaleY",
            Function::Rotate => "rotate",
            Function::SkewX => "skewX",
            Function::SkewY => "skewY",
            Function::Matrix => "matrix",
        }
    }

    /// Build the primitive from already-parsed arguments
    fn to_primitive(self, args: &[f64]) -> Result<Primitive, TransformError> {
        let primitive = match self {
            Function::Translate => {
                self.require(args, 1)?;
                Primitive::Translate { x: args[0], y: args.get(1).copied().unwrap_or(0.0) }
            }
            Function::TranslateX => {
                self.require(args, 1)?;
                Primitive::TranslateX(args[0])
            }
            Function::TranslateY => {
                self.require(args, 1)?;
                Primitive::TranslateY(args[0])
            }
            Function::Scale => {
                self.require(args, 1)?;
                // Uniform scaling if only one value
                Primitive::Scale { x: args[0], y: args.get(1).copied().unwrap_or(args[0]) }
            }
            Function::ScaleX => {
                self.require(args, 1)?;
                Primitive::ScaleX(args[0])
            }
            Function::ScaleY => {
                self.require(args, 1)?;
                Primitive::ScaleY(args[0])
            }
            Function::Rotate => {
                self.require(args, 1)?;
                // SVG form: rotate(angle, cx, cy)
                let pivot = if args.len() >= 3 { Some(Point::new(args[1], args[2])) } else { None };
                Primitive::Rotate { degrees: args[0], pivot }
            }
            Function::SkewX => {
                self.require(args, 1)?;
                Primitive::SkewX { degrees: args[0] }
            }
            Function::SkewY => {
                self.require(args, 1)?;
                Primitive::SkewY { degrees: args[0] }
            }
            Function::Matrix => {
                self.require(args, 6)?;
                Primitive::Matrix(AffineMatrix::from_array(&args[..6])?)
            }
        };
        Ok(primitive)
    }

    fn require(self, args: &[f64], count: usize) -> Result<(), TransformError> {
        if args.len() < count {
            return Err(TransformError::InvalidArgument(format!(
                "{}() expects {} argument(s), got {}",
                self.name(),
                count,
                args.len()
            )));
        }
        Ok(())
    }
}

fn function_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(translatex|translatey|translate|scalex|scaley|scale|rotate|skewx|skewy|matrix)\s*\(([^()]*)\)",
        )
        .expect("transform function pattern is a valid regex")
    })
}

/// Parse a transform string into its primitive operations, in string order.
///
/// Function names are case-insensitive. Text that is not a recognized function call
/// is skipped.
pub fn parse_primitives(text: &str) -> Result<Vec<Primitive>, TransformError> {
    let mut primitives = Vec::new();
    let mut last_end = 0;

    for caps in function_pattern().captures_iter(text) {
        let (Some(whole), Some(name), Some(args)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        let skipped = text[last_end..whole.start()]
            .trim_matches(|c: char| c == ',' || c.is_whitespace());
        if !skipped.is_empty() {
            trace!("skipping unrecognized transform text '{}'", skipped);
        }
        last_end = whole.end();

        let Some(function) = Function::from_name(name.as_str()) else {
            continue;
        };
        let values = parse_arguments(function, args.as_str())?;
        primitives.push(function.to_primitive(&values)?);
    }

    let trailing = text[last_end..].trim_matches(|c: char| c == ',' || c.is_whitespace());
    if !trailing.is_empty() {
        trace!("skipping unrecognized transform text '{}'", trailing);
    }

    debug!("parsed {} transform function(s) from '{}'", primitives.len(), text);
    Ok(primitives)
}

/// Parse a transform string into a matrix.
///
/// Functions are applied left to right, each in the frame established by the ones
/// before it. Fails with [`TransformError::InvalidArgument`] if the composition
/// overflows to a non-finite matrix. For example `parse("scale(2) translate(50,100)")` equals
/// `AffineMatrix::identity().scale(2.0, 2.0).translate(50.0, 100.0)`.
///
/// # Example
///
/// ```
/// use affx::{parse, AffineMatrix};
///
/// let m = parse("translate(50px, 100px) rotate(0.5turn)").unwrap();
/// assert!(m.equals(&AffineMatrix::identity().translate(50.0, 100.0).rotate(180.0)));
/// ```
pub fn parse(text: &str) -> Result<AffineMatrix, TransformError> {
    let primitives = parse_primitives(text)?;
    primitives.iter().try_fold(AffineMatrix::identity(), |acc, p| acc.try_then(p))
}

/// Split a function's argument list on commas and whitespace and parse each value
fn parse_arguments(function: Function, args: &str) -> Result<Vec<f64>, TransformError> {
    args.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|token| parse_number(function, token))
        .collect()
}

/// Parse a number with an optional unit suffix.
///
/// Angle units are converted to degrees; `px` and `deg` are stripped. A value that is
/// not finite after conversion is rejected.
fn parse_number(function: Function, token: &str) -> Result<f64, TransformError> {
    let lower = token.to_ascii_lowercase();
    let (number, factor) = UNIT_SUFFIXES
        .iter()
        .find_map(|&(suffix, factor)| lower.strip_suffix(suffix).map(|n| (n, factor)))
        .unwrap_or((lower.as_str(), 1.0));

    match number.parse::<f64>().map(|value| value * factor) {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(TransformError::UnparseableNumber {
            function: function.name().to_string(),
            token: token.to_string(),
        }),
    }
}

/// Render a matrix as the shortest transform string that composes back to it.
///
/// Tokens appear in the fixed order translate, rotate, scale, skewX. Components within
/// `10^-precision` of their neutral value are left out, so the identity renders as an
/// empty string. Singular matrices cannot be decomposed and fall back to
/// [`AffineMatrix::to_canonical_string`].
///
/// # Example
///
/// ```
/// use affx::{serialize, AffineMatrix};
///
/// let m = AffineMatrix::identity().translate(50.0, 100.0).rotate(45.0).scale_uniform(2.0);
/// assert_eq!(serialize(&m, 7), "translate(50,100) rotate(45deg) scale(2)");
/// ```
pub fn serialize(m: &AffineMatrix, precision: usize) -> String {
    let d = match m.decompose() {
        Ok(d) => d,
        Err(e) => {
            debug!("serializing {} in matrix form: {}", m, e);
            return m.to_canonical_string();
        }
    };

    let epsilon = 10f64.powi(-(precision as i32));
    let fmt = |v: f64| format_number(v, precision);
    let mut tokens = Vec::new();

    let has_tx = d.translate_x.abs() > epsilon;
    let has_ty = d.translate_y.abs() > epsilon;
    match (has_tx, has_ty) {
        (true, true) => {
            tokens.push(format!("translate({},{})", fmt(d.translate_x), fmt(d.translate_y)))
        }
        (true, false) => tokens.push(format!("translateX({})", fmt(d.translate_x))),
        (false, true) => tokens.push(format!("translateY({})", fmt(d.translate_y))),
        (false, false) => {}
    }

    let degrees = d.rotation_degrees().rem_euclid(360.0);
    if degrees > epsilon && 360.0 - degrees > epsilon {
        tokens.push(format!("rotate({}deg)", fmt(degrees)));
    }

    let has_sx = (d.scale_x - 1.0).abs() > epsilon;
    let has_sy = (d.scale_y - 1.0).abs() > epsilon;
    let (sx, sy) = (fmt(d.scale_x), fmt(d.scale_y));
    if has_sx && has_sy && sx == sy {
        tokens.push(format!("scale({})", sx));
    } else {
        if has_sx {
            tokens.push(format!("scaleX({})", sx));
        }
        if has_sy {
            tokens.push(format!("scaleY({})", sy));
        }
    }

    // skewX is emitted after scale, where it sees the x-scaled frame, so the angle
    // is rescaled to produce the same matrix as skew-then-scale. Its matrix entry is
    // shear * scale_y.
    if (d.shear * d.scale_y).abs() > epsilon {
        let angle = fmt((d.shear * d.scale_y / d.scale_x).atan().to_degrees());
        if angle != "0" {
            tokens.push(format!("skewX({}deg)", angle));
        }
    }

    tokens.join(" ")
}

impl AffineMatrix {
    /// Minimal transform string; see [`serialize`]
    pub fn to_css_string(self, precision: usize) -> String {
        serialize(&self, precision)
    }
}

/// Round to `precision` decimals and print without trailing zeros
pub(crate) fn format_number(value: f64, precision: usize) -> String {
    let rounded = format!("{:.*}", precision, value);
    match rounded.parse::<f64>() {
        Ok(v) if v == 0.0 => "0".to_string(),
        Ok(v) => v.to_string(),
        Err(_) => rounded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(c: [f64; 6]) -> AffineMatrix {
        AffineMatrix::from_array(&c).unwrap()
    }

    #[test]
    fn test_parse_css_transform_empty() {
        assert_eq!(parse("").unwrap(), AffineMatrix::identity());
        assert_eq!(parse("   ").unwrap(), AffineMatrix::identity());
        assert_eq!(parse("none").unwrap(), AffineMatrix::identity());
    }

    #[test]
    fn test_parse_css_translate_basic() {
        let m = parse("translate(50,100)").unwrap();
        assert_eq!(m.to_components(), [1.0, 0.0, 0.0, 1.0, 50.0, 100.0]);
    }

    #[test]
    fn test_parse_css_translate_with_px() {
        assert_eq!(parse("translate(10px, 5px)").unwrap(), parse("translate(10, 5)").unwrap());
    }

    #[test]
    fn test_parse_css_translate_single_value() {
        let primitives = parse_primitives("translate(10)").unwrap();
        assert_eq!(primitives, vec![Primitive::Translate { x: 10.0, y: 0.0 }]);
    }

    #[test]
    fn test_parse_css_translate_axis() {
        let primitives = parse_primitives("translateX(3) translateY(-4.5)").unwrap();
        assert_eq!(primitives, vec![Primitive::TranslateX(3.0), Primitive::TranslateY(-4.5)]);
    }

    #[test]
    fn test_parse_css_scale_uniform_and_non_uniform() {
        let primitives = parse_primitives("scale(2) scale(2, 1.5) scaleX(3) scaleY(0.5)").unwrap();
        assert_eq!(
            primitives,
            vec![
                Primitive::Scale { x: 2.0, y: 2.0 },
                Primitive::Scale { x: 2.0, y: 1.5 },
                Primitive::ScaleX(3.0),
                Primitive::ScaleY(0.5),
            ]
        );
    }

    #[test]
    fn test_parse_css_rotate_units() {
        let cases = [
            ("rotate(90)", 90.0),
            ("rotate(90deg)", 90.0),
            ("rotate(100grad)", 90.0),
            ("rotate(0.25turn)", 90.0),
            ("rotate(3.141592653589793rad)", 180.0),
        ];
        for (text, expected) in cases {
            match parse_primitives(text).unwrap()[..] {
                [Primitive::Rotate { degrees, pivot: None }] => {
                    assert!((degrees - expected).abs() < 1e-9, "{}: {}", text, degrees)
                }
                ref other => panic!("{}: unexpected {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_parse_css_rotate_with_pivot() {
        let primitives = parse_primitives("rotate(45, 10, 20)").unwrap();
        assert_eq!(
            primitives,
            vec![Primitive::Rotate { degrees: 45.0, pivot: Some(Point::new(10.0, 20.0)) }]
        );
    }

    #[test]
    fn test_parse_css_skew() {
        let primitives = parse_primitives("skewX(20deg) skewY(-15deg)").unwrap();
        assert_eq!(
            primitives,
            vec![Primitive::SkewX { degrees: 20.0 }, Primitive::SkewY { degrees: -15.0 }]
        );
    }

    #[test]
    fn test_parse_css_matrix() {
        let m = parse("matrix(3, 1, -1, 3, 100, 100)").unwrap();
        assert_eq!(m.to_components(), [3.0, 1.0, -1.0, 3.0, 100.0, 100.0]);
    }

    #[test]
    fn test_parse_css_whitespace_separated_arguments() {
        assert_eq!(parse("translate(50 100)").unwrap(), parse("translate(50,100)").unwrap());
    }

    #[test]
    fn test_parse_css_case_insensitive() {
        assert_eq!(
            parse("TRANSLATE(5, 5) ROTATE(90DEG)").unwrap(),
            parse("translate(5, 5) rotate(90deg)").unwrap()
        );
    }

    #[test]
    fn test_parse_css_comma_separated_functions() {
        let expected = AffineMatrix::identity().scale_uniform(2.0).translate(50.0, 100.0);
        assert_eq!(parse("scale(2),translate(50,100)").unwrap(), expected);
        assert_eq!(expected.to_components(), [2.0, 0.0, 0.0, 2.0, 100.0, 200.0]);
    }

    #[test]
    fn test_parse_css_ignores_garbage() {
        let m = parse("foo translate(1,2) ;; bar(3) skew(4) scale(2) !").unwrap();
        assert_eq!(m, AffineMatrix::identity().translate(1.0, 2.0).scale(2.0, 2.0));
    }

    #[test]
    fn test_parse_css_requires_whole_function_names() {
        let m = parse("unscale(2) prerotate(5) translate(1,2) xmatrix(0,0,0,0,0,0)").unwrap();
        assert_eq!(m, AffineMatrix::identity().translate(1.0, 2.0));
    }

    #[test]
    fn test_parse_css_error_unit_overflow() {
        let err = parse("rotate(1e308turn)").unwrap_err();
        assert_eq!(
            err,
            TransformError::UnparseableNumber {
                function: "rotate".to_string(),
                token: "1e308turn".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_css_error_composition_overflow() {
        let result = parse("scale(1e200) scale(1e200)");
        assert!(matches!(result, Err(TransformError::InvalidArgument(_))), "{:?}", result);

        let result = parse("translate(1e308, 0) translate(1e308, 0)");
        assert!(matches!(result, Err(TransformError::InvalidArgument(_))), "{:?}", result);
    }

    #[test]
    fn test_parse_css_error_unparseable_number() {
        let result = parse("translate(10, abc)");
        match result.unwrap_err() {
            TransformError::UnparseableNumber { function, token } => {
                assert_eq!(function, "translate");
                assert_eq!(token, "abc");
            }
            other => panic!("Expected UnparseableNumber error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_css_error_non_finite_number() {
        assert!(matches!(parse("scale(inf)"), Err(TransformError::UnparseableNumber { .. })));
        assert!(matches!(parse("rotate(NaNdeg)"), Err(TransformError::UnparseableNumber { .. })));
    }

    #[test]
    fn test_parse_css_error_missing_arguments() {
        assert!(matches!(parse("translate()"), Err(TransformError::InvalidArgument(_))));
        assert!(matches!(parse("matrix(1,0,0,1,0)"), Err(TransformError::InvalidArgument(_))));
    }

    #[test]
    fn test_serialize_identity_is_empty() {
        assert_eq!(serialize(&AffineMatrix::identity(), DEFAULT_PRECISION), "");
    }

    #[test]
    fn test_serialize_full_turn_omits_rotate() {
        let s = serialize(&AffineMatrix::identity().rotate(360.0), DEFAULT_PRECISION);
        assert!(!s.contains("rotate"), "{}", s);
    }

    #[test]
    fn test_serialize_translate_collapsing() {
        let id = AffineMatrix::identity();
        assert_eq!(serialize(&id.translate(50.0, 100.0), 7), "translate(50,100)");
        assert_eq!(serialize(&id.translate(50.0, 0.0), 7), "translateX(50)");
        assert_eq!(serialize(&id.translate(0.0, -3.5), 7), "translateY(-3.5)");
    }

    #[test]
    fn test_serialize_scale_collapsing() {
        let id = AffineMatrix::identity();
        assert_eq!(serialize(&id.scale(2.0, 2.0), 7), "scale(2)");
        assert_eq!(serialize(&id.scale(2.0, 3.0), 7), "scaleX(2) scaleY(3)");
        assert_eq!(serialize(&id.scale(1.0, 3.0), 7), "scaleY(3)");
    }

    #[test]
    fn test_serialize_rounds_noise() {
        let m = matrix([1.9999999999, 0.0, 0.0, 1.9999999999, 0.0, 0.0]);
        assert_eq!(serialize(&m, 7), "scale(2)");
    }

    #[test]
    fn test_serialize_precision() {
        let m = AffineMatrix::identity().translate(1.23456, 0.0);
        assert_eq!(serialize(&m, 2), "translateX(1.23)");
        assert_eq!(m.to_css_string(7), "translateX(1.23456)");
    }

    #[test]
    fn test_serialize_order() {
        let m = AffineMatrix::identity()
            .translate(5.0, 6.0)
            .rotate(30.0)
            .scale(2.0, 2.0)
            .skew_x(10.0);
        assert_eq!(serialize(&m, 7), "translate(5,6) rotate(30deg) scale(2) skewX(10deg)");
    }

    #[test]
    fn test_serialize_keeps_shear_amplified_by_scale_y() {
        let m = matrix([1.0, 0.0, 0.05, 1e6, 0.0, 0.0]);
        let text = serialize(&m, DEFAULT_PRECISION);
        assert!(text.starts_with("scaleY(1000000) skewX("), "{}", text);
        let back = parse(&text).unwrap();
        assert!(back.equals_within(&m, 1e-5), "{} -> '{}' -> {}", m, text, back);
    }

    #[test]
    fn test_serialize_omits_skew_that_rounds_to_zero() {
        let m = matrix([1000.0, 0.0, 2e-7, 1.0, 0.0, 0.0]);
        assert_eq!(serialize(&m, DEFAULT_PRECISION), "scaleX(1000)");
    }

    #[test]
    fn test_serialize_singular_falls_back_to_matrix() {
        let m = matrix([1.0, 0.0, 0.0, 0.0, 5.0, 0.0]);
        assert_eq!(serialize(&m, 7), "matrix(1,0,0,0,5,0)");
    }

    #[test]
    fn test_serialize_round_trip() {
        let matrices = [
            AffineMatrix::identity().translate(10.0, -20.0).rotate(33.0).scale(1.5, 0.75),
            AffineMatrix::identity().rotate(200.0).skew_x(25.0).scale(3.0, 0.5),
            AffineMatrix::identity().flip_x().translate(4.0, 4.0),
            AffineMatrix::identity().skew_y(15.0).rotate_about(45.0, Point::new(3.0, 9.0)),
            matrix([0.3, -1.2, 2.5, 0.7, -40.0, 12.5]),
        ];
        for m in matrices {
            let text = serialize(&m, DEFAULT_PRECISION);
            let back = parse(&text).unwrap();
            assert!(back.equals_within(&m, 1e-5), "{} -> '{}' -> {}", m, text, back);
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.9999999999, 7), "2");
        assert_eq!(format_number(-0.00000001, 7), "0");
        assert_eq!(format_number(0.1 + 0.2, 7), "0.3");
        assert_eq!(format_number(-12.4, 0), "-12");
    }
}
