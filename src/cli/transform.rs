//! Parse, format, invert, apply and compose command implementations

use std::process::ExitCode;

use crate::config::AffxConfig;
use crate::matrix::{AffineMatrix, Point};
use crate::transforms::css::format_number;

use super::{
    display_transform, parse_arg, report_error, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS,
};

/// Print the matrix a transform string composes to
pub fn run_parse(text: &str, json: bool) -> ExitCode {
    let m = match parse_arg(text) {
        Ok(m) => m,
        Err(code) => return code,
    };

    if json {
        match serde_json::to_string(&m) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: Failed to serialize matrix: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("{}", m.to_canonical_string());
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Render raw components as a transform string
pub fn run_format(components: &[f64], config: &AffxConfig) -> ExitCode {
    let m = match AffineMatrix::from_array(components) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    println!("{}", display_transform(&m, config));
    ExitCode::from(EXIT_SUCCESS)
}

/// Print the inverse transform
pub fn run_invert(text: &str, config: &AffxConfig) -> ExitCode {
    let m = match parse_arg(text) {
        Ok(m) => m,
        Err(code) => return code,
    };

    match m.invert() {
        Ok(inverse) => {
            println!("{}", display_transform(&inverse, config));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => report_error(&e),
    }
}

/// Print a transformed point as `x y`
pub fn run_apply(text: &str, x: f64, y: f64, config: &AffxConfig) -> ExitCode {
    let m = match parse_arg(text) {
        Ok(m) => m,
        Err(code) => return code,
    };

    let p = m.apply(Point::new(x, y));
    let precision = config.format.precision;
    println!("{} {}", format_number(p.x, precision), format_number(p.y, precision));
    ExitCode::from(EXIT_SUCCESS)
}

/// Multiply transform strings together, the first one outermost
pub fn run_compose(texts: &[String], config: &AffxConfig) -> ExitCode {
    let mut result = AffineMatrix::identity();
    for text in texts {
        match parse_arg(text) {
            Ok(m) => result = result.multiply(&m),
            Err(code) => return code,
        }
    }

    println!("{}", display_transform(&result, config));
    ExitCode::from(EXIT_SUCCESS)
}
