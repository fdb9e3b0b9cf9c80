//! Decompose command implementation

use std::process::ExitCode;

use serde_json::json;

use crate::config::AffxConfig;
use crate::transforms::css::format_number;
use crate::transforms::DecomposedTransform;

use super::{parse_arg, report_error, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the decompose command
pub fn run_decompose(text: &str, json: bool, config: &AffxConfig) -> ExitCode {
    let m = match parse_arg(text) {
        Ok(m) => m,
        Err(code) => return code,
    };

    let decomposed = match m.decompose() {
        Ok(d) => d,
        Err(e) => return report_error(&e),
    };

    if json {
        match to_json(&decomposed).and_then(|value| serde_json::to_string_pretty(&value)) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: Failed to serialize decomposition: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        print!("{}", format_decomposition(&decomposed, config.format.precision));
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// The serialized record plus `rotation_degrees`
fn to_json(d: &DecomposedTransform) -> Result<serde_json::Value, serde_json::Error> {
    let mut value = serde_json::to_value(d)?;
    if let Some(fields) = value.as_object_mut() {
        fields.insert("rotation_degrees".to_string(), json!(d.rotation_degrees()));
    }
    Ok(value)
}

/// One `name: value` line per component
fn format_decomposition(d: &DecomposedTransform, precision: usize) -> String {
    let n = |v: f64| format_number(v, precision);
    let mut out = String::new();
    out.push_str(&format!("translate: {}, {}\n", n(d.translate_x), n(d.translate_y)));
    out.push_str(&format!(
        "rotation:  {}deg ({}rad)\n",
        n(d.rotation_degrees()),
        n(d.rotation)
    ));
    out.push_str(&format!("shear:     {}\n", n(d.shear)));
    out.push_str(&format!("scale:     {}, {}\n", n(d.scale_x), n(d.scale_y)));
    out
}
