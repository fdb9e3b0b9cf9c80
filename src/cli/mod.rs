//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod explain;
mod transform;

use clap::{ArgAction, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, AffxConfig, CliOverrides};
use crate::matrix::AffineMatrix;
use crate::transforms::{parse, serialize, TransformError};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// affx - Compose, invert and decompose 2D affine transforms
#[derive(Parser)]
#[command(name = "affx")]
#[command(about = "affx - Compose, invert and decompose 2D affine transforms")]
#[command(version)]
pub struct Cli {
    /// Path to affx.toml (searched upward from the working directory if omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a transform string and print the resulting matrix
    Parse {
        /// Transform string, e.g. "translate(10, 5) rotate(45deg)", or - for stdin
        text: String,

        /// Print the components as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Render six matrix components as a minimal transform string
    Format {
        /// Components a b c d e f
        #[arg(num_args = 6, required = true, allow_negative_numbers = true)]
        components: Vec<f64>,

        /// Decimal digits in the output (default from affx.toml, else 7)
        #[arg(short, long)]
        precision: Option<usize>,
    },

    /// Break a transform into translate, rotate, shear and scale
    Decompose {
        /// Transform string, or - for stdin
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Decimal digits in the output (default from affx.toml, else 7)
        #[arg(short, long)]
        precision: Option<usize>,
    },

    /// Print the inverse of a transform
    Invert {
        /// Transform string, or - for stdin
        text: String,

        /// Decimal digits in the output (default from affx.toml, else 7)
        #[arg(short, long)]
        precision: Option<usize>,
    },

    /// Transform a point
    Apply {
        /// Transform string, or - for stdin
        text: String,

        /// X coordinate
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// Y coordinate
        #[arg(allow_negative_numbers = true)]
        y: f64,

        /// Decimal digits in the output (default from affx.toml, else 7)
        #[arg(short, long)]
        precision: Option<usize>,
    },

    /// Compose several transform strings, first applied last, and print the result
    Compose {
        /// Transform strings, outermost first
        #[arg(required = true)]
        texts: Vec<String>,

        /// Decimal digits in the output (default from affx.toml, else 7)
        #[arg(short, long)]
        precision: Option<usize>,

        /// Per-component tolerance for reporting an identity result
        #[arg(long)]
        tolerance: Option<f64>,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Parse { text, json } => transform::run_parse(&text, json),
        Commands::Format { components, precision } => {
            let overrides = CliOverrides { precision, ..Default::default() };
            match load_settings(config, &overrides) {
                Ok(settings) => transform::run_format(&components, &settings),
                Err(code) => code,
            }
        }
        Commands::Decompose { text, json, precision } => {
            let overrides = CliOverrides { precision, ..Default::default() };
            match load_settings(config, &overrides) {
                Ok(settings) => explain::run_decompose(&text, json, &settings),
                Err(code) => code,
            }
        }
        Commands::Invert { text, precision } => {
            let overrides = CliOverrides { precision, ..Default::default() };
            match load_settings(config, &overrides) {
                Ok(settings) => transform::run_invert(&text, &settings),
                Err(code) => code,
            }
        }
        Commands::Apply { text, x, y, precision } => {
            let overrides = CliOverrides { precision, ..Default::default() };
            match load_settings(config, &overrides) {
                Ok(settings) => transform::run_apply(&text, x, y, &settings),
                Err(code) => code,
            }
        }
        Commands::Compose { texts, precision, tolerance } => {
            let overrides = CliOverrides { precision, tolerance };
            match load_settings(config, &overrides) {
                Ok(settings) => transform::run_compose(&texts, &settings),
                Err(code) => code,
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // A logger may already be installed when run() is driven from tests
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Load affx.toml and apply command-line overrides
fn load_settings(path: Option<&Path>, overrides: &CliOverrides) -> Result<AffxConfig, ExitCode> {
    let mut config = load_config(path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    merge_cli_overrides(&mut config, overrides).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    Ok(config)
}

/// Read a transform argument, with `-` meaning standard input
fn read_text(arg: &str) -> Result<String, ExitCode> {
    if arg != "-" {
        return Ok(arg.to_string());
    }

    let mut buffer = String::new();
    match std::io::stdin().read_to_string(&mut buffer) {
        Ok(_) => Ok(buffer),
        Err(e) => {
            eprintln!("Error reading stdin: {}", e);
            Err(ExitCode::from(EXIT_INVALID_ARGS))
        }
    }
}

/// Read and parse a transform argument, reporting failures on stderr
fn parse_arg(arg: &str) -> Result<AffineMatrix, ExitCode> {
    let text = read_text(arg)?;
    parse(&text).map_err(|e| report_error(&e))
}

fn report_error(e: &TransformError) -> ExitCode {
    eprintln!("Error: {}", e);
    ExitCode::from(EXIT_ERROR)
}

/// Serialize for display; an empty transform list prints as `none`
fn display_transform(m: &AffineMatrix, config: &AffxConfig) -> String {
    if m.equals_within(&AffineMatrix::identity(), config.compare.tolerance) {
        return "none".to_string();
    }
    let text = serialize(m, config.format.precision);
    if text.is_empty() {
        "none".to_string()
    } else {
        text
    }
}
