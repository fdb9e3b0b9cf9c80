//! affx - Command-line tool for composing and decomposing 2D affine transforms

use std::process::ExitCode;

use affx::cli;

fn main() -> ExitCode {
    cli::run()
}
