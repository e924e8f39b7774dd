//! `architecture-lint`: fail the build when Yatube's layers leak.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "architecture-lint", about = "Check the Yatube backend's layering rules")]
struct Cli {
    /// Backend crate directory, the one containing `src/`.
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/../../backend"))]
    backend: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match architecture_lint::lint_backend_sources(&cli.backend) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(io::stderr().lock(), "{err}");
            ExitCode::FAILURE
        }
    }
}
