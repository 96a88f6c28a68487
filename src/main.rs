//! Encebollado CLI

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

mod cli;

/// Encebollado CLI entry point
pub fn main() -> ExitCode {
    let cli = Cli::load().unwrap_or_else(|err| err.exit());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");

            ExitCode::FAILURE
        }
    }
}
