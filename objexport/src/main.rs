//! sobject schema export tool.
//!
//! Lists the sobjects of an already-authorized org, describes the ones that
//! pass the optional filter, and writes the describe documents as YAML.
//!
//! # Guarantees
//! - Only the read-only describe endpoints are called
//! - Access tokens are never logged
//! - Nothing is written if the global describe fails

use std::process::ExitCode;

use clap::Parser;
use objexport::{Cli, command, render};
use objexport_core::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet, cli.global.log_format) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let result = command::execute(&cli).await;
    if let Err(e) = &result {
        tracing::debug!(kind = e.kind(), "Export failed");
    }

    let status = render::report(
        cli.json,
        &result,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    ExitCode::from(status)
}
