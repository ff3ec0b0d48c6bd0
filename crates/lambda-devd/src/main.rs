//! `lambda-devd` binary: loads configuration and serves the gateway until Ctrl-C.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use lambda_devd::{
    BootstrapError, StructuredHealthReporter, SystemConfigLoader, bootstrap_with,
    docker_executor, shutdown_signal,
};

#[tokio::main]
async fn main() -> ExitCode {
    let reporter = Arc::new(StructuredHealthReporter::new());
    let daemon = match bootstrap_with(&SystemConfigLoader, reporter, docker_executor) {
        Ok(daemon) => daemon,
        Err(error) => return bootstrap_failure(&error),
    };

    match daemon.serve(shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(
                target: concat!(env!("CARGO_PKG_NAME"), "::main"),
                error = %error,
                "gateway stopped with an error"
            );
            ExitCode::FAILURE
        }
    }
}

/// Reports a bootstrap failure on stderr, since telemetry may not be running
/// yet. Help output keeps clap's own exit code.
fn bootstrap_failure(error: &BootstrapError) -> ExitCode {
    if let Some(cli) = error.cli_error() {
        drop(cli.print());
        return u8::try_from(cli.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from);
    }
    drop(writeln!(io::stderr(), "lambda-devd: {error}"));
    ExitCode::FAILURE
}
