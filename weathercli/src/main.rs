//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Turning errors into a message and an exit status

use clap::Parser;
use std::{io, process};
use tracing_subscriber::{EnvFilter, fmt};
use weathercli_core::WeatherError;

mod cli;

#[tokio::main]
async fn main() {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.debug);

    let mut stdout = io::stdout().lock();
    if let Err(err) = cmd.run(&mut stdout).await {
        let code = err
            .downcast_ref::<WeatherError>()
            .map_or(1, WeatherError::exit_code);
        eprintln!("{err}");
        process::exit(code);
    }

    process::exit(0);
}

/// Initialize global tracing subscriber on stderr.
///
/// - Uses `RUST_LOG` if set (e.g. `RUST_LOG=weathercli_core=debug`)
/// - Otherwise the level follows the `-d` count, `warn` by default.
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "weathercli=info,weathercli_core=info",
        2 => "weathercli=debug,weathercli_core=debug",
        _ => "weathercli=trace,weathercli_core=trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
