//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    init_logging();
    match shelfload_cli::run() {
        Ok(()) => {}
        Err(shelfload_cli::CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("shelfload: {err}");
            std::process::exit(1);
        }
    }
}

/// Route `log` records to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
