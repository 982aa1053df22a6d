use std::{io, process::ExitCode};

use clap::Parser;
use i18ngen::cli::{Arguments, ExitStatus};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter, e.g. `I18NGEN_LOG=i18ngen=trace`.
const LOG_ENV: &str = "I18NGEN_LOG";

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_tracing(args.verbose);

    match i18ngen::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "i18ngen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
