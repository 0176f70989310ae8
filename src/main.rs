//! IAM sample - command-line entry point.
//!
//! With no arguments this connects to a local TypeDB Core server, sets up
//! `sample_app_db` (asking before replacing an existing one) and runs the
//! sample requests.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use iam_sample::cli::{self, Args};
use iam_sample::driver::typedb::TypeDbDriver;
use iam_sample::sample;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    cli::init_logging(args.verbose);

    let config = args.load_config().context("failed to load configuration")?;
    debug!(
        address = %config.address,
        database = %config.database,
        edition = %config.edition,
        "configuration loaded"
    );
    let on_existing = args.on_existing(&config);

    println!("Start");
    let driver = TypeDbDriver::connect(&config).context("Failed to connect to TypeDB server.")?;

    sample::run(&driver, &config, on_existing)
        .with_context(|| format!("sample walkthrough on {} failed", config.database))?;

    driver.close().context("failed to close the connection")?;
    Ok(())
}
