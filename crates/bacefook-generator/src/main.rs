//! Bacefook event generator binary.
//!
//! Drives a [`GraphSimulator`] and writes every batch of connection events to
//! `bacefook-events-<timestamp>.json`.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Parse command-line arguments
//! 3. Load configuration from `bacefook-config.yaml` and apply overrides
//! 4. Validate the initial user count
//! 5. Generate the bootstrap batch
//! 6. Generate a follow-up batch per line of stdin, or `--batches` batches
//!    back to back
//!
//! [`GraphSimulator`]: bacefook_core::GraphSimulator

mod cli;
mod config;
mod driver;
mod error;
mod writer;

use std::process::ExitCode;

use bacefook_core::{GraphSimulator, UserCount};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::GeneratorConfig;
use crate::driver::Driver;
use crate::error::GeneratorError;
use crate::writer::BatchWriter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "bacefook-generator failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), GeneratorError> {
    let mut config = GeneratorConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let initial: UserCount = match cli.initial_users.as_deref() {
        Some(raw) => raw.parse()?,
        None => UserCount::try_from(config.initial_users)?,
    };

    info!(
        initial_users = initial.get(),
        output_dir = %config.output_dir.display(),
        follow_up_min_users = config.follow_up_min_users,
        follow_up_max_users = config.follow_up_max_users,
        "Configuration loaded"
    );

    let mut driver = Driver::new(
        GraphSimulator::new(),
        BatchWriter::new(&config.output_dir, config.pretty),
        config.follow_up_min_users,
        config.follow_up_max_users,
    );

    let written = if let Some(batches) = cli.batches {
        let batches = usize::try_from(batches).unwrap_or(usize::MAX);
        driver.run_fixed(initial, batches)?
    } else {
        let stdin = std::io::stdin();
        let written = driver.run_interactive(initial, stdin.lock(), std::io::stdout())?;
        let stats = driver.simulator().stats();
        info!(
            users = stats.users,
            friendships = stats.friendships,
            "Interactive session ended"
        );
        written
    };

    info!(files = written.len(), "Generator finished");
    Ok(())
}
