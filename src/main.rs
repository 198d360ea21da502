//! # result-catalog
//!
//! Command-line front end for result collections stored in a directory of
//! JSON-lines documents.
//!
//! ## Usage
//!
//! ```bash
//! # Import a sample two-port sweep
//! result-catalog demo ./store --collection sweeps
//!
//! # Describe a collection or one of its series
//! result-catalog info ./store sweeps --series two_port
//!
//! # Check metadata and bulk data
//! result-catalog validate ./store sweeps
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
