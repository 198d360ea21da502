use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod info;
mod validate;

pub use config::Config;

/// result-catalog - Simulation result collections on a document store
#[derive(Parser)]
#[command(name = "result-catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load extender settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a sample two-port frequency sweep
    Demo {
        /// Store directory (created if missing)
        #[arg(value_name = "STORE")]
        store: PathBuf,

        /// Target collection
        #[arg(short = 'n', long, default_value = "demo_sweeps")]
        collection: String,

        /// Series name; a free variant is chosen if it is taken
        #[arg(short, long, default_value = "two_port")]
        series: String,

        /// Override the flush threshold from the config file
        #[arg(short = 'b', long)]
        buffer_size: Option<usize>,
    },

    /// Display the metadata overview of a collection
    Info {
        /// Store directory
        #[arg(value_name = "STORE")]
        store: PathBuf,

        /// Collection to describe; lists the collections when omitted
        #[arg(value_name = "COLLECTION")]
        collection: Option<String>,

        /// Only describe this series
        #[arg(short, long)]
        series: Option<String>,
    },

    /// Validate metadata and bulk data of a collection
    Validate {
        /// Store directory
        #[arg(value_name = "STORE")]
        store: PathBuf,

        /// Collection to validate
        #[arg(value_name = "COLLECTION")]
        collection: String,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Demo {
            store,
            collection,
            series,
            buffer_size,
        } => {
            let mut extender = config.extender;
            if let Some(buffer_size) = buffer_size {
                extender = extender.with_buffer_size(buffer_size);
            }
            demo::run(store, &collection, &series, extender)
        }
        Commands::Info {
            store,
            collection,
            series,
        } => info::run(store, collection.as_deref(), series.as_deref(), &config.extender),
        Commands::Validate { store, collection } => {
            validate::run(store, &collection, &config.extender)
        }
    }
}
