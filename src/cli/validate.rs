use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use result_catalog::extender::ExtenderConfig;
use result_catalog::store::{DocumentEntityStore, JsonDirectoryStore};
use result_catalog::validator::validate_collection;

/// Validate a stored result collection
pub fn run(store: PathBuf, collection: &str, config: &ExtenderConfig) -> Result<()> {
    info!("Result Collection Validator");
    info!("===========================");
    info!("Store: {}", store.display());
    info!("Collection: {}", collection);

    if !store.is_dir() {
        anyhow::bail!("Store does not exist: {}", store.display());
    }
    let documents = JsonDirectoryStore::open(&store).context("Failed to open store")?;
    let entities = DocumentEntityStore::new(&documents).with_suffix(config.metadata_suffix.clone());

    match validate_collection(collection, &documents, &entities) {
        Ok(report) => {
            println!("{}", report.format_colored());

            // Exit with error code if validation failed
            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
