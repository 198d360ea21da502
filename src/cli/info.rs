use anyhow::{Context, Result};
use std::path::PathBuf;

use result_catalog::catalog::ResultCatalog;
use result_catalog::extender::ExtenderConfig;
use result_catalog::overview::OverviewTable;
use result_catalog::store::{DocumentEntityStore, DocumentStore, JsonDirectoryStore};

/// Display the overview of a collection, or list the collections of a store
pub fn run(
    store: PathBuf,
    collection: Option<&str>,
    series: Option<&str>,
    config: &ExtenderConfig,
) -> Result<()> {
    if !store.is_dir() {
        anyhow::bail!("Store does not exist: {}", store.display());
    }
    let documents = JsonDirectoryStore::open(&store).context("Failed to open store")?;

    let Some(collection) = collection else {
        return list_collections(&documents, config);
    };

    let entities = DocumentEntityStore::new(&documents).with_suffix(config.metadata_suffix.clone());
    let catalog = ResultCatalog::load(collection, &entities)
        .with_context(|| format!("Failed to load collection '{}'", collection))?;

    println!("Result Collection Information");
    println!("=============================");
    println!("Store: {}", store.display());
    println!("Collection: {}", collection);
    println!(
        "Containers: {}",
        documents.find_all(collection).context("Failed to read containers")?.len()
    );
    println!();

    let table = match series {
        Some(name) => {
            let series = catalog
                .find_series(name)
                .with_context(|| format!("No series named '{}'", name))?;
            OverviewTable::for_series(catalog.campaign(), series)
        }
        None => OverviewTable::for_campaign(catalog.campaign()),
    };
    print!("{}", table);
    Ok(())
}

fn list_collections(documents: &JsonDirectoryStore, config: &ExtenderConfig) -> Result<()> {
    let names = documents.list_collections().context("Failed to list collections")?;
    println!("Collections in {}:", documents.root().display());
    for name in names
        .iter()
        .filter(|name| !name.ends_with(config.metadata_suffix.as_str()))
    {
        let count = documents.find_all(name).map(|d| d.len()).unwrap_or(0);
        println!("  {} ({} containers)", name, count);
    }
    Ok(())
}
