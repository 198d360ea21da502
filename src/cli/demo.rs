use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use result_catalog::catalog::{CatalogError, ResultCatalog};
use result_catalog::extender::{CollectionExtender, DataPoints, ExtenderConfig, ParameterSweep};
use result_catalog::metadata::{MetadataEntry, NewSeries, Parameter, Quantity, QuantityValueDescription};
use result_catalog::store::{DocumentEntityStore, JsonDirectoryStore};
use result_catalog::variable::Variable;

const FREQUENCY_POINTS: usize = 101;
const START_HZ: f64 = 1.0e9;
const STEP_HZ: f64 = 1.0e7;

/// Import a mock two-port S-parameter sweep
pub fn run(store: PathBuf, collection: &str, series: &str, config: ExtenderConfig) -> Result<()> {
    info!("Result Catalog - Two-Port Sweep Demo");
    info!("=====================================");

    let documents = JsonDirectoryStore::open(&store)
        .with_context(|| format!("Failed to open store: {}", store.display()))?;
    let entities = DocumentEntityStore::new(&documents)
        .with_suffix(config.metadata_suffix.clone())
        .with_owner(config.owner.clone());

    let series_name = match ResultCatalog::load(collection, &entities) {
        Ok(catalog) => catalog.next_free_series_name(series),
        Err(CatalogError::NotFound(_)) => series.to_string(),
        Err(e) => return Err(e).context("Failed to read existing collection"),
    };
    info!("Collection: {}", collection);
    info!("Series:     {}", series_name);

    let mut extender = CollectionExtender::open(collection, &documents, &entities, config)
        .context("Failed to open collection")?;
    if !extender.has_metadata_with_same_name(&MetadataEntry::single("solver", "")) {
        extender.add_campaign_metadata(MetadataEntry::single("solver", "mock-fdtd"));
    }

    let frequencies: Vec<Variable> = (0..FREQUENCY_POINTS)
        .map(|i| Variable::from(START_HZ + i as f64 * STEP_HZ))
        .collect();
    let network = Quantity::new("S", vec![2, 2])
        .with_value_description(QuantityValueDescription::new("Real", "", "double"))
        .with_value_description(QuantityValueDescription::new("Imaginary", "", "double"));
    let index = extender
        .add_series(
            NewSeries::new(series_name.clone())
                .with_parameter(
                    Parameter::new("Frequency", "Hz", "double").with_values(frequencies.clone()),
                )
                .with_quantity(network)
                .with_metadata(MetadataEntry::single("ports", 2i64)),
        )
        .context("Failed to register series")?;

    let registered = extender
        .catalog()
        .find_series_by_uid(index)
        .context("Series missing after registration")?;
    let frequency = registered
        .parameters
        .first()
        .map(|p| p.uid)
        .context("Frequency parameter missing after registration")?;
    let s_parameter = registered
        .quantities
        .first()
        .map(|q| q.uid)
        .context("S quantity missing after registration")?;

    info!("Generating {} frequency points...", FREQUENCY_POINTS);
    let (first, second) = mock_network(FREQUENCY_POINTS);
    let points = DataPoints::SParameter {
        ports: 2,
        first,
        second,
    };
    let sweep = ParameterSweep::new().with_varying(frequency, frequencies);
    extender
        .store_data_points(index, &sweep, s_parameter, &points)
        .context("Failed to store data points")?;

    let stats = extender.finish().context("Failed to finalize import")?;

    info!("Import complete!");
    info!("  Store: {}", store.display());
    println!("{}", stats);
    Ok(())
}

/// Real and imaginary parts of a lossy, reciprocal two-port per frequency point
fn mock_network(points: usize) -> (Vec<Vec<Variable>>, Vec<Vec<Variable>>) {
    let mut real = Vec::with_capacity(points);
    let mut imag = Vec::with_capacity(points);
    for i in 0..points {
        let phase = i as f64 / points as f64 * std::f64::consts::TAU;
        let reflection = 0.1 + 0.05 * (phase * 3.0).sin();
        let transmission = 0.9 - 0.2 * i as f64 / points as f64;
        // S11, S12, S21, S22
        let magnitudes = [reflection, transmission, transmission, reflection];
        real.push(magnitudes.iter().map(|m| Variable::from(m * phase.cos())).collect());
        imag.push(magnitudes.iter().map(|m| Variable::from(-m * phase.sin())).collect());
    }
    (real, imag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use result_catalog::prelude::*;
    use tempfile::tempdir;

    /// A differently scaled "Frequency" already in the collection takes the plain label
    #[test]
    fn test_sweep_uses_the_series_own_frequency() {
        let dir = tempdir().unwrap();
        let config = ExtenderConfig::default();
        {
            let documents = JsonDirectoryStore::open(dir.path()).unwrap();
            let entities = DocumentEntityStore::new(&documents)
                .with_suffix(config.metadata_suffix.clone())
                .with_owner(config.owner.clone());
            let mut extender =
                CollectionExtender::open("sweeps", &documents, &entities, config.clone()).unwrap();
            extender
                .add_series(NewSeries::new("legacy").with_parameter(
                    Parameter::new("Frequency", "GHz", "double").with_values(vec![Variable::from(1.0)]),
                ))
                .unwrap();
            extender.finish().unwrap();
        }

        run(dir.path().to_path_buf(), "sweeps", "two_port", config.clone()).unwrap();

        let documents = JsonDirectoryStore::open(dir.path()).unwrap();
        let entities = DocumentEntityStore::new(&documents)
            .with_suffix(config.metadata_suffix.clone())
            .with_owner(config.owner.clone());
        let catalog = ResultCatalog::load("sweeps", &entities).unwrap();
        let hertz = catalog.find_parameter("Frequency_2").unwrap();
        assert_eq!(hertz.unit, "Hz");
        assert_eq!(hertz.values.len(), FREQUENCY_POINTS);

        let containers: Vec<QuantityContainer> = documents
            .find_all("sweeps")
            .unwrap()
            .iter()
            .map(|d| QuantityContainer::from_document(d).unwrap())
            .collect();
        assert!(!containers.is_empty());
        assert!(containers.iter().all(|c| c.parameter_ids == vec![hertz.uid]));
    }
}
