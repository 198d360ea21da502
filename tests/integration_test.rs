//! Integration tests for result-catalog
//!
//! These tests run whole import sessions against a directory store and read
//! the result back through the catalog and the validator.

use result_catalog::prelude::*;
use tempfile::tempdir;

fn frequencies() -> Vec<Variable> {
    vec![
        Variable::from(1.0e9),
        Variable::from(1.5e9),
        Variable::from(2.0e9),
    ]
}

fn matrix(name: &str) -> Quantity {
    Quantity::new(name, vec![2, 2]).with_value_description(QuantityValueDescription::new(
        name, "", "double",
    ))
}

fn two_port(name: &str) -> NewSeries {
    NewSeries::new(name)
        .with_parameter(Parameter::new("Frequency", "Hz", "double").with_values(frequencies()))
        .with_quantity(matrix("Real"))
        .with_quantity(matrix("Imaginary"))
}

/// Import one two-port series with a 2x2 matrix per frequency and component
fn import_two_port(
    documents: &JsonDirectoryStore,
    entities: &DocumentEntityStore<'_>,
    name: &str,
) -> ExtenderStats {
    let config = ExtenderConfig::default().with_bucket_size(4);
    let mut extender = CollectionExtender::open("sweeps", documents, entities, config).unwrap();
    let series = extender.add_series(two_port(name)).unwrap();

    let components: Vec<Uid> = ["Real", "Imaginary"]
        .iter()
        .map(|label| {
            extender.catalog().find_quantity(label).unwrap().value_descriptions[0].uid
        })
        .collect();
    for (point, frequency) in frequencies().into_iter().enumerate() {
        for (offset, component) in components.iter().enumerate() {
            for entry in 0..4 {
                let value = (point * 10 + offset * 100 + entry) as f64;
                extender
                    .add_quantity_container(
                        series,
                        &["Frequency"],
                        vec![frequency.clone()],
                        *component,
                        Variable::from(value),
                    )
                    .unwrap();
            }
        }
    }
    extender.finish().unwrap()
}

/// Import, reload, re-import under a free name and validate
#[test]
fn test_two_port_import_cycle() {
    let dir = tempdir().unwrap();
    let documents = JsonDirectoryStore::open(dir.path()).unwrap();
    let entities = DocumentEntityStore::new(&documents);

    let stats = import_two_port(&documents, &entities, "two_port");
    assert_eq!(stats.series_added, 1);
    assert_eq!(stats.containers_written, 6);
    assert_eq!(stats.values_written, 24);
    assert_eq!(stats.metadata_entities_written, 5);

    let containers: Vec<QuantityContainer> = documents
        .find_all("sweeps")
        .unwrap()
        .iter()
        .map(|d| QuantityContainer::from_document(d).unwrap())
        .collect();
    assert_eq!(containers.len(), 6);
    assert!(containers.iter().all(|c| c.len() == 4));

    let catalog = ResultCatalog::load("sweeps", &entities).unwrap();
    assert_eq!(catalog.list_series_names(), vec!["two_port"]);
    assert_eq!(catalog.list_parameter_labels(), vec!["Frequency"]);
    assert_eq!(catalog.campaign().quantities().count(), 2);

    // A second session reuses every schema and only adds a series
    let name = catalog.next_free_series_name("two_port");
    assert_eq!(name, "two_port_2");
    let stats = import_two_port(&documents, &entities, &name);
    assert_eq!(stats.series_added, 1);

    let catalog = ResultCatalog::load("sweeps", &entities).unwrap();
    assert_eq!(catalog.list_series_names(), vec!["two_port", "two_port_2"]);
    assert_eq!(catalog.campaign().parameters().count(), 1);
    assert_eq!(catalog.campaign().quantities().count(), 2);
    assert_eq!(catalog.find_series("two_port_2").unwrap().index, 1);
    assert_eq!(
        catalog.list_series_quantity_labels("two_port_2").unwrap(),
        vec!["Real", "Imaginary"]
    );

    let report = validate_collection("sweeps", &documents, &entities).unwrap();
    assert!(!report.has_failures(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
}

/// Collections of another project are read through the session locator
#[test]
fn test_cross_collection_read() {
    let dir = tempdir().unwrap();
    let documents = JsonDirectoryStore::open(dir.path()).unwrap();
    import_two_port(&documents, &DocumentEntityStore::new(&documents), "two_port");

    let mut registry = ProjectRegistry::new();
    registry.register("antenna-lab", DocumentEntityStore::new(&documents));

    let catalog = ResultCatalog::load_cross_collection("sweeps", &registry, "antenna-lab").unwrap();
    assert!(catalog.find_series("two_port").is_some());
    assert!(matches!(
        ResultCatalog::load_cross_collection("sweeps", &registry, "unknown"),
        Err(CatalogError::Store(StoreError::UnknownProject(_)))
    ));
}

/// The companion collection follows the configured suffix
#[test]
fn test_custom_metadata_suffix() {
    let dir = tempdir().unwrap();
    let documents = JsonDirectoryStore::open(dir.path()).unwrap();
    let entities = DocumentEntityStore::new(&documents).with_suffix(".meta");
    import_two_port(&documents, &entities, "two_port");

    let collections = documents.list_collections().unwrap();
    assert_eq!(collections, vec!["sweeps", "sweeps.meta"]);
    assert!(matches!(
        ResultCatalog::load("sweeps", &DocumentEntityStore::new(&documents)),
        Err(CatalogError::NotFound(_))
    ));
}
