use super::*;
use crate::container::QuantityContainer;
use crate::metadata::{Parameter, Quantity, QuantityValueDescription};
use crate::store::{DocumentEntityStore, InMemoryDocumentStore, StoreError};

fn frequencies() -> Vec<Variable> {
    vec![
        Variable::from(1.0e9),
        Variable::from(2.0e9),
        Variable::from(3.0e9),
    ]
}

fn frequency() -> Parameter {
    Parameter::new("Frequency", "Hz", "double").with_values(frequencies())
}

fn matrix(name: &str) -> Quantity {
    Quantity::new(name, vec![2, 2]).with_value_description(QuantityValueDescription::new(
        name, "", "double",
    ))
}

fn two_port(name: &str) -> NewSeries {
    NewSeries::new(name)
        .with_parameter(frequency())
        .with_quantity(matrix("Real"))
        .with_quantity(matrix("Imaginary"))
}

fn config(bucket_size: usize, buffer_size: usize) -> ExtenderConfig {
    ExtenderConfig::default()
        .with_bucket_size(bucket_size)
        .with_buffer_size(buffer_size)
}

fn stored_containers(store: &InMemoryDocumentStore, collection: &str) -> Vec<QuantityContainer> {
    store
        .find_all(collection)
        .unwrap()
        .iter()
        .map(|document| QuantityContainer::from_document(document).unwrap())
        .collect()
}

#[test]
fn test_open_starts_new_campaign() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();

    assert_eq!(extender.catalog().campaign().name(), "sweeps");
    assert!(extender.catalog().campaign().series().is_empty());
    assert!(extender.has_pending_metadata());
}

#[test]
fn test_bucketing_produces_ceil_containers() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, config(4, 50)).unwrap();
    let series = extender.add_series(two_port("run")).unwrap();
    let real = extender.catalog().find_quantity("Real").unwrap().uid;

    for i in 0..10 {
        extender
            .add_quantity_container(
                series,
                &["Frequency"],
                vec![Variable::from(1.0e9)],
                real,
                Variable::from(i),
            )
            .unwrap();
    }
    assert_eq!(extender.buffered_containers(), 2);
    assert_eq!(extender.open_containers(), 1);

    extender.flush_all().unwrap();
    let containers = stored_containers(&documents, "sweeps");
    assert_eq!(containers.len(), 3);
    assert_eq!(containers[0].len(), 4);
    assert_eq!(containers[1].len(), 4);
    assert_eq!(containers[2].len(), 2);
    assert_eq!(containers[2].bucket, 2);
    assert_eq!(extender.open_containers(), 0);
}

fn append(extender: &mut CollectionExtender<'_>, series: Uid, quantity: Uid, i: i64) {
    extender
        .add_quantity_container(
            series,
            &["Frequency"],
            vec![Variable::from(i as f64)],
            quantity,
            Variable::from(i),
        )
        .unwrap();
}

#[test]
fn test_flush_threshold_triggers_once() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, config(1, 5)).unwrap();
    let series = extender.add_series(two_port("run")).unwrap();
    let real = extender.catalog().find_quantity("Real").unwrap().uid;

    for i in 0..4 {
        append(&mut extender, series, real, i);
    }
    assert_eq!(documents.batch_writes(), 0);
    assert_eq!(extender.buffered_containers(), 4);

    append(&mut extender, series, real, 4);
    assert_eq!(documents.batch_writes(), 1);
    assert_eq!(extender.buffered_containers(), 0);
    assert_eq!(documents.count("sweeps").unwrap(), 5);

    for i in 5..9 {
        append(&mut extender, series, real, i);
    }
    assert_eq!(documents.batch_writes(), 1);
    assert_eq!(extender.stats().flushes, 1);
}

#[test]
fn test_open_containers_count_against_buffer() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, config(4, 2)).unwrap();
    let series = extender.add_series(two_port("run")).unwrap();
    let real = extender.catalog().find_quantity("Real").unwrap().uid;

    // every sample lands on a new coordinate, so no bucket ever fills
    for i in 0..1000 {
        append(&mut extender, series, real, i);
        assert!(extender.open_containers() + extender.buffered_containers() <= 2);
    }
    assert_eq!(documents.batch_writes(), 500);
    assert_eq!(documents.count("sweeps").unwrap(), 1000);

    extender.finish().unwrap();
    assert_eq!(extender.stats().containers_written, 1000);
    assert_eq!(extender.stats().values_written, 1000);
}

#[test]
fn test_failed_flush_keeps_containers_for_retry() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, config(1, 3)).unwrap();
    let series = extender.add_series(two_port("run")).unwrap();
    let real = extender.catalog().find_quantity("Real").unwrap().uid;

    documents.set_offline(true);
    for i in 0..2 {
        extender
            .add_quantity_container(series, &["Frequency"], vec![Variable::from(1.0)], real, Variable::from(i))
            .unwrap();
    }
    let result = extender.add_quantity_container(
        series,
        &["Frequency"],
        vec![Variable::from(1.0)],
        real,
        Variable::from(2),
    );
    assert!(matches!(
        result,
        Err(ExtenderError::Store(StoreError::Unavailable(_)))
    ));
    assert_eq!(extender.buffered_containers(), 3);

    documents.set_offline(false);
    extender.flush_quantity_container().unwrap();
    assert_eq!(extender.buffered_containers(), 0);
    assert_eq!(documents.count("sweeps").unwrap(), 3);
    assert_eq!(extender.stats().values_written, 3);
}

#[test]
fn test_failed_metadata_store_can_be_retried() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();
    extender.add_series(two_port("run")).unwrap();

    documents.set_offline(true);
    assert!(extender.store_campaign_changes().is_err());
    assert!(extender.has_pending_metadata());

    documents.set_offline(false);
    extender.store_campaign_changes().unwrap();
    assert!(!extender.has_pending_metadata());
    // campaign, one parameter, two quantities, one series
    assert_eq!(extender.stats().metadata_entities_written, 5);
}

#[test]
fn test_series_dedup_is_idempotent() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();

    let first = extender.add_series(two_port("run")).unwrap();
    let second = extender.add_series(two_port("run_2")).unwrap();
    let third = extender.add_series(two_port("run_3")).unwrap();
    assert_eq!((first, second, third), (0, 1, 2));

    let catalog = extender.catalog();
    assert_eq!(catalog.list_parameter_labels(), vec!["Frequency"]);
    assert_eq!(catalog.list_quantity_labels(), vec!["Imaginary", "Real"]);
    assert_eq!(catalog.campaign().parameters().count(), 1);
    catalog.campaign().check_consistency().unwrap();
}

#[test]
fn test_same_name_different_unit_gets_suffixed_label() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();

    extender.add_series(two_port("hz")).unwrap();
    let ghz = NewSeries::new("ghz")
        .with_parameter(Parameter::new("Frequency", "GHz", "double").with_values(vec![Variable::from(1.0)]))
        .with_quantity(matrix("Real"));
    extender.add_series(ghz).unwrap();

    let catalog = extender.catalog();
    assert_eq!(catalog.list_parameter_labels(), vec!["Frequency", "Frequency_2"]);
    assert_eq!(catalog.find_parameters_with_same_name("Frequency").len(), 2);
    assert_eq!(catalog.find_parameter("Frequency_2").unwrap().unit, "GHz");
    assert_eq!(
        catalog.list_series_parameter_labels("ghz").unwrap(),
        vec!["Frequency_2"]
    );
}

#[test]
fn test_duplicate_series_name_is_rejected() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();

    extender.add_series(two_port("run")).unwrap();
    assert!(matches!(
        extender.add_series(two_port("run")),
        Err(ExtenderError::DuplicateSeriesName(name)) if name == "run"
    ));
    assert_eq!(extender.catalog().campaign().series().len(), 1);
}

#[test]
fn test_series_label_collision_is_suffixed() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();

    extender.add_series(two_port("a").with_label("Sweep")).unwrap();
    extender.add_series(two_port("b").with_label("Sweep")).unwrap();
    assert_eq!(extender.catalog().find_series("b").unwrap().label, "Sweep_2");
}

#[test]
fn test_invalid_series_is_rejected_before_registration() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();

    let unknown_dependency = NewSeries::new("run")
        .with_parameter(frequency())
        .with_quantity(matrix("Real").depending_on(["Time"]));
    assert!(matches!(
        extender.add_series(unknown_dependency),
        Err(ExtenderError::InvalidData(_))
    ));

    let empty_quantity = NewSeries::new("run")
        .with_parameter(frequency())
        .with_quantity(Quantity::new("Empty", vec![1]));
    assert!(matches!(
        extender.add_series(empty_quantity),
        Err(ExtenderError::InvalidData(_))
    ));

    assert_eq!(extender.catalog().campaign().parameters().count(), 0);
    assert_eq!(extender.catalog().campaign().allocate_next_parameter_index(), 0);
}

#[test]
fn test_depending_parameters() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();

    let series = NewSeries::new("run")
        .with_parameter(frequency())
        .with_parameter(Parameter::new("Port", "", "string").with_values(vec![Variable::from("1")]))
        .with_quantity(matrix("Real").depending_on(["Frequency"]))
        .with_quantity(matrix("Imaginary"));
    extender.add_series(series).unwrap();

    let catalog = extender.catalog();
    assert_eq!(
        catalog.find_quantity("Real").unwrap().depending_parameter_labels,
        vec!["Frequency"]
    );
    assert_eq!(
        catalog.find_quantity("Imaginary").unwrap().depending_parameter_labels,
        vec!["Frequency", "Port"]
    );
}

#[test]
fn test_remove_pending_series() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, config(4, 50)).unwrap();

    let stored = extender.add_series(two_port("stored")).unwrap();
    extender.store_campaign_changes().unwrap();

    let pending = extender
        .add_series(
            NewSeries::new("pending")
                .with_parameter(Parameter::new("Time", "s", "double").with_values(vec![Variable::from(0.0)]))
                .with_quantity(Quantity::scalar("Voltage", "V", "double")),
        )
        .unwrap();
    let voltage = extender.catalog().find_quantity("Voltage").unwrap().uid;
    extender
        .add_quantity_container(pending, &["Time"], vec![Variable::from(0.0)], voltage, Variable::from(1.5))
        .unwrap();

    assert!(!extender.remove_series(stored));
    assert!(extender.remove_series(pending));
    assert!(!extender.remove_series(pending));

    let catalog = extender.catalog();
    assert!(catalog.find_series("pending").is_none());
    assert!(catalog.find_parameter("Time").is_none());
    assert!(catalog.find_quantity("Voltage").is_none());
    assert_eq!(extender.open_containers(), 0);
    assert!(!extender.has_pending_metadata());
}

#[test]
fn test_unknown_targets_are_not_found() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();
    let series = extender.add_series(two_port("run")).unwrap();
    let real = extender.catalog().find_quantity("Real").unwrap().uid;

    let value = || Variable::from(1.0);
    assert!(matches!(
        extender.add_quantity_container(series, &["Time"], vec![value()], real, value()),
        Err(ExtenderError::NotFound(_))
    ));
    assert!(matches!(
        extender.add_quantity_container(series + 7, &["Frequency"], vec![value()], real, value()),
        Err(ExtenderError::NotFound(_))
    ));
    assert!(matches!(
        extender.add_quantity_container(series, &["Frequency"], vec![value()], 99, value()),
        Err(ExtenderError::NotFound(_))
    ));
    assert!(matches!(
        extender.add_quantity_container(series, &["Frequency"], Vec::new(), real, value()),
        Err(ExtenderError::InvalidData(_))
    ));
}

#[test]
fn test_sessions_continue_identifiers() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);

    let mut first =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();
    first.add_series(two_port("run")).unwrap();
    first.add_campaign_metadata(MetadataEntry::single("solver", "fdtd"));
    first.finish().unwrap();

    let mut second =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();
    assert!(!second.has_pending_metadata());
    assert!(second.has_metadata_with_same_value(&MetadataEntry::single("solver", "fdtd")));

    let name = second.catalog().next_free_series_name("run");
    assert_eq!(name, "run_2");
    let index = second.add_series(two_port(&name)).unwrap();
    assert_eq!(index, 1);
    second.finish().unwrap();

    let catalog = ResultCatalog::load("sweeps", &entities).unwrap();
    assert_eq!(catalog.list_series_names(), vec!["run", "run_2"]);
    assert_eq!(catalog.campaign().parameters().count(), 1);
    assert_eq!(catalog.campaign().quantities().count(), 2);
    catalog.campaign().check_consistency().unwrap();
}

#[test]
fn test_campaign_metadata_marks_campaign_dirty() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);

    let mut first =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();
    first.store_campaign_changes().unwrap();
    assert_eq!(first.stats().metadata_entities_written, 1);

    let mut second =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();
    let entry = MetadataEntry::single("mesh", "fine");
    assert!(!second.has_metadata_with_same_name(&entry));
    second.add_campaign_metadata(entry.clone());
    assert!(second.has_pending_metadata());
    second.store_campaign_changes().unwrap();

    let catalog = ResultCatalog::load("sweeps", &entities).unwrap();
    assert_eq!(catalog.campaign().metadata().get("mesh"), Some(&entry));
}

#[test]
fn test_store_s_parameter_data_points() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();

    let network = Quantity::new("S", vec![2, 2])
        .with_value_description(QuantityValueDescription::new("Re", "", "double"))
        .with_value_description(QuantityValueDescription::new("Im", "", "double"));
    let series = extender
        .add_series(NewSeries::new("touchstone").with_parameter(frequency()).with_quantity(network))
        .unwrap();
    let catalog = extender.catalog();
    let frequency_uid = catalog.find_parameter("Frequency").unwrap().uid;
    let s_uid = catalog.find_quantity("S").unwrap().uid;

    let sweep = ParameterSweep::new().with_varying(frequency_uid, frequencies());
    let entries = |offset: f64| -> Vec<Variable> {
        (0..4).map(|i| Variable::from(offset + i as f64)).collect()
    };
    let points = DataPoints::SParameter {
        ports: 2,
        first: vec![entries(0.0), entries(10.0), entries(20.0)],
        second: vec![entries(0.5), entries(10.5), entries(20.5)],
    };
    extender
        .store_data_points(series, &sweep, s_uid, &points)
        .unwrap();
    assert_eq!(extender.bucket_size(), 4);
    extender.flush_all().unwrap();

    let containers = stored_containers(&documents, "sweeps");
    assert_eq!(containers.len(), 6);
    assert!(containers.iter().all(|c| c.len() == 4));
    assert_eq!(containers.iter().filter(|c| c.quantity_index == s_uid).count(), 3);
    assert_eq!(containers.iter().filter(|c| c.quantity_index == s_uid + 1).count(), 3);
}

#[test]
fn test_store_curve_rejects_shape_mismatch() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();
    let series = extender.add_series(two_port("run")).unwrap();
    let frequency_uid = extender.catalog().find_parameter("Frequency").unwrap().uid;
    let real = extender.catalog().find_quantity("Real").unwrap().uid;
    let sweep = ParameterSweep::new().with_varying(frequency_uid, frequencies());

    let complex = DataPoints::ComplexCurve {
        real: frequencies(),
        imag: frequencies(),
    };
    assert!(matches!(
        extender.store_data_points(series, &sweep, real, &complex),
        Err(ExtenderError::InvalidData(_))
    ));

    let short = DataPoints::Curve(vec![Variable::from(1.0)]);
    assert!(matches!(
        extender.store_data_points(series, &sweep, real, &short),
        Err(ExtenderError::InvalidData(_))
    ));

    extender
        .store_data_points(series, &sweep, real, &DataPoints::Curve(frequencies()))
        .unwrap();
    assert_eq!(extender.bucket_size(), 1);
    assert_eq!(extender.buffered_containers(), 3);
}

#[test]
fn test_non_finite_samples_survive_the_store() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();
    let series = extender.add_series(two_port("run")).unwrap();
    let real = extender.catalog().find_quantity("Real").unwrap().uid;

    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        extender
            .add_quantity_container(series, &["Frequency"], vec![Variable::from(1.0e9)], real, Variable::from(value))
            .unwrap();
    }
    extender.finish().unwrap();

    let containers = stored_containers(&documents, "sweeps");
    assert_eq!(containers.len(), 3);
    let values: Vec<Variable> = containers.into_iter().flat_map(|c| c.values).collect();
    assert_eq!(
        values,
        vec![
            Variable::from(f64::NAN),
            Variable::from(f64::INFINITY),
            Variable::from(f64::NEG_INFINITY),
        ]
    );
}

#[test]
fn test_non_finite_domain_values_reload() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let mut extender =
        CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())
            .unwrap();
    let domain = vec![Variable::from(1.0), Variable::from(f64::INFINITY)];
    extender
        .add_series(
            NewSeries::new("far_field")
                .with_parameter(Parameter::new("Distance", "m", "double").with_values(domain.clone()))
                .with_quantity(Quantity::scalar("Gain", "dB", "double")),
        )
        .unwrap();
    extender.finish().unwrap();

    let catalog = ResultCatalog::load("sweeps", &entities).unwrap();
    let series = catalog.find_series("far_field").unwrap();
    assert_eq!(series.parameters[0].values, domain);
    assert_eq!(catalog.find_parameter("Distance").unwrap().values, domain);
}
