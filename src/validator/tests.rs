use super::*;
use crate::extender::{CollectionExtender, ExtenderConfig};
use crate::metadata::{NewSeries, Parameter, Quantity};
use crate::store::{DocumentEntityStore, InMemoryDocumentStore};
use crate::variable::Variable;
use serde_json::json;

fn populate(documents: &InMemoryDocumentStore, with_data: bool) {
    let entities = DocumentEntityStore::new(documents);
    let mut extender =
        CollectionExtender::open("sweeps", documents, &entities, ExtenderConfig::default())
            .unwrap();
    let series = extender
        .add_series(
            NewSeries::new("run")
                .with_parameter(
                    Parameter::new("Frequency", "Hz", "double").with_values(vec![Variable::from(1.0)]),
                )
                .with_quantity(Quantity::scalar("Gain", "dB", "double")),
        )
        .unwrap();
    if with_data {
        let gain = extender.catalog().find_quantity("Gain").unwrap().uid;
        extender
            .add_quantity_container(series, &["Frequency"], vec![Variable::from(1.0)], gain, Variable::from(3.0))
            .unwrap();
    }
    extender.finish().unwrap();
}

#[test]
fn test_report_display() {
    let mut report = ValidationReport::new("sweeps");
    report.add_check(ValidationCheck::ok("Check 1"));
    report.add_check(ValidationCheck::warning("Check 2", "This is a warning"));
    report.add_check(ValidationCheck::failed("Check 3", "This failed"));

    let output = format!("{}", report);
    assert!(output.contains("✓"));
    assert!(output.contains("⚠"));
    assert!(output.contains("✗"));
    assert!(output.contains("1 passed, 1 warnings, 1 failed"));
    assert!(output.contains("Validation FAILED"));
}

#[test]
fn test_clean_collection_passes() {
    let documents = InMemoryDocumentStore::new();
    populate(&documents, true);
    let entities = DocumentEntityStore::new(&documents);

    let report = validate_collection("sweeps", &documents, &entities).unwrap();
    assert!(!report.has_failures(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
}

#[test]
fn test_metadata_ahead_of_bulk_data_is_a_warning() {
    let documents = InMemoryDocumentStore::new();
    populate(&documents, false);
    let entities = DocumentEntityStore::new(&documents);

    let report = validate_collection("sweeps", &documents, &entities).unwrap();
    assert!(!report.has_failures(), "{}", report);
    assert_eq!(report.warning_count(), 1);
    assert!(report.to_string().contains("no containers stored for run"));
}

#[test]
fn test_foreign_containers_fail() {
    let documents = InMemoryDocumentStore::new();
    populate(&documents, true);
    let entities = DocumentEntityStore::new(&documents);

    let stray = json!({
        "seriesIndex": 9,
        "quantityIndex": 0,
        "parameterIds": [0],
        "parameterValues": [1.0],
        "values": [1.0]
    });
    let malformed = json!({ "seriesIndex": "zero" });
    for value in [stray, malformed] {
        if let serde_json::Value::Object(document) = value {
            documents.insert_one("sweeps", document).unwrap();
        }
    }

    let report = validate_collection("sweeps", &documents, &entities).unwrap();
    assert_eq!(report.failure_count(), 2, "{}", report);
    assert!(report.to_string().contains("unknown series 9"));
}

#[test]
fn test_missing_campaign_fails() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    let report = validate_collection("sweeps", &documents, &entities).unwrap();
    assert_eq!(report.checks.len(), 1);
    assert!(report.has_failures());
}

#[test]
fn test_offline_store_is_an_error() {
    let documents = InMemoryDocumentStore::new();
    let entities = DocumentEntityStore::new(&documents);
    documents.set_offline(true);
    assert!(validate_collection("sweeps", &documents, &entities).is_err());
}

#[test]
fn test_validate_in_memory_campaign() {
    let report = validate_campaign(&crate::metadata::Campaign::new("empty"));
    assert!(!report.has_failures());
    assert_eq!(report.collection, "empty");
}
