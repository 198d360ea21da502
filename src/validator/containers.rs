use std::collections::BTreeMap;

use crate::catalog::ResultCatalog;
use crate::container::QuantityContainer;
use crate::metadata::Uid;
use crate::store::DocumentStore;

use super::{ValidationCheck, ValidationError, ValidationReport};

/// Bulk documents of the collection against its metadata
pub(crate) fn check_containers(
    catalog: &ResultCatalog,
    documents: &dyn DocumentStore,
    report: &mut ValidationReport,
) -> Result<(), ValidationError> {
    let stored = documents.find_all(catalog.collection())?;

    let mut undecodable = 0usize;
    let mut containers = Vec::with_capacity(stored.len());
    for document in &stored {
        match QuantityContainer::from_document(document) {
            Ok(container) => containers.push(container),
            Err(_) => undecodable += 1,
        }
    }
    if undecodable == 0 {
        report.add_check(ValidationCheck::ok(format!(
            "{} quantity containers decode",
            containers.len()
        )));
    } else {
        report.add_check(ValidationCheck::failed(
            "Quantity containers decode",
            format!("{} of {} documents are malformed", undecodable, stored.len()),
        ));
    }

    let campaign = catalog.campaign();
    let mut problems = Vec::new();
    let mut per_series: BTreeMap<Uid, usize> = BTreeMap::new();
    let mut empty = 0usize;
    for container in &containers {
        if container.is_empty() {
            empty += 1;
        }
        if container.parameter_ids.len() != container.parameter_values.len() {
            problems.push(format!(
                "container of series {} has {} parameters but {} values",
                container.series_index,
                container.parameter_ids.len(),
                container.parameter_values.len()
            ));
        }
        if campaign.quantity_by_value_uid(container.quantity_index).is_none() {
            problems.push(format!(
                "unknown quantity value description {}",
                container.quantity_index
            ));
        }
        let Some(series) = catalog.find_series_by_uid(container.series_index) else {
            problems.push(format!("unknown series {}", container.series_index));
            continue;
        };
        *per_series.entry(series.index).or_default() += 1;
        for uid in &container.parameter_ids {
            if !series.parameters.iter().any(|p| p.uid == *uid) {
                problems.push(format!(
                    "parameter {} is not part of series '{}'",
                    uid, series.name
                ));
            }
        }
    }
    problems.dedup();
    report.add_check(ValidationCheck::from_problems(
        "Containers reference known metadata",
        &problems,
    ));

    if empty > 0 {
        report.add_check(ValidationCheck::warning(
            "Containers hold values",
            format!("{} containers are empty", empty),
        ));
    }

    let missing: Vec<&str> = campaign
        .series()
        .iter()
        .filter(|s| !s.quantities.is_empty() && !per_series.contains_key(&s.index))
        .map(|s| s.name.as_str())
        .collect();
    if missing.is_empty() {
        report.add_check(ValidationCheck::ok("Every series has bulk data"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Every series has bulk data",
            format!("no containers stored for {}", missing.join(", ")),
        ));
    }
    Ok(())
}
