use crate::metadata::Campaign;

use super::{ValidationCheck, ValidationReport};

/// Metadata invariants of a loaded campaign
pub(crate) fn check_campaign(campaign: &Campaign, report: &mut ValidationReport) {
    match campaign.check_consistency() {
        Ok(()) => report.add_check(ValidationCheck::ok("Identifiers and labels are unique")),
        Err(e) => report.add_check(ValidationCheck::failed(
            "Identifiers and labels are unique",
            e.to_string(),
        )),
    }

    let mut unsorted = Vec::new();
    let mut foreign_dependencies = Vec::new();
    let mut without_quantities = Vec::new();
    for series in campaign.series() {
        for reference in &series.parameters {
            if reference.values.windows(2).any(|pair| pair[0] >= pair[1]) {
                unsorted.push(format!("'{}' parameter {}", series.name, reference.uid));
            }
        }
        for reference in &series.quantities {
            for uid in &reference.depending_parameter_ids {
                if !series.parameters.iter().any(|p| p.uid == *uid) {
                    foreign_dependencies.push(format!(
                        "'{}' quantity {} depends on parameter {}",
                        series.name, reference.uid, uid
                    ));
                }
            }
        }
        if series.quantities.is_empty() {
            without_quantities.push(series.name.clone());
        }
    }

    report.add_check(ValidationCheck::from_problems(
        "Series domains are sorted and unique",
        &unsorted,
    ));
    report.add_check(ValidationCheck::from_problems(
        "Quantities depend on parameters of their series",
        &foreign_dependencies,
    ));
    if without_quantities.is_empty() {
        report.add_check(ValidationCheck::ok("Every series has quantities"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Every series has quantities",
            format!("no quantities in {}", without_quantities.join(", ")),
        ));
    }
}
