//! # Dataset Overview Tables
//!
//! Human-readable key/value tables describing a series or a whole campaign,
//! as shown by the `info` command. Nested sections (metadata, parameters,
//! quantities, value descriptions) are indented one column per level.
//!
//! ```text
//! Campaign Overview
//! Metadata
//!   solver        fdtd
//! Series Metadata Overview
//! Label           run-1
//! UID             0
//! Parameter
//!   Name          Frequency
//!   ...
//! ```

use std::fmt;

use crate::metadata::{Campaign, MetadataEntry, Series};
use crate::variable::Variable;

/// Number of values listed for parameter domains and array entries
pub const MAX_LISTED_VALUES: usize = 10;

/// One line of an overview table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewRow {
    /// Nesting level, one column per level
    pub indent: usize,
    /// Key or heading text
    pub key: String,
    /// Value; `None` for headings
    pub value: Option<String>,
}

/// A key/value overview of metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewTable {
    rows: Vec<OverviewRow>,
    indent: usize,
}

impl OverviewTable {
    /// Overview of one series, resolving its schema references through the campaign
    pub fn for_series(campaign: &Campaign, series: &Series) -> Self {
        let mut table = Self::default();
        table.add_series(campaign, series);
        table
    }

    /// Overview of the campaign metadata followed by every series
    pub fn for_campaign(campaign: &Campaign) -> Self {
        let mut table = Self::default();
        table.single("Campaign Overview");
        table.add_pair("Name", campaign.name().to_string());
        table.section("Metadata", |table| {
            for entry in campaign.metadata().values() {
                table.add_entry(entry);
            }
        });
        for series in campaign.series() {
            table.add_series(campaign, series);
        }
        table
    }

    /// All rows in display order
    pub fn rows(&self) -> &[OverviewRow] {
        &self.rows
    }

    /// Number of columns needed to lay the table out as a grid
    pub fn columns(&self) -> usize {
        self.rows.iter().map(|r| r.indent + 2).max().unwrap_or(0)
    }

    /// Value of the first row with the given key
    pub fn value(&self, key: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.key == key)
            .and_then(|r| r.value.as_deref())
    }

    fn add_series(&mut self, campaign: &Campaign, series: &Series) {
        self.single("Series Metadata Overview");
        self.add_pair("Label", series.label.clone());
        self.add_pair("UID", series.index.to_string());

        self.section("Metadata", |table| {
            for entry in series.metadata.values() {
                table.add_entry(entry);
            }
        });

        self.section("Parameter", |table| {
            for reference in &series.parameters {
                let Some(parameter) = campaign.parameter(reference.uid) else {
                    continue;
                };
                table.add_pair("Name", parameter.name.clone());
                table.add_pair("Label", parameter.label.clone());
                table.add_pair("UID", parameter.uid.to_string());
                table.add_pair("Data type", parameter.type_name.clone());
                table.add_pair("Unit", parameter.unit.clone());
                table.add_pair("Values", list_values(&reference.values));
                table.section("Metadata", |table| {
                    for entry in parameter.metadata.values() {
                        table.add_entry(entry);
                    }
                });
            }
        });

        self.section("Quantity", |table| {
            for reference in &series.quantities {
                let Some(quantity) = campaign.quantity(reference.uid) else {
                    continue;
                };
                table.add_pair("Name", quantity.name.clone());
                table.add_pair("Label", quantity.label.clone());
                let dimensions: Vec<String> =
                    quantity.data_dimensions.iter().map(u32::to_string).collect();
                table.add_pair("Data dimensions", format!("<{}>", dimensions.join(", ")));
                table.section("Value descriptions", |table| {
                    for description in &quantity.value_descriptions {
                        table.section(&description.label, |table| {
                            table.add_pair("Name", description.name.clone());
                            table.add_pair("Unit", description.unit.clone());
                            table.add_pair("Datatype", description.data_type_name.clone());
                            table.add_pair("UID", description.uid.to_string());
                        });
                    }
                });
                table.section("Metadata", |table| {
                    for entry in quantity.metadata.values() {
                        table.add_entry(entry);
                    }
                });
            }
        });
    }

    fn add_entry(&mut self, entry: &MetadataEntry) {
        let value = match entry {
            MetadataEntry::Single { value, .. } => value.to_string(),
            MetadataEntry::Array { values, .. } => list_values(values),
            MetadataEntry::Object { .. } => "Object".to_string(),
        };
        self.add_pair(entry.name(), value);
    }

    fn single(&mut self, text: &str) {
        self.rows.push(OverviewRow {
            indent: self.indent,
            key: text.to_string(),
            value: None,
        });
    }

    fn add_pair(&mut self, key: &str, value: String) {
        self.rows.push(OverviewRow {
            indent: self.indent,
            key: key.to_string(),
            value: Some(value),
        });
    }

    fn section(&mut self, heading: &str, body: impl FnOnce(&mut Self)) {
        self.single(heading);
        self.indent += 1;
        body(self);
        self.indent -= 1;
    }
}

fn list_values(values: &[Variable]) -> String {
    let listed: Vec<String> = values
        .iter()
        .take(MAX_LISTED_VALUES)
        .map(Variable::to_string)
        .collect();
    if values.len() > MAX_LISTED_VALUES {
        format!("{}, ... ({} total)", listed.join(", "), values.len())
    } else {
        listed.join(", ")
    }
}

impl fmt::Display for OverviewTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_width = self
            .rows
            .iter()
            .map(|r| r.indent * 2 + r.key.chars().count())
            .max()
            .unwrap_or(0);
        for row in &self.rows {
            let key = format!("{}{}", "  ".repeat(row.indent), row.key);
            match &row.value {
                Some(value) => writeln!(f, "{:<width$}  {}", key, value, width = key_width)?,
                None => writeln!(f, "{}", key)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Parameter, ParameterRef, Quantity, QuantityRef};

    fn campaign() -> Campaign {
        let mut parameter = Parameter::new("Frequency", "Hz", "double");
        parameter.metadata.insert(
            "source".to_string(),
            MetadataEntry::single("source", "touchstone"),
        );
        let quantity = Quantity::scalar("Gain", "dB", "double");
        let series = Series {
            name: "run".to_string(),
            label: "Run 1".to_string(),
            index: 0,
            parameters: vec![ParameterRef {
                uid: 0,
                values: (0..12).map(|i| Variable::from(i as f64)).collect(),
            }],
            quantities: vec![QuantityRef {
                uid: 0,
                depending_parameter_ids: vec![0],
            }],
            metadata: Default::default(),
        };
        let mut campaign = Campaign::from_parts(
            "sweeps",
            Default::default(),
            vec![series],
            vec![parameter],
            vec![quantity],
        )
        .unwrap();
        campaign.add_metadata(MetadataEntry::array(
            "ports",
            vec![Variable::from(1), Variable::from(2)],
        ));
        campaign
    }

    #[test]
    fn test_series_overview() {
        let campaign = campaign();
        let table = OverviewTable::for_series(&campaign, &campaign.series()[0]);

        assert_eq!(table.rows()[0].key, "Series Metadata Overview");
        assert_eq!(table.value("Label"), Some("Run 1"));
        assert_eq!(table.value("Data dimensions"), Some("<1>"));
        assert_eq!(table.value("source"), Some("touchstone"));
        assert!(table
            .value("Values")
            .unwrap()
            .ends_with("... (12 total)"));

        let source = table.rows().iter().find(|r| r.key == "source").unwrap();
        assert_eq!(source.indent, 2);
        assert_eq!(table.columns(), 5);
    }

    #[test]
    fn test_campaign_overview() {
        let campaign = campaign();
        let table = OverviewTable::for_campaign(&campaign);
        assert_eq!(table.value("Name"), Some("sweeps"));
        assert_eq!(table.value("ports"), Some("1, 2"));

        let rendered = table.to_string();
        assert!(rendered.starts_with("Campaign Overview\n"));
        assert!(rendered.contains("Series Metadata Overview"));
    }
}
