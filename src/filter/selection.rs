use super::descriptor::{ColumnKey, FilterDescriptor, FilterValue, ValueKind};
use super::domain::DomainTables;
use super::error::FilterCodecError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// What a column filter actually lets through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EffectiveColumn {
    Value {
        value: String,
    },
    Distinct {
        status: BTreeSet<String>,
        category: BTreeSet<String>,
    },
}

/// Effective filter state of a descriptor list, independent of list order
/// and of which values were spelled out explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selections {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_ids: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub any_ids: BTreeSet<String>,
    /// Keyed by `<runsetId>/<columnId>`
    pub columns: BTreeMap<String, EffectiveColumn>,
}

impl Selections {
    pub fn is_empty(&self) -> bool {
        self.task_ids.is_none() && self.any_ids.is_empty() && self.columns.is_empty()
    }
}

impl fmt::Display for Selections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ids) = &self.task_ids {
            writeln!(f, "id values: {}", join(ids))?;
        }
        for value in &self.any_ids {
            writeln!(f, "id any: {value}")?;
        }
        for (key, column) in &self.columns {
            match column {
                EffectiveColumn::Value { value } => writeln!(f, "{key} value: {value}")?,
                EffectiveColumn::Distinct { status, category } => {
                    writeln!(f, "{key} status: {}", join(status))?;
                    writeln!(f, "{key} category: {}", join(category))?;
                }
            }
        }
        Ok(())
    }
}

fn join(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compute the effective selections of a descriptor list.
///
/// Status and category sets are restricted to their domain, and a status
/// column whose every non-empty side is fully selected counts as unfiltered.
pub fn effective_selections(
    descriptors: &[FilterDescriptor],
    tables: &DomainTables,
) -> Result<Selections, FilterCodecError> {
    let mut selections = Selections::default();

    for descriptor in descriptors {
        if descriptor.is_task_id() {
            match (&descriptor.values, &descriptor.value) {
                (Some(values), _) if !values.is_empty() => {
                    selections.task_ids = Some(values.iter().cloned().collect());
                }
                (_, Some(value)) => {
                    selections.any_ids.insert(value.clone());
                }
                _ => {}
            }
            continue;
        }

        let key = ColumnKey::parse(&descriptor.id)?;
        let column_key = format!("{}/{}", key.runset_id, key.column_id);
        let value = descriptor.value.clone().unwrap_or_default();

        if !tables.is_status_column(&key.runset_id, &key.column_id) {
            selections
                .columns
                .insert(column_key, EffectiveColumn::Value { value });
            continue;
        }

        let entry = selections
            .columns
            .entry(column_key)
            .or_insert_with(|| EffectiveColumn::Distinct {
                status: BTreeSet::new(),
                category: BTreeSet::new(),
            });
        if let EffectiveColumn::Distinct { status, category } = entry {
            let filter_value = FilterValue::from_wire(&value);
            let wire = filter_value.to_wire();
            if tables
                .side(filter_value.kind, &key.runset_id, &key.column_id)
                .contains(&wire)
            {
                match filter_value.kind {
                    ValueKind::Status => status.insert(wire),
                    ValueKind::Category => category.insert(wire),
                };
            }
        }
    }

    selections.columns.retain(|key, column| match column {
        EffectiveColumn::Value { .. } => true,
        EffectiveColumn::Distinct { status, category } => {
            let Some((runset_id, column_id)) = key.split_once('/') else {
                return true;
            };
            !(fully_selected(tables.side(ValueKind::Status, runset_id, column_id), status)
                && fully_selected(tables.side(ValueKind::Category, runset_id, column_id), category))
        }
    });

    Ok(selections)
}

fn fully_selected(domain: &[String], selected: &BTreeSet<String>) -> bool {
    domain.iter().all(|value| selected.contains(value))
}
