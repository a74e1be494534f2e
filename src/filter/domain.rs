use super::descriptor::ValueKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `runsetId -> columnId -> values`
pub type DomainTable = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Every legal status and category value of every status column.
///
/// Derived from the dataset by the caller and passed by reference into each
/// encode/decode call; never written into the filter string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainTables {
    #[serde(rename = "statusValues", alias = "status")]
    pub status: DomainTable,
    #[serde(rename = "categoryValues", alias = "category")]
    pub category: DomainTable,
}

impl DomainTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status<I, S>(mut self, runset_id: &str, column_id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        insert(&mut self.status, runset_id, column_id, values);
        self
    }

    /// Category values carry their trailing marker space, as in the dataset
    pub fn with_category<I, S>(mut self, runset_id: &str, column_id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        insert(&mut self.category, runset_id, column_id, values);
        self
    }

    /// Add an empty entry so the runset is known even without status columns
    pub fn with_runset(mut self, runset_id: &str) -> Self {
        self.status.entry(runset_id.to_string()).or_default();
        self
    }

    fn table(&self, kind: ValueKind) -> &DomainTable {
        match kind {
            ValueKind::Status => &self.status,
            ValueKind::Category => &self.category,
        }
    }

    pub fn values(&self, kind: ValueKind, runset_id: &str, column_id: &str) -> Option<&[String]> {
        self.table(kind)
            .get(runset_id)
            .and_then(|columns| columns.get(column_id))
            .map(Vec::as_slice)
    }

    pub fn status_values(&self, runset_id: &str, column_id: &str) -> Option<&[String]> {
        self.values(ValueKind::Status, runset_id, column_id)
    }

    pub fn category_values(&self, runset_id: &str, column_id: &str) -> Option<&[String]> {
        self.values(ValueKind::Category, runset_id, column_id)
    }

    pub fn knows_runset(&self, runset_id: &str) -> bool {
        self.status.contains_key(runset_id) || self.category.contains_key(runset_id)
    }

    /// A column is a status column if either table lists values for it
    pub fn is_status_column(&self, runset_id: &str, column_id: &str) -> bool {
        self.status_values(runset_id, column_id).is_some()
            || self.category_values(runset_id, column_id).is_some()
    }

    /// Values of a side, treating a missing entry as an empty domain
    pub(crate) fn side(&self, kind: ValueKind, runset_id: &str, column_id: &str) -> &[String] {
        self.values(kind, runset_id, column_id).unwrap_or_default()
    }
}

fn insert<I, S>(table: &mut DomainTable, runset_id: &str, column_id: &str, values: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    table
        .entry(runset_id.to_string())
        .or_default()
        .insert(column_id.to_string(), values.into_iter().map(Into::into).collect());
}
