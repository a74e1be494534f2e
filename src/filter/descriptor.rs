use super::error::FilterCodecError;
use super::token::{ANY_ID_KEY, IDS_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptor id of the task-identity filter
pub const TASK_ID: &str = "id";

/// Suffix marking a category value on the wire
const CATEGORY_MARKER: char = ' ';

/// Characters with grammar meaning, never allowed in runset or column ids
const ID_DELIMITERS: [char; 4] = ['(', ')', ',', '*'];

/// One active column filter, as produced by the table UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    /// `"id"` or `"<runsetId>_<columnName>_<columnId>"`
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_table_tab_filter: bool,
}

impl FilterDescriptor {
    pub fn with_value(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn task_ids<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: TASK_ID.to_string(),
            values: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Free-text task-id filter typed into the table tab
    pub fn table_tab(value: impl Into<String>) -> Self {
        Self {
            id: TASK_ID.to_string(),
            value: Some(value.into()),
            is_table_tab_filter: true,
            ..Self::default()
        }
    }

    pub fn is_task_id(&self) -> bool {
        self.id == TASK_ID
    }
}

/// Which side of a status column a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Status,
    Category,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Status => f.write_str("status"),
            ValueKind::Category => f.write_str("category"),
        }
    }
}

/// A status or category value with its kind made explicit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterValue {
    pub kind: ValueKind,
    /// The value without the category marker
    pub literal: String,
}

impl FilterValue {
    pub fn status(literal: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Status,
            literal: literal.into(),
        }
    }

    pub fn category(literal: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Category,
            literal: literal.into(),
        }
    }

    /// Classify a wire value: a trailing space marks a category
    pub fn from_wire(value: &str) -> Self {
        if value.ends_with(CATEGORY_MARKER) {
            Self::category(value.trim_end_matches(CATEGORY_MARKER))
        } else {
            Self::status(value)
        }
    }

    /// Wire form, with exactly one trailing space for categories
    pub fn to_wire(&self) -> String {
        match self.kind {
            ValueKind::Status => self.literal.clone(),
            ValueKind::Category => format!("{}{}", self.literal, CATEGORY_MARKER),
        }
    }
}

/// Composite column id `<runsetId>_<columnName>_<columnId>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub runset_id: String,
    pub column_name: String,
    pub column_id: String,
}

impl ColumnKey {
    pub fn new(
        runset_id: impl Into<String>,
        column_name: impl Into<String>,
        column_id: impl Into<String>,
    ) -> Self {
        Self {
            runset_id: runset_id.into(),
            column_name: column_name.into(),
            column_id: column_id.into(),
        }
    }

    /// Parse a descriptor id. Underscores inside the name are kept.
    ///
    /// Runset and column ids are written to the filter string verbatim, so
    /// they may not contain grammar delimiters, and a runset may not be named
    /// like a task-id clause.
    pub fn parse(id: &str) -> Result<Self, FilterCodecError> {
        let invalid = || FilterCodecError::InvalidFilterId(id.to_string());
        let (runset_id, rest) = id.split_once('_').ok_or_else(invalid)?;
        let (column_name, column_id) = rest.rsplit_once('_').ok_or_else(invalid)?;
        if [IDS_KEY, ANY_ID_KEY].contains(&runset_id)
            || runset_id.contains(ID_DELIMITERS)
            || column_id.contains(ID_DELIMITERS)
        {
            return Err(invalid());
        }
        Ok(Self::new(runset_id, column_name, column_id))
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.runset_id, self.column_name, self.column_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_key_parse() {
        let key = ColumnKey::parse("1_status_0").unwrap();
        assert_eq!(key, ColumnKey::new("1", "status", "0"));
        assert_eq!(key.to_string(), "1_status_0");
    }

    #[test]
    fn test_column_key_keeps_underscores_in_name() {
        let key = ColumnKey::parse("0_cpu_time_wall_3").unwrap();
        assert_eq!(key.runset_id, "0");
        assert_eq!(key.column_name, "cpu_time_wall");
        assert_eq!(key.column_id, "3");
    }

    #[test]
    fn test_column_key_rejects_ids_that_break_the_grammar() {
        for id in [
            "id_x_1",
            "id_any_x_1",
            "0_x_a(b",
            "0_x_1)",
            "0_x_1,2",
            "0_x_1*",
            "a,b_x_1",
            "a*b_x_1",
        ] {
            assert_eq!(
                ColumnKey::parse(id),
                Err(FilterCodecError::InvalidFilterId(id.to_string())),
                "id: {id}"
            );
        }
        assert!(ColumnKey::parse("0_mem (MB), peak*_1").is_ok());
    }

    #[test]
    fn test_column_key_rejects_short_ids() {
        assert!(ColumnKey::parse("status").is_err());
        assert!(ColumnKey::parse("1_status").is_err());
    }

    #[test]
    fn test_filter_value_classification() {
        assert_eq!(FilterValue::from_wire("true"), FilterValue::status("true"));
        assert_eq!(
            FilterValue::from_wire("correct "),
            FilterValue::category("correct")
        );
        assert_eq!(
            FilterValue::from_wire("correct   ").to_wire(),
            "correct ",
            "category marker is normalized to exactly one space"
        );
    }

    #[test]
    fn test_descriptor_json_shape() {
        let json = serde_json::to_value(FilterDescriptor::table_tab("foo")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "id", "value": "foo", "isTableTabFilter": true})
        );

        let parsed: FilterDescriptor =
            serde_json::from_str(r#"{"id":"1_status_0","value":"true"}"#).unwrap();
        assert_eq!(parsed, FilterDescriptor::with_value("1_status_0", "true"));
    }
}
