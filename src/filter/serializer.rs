use super::descriptor::{ColumnKey, FilterDescriptor, FilterValue, ValueKind};
use super::distinct::encode_distinct;
use super::domain::DomainTables;
use super::error::FilterCodecError;
use super::grammar::{Clause, ColumnClause, DistinctExpr, FilterDocument, FilterExpr};
use tracing::debug;

/// Selected values of one status column, split by side
#[derive(Debug, Default)]
struct DistinctSelection {
    status: Option<Vec<FilterValue>>,
    category: Option<Vec<FilterValue>>,
}

impl DistinctSelection {
    fn push(&mut self, value: FilterValue) {
        let side = match value.kind {
            ValueKind::Status => &mut self.status,
            ValueKind::Category => &mut self.category,
        };
        let selected = side.get_or_insert_with(Vec::new);
        if !selected.contains(&value) {
            selected.push(value);
        }
    }

    fn side(&self, kind: ValueKind) -> Option<&[FilterValue]> {
        match kind {
            ValueKind::Status => self.status.as_deref(),
            ValueKind::Category => self.category.as_deref(),
        }
    }
}

#[derive(Debug)]
enum ColumnSelection {
    Value(String),
    Distinct(DistinctSelection),
}

#[derive(Debug)]
struct ColumnGroup {
    column_id: String,
    column_name: String,
    selection: ColumnSelection,
}

#[derive(Debug)]
struct RunsetGroup {
    runset_id: String,
    columns: Vec<ColumnGroup>,
}

impl RunsetGroup {
    fn column(&mut self, key: &ColumnKey, status_column: bool) -> &mut ColumnSelection {
        let idx = match self
            .columns
            .iter()
            .position(|column| column.column_id == key.column_id)
        {
            Some(idx) => idx,
            None => {
                let selection = if status_column {
                    ColumnSelection::Distinct(DistinctSelection::default())
                } else {
                    ColumnSelection::Value(String::new())
                };
                self.columns.push(ColumnGroup {
                    column_id: key.column_id.clone(),
                    column_name: key.column_name.clone(),
                    selection,
                });
                self.columns.len() - 1
            }
        };
        &mut self.columns[idx].selection
    }
}

/// Descriptors grouped by runset and column, in first-seen order
#[derive(Debug, Default)]
struct GroupedFilters {
    ids: Option<Vec<String>>,
    any_ids: Vec<String>,
    runsets: Vec<RunsetGroup>,
}

impl GroupedFilters {
    fn runset(&mut self, runset_id: &str) -> &mut RunsetGroup {
        let idx = match self
            .runsets
            .iter()
            .position(|runset| runset.runset_id == runset_id)
        {
            Some(idx) => idx,
            None => {
                self.runsets.push(RunsetGroup {
                    runset_id: runset_id.to_string(),
                    columns: Vec::new(),
                });
                self.runsets.len() - 1
            }
        };
        &mut self.runsets[idx]
    }

    fn collect(
        descriptors: &[FilterDescriptor],
        tables: &DomainTables,
    ) -> Result<Self, FilterCodecError> {
        let mut grouped = GroupedFilters::default();

        for descriptor in descriptors {
            if descriptor.is_task_id() {
                grouped.add_task_id(descriptor);
                continue;
            }

            let key = ColumnKey::parse(&descriptor.id)?;
            if !tables.knows_runset(&key.runset_id) {
                return Err(FilterCodecError::UnknownRunset(key.runset_id));
            }
            let status_column = tables.is_status_column(&key.runset_id, &key.column_id);
            let value = descriptor.value.clone().unwrap_or_default();

            match grouped.runset(&key.runset_id).column(&key, status_column) {
                ColumnSelection::Distinct(selection) => {
                    selection.push(FilterValue::from_wire(&value))
                }
                ColumnSelection::Value(current) => *current = value,
            }
        }

        Ok(grouped)
    }

    fn add_task_id(&mut self, descriptor: &FilterDescriptor) {
        match &descriptor.values {
            Some(values) if !values.is_empty() => self.ids = Some(values.clone()),
            _ if descriptor.is_table_tab_filter => self
                .any_ids
                .push(descriptor.value.clone().unwrap_or_default()),
            _ => debug!(
                value = ?descriptor.value,
                "dropping task-id filter that is neither an id list nor a table-tab filter"
            ),
        }
    }

    fn into_document(self, tables: &DomainTables) -> Result<FilterDocument, FilterCodecError> {
        let mut clauses = Vec::new();
        if let Some(ids) = self.ids {
            clauses.push(Clause::Ids(ids));
        }
        clauses.extend(self.any_ids.into_iter().map(Clause::AnyId));

        for runset in self.runsets {
            let mut columns = Vec::new();
            for column in runset.columns {
                let filters = match &column.selection {
                    ColumnSelection::Value(value) => vec![FilterExpr::Value(value.clone())],
                    ColumnSelection::Distinct(selection) => status_column_filters(
                        selection,
                        tables,
                        &runset.runset_id,
                        &column.column_id,
                    )?,
                };
                if filters.is_empty() {
                    debug!(
                        runset = %runset.runset_id,
                        column = %column.column_id,
                        "omitting fully selected status column"
                    );
                    continue;
                }
                columns.push(ColumnClause {
                    column_id: column.column_id,
                    column_name: column.column_name,
                    filters,
                });
            }
            if !columns.is_empty() {
                clauses.push(Clause::Runset {
                    runset_id: runset.runset_id,
                    columns,
                });
            }
        }

        Ok(FilterDocument { clauses })
    }
}

/// Filters for one status column.
///
/// A fully selected side is left out. A side with no selection at all is
/// written as `empty()`, but only when the column has values on that side.
fn status_column_filters(
    selection: &DistinctSelection,
    tables: &DomainTables,
    runset_id: &str,
    column_id: &str,
) -> Result<Vec<FilterExpr>, FilterCodecError> {
    let mut filters = Vec::new();

    for kind in [ValueKind::Status, ValueKind::Category] {
        let other = match kind {
            ValueKind::Status => ValueKind::Category,
            ValueKind::Category => ValueKind::Status,
        };
        let Some(selected) = selection.side(kind) else {
            continue;
        };

        let missing_other = selection.side(other).is_none()
            && !tables.side(other, runset_id, column_id).is_empty();
        if kind == ValueKind::Category && missing_other {
            filters.push(wrap(other, DistinctExpr::Empty));
        }

        let domain = tables.values(kind, runset_id, column_id).ok_or_else(|| {
            FilterCodecError::ConfigurationMismatch {
                table: kind,
                runset_id: runset_id.to_string(),
                column_id: column_id.to_string(),
            }
        })?;
        let wire: Vec<String> = selected.iter().map(FilterValue::to_wire).collect();
        if !domain.iter().all(|value| wire.contains(value)) {
            let trim = kind == ValueKind::Category;
            filters.push(wrap(kind, encode_distinct(&wire, domain, trim)));
        }

        if kind == ValueKind::Status && missing_other {
            filters.push(wrap(other, DistinctExpr::Empty));
        }
    }

    Ok(filters)
}

fn wrap(kind: ValueKind, expr: DistinctExpr) -> FilterExpr {
    match kind {
        ValueKind::Status => FilterExpr::Status(expr),
        ValueKind::Category => FilterExpr::Category(expr),
    }
}

/// Build the typed document for a descriptor list
pub fn to_document(
    descriptors: &[FilterDescriptor],
    tables: &DomainTables,
) -> Result<FilterDocument, FilterCodecError> {
    GroupedFilters::collect(descriptors, tables)?.into_document(tables)
}

/// Encode a descriptor list into a filter string. No filters give `""`.
pub fn serialize(
    descriptors: &[FilterDescriptor],
    tables: &DomainTables,
) -> Result<String, FilterCodecError> {
    Ok(to_document(descriptors, tables)?.to_string())
}
