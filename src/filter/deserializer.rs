use super::descriptor::{ColumnKey, FilterDescriptor, FilterValue, TASK_ID, ValueKind};
use super::domain::DomainTables;
use super::error::FilterCodecError;
use super::grammar::{Clause, ColumnClause, DistinctExpr, FilterDocument, FilterExpr};

/// Decode a filter string into descriptors. `""` gives no descriptors.
pub fn deserialize(
    input: &str,
    tables: &DomainTables,
) -> Result<Vec<FilterDescriptor>, FilterCodecError> {
    let document = FilterDocument::parse(input)?;
    from_document(&document, tables)
}

/// Expand a parsed document back into the flat descriptor list.
///
/// Values left implicit by the encoder are materialized: `notIn` becomes the
/// rest of the domain, and a column that names only one of status/category
/// gets every value of the other side.
pub fn from_document(
    document: &FilterDocument,
    tables: &DomainTables,
) -> Result<Vec<FilterDescriptor>, FilterCodecError> {
    let mut out = Vec::new();

    for clause in &document.clauses {
        match clause {
            Clause::Ids(values) => out.push(FilterDescriptor::task_ids(values.iter().cloned())),
            // The table-tab flag is not part of the string
            Clause::AnyId(value) => out.push(FilterDescriptor::with_value(TASK_ID, value.clone())),
            Clause::Runset { runset_id, columns } => {
                for column in columns {
                    expand_column(runset_id, column, tables, &mut out)?;
                }
            }
        }
    }

    Ok(out)
}

fn expand_column(
    runset_id: &str,
    column: &ColumnClause,
    tables: &DomainTables,
    out: &mut Vec<FilterDescriptor>,
) -> Result<(), FilterCodecError> {
    let has_distinct_filter = column
        .filters
        .iter()
        .any(|filter| !matches!(filter, FilterExpr::Value(_)));
    if has_distinct_filter && !tables.knows_runset(runset_id) {
        return Err(FilterCodecError::UnknownRunset(runset_id.to_string()));
    }

    let id = ColumnKey::new(runset_id, column.column_name.as_str(), column.column_id.as_str())
        .to_string();
    let mut has_status = false;
    let mut has_category = false;

    for filter in &column.filters {
        let values = match filter {
            FilterExpr::Value(value) => vec![value.clone()],
            FilterExpr::Status(expr) => {
                has_status = true;
                selected_values(ValueKind::Status, expr, tables, runset_id, &column.column_id)?
            }
            FilterExpr::Category(expr) => {
                has_category = true;
                selected_values(ValueKind::Category, expr, tables, runset_id, &column.column_id)?
            }
        };
        out.extend(
            values
                .into_iter()
                .map(|value| FilterDescriptor::with_value(id.as_str(), value)),
        );
    }

    let implicit = match (has_status, has_category) {
        (true, false) => Some(ValueKind::Category),
        (false, true) => Some(ValueKind::Status),
        _ => None,
    };
    if let Some(kind) = implicit {
        out.extend(
            tables
                .side(kind, runset_id, &column.column_id)
                .iter()
                .map(|value| FilterDescriptor::with_value(id.as_str(), value.as_str())),
        );
    }

    Ok(())
}

/// Wire values selected by one `status(...)` or `category(...)` expression
fn selected_values(
    kind: ValueKind,
    expr: &DistinctExpr,
    tables: &DomainTables,
    runset_id: &str,
    column_id: &str,
) -> Result<Vec<String>, FilterCodecError> {
    let to_wire = |literal: &String| {
        FilterValue {
            kind,
            literal: literal.clone(),
        }
        .to_wire()
    };

    match expr {
        DistinctExpr::In(listed) => Ok(listed.iter().map(to_wire).collect()),
        DistinctExpr::NotIn(listed) => {
            let excluded: Vec<String> = listed.iter().map(to_wire).collect();
            let domain = tables.values(kind, runset_id, column_id).ok_or_else(|| {
                FilterCodecError::ConfigurationMismatch {
                    table: kind,
                    runset_id: runset_id.to_string(),
                    column_id: column_id.to_string(),
                }
            })?;
            Ok(domain
                .iter()
                .filter(|value| !excluded.contains(value))
                .cloned()
                .collect())
        }
        DistinctExpr::Empty => Ok(Vec::new()),
    }
}
