use crate::filter::{ColumnKey, FilterDescriptor, Selections};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use similar::{ChangeTag, TextDiff};

/// Render descriptors as a table, one row per descriptor
pub fn descriptor_table(descriptors: &[FilterDescriptor]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Filter", "Runset", "Column", "Value"]);

    for descriptor in descriptors {
        let (runset, column) = match ColumnKey::parse(&descriptor.id) {
            Ok(key) if !descriptor.is_task_id() => {
                (key.runset_id, format!("{} ({})", key.column_name, key.column_id))
            }
            _ => ("-".to_string(), "task id".to_string()),
        };
        let value = match (&descriptor.values, &descriptor.value) {
            (Some(values), _) => values
                .iter()
                .map(|v| format!("{v:?}"))
                .collect::<Vec<_>>()
                .join(", "),
            (None, Some(value)) => format!("{value:?}"),
            (None, None) => String::new(),
        };
        table.add_row(vec![
            Cell::new(&descriptor.id),
            Cell::new(runset),
            Cell::new(column),
            Cell::new(value),
        ]);
    }

    table
}

pub fn format_descriptors_text(descriptors: &[FilterDescriptor]) -> String {
    if descriptors.is_empty() {
        return "No filters.\n".to_string();
    }
    format!("{}\n", descriptor_table(descriptors))
}

/// Colored line diff of two selections; unchanged lines are left out
pub fn selection_diff(before: &Selections, after: &Selections) -> String {
    let before = before.to_string();
    let after = after.to_string();
    let diff = TextDiff::from_lines(&before, &after);
    let mut result = String::new();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => result.push_str(&format!("{}", format!("-{change}").red())),
            ChangeTag::Insert => result.push_str(&format!("{}", format!("+{change}").green())),
            ChangeTag::Equal => continue,
        }
    }

    result
}
