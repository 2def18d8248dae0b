//! Conversion of in-band "unknown parent" values into nulls.

use crate::data::{Id, IdKind, Table};
use crate::error::Result;

/// Whether the column holds integer identifiers.
///
/// # Errors
/// Returns an error if the column does not exist.
pub fn is_integer_column(table: &Table, label: &str) -> Result<bool> {
    Ok(table.get_column(label)?.id_kind() == Some(IdKind::Integer))
}

/// The value used to represent an unknown parent in `label`.
///
/// `0` for integer ids, `"."` for token ids.
///
/// # Errors
/// Returns an error if the column does not exist.
pub fn unknown_parent_sentinel(table: &Table, label: &str) -> Result<Id> {
    Ok(if is_integer_column(table, label)? {
        Id::Int(0)
    } else {
        Id::Token(".".to_string())
    })
}

/// Replace the unknown-parent sentinel with null in each parent column.
///
/// With `sentinel == None` the sentinel is inferred per column with
/// [`unknown_parent_sentinel`]. Row count and schema are unchanged.
///
/// # Errors
/// Returns an error if a parent column does not exist.
pub fn normalize_unknown_parents(
    table: &Table,
    parent_labels: &[&str],
    sentinel: Option<&Id>,
) -> Result<Table> {
    table.require_columns(parent_labels)?;
    let mut out = table.clone();
    for &label in parent_labels {
        let unknown = match sentinel {
            Some(s) => s.clone(),
            None => unknown_parent_sentinel(table, label)?,
        };
        let column = out.get_column(label)?.null_ids_where(|id| *id == unknown);
        out = out.with_column(label, column)?;
    }
    Ok(out)
}
