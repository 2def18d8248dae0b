//! Closing a pedigree over its parents and recoding it to dense integers.

use std::collections::HashSet;

use crate::data::{Column, Id, Table};
use crate::error::{PedigreeError, Result};

use super::algebra::{dangling_parents, missing_records_from};
use super::graph::PedigreeGraph;
use super::labels::PedigreeLabels;

/// Name of the code column in [`Recoded::id_map`].
pub const RECODED_COLUMN: &str = "recoded";

/// Prepend one founder record for every parent that has none, so that every
/// parent precedes its offspring and the pedigree is closed.
///
/// # Errors
/// Returns an error if a label is missing or parent ids are of a different
/// kind than the subject column.
pub fn add_missing_records(table: &Table, labels: &PedigreeLabels) -> Result<Table> {
    let graph = PedigreeGraph::from_table(table, labels)?;
    let missing = missing_records_from(table, labels, &graph)?;
    if missing.nrows() > 0 {
        log::debug!("adding {} missing parent records", missing.nrows());
    }
    missing.vstack(table)
}

/// Set every parent reference that has no record of its own to null.
///
/// # Errors
/// Returns an error if a label is missing or names a float column.
pub fn null_parents_without_own_record(table: &Table, labels: &PedigreeLabels) -> Result<Table> {
    let graph = PedigreeGraph::from_table(table, labels)?;
    let dangling: HashSet<Id> = dangling_parents(&graph).into_iter().collect();
    let mut out = table.clone();
    for label in labels.parents() {
        let column = out.get_column(label)?.null_ids_where(|id| dangling.contains(id));
        out = out.with_column(label, column)?;
    }
    Ok(out)
}

/// A pedigree with dense integer ids and the map back to the originals.
#[derive(Debug, Clone, PartialEq)]
pub struct Recoded {
    /// Input table with subject and parent columns replaced by codes.
    pub pedigree: Table,
    /// Original id (under the subject label) and its code in [`RECODED_COLUMN`].
    pub id_map: Table,
}

/// Recode subjects and parents to `1..=N` in order of first appearance as a
/// subject. Other columns are passed through.
///
/// # Errors
/// Returns [`PedigreeError::Integrity`] with the rows that reference a parent
/// without its own record. Use [`add_missing_records`] or
/// [`null_parents_without_own_record`] first.
pub fn recode_pedigree(table: &Table, labels: &PedigreeLabels) -> Result<Recoded> {
    let graph = PedigreeGraph::from_table(table, labels)?;
    let dangling = dangling_parents(&graph);
    if !dangling.is_empty() {
        let dangling: HashSet<Id> = dangling.into_iter().collect();
        let sires = table.ids(&labels.parent_a)?;
        let dams = table.ids(&labels.parent_b)?;
        let rows = table.filter(|r| {
            [&sires[r], &dams[r]]
                .into_iter()
                .flatten()
                .any(|p| dangling.contains(p))
        });
        return Err(PedigreeError::Integrity {
            count: dangling.len(),
            rows: Box::new(rows),
        });
    }

    // Without dangling parents every node has a record, and nodes are
    // numbered by first appearance as a subject.
    let code = |id: Option<Id>| id.and_then(|id| graph.node(&id)).map(|n| n as i64 + 1);

    let mut pedigree = table.clone();
    for label in labels.all() {
        let codes: Vec<Option<i64>> = table.ids(label)?.into_iter().map(code).collect();
        pedigree = pedigree.with_column(label, Column::Integer(codes))?;
    }

    let kind = table
        .get_column(&labels.subject)?
        .id_kind()
        .ok_or_else(|| {
            PedigreeError::Data(format!("Column '{}' cannot hold identifiers", labels.subject))
        })?;
    let originals = Column::from_ids(kind, (0..graph.len()).map(|n| Some(graph.id(n).clone())))?;
    let mut id_map = Table::new();
    id_map.add_column(&labels.subject, originals)?;
    id_map.add_integer_column(RECODED_COLUMN, (1..=graph.len() as i64).map(Some).collect())?;

    Ok(Recoded { pedigree, id_map })
}
