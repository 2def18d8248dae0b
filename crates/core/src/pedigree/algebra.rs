//! Parent/child set algebra over the base record table.
//!
//! Id-set results are returned as `Vec<Id>` in first-appearance order;
//! row-set results are returned as tables with the input schema.

use std::collections::{HashMap, HashSet};

use crate::data::{Column, Id, IdIndex, Table};
use crate::error::{PedigreeError, Result};

use super::graph::PedigreeGraph;
use super::labels::PedigreeLabels;

/// Distinct non-null values across the given parent columns.
///
/// # Errors
/// Returns an error if a column is missing or is not an id column.
pub fn parent_id_set(table: &Table, parent_labels: &[&str]) -> Result<Vec<Id>> {
    table.require_columns(parent_labels)?;
    let mut seen = IdIndex::new();
    for &label in parent_labels {
        for id in table.ids(label)?.into_iter().flatten() {
            seen.insert(id);
        }
    }
    Ok(seen.ids().cloned().collect())
}

/// Ids used in the `roles.0` column that are also used in the `roles.1`
/// column, i.e. animals that are both sire and dam.
///
/// # Errors
/// Returns an error if a column is missing or is not an id column.
pub fn parents_that_are_both_roles(table: &Table, roles: (&str, &str)) -> Result<Vec<Id>> {
    let (role_a, role_b) = roles;
    let as_b: HashSet<Id> = parent_id_set(table, &[role_b])?.into_iter().collect();
    Ok(parent_id_set(table, &[role_a])?
        .into_iter()
        .filter(|id| as_b.contains(id))
        .collect())
}

/// Every row whose subject occurs in more than one row (all copies, not just
/// the repeats). Null subjects are never counted as duplicates.
///
/// # Errors
/// Returns an error if the column is missing or is not an id column.
pub fn subjects_with_multiple_records(table: &Table, subject_label: &str) -> Result<Table> {
    let subjects = table.ids(subject_label)?;
    let mut counts: HashMap<&Id, usize> = HashMap::new();
    for id in subjects.iter().flatten() {
        *counts.entry(id).or_insert(0) += 1;
    }
    Ok(table.filter(|r| {
        subjects[r]
            .as_ref()
            .is_some_and(|id| counts.get(id).copied().unwrap_or(0) > 1)
    }))
}

/// Parent ids that never appear as a subject.
///
/// # Errors
/// Returns an error if a label is missing or names a float column.
pub fn parents_without_own_record(table: &Table, labels: &PedigreeLabels) -> Result<Vec<Id>> {
    let graph = PedigreeGraph::from_table(table, labels)?;
    Ok(dangling_parents(&graph))
}

pub(crate) fn dangling_parents(graph: &PedigreeGraph) -> Vec<Id> {
    (0..graph.len())
        .filter(|&n| !graph.has_record(n))
        .map(|n| graph.id(n).clone())
        .collect()
}

/// Rows whose subject is listed as its own sire or dam.
///
/// # Errors
/// Returns an error if a label is missing or names a float column.
pub fn self_parent_records(table: &Table, labels: &PedigreeLabels) -> Result<Table> {
    table.require_columns(&labels.all())?;
    let subjects = table.ids(&labels.subject)?;
    let sires = table.ids(&labels.parent_a)?;
    let dams = table.ids(&labels.parent_b)?;
    Ok(table.filter(|r| {
        subjects[r]
            .as_ref()
            .is_some_and(|s| sires[r].as_ref() == Some(s) || dams[r].as_ref() == Some(s))
    }))
}

/// Every distinct id in the pedigree: subjects, sires and dams.
///
/// # Errors
/// Returns an error if a label is missing or names a float column.
pub fn pedigree_ids(table: &Table, labels: &PedigreeLabels) -> Result<Vec<Id>> {
    parent_id_set(table, &labels.all())
}

/// One new record for each parent without its own: the parent id as subject
/// and every other column null.
///
/// # Errors
/// Returns an error if a label is missing, or if parent ids are of a
/// different kind than the subject column.
pub fn missing_records(table: &Table, labels: &PedigreeLabels) -> Result<Table> {
    let graph = PedigreeGraph::from_table(table, labels)?;
    missing_records_from(table, labels, &graph)
}

pub(crate) fn missing_records_from(
    table: &Table,
    labels: &PedigreeLabels,
    graph: &PedigreeGraph,
) -> Result<Table> {
    let dangling = dangling_parents(graph);
    let kind = table
        .get_column(&labels.subject)?
        .id_kind()
        .ok_or_else(|| {
            PedigreeError::Data(format!("Column '{}' cannot hold identifiers", labels.subject))
        })?;
    let subjects = Column::from_ids(kind, dangling.into_iter().map(Some))?;
    let records = table.null_rows_like(subjects.len());
    records.with_column(&labels.subject, subjects)
}
