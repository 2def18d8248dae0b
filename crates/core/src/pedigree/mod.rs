// Pedigree module: schema labels, sentinel handling, graph index, set algebra,
// generations, traversal, validation and repair.

pub mod algebra;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod generations;
pub mod graph;
pub mod labels;
pub mod repair;
pub mod sentinel;
pub mod traversal;
pub mod validation;

pub use algebra::{
    missing_records, parent_id_set, parents_that_are_both_roles, parents_without_own_record,
    pedigree_ids, self_parent_records, subjects_with_multiple_records,
};
pub use generations::{classify_generations, with_generation_column, GenerationAnchor, Generations};
pub use graph::{Direction, PedigreeGraph};
pub use labels::{normalize_sex_codes, PedigreeLabels, SexCodes, SexLabels};
pub use repair::{add_missing_records, null_parents_without_own_record, recode_pedigree, Recoded};
pub use sentinel::{is_integer_column, normalize_unknown_parents, unknown_parent_sentinel};
pub use traversal::{
    get_ancestors_of, get_descendants_of, get_parents_of, get_progeny_of, relatives_of, step,
};
pub use validation::{
    parents_used_before_birth, validate_pedigree, Check, ValidationOptions, ValidationReport,
};

use crate::data::{Column, Id, IdKind, Table};
use crate::error::Result;

/// Build a three-column pedigree table from (subject, parent A, parent B)
/// triples. `None` parents are unknown.
///
/// The id kind is taken from the first subject; an empty slice yields an
/// empty token-keyed table.
///
/// # Errors
/// Returns an error if identifiers of different kinds are mixed.
pub fn pedigree_table(
    labels: &PedigreeLabels,
    triples: &[(Id, Option<Id>, Option<Id>)],
) -> Result<Table> {
    let kind = triples
        .first()
        .map(|(id, _, _)| id.kind())
        .unwrap_or(IdKind::Token);

    let subjects = Column::from_ids(kind, triples.iter().map(|(s, _, _)| Some(s.clone())))?;
    let sires = Column::from_ids(kind, triples.iter().map(|(_, s, _)| s.clone()))?;
    let dams = Column::from_ids(kind, triples.iter().map(|(_, _, d)| d.clone()))?;

    let mut table = Table::new();
    table.add_column(&labels.subject, subjects)?;
    table.add_column(&labels.parent_a, sires)?;
    table.add_column(&labels.parent_b, dams)?;
    Ok(table)
}
