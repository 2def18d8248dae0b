//! Pedigrees shared by the unit tests.

use crate::data::{Id, Table};

use super::{pedigree_table, PedigreeLabels};

/// Integer pedigree where `0` marks an unknown parent.
pub(crate) fn triples_table(labels: &PedigreeLabels, triples: &[(i64, i64, i64)]) -> Table {
    let known = |v: i64| (v != 0).then_some(Id::Int(v));
    let triples: Vec<_> = triples
        .iter()
        .map(|&(a, s, d)| (Id::Int(a), known(s), known(d)))
        .collect();
    pedigree_table(labels, &triples).unwrap()
}

/// Token pedigree where `"."` marks an unknown parent.
pub(crate) fn literal_table(labels: &PedigreeLabels, triples: &[(&str, &str, &str)]) -> Table {
    let known = |v: &str| (v != ".").then(|| Id::from(v));
    let triples: Vec<_> = triples
        .iter()
        .map(|&(a, s, d)| (Id::from(a), known(s), known(d)))
        .collect();
    pedigree_table(labels, &triples).unwrap()
}

/// 15 animals laid out after the Zhang et al. (2009) example: one latest
/// animal (14), founders 3 and 4 at the top, founders 2, 5 and 7 mated late.
pub(crate) fn zhang() -> (Table, PedigreeLabels) {
    let labels = PedigreeLabels::new("progeny", "sire", "dam");
    let t = triples_table(
        &labels,
        &[
            (1, 3, 4),
            (2, 0, 0),
            (3, 0, 0),
            (4, 0, 0),
            (5, 0, 0),
            (6, 8, 9),
            (7, 0, 0),
            (8, 11, 2),
            (9, 15, 5),
            (10, 11, 7),
            (11, 3, 4),
            (12, 1, 7),
            (13, 10, 12),
            (14, 6, 13),
            (15, 3, 4),
        ],
    );
    (t, labels)
}

/// Named pedigree with nine parents that have no record of their own.
pub(crate) fn literal() -> (Table, PedigreeLabels) {
    let labels = PedigreeLabels::new("Child", "Father", "Mother");
    let t = literal_table(
        &labels,
        &[
            ("Harry", "George", "Daisey"),
            ("Gertrude", "Jim", "Jessica"),
            ("Nader", "Harry", "Gloria"),
            ("Karen", "Harry", "Michelle"),
            ("Steve", "Harry", "Fatma"),
            ("Frances", "Harry", "."),
            ("Hein", "Tom", "Gertrude"),
            ("Emily", "Tom", "Susan"),
            ("Barry", "Hein", "Karen"),
            ("Scott", "Hein", "Karen"),
            ("Kristi", "Hein", "Karen"),
            ("Helen", "Hein", "Emily"),
        ],
    );
    (t, labels)
}

/// Pedigree with one of each structural error: 5 is its own dam, 7 has two
/// records, 3 is both sire and dam and sire 9 has no record.
pub(crate) fn errors() -> (Table, PedigreeLabels) {
    let labels = PedigreeLabels::new("anim", "sire", "dam");
    let t = triples_table(
        &labels,
        &[
            (1, 0, 0),
            (2, 0, 0),
            (3, 1, 2),
            (4, 1, 2),
            (5, 9, 5),
            (6, 3, 2),
            (7, 1, 2),
            (7, 4, 2),
            (8, 1, 3),
        ],
    );
    (t, labels)
}

/// 1 -> 3 -> 4 -> 1 cycle with 5 below it.
pub(crate) fn circular() -> (Table, PedigreeLabels) {
    let labels = PedigreeLabels::default();
    let t = triples_table(
        &labels,
        &[(1, 4, 0), (2, 0, 0), (3, 1, 2), (4, 3, 2), (5, 4, 2)],
    );
    (t, labels)
}
