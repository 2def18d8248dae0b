//! Integration test: ancestor and descendant queries.
//!
//! Uses ped_jv.csv (15 integer-coded animals, 0 = unknown) and
//! ped_literal.csv (12 named individuals, "." = unknown, nine parents without
//! a record of their own).
//!
//! Expected row counts:
//!   progeny of 3:                        3  (1, 11, 15)
//!   parents of 11 and 15:                2  (3, 4)
//!   ancestors of 6, seeds included:      9
//!   descendants of 3, seeds included:   11
//!   descendants of 11 and 15:            8 with seeds, 6 without
//!   ancestors of Barry and Emily:       13 after adding missing records
//!   descendants of Harry:                8

use pedigree_integrity_core::data::{Id, Table};
use pedigree_integrity_core::pedigree::{
    add_missing_records, get_ancestors_of, get_descendants_of, get_parents_of, get_progeny_of,
    normalize_unknown_parents, relatives_of, step, Direction, PedigreeLabels,
};

fn load(name: &str, labels: &PedigreeLabels) -> Table {
    let path = format!("{}/tests/resources/{}", env!("CARGO_MANIFEST_DIR"), name);
    let raw = Table::from_csv(&path).unwrap();
    normalize_unknown_parents(&raw, &labels.parents(), None).unwrap()
}

fn ints(ids: &[i64]) -> Vec<Id> {
    ids.iter().map(|&i| Id::Int(i)).collect()
}

fn names(ids: &[&str]) -> Vec<Id> {
    ids.iter().map(|&s| Id::from(s)).collect()
}

#[test]
fn test_jv_relatives() {
    let labels = PedigreeLabels::new("progeny", "sire", "dam");
    let ped = load("ped_jv.csv", &labels);

    assert_eq!(get_progeny_of(&ped, &labels, &ints(&[3])).unwrap().nrows(), 3);
    assert_eq!(get_parents_of(&ped, &labels, &ints(&[3])).unwrap().nrows(), 0);
    assert_eq!(get_parents_of(&ped, &labels, &ints(&[11, 15])).unwrap().nrows(), 2);
    assert_eq!(get_ancestors_of(&ped, &labels, &ints(&[6])).unwrap().nrows(), 9);
    assert_eq!(get_descendants_of(&ped, &labels, &ints(&[3])).unwrap().nrows(), 11);
    assert_eq!(get_descendants_of(&ped, &labels, &ints(&[11, 15])).unwrap().nrows(), 8);

    let without_seeds = relatives_of(
        &ped,
        &labels,
        &ints(&[11, 15]),
        Direction::Descendants,
        100,
        false,
    )
    .unwrap();
    assert_eq!(without_seeds.nrows(), 6);
}

#[test]
fn test_literal_relatives() {
    let labels = PedigreeLabels::new("Child", "Father", "Mother");
    let ped = load("ped_literal.csv", &labels);
    let closed = add_missing_records(&ped, &labels).unwrap();
    assert_eq!(closed.nrows(), 21);

    let seeds = names(&["Barry", "Emily"]);
    assert_eq!(get_ancestors_of(&closed, &labels, &seeds).unwrap().nrows(), 13);

    let one_layer = relatives_of(&closed, &labels, &seeds, Direction::Ancestors, 1, false).unwrap();
    assert_eq!(one_layer, get_parents_of(&closed, &labels, &seeds).unwrap());
    let mut parents: Vec<Id> = one_layer.ids("Child").unwrap().into_iter().flatten().collect();
    parents.sort();
    assert_eq!(parents, names(&["Hein", "Karen", "Susan", "Tom"]));

    let descendants = get_descendants_of(&ped, &labels, &names(&["Harry"])).unwrap();
    assert_eq!(descendants.nrows(), 8);
    // Payload columns travel with the rows.
    assert_eq!(descendants.column_names(), ped.column_names());
}

#[test]
fn test_step_layers() {
    let labels = PedigreeLabels::new("Child", "Father", "Mother");
    let ped = load("ped_literal.csv", &labels);
    let first = step(&ped, &labels, &names(&["Barry"]), Direction::Ancestors).unwrap();
    assert_eq!(first, names(&["Hein", "Karen"]));
    let second = step(&ped, &labels, &first, Direction::Ancestors).unwrap();
    assert_eq!(second, names(&["Tom", "Gertrude", "Harry", "Michelle"]));
}
