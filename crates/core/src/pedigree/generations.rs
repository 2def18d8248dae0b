//! Generation stratification without birth dates.
//!
//! The default ordering follows Zhang, Li, Todhunter, Lust, Goonewardene and
//! Wang (2009), "An Algorithm to Sort Complex Pedigrees Chronologically without
//! Birthdates", Journal of Animal and Veterinary Advances 8(1):177-182.
//! Individuals are first leveled from the youngest end (an individual sits one
//! level above its highest offspring) and the scale is then reversed so that
//! 0 is the earliest stratum.

use serde::{Deserialize, Serialize};

use crate::data::{Column, Id, Table};
use crate::error::Result;

use super::graph::{Direction, PedigreeGraph};
use super::labels::PedigreeLabels;

/// Which end of the pedigree generation 0 is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenerationAnchor {
    /// Level from the latest offspring upward, then reverse. A founder is
    /// placed one stratum before its earliest offspring, so founders brought
    /// in late do not sit at 0.
    #[default]
    Chronological,
    /// Level from the founders downward: every founder is 0 and
    /// `g(x) = 1 + max(g(sire), g(dam))`.
    Founders,
}

/// Generation of every row of a pedigree.
#[derive(Debug, Clone, PartialEq)]
pub struct Generations {
    rows: Vec<Option<u32>>,
    rounds: usize,
    converged: bool,
    unresolved: Vec<Id>,
}

impl Generations {
    /// Generation of each row's subject; `None` for a null subject.
    pub fn rows(&self) -> &[Option<u32>] {
        &self.rows
    }

    pub fn get(&self, row: usize) -> Option<u32> {
        self.rows.get(row).copied().flatten()
    }

    /// Number of relaxation rounds performed.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// `false` if the round cap was reached, which only happens when the
    /// pedigree contains a cycle.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Ids on or below a cycle. Empty when converged.
    pub fn unresolved(&self) -> &[Id] {
        &self.unresolved
    }

    /// Highest generation over all rows.
    pub fn max(&self) -> Option<u32> {
        self.rows.iter().flatten().max().copied()
    }

    /// Number of rows in each generation, earliest first.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.max().map_or(0, |m| m as usize + 1)];
        for &g in self.rows.iter().flatten() {
            counts[g as usize] += 1;
        }
        counts
    }

    /// Generations as an integer column.
    pub fn to_column(&self) -> Column {
        Column::Integer(self.rows.iter().map(|g| g.map(i64::from)).collect())
    }
}

/// Classify every row of `table` into a generation.
///
/// Never fails on cyclic input: the relaxation is capped at one round more
/// than the number of individuals and the result reports
/// [`Generations::converged`] and [`Generations::unresolved`].
///
/// # Errors
/// Returns an error if a label is missing or names a float column.
pub fn classify_generations(
    table: &Table,
    labels: &PedigreeLabels,
    anchor: GenerationAnchor,
) -> Result<Generations> {
    let graph = PedigreeGraph::from_table(table, labels)?;
    Ok(stratify(&graph, anchor))
}

/// Return `table` with generations added as the integer column `column`
/// (replacing an existing column of that name).
///
/// # Errors
/// Same as [`classify_generations`].
pub fn with_generation_column(
    table: &Table,
    labels: &PedigreeLabels,
    anchor: GenerationAnchor,
    column: &str,
) -> Result<Table> {
    let generations = classify_generations(table, labels, anchor)?;
    table.with_column(column, generations.to_column())
}

pub(crate) fn stratify(graph: &PedigreeGraph, anchor: GenerationAnchor) -> Generations {
    // Chronological lifts parents above their offspring; Founders lifts
    // offspring below their parents.
    let direction = match anchor {
        GenerationAnchor::Chronological => Direction::Ancestors,
        GenerationAnchor::Founders => Direction::Descendants,
    };
    let (levels, rounds, converged) = relax(graph, direction);

    let unresolved: Vec<Id> = if converged {
        Vec::new()
    } else {
        let ids: Vec<Id> = graph
            .unresolved_nodes()
            .into_iter()
            .map(|n| graph.id(n).clone())
            .collect();
        log::warn!(
            "generation classification did not converge after {} rounds; {} individuals are on or below a cycle",
            rounds,
            ids.len()
        );
        ids
    };

    let levels: Vec<Option<u32>> = (0..graph.nrows())
        .map(|r| graph.row_node(r).map(|n| levels[n]))
        .collect();

    let rows = match anchor {
        GenerationAnchor::Chronological => {
            let max = levels.iter().flatten().max().copied().unwrap_or(0);
            levels.into_iter().map(|l| l.map(|l| max - l)).collect()
        }
        GenerationAnchor::Founders => levels,
    };

    Generations {
        rows,
        rounds,
        converged,
        unresolved,
    }
}

/// Frontier relaxation: in round `r` every individual at level `r` lifts its
/// neighbours (along `direction`) to at least `r + 1`; lifted individuals form
/// the next frontier. Returns the levels, rounds run and whether the frontier
/// emptied within `len + 1` rounds.
fn relax(graph: &PedigreeGraph, direction: Direction) -> (Vec<u32>, usize, bool) {
    let n = graph.len();
    let cap = n + 1;
    let mut level = vec![0u32; n];
    let mut frontier: Vec<usize> = (0..n).collect();
    let mut round = 0usize;

    while !frontier.is_empty() && round < cap {
        let r = round as u32;
        let mut next = Vec::new();
        for &node in &frontier {
            for &nb in graph.neighbours(node, direction) {
                if level[nb] <= r {
                    level[nb] = r + 1;
                    next.push(nb);
                }
            }
        }
        log::debug!("generation round {}: {} individuals advanced", round, next.len());
        frontier = next;
        round += 1;
    }

    (level, round, frontier.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedigree::fixtures;

    fn generation_of(t: &Table, g: &Generations, label: &str, id: i64) -> u32 {
        let row = t
            .ids(label)
            .unwrap()
            .iter()
            .position(|x| x == &Some(Id::Int(id)))
            .unwrap();
        g.get(row).unwrap()
    }

    #[test]
    fn test_zhang_generation_counts() {
        let (t, labels) = fixtures::zhang();
        let g = classify_generations(&t, &labels, GenerationAnchor::Chronological).unwrap();
        assert!(g.converged());
        assert!(g.unresolved().is_empty());
        assert_eq!(g.counts(), vec![2, 6, 4, 2, 1]);
    }

    #[test]
    fn test_zhang_late_founders_sit_before_offspring() {
        let (t, labels) = fixtures::zhang();
        let g = classify_generations(&t, &labels, GenerationAnchor::Chronological).unwrap();
        assert_eq!(generation_of(&t, &g, "progeny", 3), 0);
        assert_eq!(generation_of(&t, &g, "progeny", 4), 0);
        // Founders 2, 5, 7 are only mated to generation-1 animals.
        assert_eq!(generation_of(&t, &g, "progeny", 2), 1);
        assert_eq!(generation_of(&t, &g, "progeny", 14), 4);
    }

    #[test]
    fn test_founder_anchor_counts() {
        let (t, labels) = fixtures::zhang();
        let g = classify_generations(&t, &labels, GenerationAnchor::Founders).unwrap();
        assert!(g.converged());
        assert_eq!(g.counts(), vec![5, 3, 4, 2, 1]);
        for founder in [2, 3, 4, 5, 7] {
            assert_eq!(generation_of(&t, &g, "progeny", founder), 0);
        }
    }

    #[test]
    fn test_offspring_always_later_than_parents() {
        let (t, labels) = fixtures::zhang();
        for anchor in [GenerationAnchor::Chronological, GenerationAnchor::Founders] {
            let g = classify_generations(&t, &labels, anchor).unwrap();
            let subjects = t.ids("progeny").unwrap();
            for parent_label in labels.parents() {
                for (row, parent) in t.ids(parent_label).unwrap().iter().enumerate() {
                    let Some(parent) = parent else { continue };
                    let prow = subjects.iter().position(|s| s.as_ref() == Some(parent)).unwrap();
                    assert!(g.get(row).unwrap() > g.get(prow).unwrap(), "{:?}", anchor);
                }
            }
        }
    }

    #[test]
    fn test_row_order_does_not_change_generations() {
        let (t, labels) = fixtures::zhang();
        let reversed_rows: Vec<usize> = (0..t.nrows()).rev().collect();
        let reversed = t.take(&reversed_rows);
        let g = classify_generations(&t, &labels, GenerationAnchor::Chronological).unwrap();
        let gr = classify_generations(&reversed, &labels, GenerationAnchor::Chronological).unwrap();
        for id in 1..=15 {
            assert_eq!(
                generation_of(&t, &g, "progeny", id),
                generation_of(&reversed, &gr, "progeny", id)
            );
        }
    }

    #[test]
    fn test_circular_pedigree_is_capped() {
        let (t, labels) = fixtures::circular();
        let g = classify_generations(&t, &labels, GenerationAnchor::Chronological).unwrap();
        assert!(!g.converged());
        assert_eq!(g.rounds(), 6);
        assert_eq!(
            g.unresolved(),
            &[Id::Int(1), Id::Int(3), Id::Int(4), Id::Int(5)]
        );
        assert_eq!(g.rows().len(), 5);
    }

    #[test]
    fn test_self_parent_is_capped() {
        let (t, labels) = fixtures::errors();
        let g = classify_generations(&t, &labels, GenerationAnchor::Chronological).unwrap();
        assert!(!g.converged());
        assert!(g.unresolved().contains(&Id::Int(5)));
    }

    #[test]
    fn test_empty_pedigree() {
        let (t, labels) = fixtures::zhang();
        let empty = t.empty_like();
        let g = classify_generations(&empty, &labels, GenerationAnchor::Chronological).unwrap();
        assert!(g.converged());
        assert_eq!(g.rounds(), 0);
        assert!(g.counts().is_empty());
        assert_eq!(g.max(), None);
    }

    #[test]
    fn test_with_generation_column() {
        let (t, labels) = fixtures::zhang();
        let out = with_generation_column(&t, &labels, GenerationAnchor::default(), "generation")
            .unwrap();
        assert_eq!(out.column_names(), vec!["progeny", "sire", "dam", "generation"]);
        assert_eq!(
            out.value("generation", 13).unwrap(),
            Some(crate::data::Value::Int(4))
        );
    }
}
