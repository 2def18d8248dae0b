//! Bounded breadth-first ancestor and descendant queries.

use crate::data::{Id, IdIndex, Table};
use crate::error::Result;

use super::graph::{Direction, PedigreeGraph};
use super::labels::PedigreeLabels;

/// Depth used by [`get_descendants_of`] and [`get_ancestors_of`].
pub const DEFAULT_MAX_GENERATIONS: usize = 100;

/// One traversal layer: the distinct parents (or children) of the ids in
/// `frontier`, in first-encounter order. Parents without a record of their
/// own are included; unknown ids contribute nothing.
///
/// # Errors
/// Returns an error if a label is missing or names a float column.
pub fn step(
    table: &Table,
    labels: &PedigreeLabels,
    frontier: &[Id],
    direction: Direction,
) -> Result<Vec<Id>> {
    let graph = PedigreeGraph::from_table(table, labels)?;
    let mut layer = IdIndex::new();
    for node in frontier.iter().filter_map(|id| graph.node(id)) {
        for &nb in graph.neighbours(node, direction) {
            layer.insert(graph.id(nb).clone());
        }
    }
    Ok(layer.ids().cloned().collect())
}

/// Rows of every relative of `seeds` within `max_generations` layers along
/// `direction`, in table order.
///
/// A seed is part of the result if `include_seeds` is set, or if it is
/// reached from another seed. Cycles cannot loop forever: every individual is
/// expanded at most once.
///
/// # Errors
/// Returns an error if a label is missing or names a float column.
pub fn relatives_of(
    table: &Table,
    labels: &PedigreeLabels,
    seeds: &[Id],
    direction: Direction,
    max_generations: usize,
    include_seeds: bool,
) -> Result<Table> {
    let graph = PedigreeGraph::from_table(table, labels)?;
    let n = graph.len();
    let mut is_seed = vec![false; n];
    let mut visited = vec![false; n];
    let mut reached = vec![false; n];

    let mut frontier: Vec<usize> = Vec::new();
    for node in seeds.iter().filter_map(|id| graph.node(id)) {
        if !visited[node] {
            visited[node] = true;
            is_seed[node] = true;
            frontier.push(node);
        }
    }

    let mut depth = 0;
    while depth < max_generations && !frontier.is_empty() {
        let mut next = Vec::new();
        for &node in &frontier {
            for &nb in graph.neighbours(node, direction) {
                reached[nb] = true;
                if !visited[nb] {
                    visited[nb] = true;
                    next.push(nb);
                }
            }
        }
        depth += 1;
        log::debug!("{:?} layer {}: {} new individuals", direction, depth, next.len());
        frontier = next;
    }

    Ok(table.filter(|r| {
        graph
            .row_node(r)
            .is_some_and(|node| reached[node] || (include_seeds && is_seed[node]))
    }))
}

/// All descendants of `seeds` up to 100 generations, seeds included.
///
/// # Errors
/// See [`relatives_of`].
pub fn get_descendants_of(table: &Table, labels: &PedigreeLabels, seeds: &[Id]) -> Result<Table> {
    relatives_of(
        table,
        labels,
        seeds,
        Direction::Descendants,
        DEFAULT_MAX_GENERATIONS,
        true,
    )
}

/// All ancestors of `seeds` up to 100 generations, seeds included.
///
/// # Errors
/// See [`relatives_of`].
pub fn get_ancestors_of(table: &Table, labels: &PedigreeLabels, seeds: &[Id]) -> Result<Table> {
    relatives_of(
        table,
        labels,
        seeds,
        Direction::Ancestors,
        DEFAULT_MAX_GENERATIONS,
        true,
    )
}

/// Rows of the direct offspring of `seeds`.
///
/// # Errors
/// See [`relatives_of`].
pub fn get_progeny_of(table: &Table, labels: &PedigreeLabels, seeds: &[Id]) -> Result<Table> {
    relatives_of(table, labels, seeds, Direction::Descendants, 1, false)
}

/// Rows of the parents of `seeds` that have a record of their own.
///
/// # Errors
/// See [`relatives_of`].
pub fn get_parents_of(table: &Table, labels: &PedigreeLabels, seeds: &[Id]) -> Result<Table> {
    relatives_of(table, labels, seeds, Direction::Ancestors, 1, false)
}
