use std::collections::VecDeque;

use crate::data::{Id, IdIndex, Table};
use crate::error::Result;

use super::labels::PedigreeLabels;

/// Which edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Child -> parent edges.
    Ancestors,
    /// Parent -> child edges.
    Descendants,
}

/// A single individual: its known parents and children as node indices, and
/// the table rows that describe it.
#[derive(Debug, Clone)]
struct Node {
    parents: Vec<usize>,
    children: Vec<usize>,
    /// Rows whose subject is this individual. Empty for parents without their
    /// own record; more than one entry for duplicated subjects.
    rows: Vec<usize>,
}

impl Node {
    fn new() -> Self {
        Self {
            parents: Vec::new(),
            children: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// Explicit parent/child index over a pedigree table.
///
/// Individuals are mapped to contiguous 0-based node indices: subjects first
/// (in row order), then referenced parents that have no record of their own.
/// Duplicate subjects share a node whose parents are the union over their
/// rows. Null parents produce no edge.
///
/// The graph is built once per operation and never mutated afterwards. It
/// makes no assumption about acyclicity; [`PedigreeGraph::unresolved_nodes`]
/// reports where cycles are.
#[derive(Debug, Clone)]
pub struct PedigreeGraph {
    nodes: Vec<Node>,
    index: IdIndex,
    /// Node of each row's subject, or `None` for a null subject.
    row_nodes: Vec<Option<usize>>,
}

impl PedigreeGraph {
    /// Build the graph from the three id columns of `table`.
    ///
    /// # Errors
    /// Returns an error if any label is missing or names a float column.
    pub fn from_table(table: &Table, labels: &PedigreeLabels) -> Result<Self> {
        table.require_columns(&labels.all())?;
        let subjects = table.ids(&labels.subject)?;
        let sires = table.ids(&labels.parent_a)?;
        let dams = table.ids(&labels.parent_b)?;

        let mut graph = Self {
            nodes: Vec::new(),
            index: IdIndex::new(),
            row_nodes: Vec::with_capacity(table.nrows()),
        };

        // First pass: register all subjects so node order follows row order.
        for (row, subject) in subjects.into_iter().enumerate() {
            let node = subject.map(|id| {
                let node = graph.intern(id);
                graph.nodes[node].rows.push(row);
                node
            });
            graph.row_nodes.push(node);
        }

        // Second pass: resolve parent edges. Parents of a null subject still
        // get a node, just no edge.
        for (row, (sire, dam)) in sires.into_iter().zip(dams).enumerate() {
            let child = graph.row_nodes[row];
            for parent in [sire, dam].into_iter().flatten() {
                let parent = graph.intern(parent);
                if let Some(child) = child {
                    graph.link(parent, child);
                }
            }
        }

        log::debug!(
            "pedigree graph: {} rows, {} individuals",
            graph.row_nodes.len(),
            graph.nodes.len()
        );
        Ok(graph)
    }

    fn intern(&mut self, id: Id) -> usize {
        let node = self.index.insert(id);
        if node == self.nodes.len() {
            self.nodes.push(Node::new());
        }
        node
    }

    fn link(&mut self, parent: usize, child: usize) {
        if !self.nodes[child].parents.contains(&parent) {
            self.nodes[child].parents.push(parent);
            self.nodes[parent].children.push(child);
        }
    }

    /// Number of individuals (subjects plus parents without a record).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no individuals.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node index of an identifier.
    pub fn node(&self, id: &Id) -> Option<usize> {
        self.index.code(id)
    }

    /// Identifier of a node.
    ///
    /// # Panics
    /// Panics if `node` is out of bounds.
    pub fn id(&self, node: usize) -> &Id {
        match self.index.id(node) {
            Some(id) => id,
            None => panic!("node {} out of bounds ({} nodes)", node, self.nodes.len()),
        }
    }

    pub fn parents(&self, node: usize) -> &[usize] {
        &self.nodes[node].parents
    }

    pub fn children(&self, node: usize) -> &[usize] {
        &self.nodes[node].children
    }

    /// Neighbours of `node` along `direction`.
    pub fn neighbours(&self, node: usize, direction: Direction) -> &[usize] {
        match direction {
            Direction::Ancestors => self.parents(node),
            Direction::Descendants => self.children(node),
        }
    }

    /// Table rows whose subject is `node`.
    pub fn rows(&self, node: usize) -> &[usize] {
        &self.nodes[node].rows
    }

    /// Whether the individual has at least one row of its own.
    pub fn has_record(&self, node: usize) -> bool {
        !self.nodes[node].rows.is_empty()
    }

    /// Node of the subject of `row`.
    pub fn row_node(&self, row: usize) -> Option<usize> {
        self.row_nodes[row]
    }

    /// Number of table rows the graph was built from.
    pub fn nrows(&self) -> usize {
        self.row_nodes.len()
    }

    /// Nodes that cannot be placed in a parents-before-offspring order: those
    /// on a cycle and everything descending from one.
    ///
    /// Uses Kahn's algorithm; an empty result means the pedigree is acyclic.
    pub fn unresolved_nodes(&self) -> Vec<usize> {
        let n = self.nodes.len();
        let mut in_degree: Vec<usize> = self.nodes.iter().map(|nd| nd.parents.len()).collect();

        let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut placed = vec![false; n];

        while let Some(node) = queue.pop_front() {
            placed[node] = true;
            for &child in &self.nodes[node].children {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    queue.push_back(child);
                }
            }
        }

        (0..n).filter(|&i| !placed[i]).collect()
    }

    /// Whether the parent -> child relation has no cycles.
    pub fn is_acyclic(&self) -> bool {
        self.unresolved_nodes().is_empty()
    }
}
