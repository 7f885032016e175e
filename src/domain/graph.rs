//! Hierarchy graph
//!
//! A petgraph view of the parent → child edges of a [`Forest`]. Used to keep
//! the hierarchy acyclic: before linking, and when validating decoded data.

use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use super::forest::Forest;
use super::id::TaskId;

/// Directed graph with an edge from every parent to each of its children
#[derive(Debug, Default)]
pub struct HierarchyGraph {
    graph: DiGraph<TaskId, ()>,
    node_map: HashMap<TaskId, NodeIndex>,
}

impl HierarchyGraph {
    /// Builds the graph from every node in the forest's arena
    pub fn from_forest(forest: &Forest) -> Self {
        let mut graph = Self::default();

        // First pass: add all nodes
        for node in forest.nodes() {
            graph.add_task(node.id().clone());
        }

        // Second pass: add all edges; dangling references get a node of their own
        for node in forest.nodes() {
            for child in node.children() {
                graph.add_task(child.clone());
                let from = graph.node_map[node.id()];
                let to = graph.node_map[child];
                graph.graph.add_edge(from, to, ());
            }
        }

        graph
    }

    fn add_task(&mut self, task_id: TaskId) {
        if !self.node_map.contains_key(&task_id) {
            let idx = self.graph.add_node(task_id.clone());
            self.node_map.insert(task_id, idx);
        }
    }

    /// True if `to` is reachable from `from` (a node reaches itself)
    pub fn reaches(&self, from: &TaskId, to: &TaskId) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&a), Some(&b)) => has_path_connecting(&self.graph, a, b, None),
            _ => false,
        }
    }

    /// True if adding `parent` → `child` would close a cycle
    pub fn would_create_cycle(&self, parent: &TaskId, child: &TaskId) -> bool {
        parent == child || self.reaches(child, parent)
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Number of tasks in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}
