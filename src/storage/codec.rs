//! JSONL codec for a whole forest
//!
//! One node per line, root first, then every reachable node in preorder.
//! Edges are written as task IDs on both ends, so a task shared by two
//! parents is written once and decodes to a single node.
//!
//! ```text
//! {"id":"t-1a2b3c4","name":"My Life","active":true,"date_activated":"...","children":["t-5d6e7f8"]}
//! {"id":"t-5d6e7f8","name":"Work","active":true,"date_activated":"...","children":[],"parents":["t-1a2b3c4"]}
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use thiserror::Error;

use crate::domain::{Forest, HierarchyGraph, TaskId, TaskNode};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Task data is empty")]
    Empty,

    #[error("Failed to parse task at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize task {id}: {source}")]
    Serialize {
        id: TaskId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate task ID: {0}")]
    DuplicateId(TaskId),

    #[error("Task {from} references unknown task {missing}")]
    DanglingReference { from: TaskId, missing: TaskId },

    #[error("Edge {parent} -> {child} is only recorded on one end")]
    OneSidedEdge { parent: TaskId, child: TaskId },

    #[error("Task {0} has a timestamp that does not match its active flag")]
    InconsistentState(TaskId),

    #[error("Root task {0} has parents")]
    RootHasParents(TaskId),

    #[error("Task hierarchy contains a cycle")]
    Cycle,
}

/// Serializes every task reachable from the forest root
pub fn encode(forest: &Forest) -> Result<String, CodecError> {
    let mut out = String::new();

    for node in forest.snapshot() {
        let line = serde_json::to_string(&node).map_err(|source| CodecError::Serialize {
            id: node.id().clone(),
            source,
        })?;
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", line);
    }

    Ok(out)
}

/// Rebuilds a forest, checking that every edge is intact
pub fn decode(text: &str) -> Result<Forest, CodecError> {
    let mut order = Vec::new();
    let mut nodes = HashMap::new();

    for (line_num, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let node: TaskNode = serde_json::from_str(line).map_err(|source| CodecError::Parse {
            line: line_num + 1,
            source,
        })?;

        let id = node.id().clone();
        if !has_consistent_state(&node) {
            return Err(CodecError::InconsistentState(id));
        }
        if nodes.insert(id.clone(), node).is_some() {
            return Err(CodecError::DuplicateId(id));
        }
        order.push(id);
    }

    let root = order.first().cloned().ok_or(CodecError::Empty)?;
    validate_edges(&nodes)?;

    if !nodes[&root].is_root() {
        return Err(CodecError::RootHasParents(root));
    }

    let forest = Forest::from_parts(root, nodes);
    if !HierarchyGraph::from_forest(&forest).is_acyclic() {
        return Err(CodecError::Cycle);
    }

    Ok(forest)
}

/// At most one timestamp is set, and it belongs to the current state
fn has_consistent_state(node: &TaskNode) -> bool {
    if node.is_active() {
        node.date_deactivated().is_none()
    } else {
        node.date_activated().is_none()
    }
}

fn validate_edges(nodes: &HashMap<TaskId, TaskNode>) -> Result<(), CodecError> {
    for node in nodes.values() {
        for child in node.children() {
            let child_node = nodes.get(child).ok_or_else(|| CodecError::DanglingReference {
                from: node.id().clone(),
                missing: child.clone(),
            })?;
            if !child_node.parents().contains(node.id()) {
                return Err(CodecError::OneSidedEdge {
                    parent: node.id().clone(),
                    child: child.clone(),
                });
            }
        }

        for parent in node.parents() {
            let parent_node = nodes.get(parent).ok_or_else(|| CodecError::DanglingReference {
                from: node.id().clone(),
                missing: parent.clone(),
            })?;
            if !parent_node.has_child(node.id()) {
                return Err(CodecError::OneSidedEdge {
                    parent: parent.clone(),
                    child: node.id().clone(),
                });
            }
        }
    }
    Ok(())
}
