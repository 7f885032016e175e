//! Task forest
//!
//! A flat arena of [`TaskNode`]s keyed by [`TaskId`]. Parent and child edges
//! are ID lists on both ends, and every mutation here keeps the two
//! directions in agreement:
//!
//! `child ∈ parent.children ⇔ parent ∈ child.parents`
//!
//! Nodes are never dropped from the arena. Removing an edge only detaches;
//! detached nodes simply stop being written by the codec.
//!
//! Mutations in this module do not resort or persist. That is the job of
//! [`Organizer`](crate::Organizer).

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::graph::HierarchyGraph;
use super::id::TaskId;
use super::node::TaskNode;

#[derive(Debug, Error, PartialEq)]
pub enum HierarchyError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Index {index} is out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Linking {child} under {parent} would create a cycle")]
    CycleDetected { parent: TaskId, child: TaskId },
}

/// The whole task graph, anchored at a root
#[derive(Debug, Clone)]
pub struct Forest {
    nodes: HashMap<TaskId, TaskNode>,
    root: TaskId,
    minted: u64,
}

impl Forest {
    /// Creates a forest holding a single root task
    pub fn new(root_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let root_name = root_name.into();
        let root = TaskId::new(&root_name, now, 0);
        let mut nodes = HashMap::new();
        nodes.insert(root.clone(), TaskNode::new(root.clone(), root_name, now));

        Self {
            nodes,
            root,
            minted: 1,
        }
    }

    /// Assembles a forest from already validated nodes
    pub(crate) fn from_parts(root: TaskId, nodes: HashMap<TaskId, TaskNode>) -> Self {
        let minted = nodes.len() as u64;
        Self {
            nodes,
            root,
            minted,
        }
    }

    /// The anchor root of this forest
    pub fn root(&self) -> &TaskId {
        &self.root
    }

    /// Number of nodes in the arena, including detached ones
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&TaskNode> {
        self.nodes.get(id)
    }

    /// Iterates over every node in the arena (unordered)
    pub fn nodes(&self) -> impl Iterator<Item = &TaskNode> {
        self.nodes.values()
    }

    /// Looks up a node or fails with [`HierarchyError::TaskNotFound`]
    pub fn node(&self, id: &TaskId) -> Result<&TaskNode, HierarchyError> {
        self.nodes
            .get(id)
            .ok_or_else(|| HierarchyError::TaskNotFound(id.clone()))
    }

    pub(super) fn node_mut(&mut self, id: &TaskId) -> Result<&mut TaskNode, HierarchyError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| HierarchyError::TaskNotFound(id.clone()))
    }

    pub(super) fn is_active(&self, id: &TaskId) -> bool {
        self.nodes.get(id).map(|n| n.active).unwrap_or(false)
    }

    /// Mints a new detached, active task and returns its ID
    pub fn create(&mut self, name: impl Into<String>, now: DateTime<Utc>) -> TaskId {
        let name = name.into();
        let id = loop {
            let candidate = TaskId::new(&name, now, self.minted);
            self.minted += 1;
            if !self.nodes.contains_key(&candidate) {
                break candidate;
            }
        };

        self.nodes
            .insert(id.clone(), TaskNode::new(id.clone(), name, now));
        id
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Follows `parents[0]` until a node without parents is reached
    pub fn find_root(&self, id: &TaskId) -> Result<TaskId, HierarchyError> {
        let mut current = id.clone();
        let mut seen = HashSet::new();

        loop {
            let node = self.node(&current)?;
            match node.parents.first() {
                Some(parent) if seen.insert(current.clone()) => current = parent.clone(),
                _ => return Ok(current),
            }
        }
    }

    /// The first selected parent, else the root
    pub fn current_parent(&self, id: &TaskId) -> Result<TaskId, HierarchyError> {
        let node = self.node(id)?;
        for parent in &node.parents {
            if self.node(parent)?.selected {
                return Ok(parent.clone());
            }
        }
        self.find_root(id)
    }

    /// The parent whose child list actually holds this node
    ///
    /// Same as [`current_parent`](Self::current_parent) when that parent has
    /// the node as a child. Otherwise the primary parent. A root is its own
    /// scope.
    pub fn scope_parent(&self, id: &TaskId) -> Result<TaskId, HierarchyError> {
        let current = self.current_parent(id)?;
        if self.node(&current)?.has_child(id) {
            return Ok(current);
        }

        Ok(self
            .node(id)?
            .parents
            .first()
            .cloned()
            .unwrap_or_else(|| id.clone()))
    }

    /// Direct children that are active, in child order
    pub fn active_children(&self, id: &TaskId) -> Result<Vec<TaskId>, HierarchyError> {
        self.children_where(id, true)
    }

    /// Direct children that are inactive, in child order
    pub fn inactive_children(&self, id: &TaskId) -> Result<Vec<TaskId>, HierarchyError> {
        self.children_where(id, false)
    }

    fn children_where(&self, id: &TaskId, active: bool) -> Result<Vec<TaskId>, HierarchyError> {
        Ok(self
            .node(id)?
            .children
            .iter()
            .filter(|c| self.is_active(c) == active)
            .cloned()
            .collect())
    }

    /// True if `other` is the node itself or one of its direct children
    pub fn contains(&self, id: &TaskId, other: &TaskId) -> Result<bool, HierarchyError> {
        let node = self.node(id)?;
        Ok(id == other || node.has_child(other))
    }

    /// True if the node itself or one of its direct children has this name
    pub fn contains_name(&self, id: &TaskId, name: &str) -> Result<bool, HierarchyError> {
        let node = self.node(id)?;
        if node.name == name {
            return Ok(true);
        }
        Ok(node
            .children
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .any(|c| c.name == name))
    }

    /// Every transitive descendant once, in preorder
    pub fn descendants(&self, id: &TaskId) -> Result<Vec<TaskId>, HierarchyError> {
        self.node(id)?;
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(id.clone());
        self.collect_descendants(id, &mut seen, &mut out);
        Ok(out)
    }

    fn collect_descendants(&self, id: &TaskId, seen: &mut HashSet<TaskId>, out: &mut Vec<TaskId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for child in &node.children {
            if seen.insert(child.clone()) {
                out.push(child.clone());
                self.collect_descendants(child, seen, out);
            }
        }
    }

    /// All tasks under the root this node belongs to (the root excluded)
    pub fn all_tasks(&self, id: &TaskId) -> Result<Vec<TaskId>, HierarchyError> {
        let root = self.find_root(id)?;
        self.descendants(&root)
    }

    /// The anchor root followed by everything reachable from it, in preorder
    pub fn reachable(&self) -> Vec<TaskId> {
        let mut out = vec![self.root.clone()];
        if let Ok(rest) = self.descendants(&self.root) {
            out.extend(rest);
        }
        out
    }

    /// Copies of every reachable node, in [`reachable`](Self::reachable) order
    ///
    /// Parent lists are trimmed to reachable parents, so the snapshot never
    /// points at a detached task.
    pub fn snapshot(&self) -> Vec<TaskNode> {
        let order = self.reachable();
        let keep: HashSet<&TaskId> = order.iter().collect();

        order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| {
                let mut copy = node.clone();
                copy.parents.retain(|p| keep.contains(p));
                copy
            })
            .collect()
    }

    /// Joins the names of the given tasks with `", "`
    pub fn describe(&self, ids: &[TaskId]) -> String {
        ids.iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|n| n.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Names of the active children, joined for a list subtitle
    pub fn describe_active_children(&self, id: &TaskId) -> Result<String, HierarchyError> {
        Ok(self.describe(&self.active_children(id)?))
    }

    /// The currently selected child, if any
    pub fn selected_child(&self, parent: &TaskId) -> Result<Option<TaskId>, HierarchyError> {
        Ok(self
            .node(parent)?
            .children
            .iter()
            .find(|c| self.nodes.get(*c).map(|n| n.selected).unwrap_or(false))
            .cloned())
    }

    /// Position of `child` in `parent`'s child list
    pub fn index_of(&self, parent: &TaskId, child: &TaskId) -> Option<usize> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .position(|c| c == child)
    }

    /// The child at `index`, or [`HierarchyError::IndexOutOfRange`]
    pub fn child_at(&self, parent: &TaskId, index: usize) -> Result<TaskId, HierarchyError> {
        let children = &self.node(parent)?.children;
        children
            .get(index)
            .cloned()
            .ok_or(HierarchyError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    // ---------------------------------------------------------------------
    // Hierarchy mutations
    // ---------------------------------------------------------------------

    /// Appends `child` under `parent`
    ///
    /// Returns `Ok(false)` if the edge already exists. Activates an inactive
    /// parent after linking.
    pub fn add(
        &mut self,
        parent: &TaskId,
        child: &TaskId,
        now: DateTime<Utc>,
    ) -> Result<bool, HierarchyError> {
        self.node(child)?;
        if self.node(parent)?.has_child(child) {
            return Ok(false);
        }

        if HierarchyGraph::from_forest(self).would_create_cycle(parent, child) {
            return Err(HierarchyError::CycleDetected {
                parent: parent.clone(),
                child: child.clone(),
            });
        }

        let end = self.node(parent)?.children.len();
        self.link_at(parent, child, end)?;

        if !self.node(parent)?.active {
            self.set_active(parent, true, now)?;
        }

        self.root = self.find_root(&self.root)?;
        Ok(true)
    }

    /// Severs the `parent` → `child` edge in both directions
    ///
    /// Returns `Ok(false)` if there was no such edge.
    pub fn remove(&mut self, parent: &TaskId, child: &TaskId) -> Result<bool, HierarchyError> {
        self.node(child)?;
        if !self.node(parent)?.has_child(child) {
            return Ok(false);
        }

        self.unlink(parent, child)?;
        Ok(true)
    }

    /// Moves the child at `from` to position `to` within the same parent
    pub fn move_child(
        &mut self,
        parent: &TaskId,
        from: usize,
        to: usize,
    ) -> Result<TaskId, HierarchyError> {
        let moving = self.child_at(parent, from)?;
        let len = self.node(parent)?.children.len();
        if to >= len {
            return Err(HierarchyError::IndexOutOfRange { index: to, len });
        }

        let children = &mut self.node_mut(parent)?.children;
        children.remove(from);
        children.insert(to, moving.clone());
        Ok(moving)
    }

    /// Toggles selection of the child at `index`, clearing other selections
    /// below `parent` first
    ///
    /// A child shared with other parents also clears its siblings there, so
    /// no parent ever ends up with two selected children.
    ///
    /// Returns the child's new selection flag.
    pub fn select(&mut self, parent: &TaskId, index: usize) -> Result<bool, HierarchyError> {
        let target = self.child_at(parent, index)?;
        let was_selected = self.node(&target)?.selected;

        for id in self.descendants(parent)? {
            self.node_mut(&id)?.selected = false;
        }

        if !was_selected {
            for other in self.node(&target)?.parents.clone() {
                for sibling in self.node(&other)?.children.clone() {
                    self.node_mut(&sibling)?.selected = false;
                }
            }
        }

        let node = self.node_mut(&target)?;
        node.selected = !was_selected;
        Ok(node.selected)
    }

    /// Unselects the node and everything below it
    pub fn clear_selections(&mut self, id: &TaskId) -> Result<(), HierarchyError> {
        self.node_mut(id)?.selected = false;
        for descendant in self.descendants(id)? {
            self.node_mut(&descendant)?.selected = false;
        }
        Ok(())
    }

    /// Inserts the edge at `index` without any checks beyond existence
    pub(super) fn link_at(
        &mut self,
        parent: &TaskId,
        child: &TaskId,
        index: usize,
    ) -> Result<(), HierarchyError> {
        self.node(child)?;
        let children = &mut self.node_mut(parent)?.children;
        let index = index.min(children.len());
        children.insert(index, child.clone());

        let parents = &mut self.node_mut(child)?.parents;
        if !parents.contains(parent) {
            parents.push(parent.clone());
        }

        // A selected newcomer yields to a selection the parent already has
        if self.node(child)?.selected {
            let crowded = self
                .node(parent)?
                .children
                .iter()
                .any(|c| c != child && self.get(c).is_some_and(|n| n.selected));
            if crowded {
                self.node_mut(child)?.selected = false;
            }
        }
        Ok(())
    }

    /// Moves the first parent that leads back to the forest root to the front
    /// of `id`'s parent list, so [`find_root`](Self::find_root) stays inside
    /// the forest once another parent has been detached
    pub(super) fn promote_anchored_parent(&mut self, id: &TaskId) -> Result<(), HierarchyError> {
        let parents = self.node(id)?.parents.clone();

        let mut anchored = None;
        for (index, parent) in parents.iter().enumerate() {
            if self.find_root(parent)? == self.root {
                anchored = Some(index);
                break;
            }
        }

        if let Some(index) = anchored.filter(|&i| i > 0) {
            let parents = &mut self.node_mut(id)?.parents;
            let parent = parents.remove(index);
            parents.insert(0, parent);
        }
        Ok(())
    }

    /// Parents holding more than one selected child
    #[cfg(test)]
    pub(crate) fn crowded_selections(&self) -> Vec<TaskId> {
        self.nodes
            .values()
            .filter(|node| {
                node.children
                    .iter()
                    .filter(|c| self.get(c).is_some_and(|n| n.selected))
                    .count()
                    > 1
            })
            .map(|node| node.id.clone())
            .collect()
    }

    pub(super) fn unlink(&mut self, parent: &TaskId, child: &TaskId) -> Result<(), HierarchyError> {
        self.node_mut(parent)?.children.retain(|c| c != child);
        self.node_mut(child)?.parents.retain(|p| p != parent);
        Ok(())
    }
}
