//! Task node entity
//!
//! A node carries its own state (name, activation, selection) and both
//! directions of its hierarchy edges as ID lists. Edge consistency across
//! nodes is maintained by [`Forest`](super::Forest), never by the node itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::TaskId;

/// One task in the hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskNode {
    /// Unique identifier
    pub(super) id: TaskId,

    /// Display name (not unique)
    pub(super) name: String,

    /// Whether the task is currently active
    pub(super) active: bool,

    /// Focus marker, scoped to one sibling group
    #[serde(default, skip_serializing_if = "is_false")]
    pub(super) selected: bool,

    /// When the task last became active (set iff active)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) date_activated: Option<DateTime<Utc>>,

    /// When the task last became inactive (set iff inactive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) date_deactivated: Option<DateTime<Utc>>,

    /// Ordered children; order is the sort output
    #[serde(default)]
    pub(super) children: Vec<TaskId>,

    /// Parents in link order; `parents[0]` is the primary parent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(super) parents: Vec<TaskId>,
}

fn is_false(val: &bool) -> bool {
    !*val
}

impl TaskNode {
    /// Creates a new, active, detached node
    pub(super) fn new(id: TaskId, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            selected: false,
            date_activated: Some(now),
            date_deactivated: None,
            children: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn date_activated(&self) -> Option<DateTime<Utc>> {
        self.date_activated
    }

    pub fn date_deactivated(&self) -> Option<DateTime<Utc>> {
        self.date_deactivated
    }

    pub fn children(&self) -> &[TaskId] {
        &self.children
    }

    pub fn parents(&self) -> &[TaskId] {
        &self.parents
    }

    /// Returns true if this node has no parents
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns true if `id` is a direct child
    pub fn has_child(&self, id: &TaskId) -> bool {
        self.children.contains(id)
    }

    /// The timestamp of the transition that produced the current state
    pub fn state_since(&self) -> Option<DateTime<Utc>> {
        if self.active {
            self.date_activated
        } else {
            self.date_deactivated
        }
    }

    /// Flips to active and stamps the transition
    pub(super) fn mark_active(&mut self, now: DateTime<Utc>) {
        self.active = true;
        self.date_activated = Some(now);
        self.date_deactivated = None;
    }

    /// Flips to inactive and stamps the transition
    pub(super) fn mark_inactive(&mut self, now: DateTime<Utc>) {
        self.active = false;
        self.date_deactivated = Some(now);
        self.date_activated = None;
    }
}

impl PartialEq for TaskNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TaskNode {}
