//! Rename with merge
//!
//! Renaming a task to a name some other task already carries does not create
//! a duplicate. The existing task is pulled into the renamed task's slot and
//! the renamed task is detached from that parent instead.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::forest::{Forest, HierarchyError};
use super::graph::HierarchyGraph;
use super::id::TaskId;

/// What a rename request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The task now carries the new name
    Renamed,
    /// An existing task with that name took the slot
    Merged { kept: TaskId },
    /// The name collides within the same scope; nothing changed
    Rejected,
}

impl Forest {
    /// Renames a task, or merges it with an existing task of the same name
    pub fn rename(
        &mut self,
        id: &TaskId,
        new_name: &str,
        now: DateTime<Utc>,
    ) -> Result<RenameOutcome, HierarchyError> {
        let scope = self.scope_parent(id)?;

        if &scope == id {
            self.node_mut(id)?.name = new_name.to_string();
            return Ok(RenameOutcome::Renamed);
        }

        if self.contains_name(&scope, new_name)? {
            debug!(task = %id, name = new_name, "rename collides within scope");
            return Ok(RenameOutcome::Rejected);
        }

        let existing = self
            .descendants(self.root())?
            .into_iter()
            .find(|t| t != id && self.get(t).map(|n| n.name() == new_name).unwrap_or(false));

        let Some(kept) = existing else {
            self.node_mut(id)?.name = new_name.to_string();
            return Ok(RenameOutcome::Renamed);
        };

        if HierarchyGraph::from_forest(self).would_create_cycle(&scope, &kept) {
            debug!(task = %id, kept = %kept, "merge target is an ancestor of the slot");
            return Ok(RenameOutcome::Rejected);
        }

        if !self.node(&kept)?.is_active() {
            self.set_active(&kept, true, now)?;
        }

        let slot = self
            .index_of(&scope, id)
            .unwrap_or_else(|| self.node(&scope).map(|n| n.children().len()).unwrap_or(0));
        self.link_at(&scope, &kept, slot)?;
        self.unlink(&scope, id)?;
        self.promote_anchored_parent(&kept)?;

        debug!(task = %id, kept = %kept, "rename merged into existing task");
        Ok(RenameOutcome::Merged { kept })
    }
}
