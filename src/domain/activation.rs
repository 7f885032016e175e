//! Activation propagation
//!
//! Toggling a task active or inactive cascades through the hierarchy:
//!
//! | Transition | Upward | Downward |
//! |------------|--------|----------|
//! | activate | current parent, if inactive | all children, if none is active |
//! | deactivate | current parent, if nothing below it is active (and it is not the root) | all children |
//!
//! Requesting the state a task already has is a no-op, which is also what
//! stops re-entrant cascades.

use chrono::{DateTime, Utc};

use super::forest::{Forest, HierarchyError};
use super::id::TaskId;

impl Forest {
    /// Moves a task to `active`, cascading per the table above
    ///
    /// Returns `Ok(false)` if the task already had that state.
    pub fn set_active(
        &mut self,
        id: &TaskId,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<bool, HierarchyError> {
        if self.node(id)?.is_active() == active {
            return Ok(false);
        }

        if active {
            self.activate(id, now)?;
        } else {
            self.deactivate(id, now)?;
        }
        Ok(true)
    }

    fn activate(&mut self, id: &TaskId, now: DateTime<Utc>) -> Result<(), HierarchyError> {
        if self.node(id)?.is_active() {
            return Ok(());
        }
        self.node_mut(id)?.mark_active(now);

        let parent = self.current_parent(id)?;
        if !self.is_active(&parent) {
            self.activate(&parent, now)?;
        }

        let children = self.node(id)?.children().to_vec();
        if !children.is_empty() && !children.iter().any(|c| self.is_active(c)) {
            for child in &children {
                self.activate(child, now)?;
            }
        }
        Ok(())
    }

    fn deactivate(&mut self, id: &TaskId, now: DateTime<Utc>) -> Result<(), HierarchyError> {
        if !self.node(id)?.is_active() {
            return Ok(());
        }
        self.node_mut(id)?.mark_inactive(now);

        let parent = self.current_parent(id)?;
        let root = self.find_root(id)?;
        if parent != root && self.is_active(&parent) {
            let dormant = self
                .descendants(&parent)?
                .iter()
                .all(|d| !self.is_active(d));
            if dormant {
                self.deactivate(&parent, now)?;
            }
        }

        let children = self.node(id)?.children().to_vec();
        for child in &children {
            self.deactivate(child, now)?;
        }
        Ok(())
    }
}
