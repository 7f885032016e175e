//! The task organizer
//!
//! [`Organizer`] is the entry point collaborators use. It owns a [`Forest`]
//! and a [`ForestStore`] handle. Every mutating call runs its cascades,
//! resorts from the root and writes the whole forest before returning.
//! Failed writes are logged and otherwise ignored: the in-memory forest stays
//! authoritative until the next successful save.

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, error, warn};

use crate::domain::{
    seed_forest, Forest, HierarchyError, PriorityScore, RenameOutcome, SearchHit, TaskId,
};
use crate::storage::ForestStore;

/// A forest bound to its persistence handle
pub struct Organizer<S: ForestStore> {
    forest: Forest,
    store: S,
}

impl<S: ForestStore> Organizer<S> {
    /// Loads the stored forest, falling back to the seed tree
    ///
    /// A missing or unreadable file is not an error.
    pub fn open(store: S) -> Result<Self> {
        let forest = match store.load() {
            Ok(Some(forest)) => forest,
            Ok(None) => {
                debug!("no saved tasks, starting from the seed tree");
                seed_forest(Utc::now())?
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "failed to load tasks, starting from the seed tree");
                seed_forest(Utc::now())?
            }
        };

        Ok(Self { forest, store })
    }

    /// Wraps an existing forest without touching the store
    pub fn with_forest(forest: Forest, store: S) -> Self {
        Self { forest, store }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn root(&self) -> &TaskId {
        self.forest.root()
    }

    /// Writes the whole forest, returning any failure
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.forest)
    }

    /// Resorts from the discovered root, then writes
    fn commit(&mut self) -> Result<(), HierarchyError> {
        let root = self.forest.find_root(self.forest.root())?;
        self.forest.sort_from(&root, Utc::now())?;

        if let Err(e) = self.store.save(&self.forest) {
            error!(error = %format!("{:#}", e), "failed to save tasks");
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Mints a detached task; link it with [`add`](Self::add)
    pub fn create_task(&mut self, name: impl Into<String>) -> TaskId {
        self.forest.create(name, Utc::now())
    }

    /// Creates a task named `name` and appends it under `parent`
    pub fn add_new(&mut self, parent: &TaskId, name: impl Into<String>) -> Result<TaskId, HierarchyError> {
        self.forest.node(parent)?;
        let child = self.forest.create(name, Utc::now());
        self.add(parent, &child)?;
        Ok(child)
    }

    /// Appends an existing task under `parent`
    pub fn add(&mut self, parent: &TaskId, child: &TaskId) -> Result<bool, HierarchyError> {
        let added = self.forest.add(parent, child, Utc::now())?;
        debug!(parent = %parent, child = %child, added, "add");
        self.commit()?;
        Ok(added)
    }

    /// Detaches `child` from `parent`
    pub fn remove(&mut self, parent: &TaskId, child: &TaskId) -> Result<bool, HierarchyError> {
        let removed = self.forest.remove(parent, child)?;
        debug!(parent = %parent, child = %child, removed, "remove");
        self.commit()?;
        Ok(removed)
    }

    /// Moves a child within its parent
    pub fn move_child(&mut self, parent: &TaskId, from: usize, to: usize) -> Result<TaskId, HierarchyError> {
        let moved = self.forest.move_child(parent, from, to)?;
        debug!(parent = %parent, from, to, "move");
        self.commit()?;
        Ok(moved)
    }

    /// Toggles selection of a child; does not resort
    pub fn select(&mut self, parent: &TaskId, index: usize) -> Result<bool, HierarchyError> {
        let selected = self.forest.select(parent, index)?;
        if let Err(e) = self.store.save(&self.forest) {
            error!(error = %format!("{:#}", e), "failed to save tasks");
        }
        Ok(selected)
    }

    /// Unselects a task and everything below it
    pub fn clear_selections(&mut self, id: &TaskId) -> Result<(), HierarchyError> {
        self.forest.clear_selections(id)?;
        if let Err(e) = self.store.save(&self.forest) {
            error!(error = %format!("{:#}", e), "failed to save tasks");
        }
        Ok(())
    }

    /// Activates or deactivates a task with its cascades
    ///
    /// Requesting the current state changes nothing and writes nothing.
    pub fn toggle_active(&mut self, id: &TaskId, active: bool) -> Result<bool, HierarchyError> {
        let changed = self.forest.set_active(id, active, Utc::now())?;
        if changed {
            debug!(task = %id, active, "toggle active");
            self.commit()?;
        }
        Ok(changed)
    }

    /// Renames a task, or merges it into an existing task of that name
    pub fn rename(&mut self, id: &TaskId, new_name: &str) -> Result<RenameOutcome, HierarchyError> {
        let outcome = self.forest.rename(id, new_name, Utc::now())?;
        debug!(task = %id, name = new_name, ?outcome, "rename");
        self.commit()?;
        Ok(outcome)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn priority(&self, id: &TaskId) -> Result<PriorityScore, HierarchyError> {
        self.forest.priority(id, Utc::now())
    }

    pub fn active_children(&self, id: &TaskId) -> Result<Vec<TaskId>, HierarchyError> {
        self.forest.active_children(id)
    }

    pub fn inactive_children(&self, id: &TaskId) -> Result<Vec<TaskId>, HierarchyError> {
        self.forest.inactive_children(id)
    }

    pub fn contains(&self, id: &TaskId, other: &TaskId) -> Result<bool, HierarchyError> {
        self.forest.contains(id, other)
    }

    pub fn contains_name(&self, id: &TaskId, name: &str) -> Result<bool, HierarchyError> {
        self.forest.contains_name(id, name)
    }

    pub fn all_tasks(&self, id: &TaskId) -> Result<Vec<TaskId>, HierarchyError> {
        self.forest.all_tasks(id)
    }

    pub fn find_root(&self, id: &TaskId) -> Result<TaskId, HierarchyError> {
        self.forest.find_root(id)
    }

    pub fn current_parent(&self, id: &TaskId) -> Result<TaskId, HierarchyError> {
        self.forest.current_parent(id)
    }

    pub fn selected_child(&self, parent: &TaskId) -> Result<Option<TaskId>, HierarchyError> {
        self.forest.selected_child(parent)
    }

    pub fn describe(&self, ids: &[TaskId]) -> String {
        self.forest.describe(ids)
    }

    pub fn search(&self, scope: &TaskId, query: &str) -> Result<Vec<SearchHit>, HierarchyError> {
        self.forest.search(scope, query)
    }
}
