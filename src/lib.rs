//! tasktree - A personal hierarchical task organizer
//!
//! Tasks form a hierarchy in which a task may sit under several parents.
//! Activating or deactivating a task cascades through that hierarchy, and
//! siblings are kept ordered by a priority that blends their position with
//! how long they have held their current state.

pub mod cli;
pub mod domain;
pub mod organizer;
pub mod storage;

pub use domain::{Forest, HierarchyError, PriorityScore, RenameOutcome, SearchHit, TaskId, TaskNode};
pub use organizer::Organizer;
pub use storage::{ForestStore, MemoryStore, TaskStore};
