//! Domain models for tasktree
//!
//! Contains the task-hierarchy engine without any I/O concerns. Every
//! operation takes the current time explicitly so callers (and tests) decide
//! what "now" is.

mod id;
mod node;
mod forest;
mod graph;
mod activation;
mod priority;
mod sort;
mod rename;
mod search;
mod seed;

pub use id::{IdError, TaskId};
pub use node::TaskNode;
pub use forest::{Forest, HierarchyError};
pub use graph::HierarchyGraph;
pub use priority::PriorityScore;
pub use rename::RenameOutcome;
pub use search::{match_position, SearchHit};
pub use seed::{seed_forest, SEED_ROOT};
