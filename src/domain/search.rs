//! Name search
//!
//! Case-insensitive substring search over all tasks of a forest, ranked by
//! where the match starts: a name that starts with the query beats one that
//! only contains it further in. Equal positions keep forest preorder.

use super::forest::{Forest, HierarchyError};
use super::id::TaskId;

/// A matching task and where in its name the query starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: TaskId,
    /// Character offset of the first match in the lowercased name
    pub position: usize,
}

/// Character offset of the first case-insensitive occurrence of `query`
pub fn match_position(name: &str, query: &str) -> Option<usize> {
    let name = name.to_lowercase();
    let query = query.to_lowercase();

    name.char_indices()
        .position(|(byte, _)| name[byte..].starts_with(&query))
}

impl Forest {
    /// Tasks whose names contain `query`, best match first
    ///
    /// `scope` (the task being viewed) is left out of the results, as is the
    /// forest root.
    pub fn search(&self, scope: &TaskId, query: &str) -> Result<Vec<SearchHit>, HierarchyError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = self
            .all_tasks(scope)?
            .into_iter()
            .filter(|id| id != scope)
            .filter_map(|id| {
                let position = match_position(self.get(&id)?.name(), query)?;
                Some(SearchHit { id, position })
            })
            .collect();

        hits.sort_by_key(|hit| hit.position);
        Ok(hits)
    }
}
