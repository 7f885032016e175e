//! Priority scoring
//!
//! A task's priority blends how long it has held its current state with its
//! position among the siblings that share that state:
//!
//! - Active: `order = (n - idx) / n`, earlier positions score higher
//! - Inactive: `order = idx / n`, later positions score higher
//! - `time_factor = elapsed / max elapsed in the group`
//! - `priority = order * time_factor`
//!
//! A group of one scores `order = 1`; a group where no time has passed scores
//! `time_factor = 1`. A task without a timestamp for its state scores zero.

use chrono::{DateTime, Utc};

use super::forest::{Forest, HierarchyError};
use super::id::TaskId;

/// The two factors of a priority score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityScore {
    /// Position factor within the sibling group
    pub order: f64,
    /// Elapsed time relative to the longest-waiting sibling
    pub time_factor: f64,
}

impl PriorityScore {
    pub const ZERO: Self = Self {
        order: 0.0,
        time_factor: 0.0,
    };

    pub const FULL: Self = Self {
        order: 1.0,
        time_factor: 1.0,
    };

    /// The combined score
    pub fn value(&self) -> f64 {
        self.order * self.time_factor
    }
}

/// Milliseconds since `since`, never negative
fn elapsed_ms(since: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    since
        .map(|t| (now - t).num_milliseconds().max(0) as f64)
        .unwrap_or(0.0)
}

impl Forest {
    /// Priority of a task within its scope parent's matching sibling group
    pub fn priority(&self, id: &TaskId, now: DateTime<Utc>) -> Result<PriorityScore, HierarchyError> {
        let scope = self.scope_parent(id)?;
        self.priority_in(&scope, id, now)
    }

    /// Priority of a task as a child of `scope`
    ///
    /// A root scored against itself gets [`PriorityScore::FULL`]; a task that is
    /// not a child of `scope` gets [`PriorityScore::ZERO`].
    pub fn priority_in(
        &self,
        scope: &TaskId,
        id: &TaskId,
        now: DateTime<Utc>,
    ) -> Result<PriorityScore, HierarchyError> {
        let node = self.node(id)?;
        let Some(since) = node.state_since() else {
            return Ok(PriorityScore::ZERO);
        };
        if scope == id {
            return Ok(PriorityScore::FULL);
        }

        let active = node.is_active();
        let group = if active {
            self.active_children(scope)?
        } else {
            self.inactive_children(scope)?
        };
        let Some(idx) = group.iter().position(|c| c == id) else {
            return Ok(PriorityScore::ZERO);
        };

        let n = group.len();
        let order = if n <= 1 {
            1.0
        } else if active {
            (n - idx) as f64 / n as f64
        } else {
            idx as f64 / n as f64
        };

        let max_time = group
            .iter()
            .filter_map(|c| self.get(c))
            .map(|c| elapsed_ms(c.state_since(), now))
            .fold(0.0, f64::max);
        let time_factor = if max_time == 0.0 {
            1.0
        } else {
            elapsed_ms(Some(since), now) / max_time
        };

        Ok(PriorityScore { order, time_factor })
    }
}
