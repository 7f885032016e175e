//! Sibling sort
//!
//! Reorders every child list below a task: active children first by
//! descending priority, then inactive children by ascending priority.
//! Scores for one list are taken from its order before sorting, and the sort
//! is stable, so ties keep their previous relative order.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::forest::{Forest, HierarchyError};
use super::id::TaskId;

impl Forest {
    /// Sorts every child list reachable from the anchor root
    pub fn resort(&mut self, now: DateTime<Utc>) -> Result<(), HierarchyError> {
        let root = self.root().clone();
        self.sort_from(&root, now)
    }

    /// Sorts the child lists of `id` and everything below it
    ///
    /// A task shared by several parents is sorted once.
    pub fn sort_from(&mut self, id: &TaskId, now: DateTime<Utc>) -> Result<(), HierarchyError> {
        let mut visited = HashSet::new();
        let mut stack = vec![id.clone()];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }

            let ordered = self.sorted_children(&current, now)?;
            stack.extend(ordered.iter().rev().cloned());
            self.node_mut(&current)?.children = ordered;
        }
        Ok(())
    }

    fn sorted_children(&self, id: &TaskId, now: DateTime<Utc>) -> Result<Vec<TaskId>, HierarchyError> {
        let mut active = Vec::new();
        let mut inactive = Vec::new();

        for child in self.node(id)?.children() {
            let score = self.priority_in(id, child, now)?.value();
            if self.node(child)?.is_active() {
                active.push((child.clone(), score));
            } else {
                inactive.push((child.clone(), score));
            }
        }

        active.sort_by(|a, b| b.1.total_cmp(&a.1));
        inactive.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(active
            .into_iter()
            .chain(inactive)
            .map(|(child, _)| child)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn children(forest: &Forest, id: &TaskId) -> Vec<TaskId> {
        forest.node(id).unwrap().children().to_vec()
    }

    fn assert_partitioned(forest: &Forest) {
        for node in forest.nodes() {
            let states: Vec<bool> = node
                .children()
                .iter()
                .map(|c| forest.node(c).unwrap().is_active())
                .collect();
            let first_inactive = states.iter().position(|a| !a).unwrap_or(states.len());
            assert!(
                states[first_inactive..].iter().all(|a| !a),
                "active child after an inactive one under {}",
                node.name()
            );
        }
    }

    #[test]
    fn active_children_precede_inactive() {
        let now = Utc::now();
        let mut forest = Forest::new("Root", now);
        let root = forest.root().clone();
        let ids: Vec<_> = ["A", "B", "C", "D"]
            .iter()
            .map(|n| {
                let id = forest.create(*n, now);
                forest.add(&root, &id, now).unwrap();
                id
            })
            .collect();
        forest.set_active(&ids[0], false, now).unwrap();
        forest.set_active(&ids[2], false, now).unwrap();

        forest.resort(now + Duration::seconds(1)).unwrap();

        assert_eq!(
            children(&forest, &root),
            vec![ids[1].clone(), ids[3].clone(), ids[0].clone(), ids[2].clone()]
        );
        assert_partitioned(&forest);
    }

    #[test]
    fn sort_recurses_into_grandchildren() {
        let now = Utc::now();
        let mut forest = Forest::new("Root", now);
        let root = forest.root().clone();
        let parent = forest.create("Parent", now);
        let a = forest.create("A", now);
        let b = forest.create("B", now);
        forest.add(&root, &parent, now).unwrap();
        forest.add(&parent, &a, now).unwrap();
        forest.add(&parent, &b, now).unwrap();
        forest.set_active(&a, false, now).unwrap();

        forest.resort(now).unwrap();

        assert_eq!(children(&forest, &parent), vec![b, a]);
    }

    #[test]
    fn resort_is_idempotent_at_equal_times() {
        let now = Utc::now();
        let mut forest = Forest::new("Root", now);
        let root = forest.root().clone();
        for n in ["A", "B", "C", "D", "E"] {
            let id = forest.create(n, now);
            forest.add(&root, &id, now).unwrap();
        }
        let inactive = forest.child_at(&root, 3).unwrap();
        forest.set_active(&inactive, false, now).unwrap();

        let later = now + Duration::seconds(10);
        forest.resort(later).unwrap();
        let once = children(&forest, &root);
        forest.resort(later).unwrap();

        assert_eq!(children(&forest, &root), once);
    }

    #[test]
    fn longer_waiting_active_task_rises() {
        let now = Utc::now();
        let mut forest = Forest::new("Root", now);
        let root = forest.root().clone();
        let fresh = forest.create("Fresh", now + Duration::seconds(90));
        let stale = forest.create("Stale", now);
        forest.add(&root, &fresh, now).unwrap();
        forest.add(&root, &stale, now).unwrap();
        forest
            .node_mut(&fresh)
            .unwrap()
            .mark_active(now + Duration::seconds(90));

        // Fresh: order 1.0, time 10/100. Stale: order 0.5, time 1.0.
        forest.resort(now + Duration::seconds(100)).unwrap();

        assert_eq!(children(&forest, &root), vec![stale, fresh]);
    }

    #[test]
    fn shared_child_is_sorted_once() {
        let now = Utc::now();
        let mut forest = Forest::new("Root", now);
        let root = forest.root().clone();
        let left = forest.create("Left", now);
        let right = forest.create("Right", now);
        let shared = forest.create("Shared", now);
        let leaf = forest.create("Leaf", now);
        forest.add(&root, &left, now).unwrap();
        forest.add(&root, &right, now).unwrap();
        forest.add(&left, &shared, now).unwrap();
        forest.add(&right, &shared, now).unwrap();
        forest.add(&shared, &leaf, now).unwrap();

        forest.resort(now).unwrap();

        assert_eq!(children(&forest, &shared), vec![leaf]);
        assert_eq!(children(&forest, &left), vec![shared.clone()]);
        assert_eq!(children(&forest, &right), vec![shared]);
    }
}
