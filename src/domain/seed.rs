//! Built-in starter forest
//!
//! Used when there is no task file yet or the existing one cannot be read.

use chrono::{DateTime, Utc};

use super::forest::{Forest, HierarchyError};

/// Name of the seeded root task
pub const SEED_ROOT: &str = "My Life";

const SEED: &[(&str, &[&str])] = &[
    ("Work", &[]),
    ("Home", &["Yardwork", "Clean"]),
    ("Meals", &["Breakfast", "Lunch", "Dinner"]),
];

/// Builds the default forest, with the root selected
pub fn seed_forest(now: DateTime<Utc>) -> Result<Forest, HierarchyError> {
    let mut forest = Forest::new(SEED_ROOT, now);
    let root = forest.root().clone();
    forest.node_mut(&root)?.selected = true;

    for (name, children) in SEED {
        let group = forest.create(*name, now);
        forest.add(&root, &group, now)?;
        for child in *children {
            let id = forest.create(*child, now);
            forest.add(&group, &id, now)?;
        }
    }

    forest.resort(now)?;
    Ok(forest)
}
