//! Task editing commands

use anyhow::{bail, Result};

use super::output::Output;
use crate::domain::{RenameOutcome, TaskId};
use crate::storage::ForestStore;
use crate::Organizer;

/// Resolves a task reference: an ID, `root`, or a unique exact name
pub(super) fn resolve<S: ForestStore>(org: &Organizer<S>, reference: &str) -> Result<TaskId> {
    let reference = reference.trim();

    if reference.eq_ignore_ascii_case("root") {
        return Ok(org.root().clone());
    }

    if let Ok(id) = reference.parse::<TaskId>() {
        if org.forest().get(&id).is_some() {
            return Ok(id);
        }
    }

    let mut candidates = vec![org.root().clone()];
    candidates.extend(org.all_tasks(org.root())?);

    let matches: Vec<TaskId> = candidates
        .into_iter()
        .filter(|id| {
            org.forest()
                .get(id)
                .is_some_and(|node| node.name() == reference)
        })
        .collect();

    match matches.as_slice() {
        [id] => Ok(id.clone()),
        [] => bail!("Task not found: {}", reference),
        many => bail!(
            "'{}' matches {} tasks; use an ID instead ({})",
            reference,
            many.len(),
            many.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn name_of<S: ForestStore>(org: &Organizer<S>, id: &TaskId) -> String {
    org.describe(std::slice::from_ref(id))
}

pub(super) fn add<S: ForestStore>(
    org: &mut Organizer<S>,
    output: &Output,
    parent: &str,
    name: &str,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Task name cannot be empty");
    }

    let parent = resolve(org, parent)?;
    let id = org.add_new(&parent, name)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "name": name,
            "parent": parent.to_string(),
        }));
    } else {
        println!("Created task: {} ({})", name, id);
    }

    Ok(())
}

pub(super) fn link<S: ForestStore>(
    org: &mut Organizer<S>,
    output: &Output,
    parent: &str,
    child: &str,
) -> Result<()> {
    let parent = resolve(org, parent)?;
    let child = resolve(org, child)?;

    if org.add(&parent, &child)? {
        output.success(&format!(
            "Linked {} under {}",
            name_of(org, &child),
            name_of(org, &parent)
        ));
    } else {
        output.success(&format!(
            "{} is already under {}",
            name_of(org, &child),
            name_of(org, &parent)
        ));
    }

    Ok(())
}

pub(super) fn remove<S: ForestStore>(
    org: &mut Organizer<S>,
    output: &Output,
    parent: &str,
    child: &str,
) -> Result<()> {
    let parent = resolve(org, parent)?;
    let child = resolve(org, child)?;

    if org.remove(&parent, &child)? {
        output.success(&format!(
            "Removed {} from {}",
            name_of(org, &child),
            name_of(org, &parent)
        ));
    } else {
        output.success(&format!(
            "{} is not under {}",
            name_of(org, &child),
            name_of(org, &parent)
        ));
    }

    Ok(())
}

pub(super) fn move_child<S: ForestStore>(
    org: &mut Organizer<S>,
    output: &Output,
    parent: &str,
    from: usize,
    to: usize,
) -> Result<()> {
    let parent = resolve(org, parent)?;
    let moved = org.move_child(&parent, from, to)?;

    output.success(&format!("Moved {} to position {}", name_of(org, &moved), to));
    Ok(())
}

pub(super) fn select<S: ForestStore>(
    org: &mut Organizer<S>,
    output: &Output,
    parent: &str,
    index: usize,
) -> Result<()> {
    let parent = resolve(org, parent)?;
    let selected = org.select(&parent, index)?;
    let child = org.forest().child_at(&parent, index)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": child.to_string(),
            "selected": selected,
        }));
    } else if selected {
        println!("Selected {}", name_of(org, &child));
    } else {
        println!("Unselected {}", name_of(org, &child));
    }

    Ok(())
}

pub(super) fn clear<S: ForestStore>(org: &mut Organizer<S>, output: &Output, task: &str) -> Result<()> {
    let id = resolve(org, task)?;
    org.clear_selections(&id)?;

    output.success(&format!("Cleared selections under {}", name_of(org, &id)));
    Ok(())
}

pub(super) fn set_active<S: ForestStore>(
    org: &mut Organizer<S>,
    output: &Output,
    task: &str,
    active: bool,
) -> Result<()> {
    let id = resolve(org, task)?;
    let changed = org.toggle_active(&id, active)?;
    let state = if active { "active" } else { "inactive" };

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "active": active,
            "changed": changed,
        }));
    } else if changed {
        println!("{} is now {}", name_of(org, &id), state);
    } else {
        println!("{} is already {}", name_of(org, &id), state);
    }

    Ok(())
}

pub(super) fn rename<S: ForestStore>(
    org: &mut Organizer<S>,
    output: &Output,
    task: &str,
    name: &str,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Task name cannot be empty");
    }

    let id = resolve(org, task)?;
    let outcome = org.rename(&id, name)?;

    if output.is_json() {
        let (result, kept) = match &outcome {
            RenameOutcome::Renamed => ("renamed", Some(id.to_string())),
            RenameOutcome::Merged { kept } => ("merged", Some(kept.to_string())),
            RenameOutcome::Rejected => ("rejected", None),
        };
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "outcome": result,
            "kept": kept,
        }));
        return Ok(());
    }

    match outcome {
        RenameOutcome::Renamed => println!("Renamed {} to {}", id, name),
        RenameOutcome::Merged { kept } => {
            println!("Merged {} into existing task {} ({})", id, name, kept)
        }
        RenameOutcome::Rejected => {
            println!("A task named '{}' already exists here; nothing renamed", name)
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Forest;
    use crate::storage::MemoryStore;
    use chrono::Utc;

    fn organizer(store: &MemoryStore) -> Organizer<&MemoryStore> {
        Organizer::with_forest(Forest::new("Root", Utc::now()), store)
    }

    #[test]
    fn resolve_root_keyword() {
        let store = MemoryStore::new();
        let org = organizer(&store);

        assert_eq!(resolve(&org, "root").unwrap(), *org.root());
        assert_eq!(resolve(&org, "ROOT").unwrap(), *org.root());
    }

    #[test]
    fn resolve_by_id_and_name() {
        let store = MemoryStore::new();
        let mut org = organizer(&store);
        let root = org.root().clone();
        let a = org.add_new(&root, "Alpha").unwrap();

        assert_eq!(resolve(&org, &a.to_string()).unwrap(), a);
        assert_eq!(resolve(&org, " Alpha ").unwrap(), a);
        assert!(resolve(&org, "Beta").is_err());
    }

    #[test]
    fn resolve_ambiguous_name_fails() {
        let store = MemoryStore::new();
        let mut org = organizer(&store);
        let root = org.root().clone();
        let a = org.add_new(&root, "A").unwrap();
        let b = org.add_new(&root, "B").unwrap();
        org.add_new(&a, "Dup").unwrap();
        org.add_new(&b, "Dup").unwrap();

        let err = resolve(&org, "Dup").unwrap_err();
        assert!(err.to_string().contains("matches 2 tasks"));
    }
}
