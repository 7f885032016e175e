//! Read-only commands: tree, show, search

use anyhow::Result;
use serde_json::Value;

use super::output::Output;
use super::task::resolve;
use crate::domain::TaskId;
use crate::storage::ForestStore;
use crate::Organizer;

/// State marker used in text output
fn marker(active: bool) -> &'static str {
    if active {
        "[ ]"
    } else {
        "[x]"
    }
}

fn tree_json<S: ForestStore>(org: &Organizer<S>, id: &TaskId) -> Result<Value> {
    let node = org.forest().node(id)?;
    let priority = org.priority(id)?;

    let children = node
        .children()
        .iter()
        .map(|child| tree_json(org, child))
        .collect::<Result<Vec<_>>>()?;

    Ok(serde_json::json!({
        "id": node.id().to_string(),
        "name": node.name(),
        "active": node.is_active(),
        "selected": node.is_selected(),
        "priority": priority.value(),
        "children": children,
    }))
}

fn print_tree<S: ForestStore>(org: &Organizer<S>, id: &TaskId, depth: usize) -> Result<()> {
    let node = org.forest().node(id)?;
    let priority = org.priority(id)?;

    println!(
        "{}{} {}{}  {}  {:.2}",
        "  ".repeat(depth),
        marker(node.is_active()),
        node.name(),
        if node.is_selected() { " *" } else { "" },
        node.id(),
        priority.value()
    );

    for child in node.children() {
        print_tree(org, child, depth + 1)?;
    }
    Ok(())
}

pub(super) fn tree<S: ForestStore>(org: &Organizer<S>, output: &Output, task: Option<&str>) -> Result<()> {
    let start = match task {
        Some(reference) => resolve(org, reference)?,
        None => org.root().clone(),
    };

    if output.is_json() {
        output.data(&tree_json(org, &start)?);
    } else {
        print_tree(org, &start, 0)?;
    }

    Ok(())
}

pub(super) fn show<S: ForestStore>(org: &Organizer<S>, output: &Output, task: &str) -> Result<()> {
    let id = resolve(org, task)?;
    let node = org.forest().node(&id)?;
    let priority = org.priority(&id)?;
    let active = org.active_children(&id)?;
    let inactive = org.inactive_children(&id)?;
    let parent = org.current_parent(&id)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "name": node.name(),
            "active": node.is_active(),
            "selected": node.is_selected(),
            "date_activated": node.date_activated(),
            "date_deactivated": node.date_deactivated(),
            "priority": {
                "order": priority.order,
                "time_factor": priority.time_factor,
                "value": priority.value(),
            },
            "parents": node.parents().iter().map(|p| p.to_string()).collect::<Vec<_>>(),
            "current_parent": parent.to_string(),
            "active_children": active.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            "inactive_children": inactive.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    println!("{} {}", id, node.name());
    println!(
        "State: {}{}",
        if node.is_active() { "active" } else { "inactive" },
        if node.is_selected() { " (selected)" } else { "" }
    );
    if let Some(since) = node.state_since() {
        println!("Since: {}", since.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!(
        "Priority: {:.2} (order {:.2}, time {:.2})",
        priority.value(),
        priority.order,
        priority.time_factor
    );

    if !node.is_root() {
        println!("Parents: {}", org.describe(node.parents()));
        if parent != id {
            println!("Viewing under: {}", org.describe(std::slice::from_ref(&parent)));
        }
    }

    if !active.is_empty() {
        println!();
        println!("Active:");
        for child in &active {
            println!("  {} {}", child, org.describe(std::slice::from_ref(child)));
        }
    }

    if !inactive.is_empty() {
        println!();
        println!("Inactive:");
        for child in &inactive {
            println!("  {} {}", child, org.describe(std::slice::from_ref(child)));
        }
    }

    Ok(())
}

pub(super) fn search<S: ForestStore>(
    org: &Organizer<S>,
    output: &Output,
    query: &str,
    scope: Option<&str>,
) -> Result<()> {
    let scope = match scope {
        Some(reference) => resolve(org, reference)?,
        None => org.root().clone(),
    };
    let hits = org.search(&scope, query)?;

    if output.is_json() {
        let results: Vec<_> = hits
            .iter()
            .map(|hit| {
                serde_json::json!({
                    "id": hit.id.to_string(),
                    "name": org.describe(std::slice::from_ref(&hit.id)),
                    "position": hit.position,
                })
            })
            .collect();
        output.data(&results);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No tasks match '{}'", query);
        return Ok(());
    }

    for hit in &hits {
        let node = org.forest().node(&hit.id)?;
        println!("{} {} {}", marker(node.is_active()), hit.id, node.name());
    }

    Ok(())
}
