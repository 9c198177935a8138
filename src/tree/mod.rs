//! Task tree algorithms over the store.
//!
//! Every walk reads each task fresh from the store. In-memory copies held by the
//! navigation context go stale as soon as a sibling or ancestor is rewritten, so
//! nothing here trusts a record it did not just read.

pub mod accounting;
pub mod removal;
pub mod reparent;
pub mod search;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::{Result, TreeError};
use crate::model::{State, Task, derive_state};
use crate::store::files::FileStore;

pub use accounting::{
    begin_work, close_open_sessions, cumulative_cost, end_work, reset_worked_time, total_worked,
};
pub use removal::remove;
pub use reparent::{Direction, pull, push, shift, sort_children};
pub use search::first_pending;

/// Recompute derived state for every task in `history`, deepest first.
///
/// Always walks all the way to the root. Leaves in the chain keep their state.
pub fn propagate(store: &FileStore, history: &[u64]) -> Result<()> {
    for &id in history.iter().rev() {
        let mut task = store.read(id)?;
        let children = store.read_many(&task.children)?;
        let Some(derived) = derive_state(children.iter().map(|c| c.state)) else {
            continue;
        };
        if derived != task.state {
            tracing::debug!(id, from = %task.state, to = %derived, "propagated state");
            task.state = derived;
            store.write(&task)?;
        }
    }
    Ok(())
}

/// Every task in the subtree rooted at `id`, children before their parent.
pub fn subtree(store: &FileStore, id: u64) -> Result<Vec<Task>> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    let mut stack: Vec<(u64, Option<Task>)> = vec![(id, None)];
    while let Some((id, expanded)) = stack.pop() {
        if let Some(task) = expanded {
            order.push(task);
            continue;
        }
        if !seen.insert(id) {
            tracing::warn!(id, "task reachable twice, skipping");
            continue;
        }
        let task = store.read(id)?;
        let children = task.children.clone();
        stack.push((id, Some(task)));
        for &child in children.iter().rev() {
            stack.push((child, None));
        }
    }
    Ok(order)
}

/// Leaf descendants of `id`, in child order. A leaf is its own only leaf.
pub fn leaves(store: &FileStore, id: u64) -> Result<Vec<Task>> {
    Ok(subtree(store, id)?
        .into_iter()
        .filter(Task::is_leaf)
        .collect())
}

/// Create a leaf named `name` at the end of `parent_id`'s children.
///
/// A parent that was a leaf with an open session has that session closed first.
pub fn add_child(
    store: &FileStore,
    parent_id: u64,
    name: &str,
    now: DateTime<Utc>,
) -> Result<Task> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TreeError::invalid("task name cannot be empty"));
    }
    let mut parent = store.read(parent_id)?;
    let id = store.allocate()?;
    let child = Task::new(id, name);

    if let Some(elapsed) = parent.end_session(now) {
        tracing::info!(id = parent_id, elapsed, "closed session on task gaining subtasks");
    }
    parent.children.push(id);

    store.write(&child)?;
    store.write(&parent)?;
    tracing::info!(id, parent = parent_id, "created task");
    Ok(child)
}

/// Assign `state` to leaf `id`.
pub fn set_leaf_state(store: &FileStore, id: u64, state: State) -> Result<Task> {
    let mut task = store.read(id)?;
    task.set_state(state)?;
    store.write(&task)?;
    Ok(task)
}

/// Set every task in the subtree rooted at `id` back to todo.
pub fn reset_subtree(store: &FileStore, id: u64) -> Result<usize> {
    let mut changed = 0;
    for mut task in subtree(store, id)? {
        if task.state != State::Todo {
            task.state = State::Todo;
            store.write(&task)?;
            changed += 1;
        }
    }
    tracing::info!(id, changed, "reset subtree");
    Ok(changed)
}

pub fn rename(store: &FileStore, id: u64, name: &str) -> Result<Task> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TreeError::invalid("task name cannot be empty"));
    }
    let mut task = store.read(id)?;
    task.name = name.to_string();
    store.write(&task)?;
    Ok(task)
}

pub fn set_estimated_cost(store: &FileStore, id: u64, cost: f64) -> Result<Task> {
    let mut task = store.read(id)?;
    task.set_estimated_cost(cost)?;
    store.write(&task)?;
    Ok(task)
}
