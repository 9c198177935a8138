use chrono::{DateTime, Utc};

use crate::error::{Result, TreeError};
use crate::model::Task;
use crate::store::files::FileStore;
use crate::tree::propagate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Read `parent_id` and check that `id` is one of its children.
fn read_parent_of(store: &FileStore, parent_id: u64, id: u64) -> Result<Task> {
    if !store.exists(id) {
        return Err(TreeError::TaskNotFound(id));
    }
    let parent = store.read(parent_id)?;
    if !parent.has_child(id) {
        return Err(TreeError::NotChild(id, parent_id));
    }
    Ok(parent)
}

/// Move child `id` of the deepest task in `history` up to that task's parent.
pub fn pull(store: &FileStore, history: &[u64], id: u64) -> Result<()> {
    let &[.., grandparent_id, current_id] = history else {
        return Err(TreeError::invalid(
            "cannot pull from the root task: it has no parent",
        ));
    };
    let mut current = read_parent_of(store, current_id, id)?;
    let mut grandparent = store.read(grandparent_id)?;

    current.children.retain(|&child| child != id);
    grandparent.children.push(id);
    store.write(&current)?;
    store.write(&grandparent)?;
    tracing::info!(id, from = current_id, to = grandparent_id, "pulled task");

    propagate(store, history)
}

/// Move child `id` of the deepest task in `history` under its sibling `target`.
///
/// A target that was a leaf with an open session has that session closed first.
pub fn push(
    store: &FileStore,
    history: &[u64],
    id: u64,
    target: u64,
    now: DateTime<Utc>,
) -> Result<()> {
    let Some(&current_id) = history.last() else {
        return Err(TreeError::invalid("empty navigation history"));
    };
    if id == target {
        return Err(TreeError::invalid(format!(
            "cannot push task {id} into itself"
        )));
    }
    let mut current = read_parent_of(store, current_id, id)?;
    read_parent_of(store, current_id, target)?;
    let mut destination = store.read(target)?;

    if let Some(elapsed) = destination.end_session(now) {
        tracing::info!(id = target, elapsed, "closed session on task gaining subtasks");
    }
    current.children.retain(|&child| child != id);
    destination.children.push(id);
    store.write(&current)?;
    store.write(&destination)?;
    tracing::info!(id, from = current_id, to = target, "pushed task");

    let mut chain = history.to_vec();
    chain.push(target);
    propagate(store, &chain)
}

/// Swap child `id` of `parent_id` with its neighbour. Returns false at the boundary.
pub fn shift(store: &FileStore, parent_id: u64, id: u64, direction: Direction) -> Result<bool> {
    let mut parent = read_parent_of(store, parent_id, id)?;
    let Some(pos) = parent.children.iter().position(|&child| child == id) else {
        return Err(TreeError::NotChild(id, parent_id));
    };
    let other = match direction {
        Direction::Up => pos.checked_sub(1),
        Direction::Down => Some(pos + 1).filter(|&next| next < parent.children.len()),
    };
    let Some(other) = other else {
        return Ok(false);
    };
    parent.children.swap(pos, other);
    store.write(&parent)?;
    Ok(true)
}

/// Stable-sort the children of `parent_id`: in progress, then todo, then done.
pub fn sort_children(store: &FileStore, parent_id: u64) -> Result<()> {
    let mut parent = store.read(parent_id)?;
    let mut children = store.read_many(&parent.children)?;
    children.sort_by_key(|child| child.state.sort_rank());
    parent.children = children.iter().map(|child| child.id).collect();
    store.write(&parent)
}
