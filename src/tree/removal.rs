use crate::error::{Result, TreeError};
use crate::model::ROOT_ID;
use crate::store::files::FileStore;
use crate::tree::subtree;

/// Delete `id` and all its descendants, then unlink it from `parent_id`.
///
/// Descendants go first, depth-first. Open sessions in the subtree are discarded
/// with the records. Returns the removed ids in deletion order.
pub fn remove(store: &FileStore, parent_id: u64, id: u64) -> Result<Vec<u64>> {
    if id == ROOT_ID {
        return Err(TreeError::invalid("cannot remove the root task"));
    }
    if !store.exists(id) {
        return Err(TreeError::TaskNotFound(id));
    }
    let mut parent = store.read(parent_id)?;
    if !parent.has_child(id) {
        return Err(TreeError::NotChild(id, parent_id));
    }

    let doomed = subtree(store, id)?;
    let mut removed = Vec::with_capacity(doomed.len());
    for task in doomed {
        if task.has_open_session() {
            tracing::info!(id = task.id, "discarding open session of removed task");
        }
        store.delete(task.id)?;
        removed.push(task.id);
    }

    parent.children.retain(|&child| child != id);
    store.write(&parent)?;
    tracing::info!(id, parent = parent_id, count = removed.len(), "removed subtree");
    Ok(removed)
}
