use std::collections::HashSet;

use crate::error::Result;
use crate::model::{ROOT_ID, State, Task};
use crate::store::files::FileStore;

/// Walk from the root along the first pending child at each level.
///
/// Returns the path from root to the first pending leaf, or `None` when the walk
/// stops on a finished leaf or on a parent with no pending children.
pub fn first_pending(store: &FileStore) -> Result<Option<Vec<Task>>> {
    let mut seen = HashSet::from([ROOT_ID]);
    let mut path = vec![store.read(ROOT_ID)?];
    loop {
        let Some(current) = path.last() else {
            return Ok(None);
        };
        if current.is_leaf() {
            let pending = current.state != State::Done;
            return Ok(pending.then_some(path));
        }

        let mut next = None;
        for &id in &current.children {
            let child = store.read(id)?;
            if child.state.is_pending() {
                next = Some(child);
                break;
            }
        }
        match next {
            Some(child) if seen.insert(child.id) => path.push(child),
            _ => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::testing::*;
    use crate::tree::{propagate, set_leaf_state};

    fn ids(path: &[Task]) -> Vec<u64> {
        path.iter().map(|t| t.id).collect()
    }

    #[test]
    fn empty_root_is_pending() {
        let (_dir, store) = store();
        let path = first_pending(&store).unwrap().unwrap();
        assert_eq!(ids(&path), vec![ROOT_ID]);
    }

    #[test]
    fn follows_first_pending_child() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        let a1 = add(&store, &[ROOT_ID, a], "A1");
        let a2 = add(&store, &[ROOT_ID, a], "A2");
        add(&store, &[ROOT_ID], "B");
        set_leaf_state(&store, a1, State::Done).unwrap();
        propagate(&store, &[ROOT_ID, a]).unwrap();

        let path = first_pending(&store).unwrap().unwrap();
        assert_eq!(ids(&path), vec![ROOT_ID, a, a2]);
    }

    #[test]
    fn skips_finished_subtrees() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        let a1 = add(&store, &[ROOT_ID, a], "A1");
        let b = add(&store, &[ROOT_ID], "B");
        set_leaf_state(&store, a1, State::Done).unwrap();
        propagate(&store, &[ROOT_ID, a]).unwrap();

        let path = first_pending(&store).unwrap().unwrap();
        assert_eq!(ids(&path), vec![ROOT_ID, b]);
    }

    #[test]
    fn nothing_pending_when_all_done() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        set_leaf_state(&store, a, State::Done).unwrap();
        propagate(&store, &[ROOT_ID]).unwrap();
        assert!(first_pending(&store).unwrap().is_none());
    }
}
