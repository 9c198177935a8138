use chrono::{DateTime, Utc};

use crate::error::{Result, TreeError};
use crate::store::files::FileStore;
use crate::tree::{leaves, subtree};

/// Sum of estimated costs over the leaves below `id`.
pub fn cumulative_cost(store: &FileStore, id: u64) -> Result<f64> {
    Ok(leaves(store, id)?
        .iter()
        .filter_map(|leaf| leaf.estimated_cost)
        .sum())
}

/// Worked seconds recorded anywhere in the subtree of `id`, open sessions included
/// up to `now`. Parents count too: a leaf that gained children keeps the seconds it
/// logged before.
pub fn total_worked(store: &FileStore, id: u64, now: DateTime<Utc>) -> Result<u64> {
    Ok(subtree(store, id)?
        .iter()
        .map(|task| task.own_worked_seconds(now))
        .sum())
}

/// Open a session on leaf `id`, folding any session already open.
pub fn begin_work(store: &FileStore, id: u64, now: DateTime<Utc>) -> Result<Option<u64>> {
    let mut task = store.read(id)?;
    let folded = task.begin_session(now)?;
    store.write(&task)?;
    tracing::info!(id, folded = ?folded, "started work session");
    Ok(folded)
}

/// Close the open session on `id`, returning the seconds it added.
pub fn end_work(store: &FileStore, id: u64, now: DateTime<Utc>) -> Result<u64> {
    let mut task = store.read(id)?;
    let Some(elapsed) = task.end_session(now) else {
        return Err(TreeError::invalid(format!(
            "no work session in progress on task {id}"
        )));
    };
    store.write(&task)?;
    tracing::info!(id, elapsed, "ended work session");
    Ok(elapsed)
}

/// Clear worked time and open sessions in the subtree rooted at `id`.
pub fn reset_worked_time(store: &FileStore, id: u64) -> Result<usize> {
    let mut changed = 0;
    for mut task in subtree(store, id)? {
        if task.worked_seconds.is_some() || task.has_open_session() {
            task.reset_worked_time();
            store.write(&task)?;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Close every open session in the store. Runs on every shutdown path so that no
/// timer survives into the next run. Returns the ids that were closed.
pub fn close_open_sessions(store: &FileStore, now: DateTime<Utc>) -> Result<Vec<u64>> {
    let mut closed = Vec::new();
    for mut task in store.list_all()? {
        if let Some(elapsed) = task.end_session(now) {
            store.write(&task)?;
            tracing::info!(id = task.id, elapsed, "closed open session on shutdown");
            closed.push(task.id);
        }
    }
    Ok(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ROOT_ID;
    use crate::tree::{add_child, set_estimated_cost};
    use crate::tree::testing::*;
    use chrono::Duration;

    #[test]
    fn cost_sums_leaves_only() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        let a1 = add(&store, &[ROOT_ID, a], "A1");
        let a2 = add(&store, &[ROOT_ID, a], "A2");
        let b = add(&store, &[ROOT_ID], "B");
        set_estimated_cost(&store, a1, 1.5).unwrap();
        set_estimated_cost(&store, a2, 2.0).unwrap();
        set_estimated_cost(&store, b, 4.0).unwrap();

        assert_eq!(cumulative_cost(&store, a).unwrap(), 3.5);
        assert_eq!(cumulative_cost(&store, b).unwrap(), 4.0);
        assert_eq!(cumulative_cost(&store, ROOT_ID).unwrap(), 7.5);
    }

    #[test]
    fn cost_of_unestimated_leaf_is_zero() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        assert_eq!(cumulative_cost(&store, a).unwrap(), 0.0);
    }

    #[test]
    fn session_accumulates_elapsed_time() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        let t0 = Utc::now();

        begin_work(&store, a, t0).unwrap();
        assert_eq!(total_worked(&store, a, t0 + Duration::seconds(10)).unwrap(), 10);
        assert_eq!(end_work(&store, a, t0 + Duration::seconds(42)).unwrap(), 42);
        assert_eq!(total_worked(&store, a, t0 + Duration::hours(1)).unwrap(), 42);
        assert!(matches!(
            end_work(&store, a, t0),
            Err(TreeError::InvalidOperation(_))
        ));
    }

    #[test]
    fn parent_total_sums_leaves() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        let a1 = add(&store, &[ROOT_ID, a], "A1");
        let a2 = add(&store, &[ROOT_ID, a], "A2");
        let t0 = Utc::now();
        begin_work(&store, a1, t0).unwrap();
        end_work(&store, a1, t0 + Duration::seconds(60)).unwrap();
        begin_work(&store, a2, t0).unwrap();

        let worked = total_worked(&store, a, t0 + Duration::seconds(30)).unwrap();
        assert_eq!(worked, 90);
    }

    #[test]
    fn time_logged_before_gaining_children_still_counts() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        let t0 = Utc::now();
        begin_work(&store, a, t0).unwrap();
        let a1 = add_child(&store, a, "A1", t0 + Duration::seconds(30))
            .unwrap()
            .id;
        begin_work(&store, a1, t0 + Duration::seconds(30)).unwrap();
        end_work(&store, a1, t0 + Duration::seconds(40)).unwrap();

        let later = t0 + Duration::hours(1);
        assert_eq!(total_worked(&store, a, later).unwrap(), 40);
        assert_eq!(total_worked(&store, a1, later).unwrap(), 10);
        assert_eq!(total_worked(&store, ROOT_ID, later).unwrap(), 40);
    }

    #[test]
    fn begin_work_rejects_parents() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        add(&store, &[ROOT_ID, a], "A1");
        assert!(matches!(
            begin_work(&store, a, Utc::now()),
            Err(TreeError::InvalidOperation(_))
        ));
    }

    #[test]
    fn shutdown_closes_every_open_session() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        let b = add(&store, &[ROOT_ID], "B");
        let t0 = Utc::now();
        begin_work(&store, a, t0).unwrap();
        begin_work(&store, a, t0 + Duration::seconds(20)).unwrap();

        let closed = close_open_sessions(&store, t0 + Duration::seconds(25)).unwrap();
        assert_eq!(closed, vec![a]);
        let task = store.read(a).unwrap();
        assert!(!task.has_open_session());
        assert_eq!(task.worked_seconds, Some(25));
        assert_eq!(store.read(b).unwrap().worked_seconds, None);
    }

    #[test]
    fn reset_worked_time_clears_subtree() {
        let (_dir, store) = store();
        let a = add(&store, &[ROOT_ID], "A");
        let a1 = add(&store, &[ROOT_ID, a], "A1");
        let t0 = Utc::now();
        begin_work(&store, a1, t0).unwrap();
        end_work(&store, a1, t0 + Duration::seconds(5)).unwrap();
        begin_work(&store, a1, t0 + Duration::seconds(6)).unwrap();

        assert_eq!(reset_worked_time(&store, a).unwrap(), 1);
        let leaf = store.read(a1).unwrap();
        assert_eq!(leaf.worked_seconds, None);
        assert!(!leaf.has_open_session());
    }
}
