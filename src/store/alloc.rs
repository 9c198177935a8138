use crate::model::ROOT_ID;

/// Smallest non-negative id absent from `existing`, never the root id.
///
/// `existing` does not need to be sorted or deduplicated.
pub fn first_free_id(existing: &[u64]) -> u64 {
    let mut ids = existing.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let mut candidate = 0;
    for id in ids {
        if candidate == ROOT_ID {
            candidate += 1;
        }
        if id > candidate {
            break;
        }
        if id == candidate {
            candidate += 1;
        }
    }
    if candidate == ROOT_ID {
        candidate += 1;
    }
    candidate
}
