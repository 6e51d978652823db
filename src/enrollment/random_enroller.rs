//! Interleaves sessions across all unordered activities in priority order,
//! breaking ties uniformly at random.

use super::{flatten, fold_fill, regroup_sorted_desc, validate_unordered};
use crate::error::Result;
use crate::model::{ActivitySessions, AttendanceRecord, Block};
use rand::Rng;

pub fn enroll(unordered: &[ActivitySessions], block: &Block, attendance: &AttendanceRecord, rng: &mut impl Rng) -> Result<Vec<ActivitySessions>> {
    validate_unordered(unordered, block)?;
    let mut keyed: Vec<_> = flatten(unordered)
        .into_iter()
        .map(|(id, session)| (block.activity(id).priority, rng.random::<u64>(), id, session))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    let ordered = keyed.into_iter().map(|(_, _, id, session)| (id, session)).collect();
    let filled = fold_fill(ordered, block, attendance, rng);
    Ok(regroup_sorted_desc(filled, unordered))
}
