//! Fills one unordered activity completely (in its sessions' existing
//! order) before moving to the next, rather than interleaving sessions
//! across activities.

use super::filler::{fill_session, ScheduledSoFar};
use super::validate_unordered;
use crate::error::Result;
use crate::model::{ActivitySessions, AttendanceRecord, Block};
use rand::Rng;

pub fn enroll(unordered: &[ActivitySessions], block: &Block, attendance: &AttendanceRecord, rng: &mut impl Rng) -> Result<Vec<ActivitySessions>> {
    validate_unordered(unordered, block)?;
    let mut keyed: Vec<(crate::model::Priority, u64, &ActivitySessions)> =
        unordered.iter().map(|a| (block.activity(a.activity).priority, rng.random::<u64>(), a)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    let order = keyed.into_iter().map(|(_, _, a)| a);

    let mut accumulated: ScheduledSoFar = Vec::new();
    let mut out: Vec<ActivitySessions> = Vec::with_capacity(unordered.len());
    for activity_sessions in order {
        let activity = block.activity(activity_sessions.activity);
        let mut this_activity_scheduled: Vec<_> = Vec::new();
        let mut filled_sessions = Vec::with_capacity(activity_sessions.sessions.len());
        for session in &activity_sessions.sessions {
            let filled = fill_session(session, activity, &accumulated, &this_activity_scheduled, attendance, rng);
            this_activity_scheduled.push(filled.clone());
            accumulated.push((activity_sessions.activity, filled.clone()));
            filled_sessions.push(filled);
        }
        out.push(ActivitySessions { activity: activity_sessions.activity, sessions: filled_sessions });
    }

    Ok(unordered
        .iter()
        .map(|template| out.iter().find(|a| a.activity == template.activity).cloned().expect("every activity was processed"))
        .collect())
}
