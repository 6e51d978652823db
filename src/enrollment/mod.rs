//! Constructive enrollment: turns a block's generated, empty sessions into a
//! filled [`crate::model::BlockSchedule`] without any search or backtracking.
//!
//! Three interleaving strategies (random, ordered-session, ordered) share a
//! single per-session filler (§ [`filler`]); the mandatory and overflow bands
//! each get their own trivial pass, run before and after the unordered pass
//! respectively.

pub mod filler;
pub mod mandatory;
pub mod ordered_enroller;
pub mod ordered_session_enroller;
pub mod overflow;
pub mod predicates;
pub mod random_enroller;

use crate::error::{Result, SchedulerError};
use crate::model::{ActivityId, ActivitySessions, AttendanceRecord, Block, Session};
use filler::{fill_session, ScheduledSoFar};
use rand::Rng;

/// Which constructive strategy a caller wants for unordered activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enroller {
    Random,
    OrderedSession,
    Ordered,
}

/// Every constructive enroller's `enroll()` calls this first: a constructive
/// enroller only ever schedules the unordered band, never mandatory or
/// overflow activities.
fn validate_unordered(unordered: &[ActivitySessions], block: &Block) -> Result<()> {
    for activity_sessions in unordered {
        let activity = block.activity(activity_sessions.activity);
        if activity.is_mandatory() || activity.is_overflow() {
            return Err(SchedulerError::NotUnordered(activity.name.clone()));
        }
    }
    Ok(())
}

fn flatten(bands: &[ActivitySessions]) -> Vec<(ActivityId, Session)> {
    bands.iter().flat_map(|a| a.sessions.iter().map(move |s| (a.activity, s.clone()))).collect()
}

/// Folds `ordered` left to right, filling each session in turn and feeding
/// the growing accumulator back in as the "already scheduled" context for
/// both conflict checks and per-activity need computation.
fn fold_fill(ordered: Vec<(ActivityId, Session)>, block: &Block, attendance: &AttendanceRecord, rng: &mut impl Rng) -> ScheduledSoFar {
    let mut accumulated: ScheduledSoFar = Vec::with_capacity(ordered.len());
    for (activity_id, session) in ordered {
        let activity = block.activity(activity_id);
        let this_activity_scheduled: Vec<Session> =
            accumulated.iter().filter(|(id, _)| *id == activity_id).map(|(_, s)| s.clone()).collect();
        let filled = fill_session(&session, activity, &accumulated, &this_activity_scheduled, attendance, rng);
        accumulated.push((activity_id, filled));
    }
    accumulated
}

/// Regroups flattened `(activity, session)` pairs back into one
/// [`ActivitySessions`] per activity, in the same activity order as
/// `template`, sorting each activity's sessions by `(date, start)`
/// descending.
fn regroup_sorted_desc(filled: ScheduledSoFar, template: &[ActivitySessions]) -> Vec<ActivitySessions> {
    template
        .iter()
        .map(|activity_sessions| {
            let mut sessions: Vec<Session> =
                filled.iter().filter(|(id, _)| *id == activity_sessions.activity).map(|(_, s)| s.clone()).collect();
            sessions.sort_by(|a, b| (b.date, b.start).cmp(&(a.date, a.start)));
            ActivitySessions { activity: activity_sessions.activity, sessions }
        })
        .collect()
}
