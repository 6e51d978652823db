//! Expands a block's activities into concrete session instances and
//! classifies them into the three bands the rest of the crate operates on.

use crate::error::{Result, SchedulerError};
use crate::model::{ActivityId, ActivitySessions, Block, EnrollmentCriteria, Session};
use log::warn;
use std::collections::{BTreeSet, HashMap};

/// The three disjoint bands `createSessions` partitions a block's activities
/// into.
#[derive(Debug, Clone, Default)]
pub struct SessionBands {
    pub mandatory: Vec<ActivitySessions>,
    pub unordered: Vec<ActivitySessions>,
    pub overflow: Vec<ActivitySessions>,
}

/// Materializes every activity's session grid and sorts each activity's
/// raw activities into the mandatory / unordered / overflow bands.
///
/// Overflow activities are resolved against their master's raw time grid
/// before the mandatory-conflict filter runs, so a filtered-out master
/// session and its overflow mirror are dropped in lockstep.
pub fn generate_sessions(block: &Block) -> Result<SessionBands> {
    let mut cache: HashMap<ActivityId, Vec<Session>> = HashMap::new();
    let mut raw: Vec<(ActivityId, Vec<Session>)> = Vec::with_capacity(block.activities.len());
    for index in 0..block.activities.len() {
        let id = ActivityId(index);
        let sessions = raw_sessions_for(id, block, &mut cache, &mut Vec::new())?;
        raw.push((id, sessions));
    }

    let mandatory_sessions: Vec<Session> = raw
        .iter()
        .filter(|(id, _)| block.activity(*id).is_mandatory())
        .flat_map(|(_, sessions)| sessions.iter().cloned())
        .collect();

    let mut bands = SessionBands::default();
    for (id, mut sessions) in raw {
        let activity = block.activity(id);
        if !activity.is_mandatory() {
            let before = sessions.len();
            sessions.retain(|session| !mandatory_sessions.iter().any(|m| session.overlaps(m)));
            let dropped = before - sessions.len();
            if dropped > 0 {
                warn!("activity '{}': dropped {dropped} session(s) overlapping a mandatory activity", activity.name);
            }
        }
        sessions.sort_by(|a, b| (a.date, a.start, a.end).cmp(&(b.date, b.start, b.end)));
        let entry = ActivitySessions { activity: id, sessions };

        if activity.is_mandatory() {
            bands.mandatory.push(entry);
        } else if activity.is_overflow() {
            bands.overflow.push(entry);
        } else {
            bands.unordered.push(entry);
        }
    }
    Ok(bands)
}

/// Builds (and memoizes) the raw, unfiltered session list for one activity.
///
/// `chain` tracks the `OverflowFrom` path taken to reach this activity, so a
/// misconfigured cyclic chain of overflow activities fails with a frequency
/// mismatch (against itself) rather than recursing forever.
fn raw_sessions_for(
    id: ActivityId,
    block: &Block,
    cache: &mut HashMap<ActivityId, Vec<Session>>,
    chain: &mut Vec<ActivityId>,
) -> Result<Vec<Session>> {
    if let Some(cached) = cache.get(&id) {
        return Ok(cached.clone());
    }
    if chain.contains(&id) {
        let activity = block.activity(id);
        return Err(SchedulerError::FrequencyMismatch { overflow: activity.name.clone(), master: activity.name.clone() });
    }

    let activity = block.activity(id);
    let sessions = match &activity.criteria {
        EnrollmentCriteria::FromGroup(_) => {
            let mut sessions = Vec::new();
            for group in &block.house.groups {
                let enrollable: BTreeSet<_> = group.students.iter().cloned().collect();
                for (date, start, end) in activity.frequency.instances(block.start, block.end) {
                    sessions.push(Session::new(date, start, end, enrollable.clone()));
                }
            }
            sessions
        }
        EnrollmentCriteria::FromHouse(_) => {
            let enrollable: BTreeSet<_> = block.house.all_students().into_iter().collect();
            activity
                .frequency
                .instances(block.start, block.end)
                .into_iter()
                .map(|(date, start, end)| Session::new(date, start, end, enrollable.clone()))
                .collect()
        }
        EnrollmentCriteria::OverflowFrom(master_id) => {
            chain.push(id);
            let master = block.activity(*master_id);
            if master.frequency != activity.frequency {
                chain.pop();
                return Err(SchedulerError::FrequencyMismatch { overflow: activity.name.clone(), master: master.name.clone() });
            }
            let master_sessions = raw_sessions_for(*master_id, block, cache, chain)?;
            chain.pop();
            master_sessions
                .into_iter()
                .map(|master_session| Session::new(master_session.date, master_session.start, master_session.end, master_session.enrollable))
                .collect()
        }
    };

    cache.insert(id, sessions.clone());
    Ok(sessions)
}
