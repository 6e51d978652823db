//! The per-session filler shared by the random, ordered, and
//! ordered-session enrollers.

use super::predicates::{compute_need, Need};
use crate::model::{Activity, ActivityId, AttendanceRecord, Enrollment, EnrollmentCriteria, HouseSelection, PeerPair, Session, Student};
use crate::random::shuffle;
use log::debug;
use rand::Rng;
use std::collections::BTreeSet;

/// Every session (across every activity) filled so far this block, paired
/// with the activity that owns it. Conflict checks scan this list for
/// strict time-window overlap with the session under consideration.
pub type ScheduledSoFar = Vec<(ActivityId, Session)>;

fn overlapping_sessions<'a>(target: &Session, scheduled: &'a ScheduledSoFar) -> Vec<&'a Session> {
    scheduled.iter().filter(|(_, s)| s.id != target.id && s.overlaps(target)).map(|(_, s)| s).collect()
}

fn can_enroll(student: &Student, overlapping: &[&Session]) -> bool {
    !overlapping.iter().any(|s| s.enrollment.enrolled_students().contains(student))
}

/// Picks a bedside/peer pair preferring the shuffled head of each role's
/// candidate list, while preserving the bedside != peer invariant when a
/// student appears in both candidate lists.
fn pick_peer_pair(bedside: &[Student], peer: &[Student]) -> Option<PeerPair> {
    for b in bedside {
        for p in peer {
            if b != p {
                return Some(PeerPair { bedside: b.clone(), peer: p.clone() });
            }
        }
    }
    None
}

/// Fills one session of `activity`, given the sessions already filled this
/// block (`all_scheduled`) and the sessions already filled for this
/// activity specifically (`this_activity_scheduled`). Returns a clone of
/// `session` with `enrollment` updated; starved sessions are returned
/// unchanged (or with their existing partial enrollment untouched) rather
/// than erroring, per the domain-starvation handling in the error design.
pub fn fill_session(
    session: &Session,
    activity: &Activity,
    all_scheduled: &ScheduledSoFar,
    this_activity_scheduled: &[Session],
    attendance: &AttendanceRecord,
    rng: &mut impl Rng,
) -> Session {
    let mut filled = session.clone();
    let overlapping = overlapping_sessions(session, all_scheduled);
    let need = compute_need(activity, &session.enrollable, attendance, this_activity_scheduled);

    match (&activity.criteria, need) {
        (EnrollmentCriteria::FromGroup(_), Need::Peers { needs_bedside, needs_peer }) => {
            if !filled.enrollment.is_empty() {
                return filled;
            }
            let mut bedside_candidates: Vec<Student> = needs_bedside.into_iter().filter(|s| can_enroll(s, &overlapping)).collect();
            let mut peer_candidates: Vec<Student> = needs_peer.into_iter().filter(|s| can_enroll(s, &overlapping)).collect();
            shuffle(rng, &mut bedside_candidates);
            shuffle(rng, &mut peer_candidates);
            if let Some(pair) = pick_peer_pair(&bedside_candidates, &peer_candidates) {
                filled.enrollment = Enrollment::PeerEnrollment(pair);
            } else {
                debug!("activity '{}': session {} left empty, no valid bedside/peer pair among candidates", activity.name, session.id.0);
            }
        }
        (EnrollmentCriteria::FromHouse(HouseSelection::SelectMaxStudents { cap, .. }), Need::All(needing) | Need::NotYetAttended(needing)) => {
            let existing: BTreeSet<Student> = match &filled.enrollment {
                Enrollment::StudentsEnrollment(set) => set.clone(),
                _ => BTreeSet::new(),
            };
            let remaining_capacity = (*cap as usize).saturating_sub(existing.len());
            let mut candidates: Vec<Student> =
                needing.into_iter().filter(|s| !existing.contains(s) && can_enroll(s, &overlapping)).collect();
            shuffle(rng, &mut candidates);
            let filled_count = candidates.len().min(remaining_capacity);
            if filled_count < remaining_capacity {
                debug!(
                    "activity '{}': session {} filled {filled_count}/{remaining_capacity} remaining slots, too few eligible candidates",
                    activity.name, session.id.0
                );
            }
            let mut new_set = existing;
            new_set.extend(candidates.into_iter().take(remaining_capacity));
            filled.enrollment = Enrollment::StudentsEnrollment(new_set);
        }
        _ => {}
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::random::worker_rng;
    use chrono::{NaiveDate, NaiveTime};

    fn student(name: &str) -> Student {
        Student::new(name, "Last", Gender::NotSpecified, 20, "Undeclared")
    }

    #[test]
    fn peer_fill_never_pairs_a_student_with_themself() {
        let a = student("A");
        let enrollable: BTreeSet<_> = [a.clone()].into_iter().collect();
        let session = Session::new(NaiveDate::from_ymd_opt(2015, 10, 27).unwrap(), NaiveTime::MIN, NaiveTime::MIN, enrollable);
        let activity = Activity::new(
            "Bedside",
            Frequency::Once(session.date, session.start, session.end),
            Priority::Neutral,
            EnrollmentCriteria::FromGroup(GroupSelection::SelectTwoPeers { times_per_block: 1 }),
        );
        let mut rng = worker_rng(Some(1), 0);
        let filled = fill_session(&session, &activity, &Vec::new(), &[], &AttendanceRecord::new(), &mut rng);
        assert!(filled.enrollment.is_empty(), "a lone student cannot fill both peer roles");
    }

    #[test]
    fn capped_fill_never_exceeds_cap() {
        let students: BTreeSet<_> = (0..10).map(|i| student(&format!("S{i}"))).collect();
        let session = Session::new(NaiveDate::from_ymd_opt(2015, 10, 27).unwrap(), NaiveTime::MIN, NaiveTime::MIN, students);
        let activity = Activity::new(
            "Clinic",
            Frequency::Once(session.date, session.start, session.end),
            Priority::Neutral,
            EnrollmentCriteria::FromHouse(HouseSelection::SelectMaxStudents { cap: 3, requirement: HouseRequirement::AttendOnceThisYear }),
        );
        let mut rng = worker_rng(Some(2), 0);
        let filled = fill_session(&session, &activity, &Vec::new(), &[], &AttendanceRecord::new(), &mut rng);
        assert_eq!(filled.enrollment.enrolled_students().len(), 3);
    }

    #[test]
    fn conflicting_overlap_excludes_already_busy_students() {
        let a = student("A");
        let b = student("B");
        let students: BTreeSet<_> = [a.clone(), b.clone()].into_iter().collect();
        let date = NaiveDate::from_ymd_opt(2015, 10, 27).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let one = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        let two = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        let mut busy_session = Session::new(date, noon, one, students.clone());
        busy_session.enrollment = Enrollment::StudentsEnrollment(BTreeSet::from([a.clone()]));
        let target = Session::new(date, noon, two, students);
        let activity = Activity::new(
            "Clinic",
            Frequency::Once(date, noon, two),
            Priority::Neutral,
            EnrollmentCriteria::FromHouse(HouseSelection::SelectMaxStudents { cap: 2, requirement: HouseRequirement::AttendOnceThisYear }),
        );
        let other_id = ActivityId(99);
        let all_scheduled = vec![(other_id, busy_session)];
        let mut rng = worker_rng(Some(3), 0);
        let filled = fill_session(&target, &activity, &all_scheduled, &[], &AttendanceRecord::new(), &mut rng);
        let enrolled = filled.enrollment.enrolled_students();
        assert!(!enrolled.contains(&a));
        assert!(enrolled.contains(&b));
    }
}
