//! Determines which students still require an activity, given attendance
//! history, the enrollable set, and the sessions already scheduled for that
//! activity this block.

use crate::model::{
    Activity, AttendanceRecord, Enrollment, EnrollmentCriteria, GroupSelection, HouseRequirement, HouseSelection, Session, Student,
};
use std::collections::BTreeSet;

/// The subset of students an activity still needs, shaped by which
/// enrollment criteria the activity uses.
#[derive(Debug, Clone)]
pub enum Need {
    /// `AttendEverySession`: every enrollable student, every session.
    All(BTreeSet<Student>),
    /// `AttendOnceThisYear`: students with no prior-block or this-block
    /// attendance of the activity yet.
    NotYetAttended(BTreeSet<Student>),
    /// `SelectTwoPeers`: the two role-specific subsets.
    Peers { needs_bedside: BTreeSet<Student>, needs_peer: BTreeSet<Student> },
    /// Overflow activities and any criteria with no attendance requirement
    /// are never scheduled by a constructive enroller.
    None,
}

pub(crate) fn requirement_of(criteria: &EnrollmentCriteria) -> Option<HouseRequirement> {
    match criteria {
        EnrollmentCriteria::FromHouse(HouseSelection::SelectMaxStudents { requirement, .. }) => Some(*requirement),
        EnrollmentCriteria::FromHouse(HouseSelection::SelectAllStudents { requirement }) => Some(*requirement),
        _ => None,
    }
}

/// Counts, across `scheduled_this_block`, how many times `student` has
/// filled each peer role for the owning activity so far.
pub fn role_counts(student: &Student, scheduled_this_block: &[Session]) -> (u32, u32) {
    let mut bedside = 0;
    let mut peer = 0;
    for session in scheduled_this_block {
        if let Enrollment::PeerEnrollment(pair) = &session.enrollment {
            if &pair.bedside == student {
                bedside += 1;
            }
            if &pair.peer == student {
                peer += 1;
            }
        }
    }
    (bedside, peer)
}

/// Computes [`Need`] for `activity` given the sessions of it already
/// scheduled this block (`scheduled_this_block`) and the students eligible
/// for the session under consideration (`enrollable`).
pub fn compute_need(activity: &Activity, enrollable: &BTreeSet<Student>, attendance: &AttendanceRecord, scheduled_this_block: &[Session]) -> Need {
    match &activity.criteria {
        EnrollmentCriteria::FromGroup(GroupSelection::SelectTwoPeers { times_per_block }) => {
            let n = *times_per_block;
            let mut needs_bedside = BTreeSet::new();
            let mut needs_peer = BTreeSet::new();
            for student in enrollable {
                let (bedside_count, peer_count) = role_counts(student, scheduled_this_block);
                if bedside_count < n {
                    needs_bedside.insert(student.clone());
                }
                if peer_count < n {
                    needs_peer.insert(student.clone());
                }
            }
            Need::Peers { needs_bedside, needs_peer }
        }
        EnrollmentCriteria::FromHouse(_) => match requirement_of(&activity.criteria) {
            Some(HouseRequirement::AttendEverySession) => Need::All(enrollable.clone()),
            Some(HouseRequirement::AttendOnceThisYear) => {
                let already_enrolled_this_block: BTreeSet<Student> =
                    scheduled_this_block.iter().flat_map(|s| s.enrollment.enrolled_students()).collect();
                let needing = enrollable
                    .iter()
                    .filter(|student| !attendance.attended_activity(student, &activity.name) && !already_enrolled_this_block.contains(*student))
                    .cloned()
                    .collect();
                Need::NotYetAttended(needing)
            }
            None => Need::None,
        },
        EnrollmentCriteria::OverflowFrom(_) => Need::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frequency, Gender, Priority};
    use chrono::{NaiveDate, NaiveTime};

    fn student(name: &str) -> Student {
        Student::new(name, "Last", Gender::NotSpecified, 20, "Undeclared")
    }

    #[test]
    fn attend_every_session_needs_everyone_regardless_of_history() {
        let activity = Activity::new(
            "Assembly",
            Frequency::Once(NaiveDate::from_ymd_opt(2015, 10, 27).unwrap(), NaiveTime::MIN, NaiveTime::MIN),
            Priority::Neutral,
            EnrollmentCriteria::FromHouse(HouseSelection::SelectAllStudents { requirement: HouseRequirement::AttendEverySession }),
        );
        let enrollable: BTreeSet<_> = [student("A"), student("B")].into_iter().collect();
        let need = compute_need(&activity, &enrollable, &AttendanceRecord::new(), &[]);
        match need {
            Need::All(set) => assert_eq!(set, enrollable),
            other => panic!("expected Need::All, got {other:?}"),
        }
    }

    #[test]
    fn attend_once_this_year_excludes_prior_attendance() {
        let activity = Activity::new(
            "Clinic",
            Frequency::Once(NaiveDate::from_ymd_opt(2015, 10, 27).unwrap(), NaiveTime::MIN, NaiveTime::MIN),
            Priority::Neutral,
            EnrollmentCriteria::FromHouse(HouseSelection::SelectMaxStudents { cap: 5, requirement: HouseRequirement::AttendOnceThisYear }),
        );
        let a = student("A");
        let b = student("B");
        let enrollable: BTreeSet<_> = [a.clone(), b.clone()].into_iter().collect();
        let mut attendance = AttendanceRecord::new();
        attendance.record(a.clone(), "Clinic", crate::model::SessionId(1));
        let need = compute_need(&activity, &enrollable, &attendance, &[]);
        match need {
            Need::NotYetAttended(set) => assert_eq!(set, BTreeSet::from([b])),
            other => panic!("expected Need::NotYetAttended, got {other:?}"),
        }
    }

    #[test]
    fn peers_need_both_roles_independently() {
        let activity = Activity::new(
            "Bedside",
            Frequency::Once(NaiveDate::from_ymd_opt(2015, 10, 27).unwrap(), NaiveTime::MIN, NaiveTime::MIN),
            Priority::Neutral,
            EnrollmentCriteria::FromGroup(GroupSelection::SelectTwoPeers { times_per_block: 1 }),
        );
        let a = student("A");
        let b = student("B");
        let enrollable: BTreeSet<_> = [a.clone(), b.clone()].into_iter().collect();
        let mut already = crate::model::Session::new(
            NaiveDate::from_ymd_opt(2015, 10, 20).unwrap(),
            NaiveTime::MIN,
            NaiveTime::MIN,
            enrollable.clone(),
        );
        already.enrollment = Enrollment::PeerEnrollment(crate::model::PeerPair { bedside: a.clone(), peer: b.clone() });
        let need = compute_need(&activity, &enrollable, &AttendanceRecord::new(), std::slice::from_ref(&already));
        match need {
            Need::Peers { needs_bedside, needs_peer } => {
                assert!(needs_bedside.is_empty());
                assert!(needs_peer.is_empty());
            }
            other => panic!("expected Need::Peers, got {other:?}"),
        }
    }
}
