//! The overflow enroller: runs after unordered enrollment completes, filling
//! each overflow session with the complement of its master session.

use crate::model::{ActivityId, ActivitySessions, Block, Enrollment, EnrollmentCriteria, Session};
use std::collections::BTreeSet;

/// For each overflow session, finds the matching master session (same
/// date/start/end) among `all_scheduled` and enrolls every enrollable
/// student not already enrolled in the master session or any other session
/// overlapping this one this block.
pub fn enroll_overflow(overflow: &[ActivitySessions], block: &Block, all_scheduled: &[(ActivityId, Session)]) -> Vec<ActivitySessions> {
    overflow
        .iter()
        .map(|activity_sessions| {
            let activity = block.activity(activity_sessions.activity);
            let master_id = match activity.criteria {
                EnrollmentCriteria::OverflowFrom(master_id) => master_id,
                _ => unreachable!("overflow band only contains OverflowFrom activities"),
            };
            let sessions = activity_sessions
                .sessions
                .iter()
                .map(|session| fill_overflow_session(session, master_id, all_scheduled))
                .collect();
            ActivitySessions { activity: activity_sessions.activity, sessions }
        })
        .collect()
}

fn fill_overflow_session(session: &Session, master_id: ActivityId, all_scheduled: &[(ActivityId, Session)]) -> Session {
    let master_session = all_scheduled
        .iter()
        .find(|(id, s)| *id == master_id && s.date == session.date && s.start == session.start && s.end == session.end)
        .map(|(_, s)| s);

    let mut excluded: BTreeSet<_> = master_session.map(|s| s.enrollment.enrolled_students()).unwrap_or_default();
    for (_, other) in all_scheduled {
        if other.id != session.id && other.overlaps(session) {
            excluded.extend(other.enrollment.enrolled_students());
        }
    }

    let mut filled = session.clone();
    let remaining: BTreeSet<_> = session.enrollable.difference(&excluded).cloned().collect();
    filled.enrollment = Enrollment::StudentsEnrollment(remaining);
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use chrono::{NaiveDate, NaiveTime};

    fn student(n: &str) -> Student {
        Student::new(n, "Last", Gender::NotSpecified, 20, "Undeclared")
    }

    #[test]
    fn overflow_enrollment_is_the_complement_of_the_master() {
        let a = student("A");
        let b = student("B");
        let enrollable: BTreeSet<_> = [a.clone(), b.clone()].into_iter().collect();
        let date = NaiveDate::from_ymd_opt(2015, 10, 27).unwrap();
        let one = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        let three = NaiveTime::from_hms_opt(15, 0, 0).unwrap();

        let mut master_session = Session::new(date, one, three, enrollable.clone());
        master_session.enrollment = Enrollment::StudentsEnrollment(BTreeSet::from([a.clone()]));
        let overflow_session = Session::new(date, one, three, enrollable);

        let master = Activity::new(
            "Seminar",
            Frequency::Once(date, one, three),
            Priority::Neutral,
            EnrollmentCriteria::FromHouse(HouseSelection::SelectMaxStudents { cap: 1, requirement: HouseRequirement::AttendOnceThisYear }),
        );
        let overflow = Activity::new("Seminar Overflow", Frequency::Once(date, one, three), Priority::Low, EnrollmentCriteria::OverflowFrom(ActivityId(0)));
        let block = Block {
            course: "Course".into(),
            name: "Block 1".into(),
            start: date,
            end: date,
            house: House::new(vec![Group::new("mentor", vec![])]),
            activities: vec![master, overflow],
        };

        let all_scheduled = vec![(ActivityId(0), master_session)];
        let bands = vec![ActivitySessions { activity: ActivityId(1), sessions: vec![overflow_session] }];
        let result = enroll_overflow(&bands, &block, &all_scheduled);
        let enrolled = result[0].sessions[0].enrollment.enrolled_students();
        assert_eq!(enrolled, BTreeSet::from([b]));
    }
}
