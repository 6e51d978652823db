//! The mandatory-activity enroller: a trivial pass that enrolls the entire
//! house in every mandatory session.

use crate::model::{ActivitySessions, Enrollment, House};

/// Sets every `Empty` mandatory session's enrollment to `GroupsEnrollment`
/// over the whole house. Already-populated sessions are left untouched.
pub fn enroll_mandatory(mandatory: &[ActivitySessions], house: &House) -> Vec<ActivitySessions> {
    mandatory
        .iter()
        .map(|activity_sessions| {
            let sessions = activity_sessions
                .sessions
                .iter()
                .map(|session| {
                    let mut session = session.clone();
                    if session.enrollment.is_empty() {
                        session.enrollment = Enrollment::GroupsEnrollment(house.groups.clone());
                    }
                    session
                })
                .collect();
            ActivitySessions { activity: activity_sessions.activity, sessions }
        })
        .collect()
}
