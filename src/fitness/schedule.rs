//! Scores a filled block schedule along four dimensions: whether students
//! are on track to meet their attendance requirements, how full sessions
//! are, how evenly students are spread across activities, and how evenly
//! each activity's own sessions spread their enrollment.

use crate::enrollment::predicates::{requirement_of, role_counts};
use crate::model::{Activity, AttendanceRecord, BlockSchedule, EnrollmentCriteria, GroupSelection, HouseRequirement, HouseSelection, Session, Student};
use crate::stats;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleScore {
    pub student: f64,
    pub enrollment_fullness: f64,
    pub student_distribution: f64,
    pub activity_diversity: f64,
    pub activities: f64,
    pub overall: f64,
}

pub fn score_schedule(schedule: &BlockSchedule, attendance: &AttendanceRecord) -> ScheduleScore {
    let house_students = schedule.block.house.all_students();
    let house_size = house_students.len();

    let student = student_score(schedule, attendance, &house_students);
    let enrollment_fullness = enrollment_fullness(schedule, house_size);
    let student_distribution = student_distribution(schedule, house_size);
    let activity_diversity = activity_diversity(schedule, &house_students);
    let activities = (enrollment_fullness + student_distribution + activity_diversity) / 3.0;
    let overall = (student + activities) / 2.0;

    ScheduleScore { student, enrollment_fullness, student_distribution, activity_diversity, activities, overall }
}

fn required_credits(activity: &Activity, sessions: &[Session]) -> u32 {
    match &activity.criteria {
        EnrollmentCriteria::FromGroup(GroupSelection::SelectTwoPeers { times_per_block }) => 2 * times_per_block,
        EnrollmentCriteria::FromHouse(_) => match requirement_of(&activity.criteria) {
            Some(HouseRequirement::AttendEverySession) => sessions.len() as u32,
            Some(HouseRequirement::AttendOnceThisYear) => 1,
            None => 0,
        },
        EnrollmentCriteria::OverflowFrom(_) => 0,
    }
}

fn satisfied_credits(activity: &Activity, student: &Student, sessions: &[Session], attendance: &AttendanceRecord) -> u32 {
    match &activity.criteria {
        EnrollmentCriteria::FromGroup(GroupSelection::SelectTwoPeers { times_per_block }) => {
            let (bedside, peer) = role_counts(student, sessions);
            bedside.min(*times_per_block) + peer.min(*times_per_block)
        }
        EnrollmentCriteria::FromHouse(_) => match requirement_of(&activity.criteria) {
            Some(HouseRequirement::AttendEverySession) => {
                sessions.iter().filter(|s| s.enrollment.enrolled_students().contains(student)).count() as u32
            }
            Some(HouseRequirement::AttendOnceThisYear) => {
                let attended_this_block = sessions.iter().any(|s| s.enrollment.enrolled_students().contains(student));
                u32::from(attended_this_block || attendance.attended_activity(student, &activity.name))
            }
            None => 0,
        },
        EnrollmentCriteria::OverflowFrom(_) => 0,
    }
}

fn student_score(schedule: &BlockSchedule, attendance: &AttendanceRecord, house_students: &[Student]) -> f64 {
    let completions: Vec<f64> = house_students
        .iter()
        .map(|student| {
            let per_activity: Vec<f64> = schedule
                .schedule
                .iter()
                .map(|activity_sessions| {
                    let activity = schedule.block.activity(activity_sessions.activity);
                    let required = required_credits(activity, &activity_sessions.sessions);
                    if required == 0 {
                        return 100.0;
                    }
                    let satisfied = satisfied_credits(activity, student, &activity_sessions.sessions, attendance);
                    100.0 * satisfied as f64 / required as f64
                })
                .collect();
            stats::mean(&per_activity)
        })
        .collect();
    stats::mean_minus_stddev(&completions)
}

fn capacity_of(activity: &Activity, house_size: usize) -> u32 {
    match &activity.criteria {
        EnrollmentCriteria::FromHouse(HouseSelection::SelectMaxStudents { cap, .. }) => *cap,
        EnrollmentCriteria::FromHouse(HouseSelection::SelectAllStudents { .. }) => house_size as u32,
        EnrollmentCriteria::FromGroup(GroupSelection::SelectTwoPeers { .. }) => 2,
        EnrollmentCriteria::OverflowFrom(_) => 0,
    }
}

fn enrollment_fullness(schedule: &BlockSchedule, house_size: usize) -> f64 {
    let percentages: Vec<f64> = schedule
        .schedule
        .iter()
        .filter(|activity_sessions| !schedule.block.activity(activity_sessions.activity).is_overflow())
        .flat_map(|activity_sessions| {
            let activity = schedule.block.activity(activity_sessions.activity);
            let capacity = capacity_of(activity, house_size);
            activity_sessions.sessions.iter().map(move |session| {
                let enrolled = session.enrollment.enrolled_students().len();
                if enrolled == 0 {
                    100.0
                } else {
                    100.0 * enrolled as f64 / capacity as f64
                }
            })
        })
        .collect();
    stats::mean_minus_stddev(&percentages)
}

fn student_distribution(schedule: &BlockSchedule, house_size: usize) -> f64 {
    let ratios: Vec<f64> = schedule
        .schedule
        .iter()
        .map(|activity_sessions| {
            let distinct: BTreeSet<Student> = activity_sessions.sessions.iter().flat_map(|s| s.enrollment.enrolled_students()).collect();
            100.0 * distinct.len() as f64 / house_size as f64
        })
        .collect();
    stats::mean_minus_stddev(&ratios)
}

fn activity_diversity(schedule: &BlockSchedule, house_students: &[Student]) -> f64 {
    let per_activity: Vec<f64> = schedule
        .schedule
        .iter()
        .map(|activity_sessions| {
            let counts: Vec<u32> = house_students
                .iter()
                .map(|student| activity_sessions.sessions.iter().filter(|s| s.enrollment.enrolled_students().contains(student)).count() as u32)
                .collect();
            let min = *counts.iter().min().unwrap_or(&0);
            let max = *counts.iter().max().unwrap_or(&0);
            let scaled: Vec<f64> = if max == min {
                vec![1.0; counts.len()]
            } else {
                counts.iter().map(|&c| (c - min) as f64 / (max - min) as f64).collect()
            };
            stats::mean(&scaled) * 100.0
        })
        .collect();
    stats::mean(&per_activity)
}
