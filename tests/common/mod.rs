//! Shared test helpers for integration and property tests.

use block_scheduler::model::{
    Activity, AttendanceRecord, Block, EnrollmentCriteria, Frequency, Gender, Group,
    GroupSelection, House, HouseRequirement, HouseSelection, Priority, Student,
};
use chrono::{NaiveDate, NaiveTime};

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(dead_code)]
pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[allow(dead_code)]
pub fn student(first: &str, last: &str) -> Student {
    Student::new(first, last, Gender::NotSpecified, 20, "Undeclared")
}

/// Builds a house of `group_count` groups with `per_group` students each,
/// named `S{group}-{member}` / last name `Last{group}-{member}` so every
/// student has a distinct surname.
#[allow(dead_code)]
pub fn house(group_count: usize, per_group: usize) -> House {
    House::new(
        (0..group_count)
            .map(|g| {
                let students = (0..per_group).map(|i| student(&format!("S{g}-{i}"), &format!("Last{g}-{i}"))).collect();
                Group::new(format!("Mentor{g}"), students)
            })
            .collect(),
    )
}

/// A block carrying `activities` over the given date range, with a house of
/// `group_count` groups of `per_group` students each.
#[allow(dead_code)]
pub fn block(activities: Vec<Activity>, start: NaiveDate, end: NaiveDate, group_count: usize, per_group: usize) -> Block {
    Block { course: "Course".into(), name: "Block".into(), start, end, house: house(group_count, per_group), activities }
}

#[allow(dead_code)]
pub fn mandatory_activity(name: &str, frequency: Frequency, priority: Priority) -> Activity {
    Activity::new(name, frequency, priority, EnrollmentCriteria::FromHouse(HouseSelection::SelectAllStudents { requirement: HouseRequirement::AttendEverySession }))
}

#[allow(dead_code)]
pub fn house_activity(name: &str, frequency: Frequency, priority: Priority, cap: u32, requirement: HouseRequirement) -> Activity {
    Activity::new(name, frequency, priority, EnrollmentCriteria::FromHouse(HouseSelection::SelectMaxStudents { cap, requirement }))
}

#[allow(dead_code)]
pub fn peer_activity(name: &str, frequency: Frequency, priority: Priority, times_per_block: u32) -> Activity {
    Activity::new(name, frequency, priority, EnrollmentCriteria::FromGroup(GroupSelection::SelectTwoPeers { times_per_block }))
}

#[allow(dead_code)]
pub fn empty_attendance() -> AttendanceRecord {
    AttendanceRecord::new()
}
