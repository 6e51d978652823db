//! Value types for students, activities, sessions, and schedules.
//!
//! This module is pure data: no scheduling logic lives here beyond the small
//! amount of arithmetic (`Frequency::instances`, overlap checks) that every
//! downstream module would otherwise have to duplicate. Activities are kept
//! in a flat, indexed arena on [`Block`] and referred to elsewhere by
//! [`ActivityId`] rather than by value, so that hot loops in the constructive
//! enrollers and the genetic operators never pay for a deep structural
//! comparison of an `Activity` (see the design notes on cyclic
//! `OverflowFrom` references).

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

/// A student's reported gender, used by the grouping fitness' gender-balance
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    NotSpecified,
}

/// A student to be scheduled into activity sessions or a mentor group.
///
/// Equality and ordering are structural over every field; the grouping
/// fitness singles out `last_name` for its duplicate-surname rule, so `Ord`
/// is implemented by hand to put `last_name` first rather than relying on
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub age: u32,
    pub major: String,
}

impl Student {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, gender: Gender, age: u32, major: impl Into<String>) -> Self {
        Student {
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
            age,
            major: major.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl PartialOrd for Student {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Student {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.last_name, &self.first_name, self.gender, self.age, &self.major).cmp(&(
            &other.last_name,
            &other.first_name,
            other.gender,
            other.age,
            &other.major,
        ))
    }
}

/// A mentor and the ordered sequence of students assigned to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub mentor: String,
    pub students: Vec<Student>,
}

impl Group {
    pub fn new(mentor: impl Into<String>, students: Vec<Student>) -> Self {
        Group { mentor: mentor.into(), students }
    }

    /// `true` when two students in this group share a last name, the
    /// condition that zeros out every grouping-fitness dimension for the
    /// group.
    pub fn has_duplicate_last_name(&self) -> bool {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for student in &self.students {
            if !seen.insert(student.last_name.as_str()) {
                return true;
            }
        }
        false
    }
}

/// An ordered sequence of mentor-led groups: the full partition of a
/// student population for a block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct House {
    pub groups: Vec<Group>,
}

impl House {
    pub fn new(groups: Vec<Group>) -> Self {
        House { groups }
    }

    /// All students across all groups, in group-then-member order.
    pub fn all_students(&self) -> Vec<Student> {
        self.groups.iter().flat_map(|g| g.students.iter().cloned()).collect()
    }

    pub fn student_count(&self) -> usize {
        self.groups.iter().map(|g| g.students.len()).sum()
    }

    /// The group containing `student`, if any.
    pub fn group_of(&self, student: &Student) -> Option<&Group> {
        self.groups.iter().find(|g| g.students.contains(student))
    }
}

/// Two distinct students drawn from the same group, one in each role of a
/// `SelectTwoPeers` session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerPair {
    pub bedside: Student,
    pub peer: Student,
}

/// How often an activity recurs over the life of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Frequency {
    /// A single session at a fixed date and time window.
    Once(NaiveDate, NaiveTime, NaiveTime),
    /// A fixed list of (date, start, end) instances.
    SpecificTimes(Vec<(NaiveDate, NaiveTime, NaiveTime)>),
    /// Every 7 days from the block's start through its end (inclusive), at
    /// each listed (start, end) time window.
    Weekly(Vec<(NaiveTime, NaiveTime)>),
}

impl Frequency {
    /// Materializes every (date, start, end) instance this frequency implies
    /// for a block running from `block_start` to `block_end` (inclusive).
    pub fn instances(&self, block_start: NaiveDate, block_end: NaiveDate) -> Vec<(NaiveDate, NaiveTime, NaiveTime)> {
        match self {
            Frequency::Once(date, start, end) => vec![(*date, *start, *end)],
            Frequency::SpecificTimes(times) => times.clone(),
            Frequency::Weekly(windows) => WeeklyDates::new(block_start, block_end)
                .flat_map(|date| windows.iter().map(move |(start, end)| (date, *start, *end)))
                .collect(),
        }
    }
}

/// A bounded iterator over dates spaced 7 days apart, starting at
/// `block_start` and stopping once a date would exceed `block_end`.
///
/// Implemented as an iterator (rather than eagerly collecting a `Vec`) per
/// the design notes: the source's equivalent is an infinite lazy sequence
/// taken-while the cutoff holds.
struct WeeklyDates {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl WeeklyDates {
    fn new(start: NaiveDate, end: NaiveDate) -> Self {
        WeeklyDates { next: Some(start), end }
    }
}

impl Iterator for WeeklyDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = current.checked_add_days(chrono::Days::new(7));
        Some(current)
    }
}

/// Scheduling priority used to order unordered activities (and their
/// sessions) during constructive enrollment. Lower-priority activities are
/// filled last and so are the first to starve when students run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Highest,
    High,
    Neutral,
    Low,
    Lowest,
}

/// Whether a house-scoped activity must be attended at every session this
/// block, or only once across the whole academic year (possibly satisfied
/// in a prior block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HouseRequirement {
    AttendEverySession,
    AttendOnceThisYear,
}

/// `FromGroup` enrollment shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupSelection {
    /// One bedside + one peer per session, drawn from the session's own
    /// group; each student must fill each role `times_per_block` times.
    SelectTwoPeers { times_per_block: u32 },
}

/// `FromHouse` enrollment shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HouseSelection {
    /// Up to `cap` students from the whole house, subject to `requirement`.
    SelectMaxStudents { cap: u32, requirement: HouseRequirement },
    /// The entire house, every session. Marks the activity as mandatory.
    SelectAllStudents { requirement: HouseRequirement },
}

/// A reference to another activity within the same [`Block`], by index into
/// `Block::activities`. Kept as a small copyable key rather than an embedded
/// `Activity` so `OverflowFrom` activities (which point at their master) do
/// not require self-referential or cyclic structural data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub usize);

/// How a session's enrollable/enrolled population is determined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentCriteria {
    FromGroup(GroupSelection),
    FromHouse(HouseSelection),
    /// Sessions mirror `master`'s time grid; enrollment is the complement of
    /// the master's enrollment in each matching session.
    OverflowFrom(ActivityId),
}

/// A scheduled educational event type: a name (its identity), a recurrence,
/// a fill priority, and an enrollment shape.
///
/// `PartialEq`, `Eq`, and `Hash` are all name-based, matching the source's
/// reliance on name identity for fast activity comparisons in hot loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub frequency: Frequency,
    pub priority: Priority,
    pub criteria: EnrollmentCriteria,
}

impl Activity {
    pub fn new(name: impl Into<String>, frequency: Frequency, priority: Priority, criteria: EnrollmentCriteria) -> Self {
        Activity { name: name.into(), frequency, priority, criteria }
    }

    pub fn is_mandatory(&self) -> bool {
        matches!(self.criteria, EnrollmentCriteria::FromHouse(HouseSelection::SelectAllStudents { .. }))
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self.criteria, EnrollmentCriteria::OverflowFrom(_))
    }
}

impl PartialEq for Activity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Activity {}

impl Hash for Activity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A stable identifier for a session, derived from its date, time window,
/// and enrollable-student set, so two sessions with identical content
/// compare equal without a deep field-by-field comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    fn compute(date: NaiveDate, start: NaiveTime, end: NaiveTime, enrollable: &BTreeSet<Student>) -> Self {
        let mut hasher = DefaultHasher::new();
        date.num_days_from_ce().hash(&mut hasher);
        start.hash(&mut hasher);
        end.hash(&mut hasher);
        for student in enrollable {
            student.hash(&mut hasher);
        }
        SessionId(hasher.finish())
    }
}

/// Who ended up enrolled in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enrollment {
    Empty,
    StudentEnrollment(Student),
    StudentsEnrollment(BTreeSet<Student>),
    PeerEnrollment(PeerPair),
    GroupsEnrollment(Vec<Group>),
}

impl Default for Enrollment {
    fn default() -> Self {
        Enrollment::Empty
    }
}

impl Enrollment {
    /// The flattened set of enrolled students, regardless of shape.
    pub fn enrolled_students(&self) -> BTreeSet<Student> {
        match self {
            Enrollment::Empty => BTreeSet::new(),
            Enrollment::StudentEnrollment(s) => BTreeSet::from([s.clone()]),
            Enrollment::StudentsEnrollment(set) => set.clone(),
            Enrollment::PeerEnrollment(pair) => BTreeSet::from([pair.bedside.clone(), pair.peer.clone()]),
            Enrollment::GroupsEnrollment(groups) => groups.iter().flat_map(|g| g.students.iter().cloned()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Enrollment::Empty)
    }
}

/// A concrete time-instance of an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub enrollable: BTreeSet<Student>,
    pub enrollment: Enrollment,
}

impl Session {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime, enrollable: BTreeSet<Student>) -> Self {
        let id = SessionId::compute(date, start, end, &enrollable);
        Session { id, date, start, end, enrollable, enrollment: Enrollment::Empty }
    }

    /// Strict time-window overlap on the same date: sharing only an endpoint
    /// is not overlap.
    pub fn overlaps(&self, other: &Session) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Session {}
impl Hash for Session {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An activity paired with the ordered list of its sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySessions {
    pub activity: ActivityId,
    pub sessions: Vec<Session>,
}

/// A time-bounded offering of a course: the house, and the activities it
/// must schedule this block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub course: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub house: House,
    pub activities: Vec<Activity>,
}

impl Block {
    pub fn activity(&self, id: ActivityId) -> &Activity {
        &self.activities[id.0]
    }

    pub fn activity_id_by_name(&self, name: &str) -> Option<ActivityId> {
        self.activities.iter().position(|a| a.name == name).map(ActivityId)
    }
}

/// A block together with the list of `(activity, sessions)` pairs that make
/// up a candidate or final schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSchedule {
    pub block: Block,
    pub schedule: Vec<ActivitySessions>,
}

impl BlockSchedule {
    pub fn activity_sessions(&self, id: ActivityId) -> Option<&ActivitySessions> {
        self.schedule.iter().find(|a| a.activity == id)
    }

    pub fn activity_sessions_mut(&mut self, id: ActivityId) -> Option<&mut ActivitySessions> {
        self.schedule.iter_mut().find(|a| a.activity == id)
    }

    /// All sessions across every activity, flattened, each paired with its
    /// owning activity id.
    pub fn all_sessions(&self) -> Vec<(ActivityId, &Session)> {
        self.schedule.iter().flat_map(|a| a.sessions.iter().map(move |s| (a.activity, s))).collect()
    }
}

/// One prior attendance of a named activity, in a specific session, from an
/// earlier block of the same course this academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendedActivity {
    pub activity_name: String,
    pub session_id: SessionId,
}

/// Per-student attendance history across prior blocks of the current
/// course, for the current academic year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceRecord {
    entries: HashMap<Student, Vec<AttendedActivity>>,
}

impl AttendanceRecord {
    pub fn new() -> Self {
        AttendanceRecord { entries: HashMap::new() }
    }

    pub fn record(&mut self, student: Student, activity_name: impl Into<String>, session_id: SessionId) {
        self.entries.entry(student).or_default().push(AttendedActivity { activity_name: activity_name.into(), session_id });
    }

    /// Whether `student` attended `activity_name` in any prior block.
    pub fn attended_activity(&self, student: &Student, activity_name: &str) -> bool {
        self.entries
            .get(student)
            .map(|history| history.iter().any(|a| a.activity_name == activity_name))
            .unwrap_or(false)
    }
}
