//! Property-based tests verifying invariants from the scheduling and
//! grouping domain hold across randomly generated configurations.

mod common;

use block_scheduler::model::{Enrollment, Frequency, HouseRequirement, Priority, Student};
use block_scheduler::random::worker_rng;
use block_scheduler::{create_schedule, Enroller, Genetic, GeneticConfig};
use common::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn capped_house_block(group_count: usize, per_group: usize, cap: u32) -> block_scheduler::model::Block {
    let activity = house_activity(
        "Clinic",
        Frequency::Weekly(vec![(time(9, 0), time(11, 0)), (time(13, 0), time(15, 0))]),
        Priority::Neutral,
        cap,
        HouseRequirement::AttendOnceThisYear,
    );
    block(vec![activity], date(2015, 9, 29), date(2015, 10, 13), group_count, per_group)
}

proptest! {
    /// No student is ever enrolled in two sessions whose windows overlap on
    /// the same date, for any non-mandatory, non-overflow activity.
    #[test]
    fn no_overlapping_enrollment_across_sessions(group_count in 1usize..4, per_group in 1usize..5, cap in 1u32..6, seed in any::<u64>()) {
        let b = capped_house_block(group_count, per_group, cap);
        let house = b.house.clone();
        let mut rng = worker_rng(Some(seed), 0);
        let schedule = create_schedule(&b, &house, &empty_attendance(), Enroller::Random, &mut rng).unwrap();

        let sessions: Vec<_> = schedule.all_sessions();
        for (i, (_, s1)) in sessions.iter().enumerate() {
            for (_, s2) in sessions.iter().skip(i + 1) {
                if s1.overlaps(s2) {
                    let e1 = s1.enrollment.enrolled_students();
                    let e2 = s2.enrollment.enrolled_students();
                    prop_assert!(e1.is_disjoint(&e2));
                }
            }
        }
    }

    /// `SelectMaxStudents(cap, ...)` sessions never exceed their cap.
    #[test]
    fn select_max_students_respects_cap(group_count in 1usize..4, per_group in 1usize..5, cap in 1u32..6, seed in any::<u64>()) {
        let b = capped_house_block(group_count, per_group, cap);
        let house = b.house.clone();
        let mut rng = worker_rng(Some(seed), 0);
        let schedule = create_schedule(&b, &house, &empty_attendance(), Enroller::Random, &mut rng).unwrap();

        for (_, session) in schedule.all_sessions() {
            prop_assert!(session.enrollment.enrolled_students().len() as u32 <= cap);
        }
    }

    /// Every enrolled student is drawn from the session's own enrollable set.
    #[test]
    fn enrolled_students_are_always_enrollable(group_count in 1usize..4, per_group in 1usize..5, cap in 1u32..6, seed in any::<u64>()) {
        let b = capped_house_block(group_count, per_group, cap);
        let house = b.house.clone();
        let mut rng = worker_rng(Some(seed), 0);
        let schedule = create_schedule(&b, &house, &empty_attendance(), Enroller::Random, &mut rng).unwrap();

        for (_, session) in schedule.all_sessions() {
            let enrolled = session.enrollment.enrolled_students();
            prop_assert!(enrolled.is_subset(&session.enrollable));
        }
    }
}

#[test]
fn peer_enrollment_is_always_two_distinct_students_from_the_same_group() {
    let activity = peer_activity("Rounds", Frequency::Weekly(vec![(time(9, 0), time(11, 0))]), Priority::Neutral, 1);
    let b = block(vec![activity], date(2015, 9, 29), date(2015, 10, 13), 3, 4);
    let house = b.house.clone();
    for seed in 0u64..20 {
        let mut rng = worker_rng(Some(seed), 0);
        let schedule = create_schedule(&b, &house, &empty_attendance(), Enroller::Random, &mut rng).unwrap();
        for (_, session) in schedule.all_sessions() {
            if let Enrollment::PeerEnrollment(pair) = &session.enrollment {
                assert_ne!(pair.bedside, pair.peer);
                assert!(session.enrollable.contains(&pair.bedside));
                assert!(session.enrollable.contains(&pair.peer));
            }
        }
    }
}

#[test]
fn overflow_enrollment_never_shares_a_student_with_its_master_session() {
    let master = house_activity("Seminar", Frequency::Once(date(2015, 10, 27), time(13, 0), time(15, 0)), Priority::Neutral, 2, HouseRequirement::AttendOnceThisYear);
    let overflow = block_scheduler::model::Activity::new(
        "Seminar Overflow",
        Frequency::Once(date(2015, 10, 27), time(13, 0), time(15, 0)),
        Priority::Low,
        block_scheduler::model::EnrollmentCriteria::OverflowFrom(block_scheduler::model::ActivityId(0)),
    );
    let b = block(vec![master, overflow], date(2015, 10, 1), date(2015, 10, 31), 2, 3);
    let house = b.house.clone();
    for seed in 0u64..20 {
        let mut rng = worker_rng(Some(seed), 0);
        let schedule = create_schedule(&b, &house, &empty_attendance(), Enroller::Random, &mut rng).unwrap();
        let master_students = schedule.activity_sessions(block_scheduler::model::ActivityId(0)).unwrap().sessions[0].enrollment.enrolled_students();
        let overflow_students = schedule.activity_sessions(block_scheduler::model::ActivityId(1)).unwrap().sessions[0].enrollment.enrolled_students();
        assert!(master_students.is_disjoint(&overflow_students));
    }
}

#[test]
fn mandatory_unordered_overflow_bands_partition_the_activity_list() {
    let mandatory = mandatory_activity("Opening", Frequency::Once(date(2015, 10, 27), time(8, 0), time(9, 0)), Priority::Neutral);
    let unordered = house_activity("Clinic", Frequency::Once(date(2015, 10, 28), time(13, 0), time(15, 0)), Priority::Neutral, 2, HouseRequirement::AttendOnceThisYear);
    let overflow = block_scheduler::model::Activity::new(
        "Clinic Overflow",
        Frequency::Once(date(2015, 10, 28), time(13, 0), time(15, 0)),
        Priority::Low,
        block_scheduler::model::EnrollmentCriteria::OverflowFrom(block_scheduler::model::ActivityId(1)),
    );
    let b = block(vec![mandatory, unordered, overflow], date(2015, 10, 1), date(2015, 10, 31), 1, 4);
    let bands = block_scheduler::sessions::generate_sessions(&b).unwrap();

    let mut seen: BTreeSet<usize> = BTreeSet::new();
    for a in bands.mandatory.iter().chain(bands.unordered.iter()).chain(bands.overflow.iter()) {
        assert!(seen.insert(a.activity.0), "activity {} appeared in more than one band", a.activity.0);
    }
    assert_eq!(seen.len(), b.activities.len());
    assert_eq!(bands.mandatory.len(), 1);
    assert_eq!(bands.unordered.len(), 1);
    assert_eq!(bands.overflow.len(), 1);
}

#[test]
fn genetic_best_fitness_is_non_decreasing_as_generations_increase() {
    let _ = env_logger::try_init();
    let mentors: Vec<String> = (0..4).map(|i| format!("Mentor{i}")).collect();
    let students: Vec<Student> = (0..40).map(|i| student(&format!("First{i}"), &format!("Last{i}"))).collect();

    let fitness_of = |max_evolutions: u32| {
        let config = GeneticConfig { population_size: 12, max_evolutions, acceptable_score: 101.0 };
        let house = Genetic::create_grouping(&config, Some(7), &mentors, &students);
        block_scheduler::fitness::grouping::score_house(&house).overall
    };

    let mut previous = fitness_of(0);
    for generations in [1u32, 2, 4, 8] {
        let current = fitness_of(generations);
        assert!(current >= previous - 1e-9, "fitness regressed: {previous} -> {current} at {generations} generations");
        previous = current;
    }
}

#[test]
fn seed_heuristic_distributes_114_students_across_20_mentors_evenly() {
    let mentors: Vec<String> = (0..20).map(|i| format!("Mentor{i}")).collect();
    let students: Vec<Student> = (0..114).map(|i| student(&format!("First{i}"), &format!("Last{i}"))).collect();
    let house = block_scheduler::genetic::grouping::seed_heuristic(&mentors, &students);

    assert_eq!(house.student_count(), 114);
    for group in &house.groups {
        assert!(group.students.len() >= 114 / 20);
    }
}

#[test]
fn group_with_a_duplicate_surname_scores_zero_on_every_dimension() {
    use block_scheduler::model::{Gender, Group, House};
    let group = Group::new(
        "Mentor",
        vec![Student::new("A", "Smith", Gender::Male, 20, "CS"), Student::new("B", "Smith", Gender::Female, 21, "Math")],
    );
    let house = House::new(vec![group]);
    let score = block_scheduler::fitness::grouping::score_house(&house);
    assert_eq!(score.gender, 0.0);
    assert_eq!(score.age, 0.0);
    assert_eq!(score.major, 0.0);
}
