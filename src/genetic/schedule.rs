//! Schedule-specific genetic operators: crossover, mutation, and the evolved
//! `create_schedule` entry point.

use crate::enrollment::Enroller;
use crate::error::{Result, SchedulerError};
use crate::fitness;
use crate::model::{Activity, ActivityId, AttendanceRecord, Block, BlockSchedule, Enrollment, EnrollmentCriteria, GroupSelection, House, HouseRequirement, HouseSelection, Session, SessionId, Student};
use crate::random::{shuffle, uniform_inclusive};
use crate::schedule_ops;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeSet, HashMap};

use super::GeneticConfig;

fn is_crossable(activity: &Activity) -> bool {
    !activity.is_mandatory() && !activity.is_overflow()
}

/// Builds one crossover child: a k-sized random subset of `mum`'s
/// (activity, session) pairs, plus every `dad` pair not already taken,
/// fixed up against conflicts with the mum subset and against
/// per-activity over-enrollment.
fn merge_via_crossover(mum: &BlockSchedule, dad: &BlockSchedule, rng: &mut impl Rng) -> Result<Vec<(ActivityId, Session)>> {
    let mum_pairs: Vec<(ActivityId, Session)> =
        mum.all_sessions().into_iter().filter(|(id, _)| is_crossable(mum.block.activity(*id))).map(|(id, s)| (id, s.clone())).collect();
    let dad_pairs: Vec<(ActivityId, Session)> =
        dad.all_sessions().into_iter().filter(|(id, _)| is_crossable(dad.block.activity(*id))).map(|(id, s)| (id, s.clone())).collect();

    if mum_pairs.is_empty() {
        return Ok(dad_pairs);
    }

    let k = uniform_inclusive(rng, 1, mum_pairs.len() as i64) as usize;
    let mut indices: Vec<usize> = (0..mum_pairs.len()).collect();
    shuffle(rng, &mut indices);
    let a_subset: Vec<(ActivityId, Session)> = indices.into_iter().take(k).map(|i| mum_pairs[i].clone()).collect();
    let a_ids: BTreeSet<SessionId> = a_subset.iter().map(|(_, s)| s.id).collect();

    let b_borrowed: Vec<(ActivityId, Session)> = dad_pairs.into_iter().filter(|(_, s)| !a_ids.contains(&s.id)).collect();
    let fixed_b = fix_up(b_borrowed, &a_subset, &mum.block)?;

    let mut merged = a_subset;
    merged.extend(fixed_b);
    Ok(merged)
}

/// Removes students from borrowed sessions who now conflict with the A
/// subset, then caps each activity's per-student enrollment at what its
/// requirement allows.
fn fix_up(b_pairs: Vec<(ActivityId, Session)>, a_subset: &[(ActivityId, Session)], block: &Block) -> Result<Vec<(ActivityId, Session)>> {
    let conflict_removed: Vec<(ActivityId, Session)> = b_pairs
        .into_iter()
        .map(|(id, session)| {
            let conflicted: BTreeSet<Student> = session
                .enrollment
                .enrolled_students()
                .into_iter()
                .filter(|student| {
                    a_subset.iter().any(|(_, a_session)| a_session.overlaps(&session) && a_session.enrollment.enrolled_students().contains(student))
                })
                .collect();
            let session =
                if conflicted.is_empty() { session } else { remove_students(session, &conflicted, &block.activity(id).name)? };
            Ok((id, session))
        })
        .collect::<Result<Vec<_>>>()?;
    enforce_activity_caps(conflict_removed, block)
}

/// Removes `to_remove` from a session's enrollment, regardless of shape.
/// Crossover's candidate pairs are filtered to non-mandatory activities
/// (see [`is_crossable`]), so `GroupsEnrollment` is never actually asked to
/// drop a student here in practice; if it ever is, that is the
/// configuration fault `SchedulerError::IllegalGroupsEnrollmentEdit`
/// describes, not a silent no-op.
fn remove_students(mut session: Session, to_remove: &BTreeSet<Student>, activity_name: &str) -> Result<Session> {
    session.enrollment = match session.enrollment {
        Enrollment::Empty => Enrollment::Empty,
        Enrollment::StudentEnrollment(s) => {
            if to_remove.contains(&s) {
                Enrollment::Empty
            } else {
                Enrollment::StudentEnrollment(s)
            }
        }
        Enrollment::StudentsEnrollment(set) => Enrollment::StudentsEnrollment(set.difference(to_remove).cloned().collect()),
        Enrollment::PeerEnrollment(pair) => {
            if to_remove.contains(&pair.bedside) || to_remove.contains(&pair.peer) {
                Enrollment::Empty
            } else {
                Enrollment::PeerEnrollment(pair)
            }
        }
        Enrollment::GroupsEnrollment(_) => return Err(SchedulerError::IllegalGroupsEnrollmentEdit(activity_name.to_string())),
    };
    Ok(session)
}

fn enforce_activity_caps(pairs: Vec<(ActivityId, Session)>, block: &Block) -> Result<Vec<(ActivityId, Session)>> {
    let mut by_activity: HashMap<ActivityId, Vec<usize>> = HashMap::new();
    for (index, (id, _)) in pairs.iter().enumerate() {
        by_activity.entry(*id).or_default().push(index);
    }

    let mut pairs = pairs;
    for (id, indices) in by_activity {
        let activity = block.activity(id);
        match &activity.criteria {
            EnrollmentCriteria::FromHouse(HouseSelection::SelectMaxStudents { requirement: HouseRequirement::AttendOnceThisYear, .. })
            | EnrollmentCriteria::FromHouse(HouseSelection::SelectAllStudents { requirement: HouseRequirement::AttendOnceThisYear }) => {
                let mut seen: BTreeSet<Student> = BTreeSet::new();
                for index in indices {
                    let enrolled = pairs[index].1.enrollment.enrolled_students();
                    let excess: BTreeSet<Student> = enrolled.intersection(&seen).cloned().collect();
                    if !excess.is_empty() {
                        pairs[index].1 = remove_students(pairs[index].1.clone(), &excess, &activity.name)?;
                    }
                    seen.extend(pairs[index].1.enrollment.enrolled_students());
                }
            }
            EnrollmentCriteria::FromGroup(GroupSelection::SelectTwoPeers { times_per_block }) => {
                let n = *times_per_block;
                let mut bedside_counts: HashMap<Student, u32> = HashMap::new();
                let mut peer_counts: HashMap<Student, u32> = HashMap::new();
                for index in indices {
                    if let Enrollment::PeerEnrollment(pair) = pairs[index].1.enrollment.clone() {
                        let over = *bedside_counts.get(&pair.bedside).unwrap_or(&0) >= n || *peer_counts.get(&pair.peer).unwrap_or(&0) >= n;
                        if over {
                            pairs[index].1.enrollment = Enrollment::Empty;
                        } else {
                            *bedside_counts.entry(pair.bedside).or_insert(0) += 1;
                            *peer_counts.entry(pair.peer).or_insert(0) += 1;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(pairs)
}

fn regroup(pairs: Vec<(ActivityId, Session)>) -> Vec<crate::model::ActivitySessions> {
    let mut order: Vec<ActivityId> = Vec::new();
    let mut map: HashMap<ActivityId, Vec<Session>> = HashMap::new();
    for (id, session) in pairs {
        map.entry(id)
            .or_insert_with(|| {
                order.push(id);
                Vec::new()
            })
            .push(session);
    }
    order.into_iter().map(|id| crate::model::ActivitySessions { activity: id, sessions: map.remove(&id).expect("tracked in order") }).collect()
}

pub fn crossover(
    mum: &BlockSchedule,
    dad: &BlockSchedule,
    house: &House,
    attendance: &AttendanceRecord,
    enroller: Enroller,
    rng: &mut ChaCha8Rng,
) -> Result<(BlockSchedule, BlockSchedule)> {
    let child_a = BlockSchedule { block: mum.block.clone(), schedule: regroup(merge_via_crossover(mum, dad, rng)?) };
    let child_b = BlockSchedule { block: dad.block.clone(), schedule: regroup(merge_via_crossover(dad, mum, rng)?) };
    let repaired_a = schedule_ops::fill_schedule(house, attendance, enroller, child_a, rng)?;
    let repaired_b = schedule_ops::fill_schedule(house, attendance, enroller, child_b, rng)?;
    Ok((repaired_a, repaired_b))
}

pub fn mutate(individual: BlockSchedule, house: &House, attendance: &AttendanceRecord, enroller: Enroller, rng: &mut ChaCha8Rng) -> Result<BlockSchedule> {
    let mut schedule = individual;
    let block = schedule.block.clone();

    let mutable_positions: Vec<(usize, usize)> = schedule
        .schedule
        .iter()
        .enumerate()
        .filter(|(_, a)| is_crossable(block.activity(a.activity)))
        .flat_map(|(ai, a)| (0..a.sessions.len()).map(move |si| (ai, si)))
        .collect();

    if !mutable_positions.is_empty() {
        let pick = uniform_inclusive(rng, 0, mutable_positions.len() as i64 - 1) as usize;
        let (ai, si) = mutable_positions[pick];
        schedule.schedule[ai].sessions[si].enrollment = Enrollment::Empty;
    }

    for activity_sessions in schedule.schedule.iter_mut() {
        if block.activity(activity_sessions.activity).is_overflow() {
            for session in activity_sessions.sessions.iter_mut() {
                session.enrollment = Enrollment::Empty;
            }
        }
    }

    schedule_ops::fill_schedule(house, attendance, enroller, schedule, rng)
}

/// Evolves a population of schedules and returns the best one found.
pub fn create_schedule(
    config: &GeneticConfig,
    seed: Option<u64>,
    block: &Block,
    house: &House,
    attendance: &AttendanceRecord,
    enroller: Enroller,
) -> Result<BlockSchedule> {
    let mut effective_block = block.clone();
    effective_block.house = house.clone();
    crate::sessions::generate_sessions(&effective_block)?;

    let fitness_fn = |schedule: &BlockSchedule| fitness::schedule::score_schedule(schedule, attendance).overall;
    let random_individual = |_task: usize, rng: &mut ChaCha8Rng| {
        schedule_ops::create_schedule(&effective_block, house, attendance, enroller, rng)
            .expect("block was validated before evolution started")
    };
    let crossover_op = |a: &BlockSchedule, b: &BlockSchedule, rng: &mut ChaCha8Rng| crossover(a, b, house, attendance, enroller, rng);
    let mutate_op = |individual: BlockSchedule, rng: &mut ChaCha8Rng| mutate(individual, house, attendance, enroller, rng);

    super::evolve(config, seed, fitness_fn, random_individual, crossover_op, mutate_op, 0.01)
}
