//! Grouping-specific genetic operators: crossover, mutation, the
//! sort-based seed heuristic, and the evolved `create_grouping` entry
//! point.

use crate::balance::{distribute_evenly, rebalance};
use crate::fitness;
use crate::model::{Group, House, Student};
use crate::random::{distinct_pair, shuffle, shuffled, uniform_inclusive};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

use super::GeneticConfig;

/// Round-robin-assigns students (sorted by `(gender, age, major)`, so that
/// adjacent students differ as much as possible) across `mentors`.
pub fn seed_heuristic(mentors: &[String], students: &[Student]) -> House {
    let mut sorted = students.to_vec();
    sorted.sort_by(|a, b| (a.gender, a.age, &a.major).cmp(&(b.gender, b.age, &b.major)));
    let buckets = distribute_evenly(sorted, mentors.len().max(1));
    House::new(mentors.iter().zip(buckets).map(|(mentor, members)| Group::new(mentor.clone(), members)).collect())
}

fn random_house(mentors: &[String], students: &[Student], rng: &mut impl Rng) -> House {
    let shuffled_students = shuffled(rng, students);
    let buckets = distribute_evenly(shuffled_students, mentors.len().max(1));
    House::new(mentors.iter().zip(buckets).map(|(mentor, members)| Group::new(mentor.clone(), members)).collect())
}

fn crossover_one(mum: &House, dad: &House, rng: &mut impl Rng) -> House {
    let slot_count = mum.groups.len();
    if slot_count == 0 {
        return House::new(Vec::new());
    }

    let k = uniform_inclusive(rng, 0, slot_count as i64) as usize;
    let mut slots: Vec<usize> = (0..slot_count).collect();
    shuffle(rng, &mut slots);
    let mum_slots: BTreeSet<usize> = slots.into_iter().take(k).collect();
    let mum_students: BTreeSet<Student> = mum_slots.iter().flat_map(|&i| mum.groups[i].students.iter().cloned()).collect();

    let mut groups: Vec<Group> = (0..slot_count)
        .map(|i| {
            if mum_slots.contains(&i) {
                mum.groups[i].clone()
            } else {
                let kept: Vec<Student> = dad.groups[i].students.iter().filter(|s| !mum_students.contains(s)).cloned().collect();
                Group::new(dad.groups[i].mentor.clone(), kept)
            }
        })
        .collect();

    let assigned: BTreeSet<Student> = groups.iter().flat_map(|g| g.students.iter().cloned()).collect();
    let population: BTreeSet<Student> = mum.all_students().into_iter().chain(dad.all_students()).collect();
    let unassigned: Vec<Student> = population.into_iter().filter(|s| !assigned.contains(s)).collect();

    let dad_slots: Vec<usize> = (0..slot_count).filter(|i| !mum_slots.contains(i)).collect();
    if !dad_slots.is_empty() {
        let distributed = distribute_evenly(unassigned, dad_slots.len());
        for (&slot, members) in dad_slots.iter().zip(distributed) {
            groups[slot].students.extend(members);
        }

        let mut dad_buckets: Vec<Vec<Student>> = dad_slots.iter().map(|&slot| groups[slot].students.clone()).collect();
        rebalance(&mut dad_buckets);
        for (&slot, bucket) in dad_slots.iter().zip(dad_buckets) {
            groups[slot].students = bucket;
        }
    }

    House::new(groups)
}

pub fn crossover(mum: &House, dad: &House, rng: &mut ChaCha8Rng) -> (House, House) {
    (crossover_one(mum, dad, rng), crossover_one(dad, mum, rng))
}

/// Swaps one student from each of two distinct groups.
pub fn mutate(mut house: House, rng: &mut ChaCha8Rng) -> House {
    if house.groups.len() < 2 {
        return house;
    }
    let (i, j) = distinct_pair(rng, house.groups.len());
    if house.groups[i].students.is_empty() || house.groups[j].students.is_empty() {
        return house;
    }
    let a = uniform_inclusive(rng, 0, house.groups[i].students.len() as i64 - 1) as usize;
    let b = uniform_inclusive(rng, 0, house.groups[j].students.len() as i64 - 1) as usize;
    let student_a = house.groups[i].students[a].clone();
    let student_b = house.groups[j].students[b].clone();
    house.groups[i].students[a] = student_b;
    house.groups[j].students[b] = student_a;
    house
}

/// Evolves a population of groupings and returns the best one found.
pub fn create_grouping(config: &GeneticConfig, seed: Option<u64>, mentors: &[String], students: &[Student]) -> House {
    let fitness_fn = |house: &House| fitness::grouping::score_house(house).overall;
    let random_individual = |task: usize, rng: &mut ChaCha8Rng| {
        if task == 0 {
            seed_heuristic(mentors, students)
        } else {
            random_house(mentors, students, rng)
        }
    };
    let crossover_op = |a: &House, b: &House, rng: &mut ChaCha8Rng| Ok(crossover(a, b, rng));
    let mutate_op = |individual: House, rng: &mut ChaCha8Rng| Ok(mutate(individual, rng));

    super::evolve(config, seed, fitness_fn, random_individual, crossover_op, mutate_op, 0.05)
        .expect("grouping crossover and mutation never raise a configuration fault")
}
