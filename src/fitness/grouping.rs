//! Scores a house (a partition of students into mentor groups) along three
//! diversity dimensions: gender balance, age spread, and major spread.

use crate::model::{Gender, Group, House};
use std::collections::HashMap;
use std::hash::Hash;

/// The three per-dimension scores (each 0–100, higher is more diverse) and
/// their mean, which is the scalar fitness the genetic framework optimizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupingScore {
    pub gender: f64,
    pub age: f64,
    pub major: f64,
    pub overall: f64,
}

/// Scores an entire house: the mean, across its groups, of each dimension.
pub fn score_house(house: &House) -> GroupingScore {
    if house.groups.is_empty() {
        return GroupingScore { gender: 100.0, age: 100.0, major: 100.0, overall: 100.0 };
    }
    let per_group: Vec<(f64, f64, f64)> = house.groups.iter().map(score_group).collect();
    let n = per_group.len() as f64;
    let gender = per_group.iter().map(|g| g.0).sum::<f64>() / n;
    let age = per_group.iter().map(|g| g.1).sum::<f64>() / n;
    let major = per_group.iter().map(|g| g.2).sum::<f64>() / n;
    GroupingScore { gender, age, major, overall: (gender + age + major) / 3.0 }
}

/// (gender, age, major) for a single group. A shared last name zeroes all
/// three dimensions for that group.
fn score_group(group: &Group) -> (f64, f64, f64) {
    if group.has_duplicate_last_name() {
        return (0.0, 0.0, 0.0);
    }
    let gender = gender_score(group);
    let age = diversity_score(group.students.iter().map(|s| s.age));
    let major = diversity_score(group.students.iter().map(|s| s.major.as_str()));
    (gender, age, major)
}

fn gender_score(group: &Group) -> f64 {
    let n = group.students.len();
    if n == 0 {
        return 100.0;
    }
    let sum: i64 = group
        .students
        .iter()
        .map(|s| match s.gender {
            Gender::Male => 1,
            Gender::Female => -1,
            Gender::NotSpecified => 0,
        })
        .sum();
    let imbalance = sum.unsigned_abs() as f64 / n as f64;
    (1.0 - imbalance) * 100.0
}

/// Shared formula for the age and major dimensions: `Σ k_a² − n`, where
/// `k_a` is the count of group members sharing attribute value `a`,
/// normalized against `n²` and scaled to 0–100. 0 when every value is
/// distinct, 0-ward as members cluster onto shared values.
fn diversity_score<T: Eq + Hash>(values: impl Iterator<Item = T>) -> f64 {
    let mut counts: HashMap<T, u32> = HashMap::new();
    let mut n: u32 = 0;
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
        n += 1;
    }
    if n == 0 {
        return 100.0;
    }
    let raw: i64 = counts.values().map(|&k| (k as i64) * (k as i64)).sum::<i64>() - n as i64;
    let normalized = raw as f64 / (n as f64 * n as f64);
    ((1.0 - normalized) * 100.0).clamp(0.0, 100.0)
}
