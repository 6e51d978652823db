//! Random utilities shared by the constructive enrollers and the genetic
//! framework.
//!
//! The rest of the crate never reaches for `rand` directly; it goes through
//! the small surface here so that every call site accepts `&mut impl Rng`
//! rather than assuming a particular generator. That keeps a single shared
//! generator from ever being passed across a `rayon` work-stealing boundary,
//! which the design explicitly forbids (it would both serialize the workers
//! and make runs non-reproducible even with a fixed seed).

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Produces a fresh, independent generator for one worker/task.
///
/// When `seed` is `Some`, the generator is a `ChaCha8Rng` seeded
/// deterministically from `seed` combined with `task_index`, so repeated runs
/// with the same seed and the same task layout reproduce identical schedules.
/// When `seed` is `None`, each call draws entropy from the OS via
/// [`rand::rng`]; because `rand::rng()` hands back a distinct thread-local
/// generator per OS thread, concurrent `rayon` tasks never contend on or
/// share state.
pub fn worker_rng(seed: Option<u64>, task_index: u64) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(task_index)),
        None => {
            let mut entropy_source = rand::rng();
            ChaCha8Rng::seed_from_u64(entropy_source.random())
        }
    }
}

/// Draws a uniformly distributed integer in `[low, high]` (inclusive on both
/// ends).
///
/// # Panics
///
/// Panics if `low > high`.
pub fn uniform_inclusive(rng: &mut impl Rng, low: i64, high: i64) -> i64 {
    assert!(low <= high, "uniform_inclusive: low ({low}) > high ({high})");
    rng.random_range(low..=high)
}

/// Shuffles `items` in place using the Fisher-Yates algorithm.
pub fn shuffle<T>(rng: &mut impl Rng, items: &mut [T]) {
    items.shuffle(rng);
}

/// Returns a clone of `items`, shuffled.
pub fn shuffled<T: Clone>(rng: &mut impl Rng, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle(rng, &mut out);
    out
}

/// Picks two distinct indices uniformly at random from `0..len`.
///
/// Used by parent selection (which restricts `len` to the top half of the
/// sorted population before calling this) and by the grouping mutation
/// operator (which restricts `len` to the group count).
///
/// # Panics
///
/// Panics if `len < 2`.
pub fn distinct_pair(rng: &mut impl Rng, len: usize) -> (usize, usize) {
    assert!(len >= 2, "distinct_pair requires at least two candidates");
    let first = rng.random_range(0..len);
    loop {
        let second = rng.random_range(0..len);
        if second != first {
            return (first, second);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_inclusive_respects_bounds() {
        let mut rng = worker_rng(Some(1), 0);
        for _ in 0..200 {
            let value = uniform_inclusive(&mut rng, 3, 7);
            assert!((3..=7).contains(&value));
        }
    }

    #[test]
    fn distinct_pair_never_repeats() {
        let mut rng = worker_rng(Some(2), 0);
        for _ in 0..200 {
            let (a, b) = distinct_pair(&mut rng, 5);
            assert_ne!(a, b);
            assert!(a < 5 && b < 5);
        }
    }

    #[test]
    fn same_seed_same_task_index_is_deterministic() {
        let mut a = worker_rng(Some(42), 7);
        let mut b = worker_rng(Some(42), 7);
        let draws_a: Vec<i64> = (0..10).map(|_| uniform_inclusive(&mut a, 0, 1_000_000)).collect();
        let draws_b: Vec<i64> = (0..10).map(|_| uniform_inclusive(&mut b, 0, 1_000_000)).collect();
        assert_eq!(draws_a, draws_b);
    }
}
