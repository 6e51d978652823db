//! Even distribution of items across sublists, and rebalancing of sublists
//! that have drifted apart in size.
//!
//! Both the grouping constructor (round-robin seeding) and the grouping
//! crossover operator (distributing unassigned students, then rebalancing)
//! go through these two functions rather than re-deriving the arithmetic
//! locally.

/// Distributes `items` across `bucket_count` buckets as evenly as possible,
/// round-robin. With `n` items and `k` buckets, every bucket gets `n / k` or
/// `n / k + 1` items.
///
/// # Panics
///
/// Panics if `bucket_count == 0`.
pub fn distribute_evenly<T>(items: Vec<T>, bucket_count: usize) -> Vec<Vec<T>> {
    assert!(bucket_count > 0, "distribute_evenly requires at least one bucket");
    let mut buckets: Vec<Vec<T>> = (0..bucket_count).map(|_| Vec::new()).collect();
    for (i, item) in items.into_iter().enumerate() {
        buckets[i % bucket_count].push(item);
    }
    buckets
}

/// Restores the invariant "no two buckets differ in size by more than one"
/// by repeatedly moving a single element from the largest bucket to the
/// smallest.
///
/// This mirrors the source's rebalance loop: it moves one element at a time
/// and keeps going while the smallest bucket trails the largest by two or
/// more. Termination follows from size being a bounded, strictly-decreasing
/// potential (max - min) each time a move is made between the current max
/// and min buckets; see the design notes' open question on this point.
pub fn rebalance<T>(buckets: &mut [Vec<T>]) {
    if buckets.len() < 2 {
        return;
    }
    loop {
        let (min_idx, max_idx) = match min_max_indices(buckets) {
            Some(pair) => pair,
            None => return,
        };
        if buckets[max_idx].len() as i64 - buckets[min_idx].len() as i64 < 2 {
            return;
        }
        let moved = buckets[max_idx].pop().expect("max bucket is non-empty by construction");
        buckets[min_idx].push(moved);
    }
}

fn min_max_indices<T>(buckets: &[Vec<T>]) -> Option<(usize, usize)> {
    if buckets.is_empty() {
        return None;
    }
    let mut min_idx = 0;
    let mut max_idx = 0;
    for (i, bucket) in buckets.iter().enumerate() {
        if bucket.len() < buckets[min_idx].len() {
            min_idx = i;
        }
        if bucket.len() > buckets[max_idx].len() {
            max_idx = i;
        }
    }
    Some((min_idx, max_idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distributes_remainder_to_earliest_buckets() {
        let items: Vec<i32> = (0..7).collect();
        let buckets = distribute_evenly(items, 3);
        let lens: Vec<usize> = buckets.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![3, 2, 2]);
    }

    #[test]
    fn rebalance_restores_within_one() {
        let mut buckets = vec![vec![1, 2, 3, 4, 5], vec![6], vec![7, 8]];
        rebalance(&mut buckets);
        let lens: Vec<usize> = buckets.iter().map(Vec::len).collect();
        let min = *lens.iter().min().unwrap();
        let max = *lens.iter().max().unwrap();
        assert!(max - min <= 1, "lens = {lens:?}");
        let total: usize = lens.iter().sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn rebalance_is_a_no_op_when_already_even() {
        let mut buckets = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
        rebalance(&mut buckets);
        let lens: Vec<usize> = buckets.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![2, 2, 2]);
    }
}
