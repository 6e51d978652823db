//! The genetic search framework shared by schedule evolution and grouping
//! evolution: elitism, parent selection, parallel crossover, mutation, and
//! a generation/acceptable-score termination rule.
//!
//! The framework itself is chromosome-agnostic; [`genetic::schedule`] and
//! [`genetic::grouping`] supply the fitness function, the random individual
//! constructor, and the crossover/mutation operators for their respective
//! chromosome shapes.

pub mod grouping;
pub mod schedule;

use crate::error::Result;
use crate::random::{distinct_pair, worker_rng};
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Population size, evolution cap, and the fitness score at which a run is
/// considered converged.
#[derive(Debug, Clone, Copy)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub max_evolutions: u32,
    pub acceptable_score: f64,
}

const ELITE_FRACTION: f64 = 0.10;

fn elite_count(population_size: usize) -> usize {
    let fraction = (population_size as f64 * ELITE_FRACTION).ceil() as usize;
    fraction.max(1)
}

/// Runs the generic evolution loop and returns the best individual seen.
///
/// `seed` makes the whole run reproducible: every per-task random source is
/// derived from it via [`crate::random::worker_rng`] rather than shared
/// across the rayon workers driving initial construction and crossover.
///
/// `crossover` and `mutate` are fallible: a configuration fault raised by
/// either one aborts the run and propagates out of `evolve` rather than
/// being swallowed, since it means the chromosome itself is contradictory,
/// not that this particular generation got unlucky.
#[allow(clippy::too_many_arguments)]
pub fn evolve<T, Fit, Rnd, Cross, Mut>(
    config: &GeneticConfig,
    seed: Option<u64>,
    fitness: Fit,
    random_individual: Rnd,
    crossover: Cross,
    mutate: Mut,
    mutation_chance: f64,
) -> Result<T>
where
    T: Clone + Send + Sync,
    Fit: Fn(&T) -> f64 + Sync,
    Rnd: Fn(usize, &mut ChaCha8Rng) -> T + Sync,
    Cross: Fn(&T, &T, &mut ChaCha8Rng) -> Result<(T, T)> + Sync,
    Mut: Fn(T, &mut ChaCha8Rng) -> Result<T> + Sync,
{
    let population_size = config.population_size.max(1);
    let elites = elite_count(population_size);

    let mut population: Vec<(T, f64)> = (0..population_size)
        .into_par_iter()
        .map(|task| {
            let mut rng = worker_rng(seed, task as u64);
            let individual = random_individual(task, &mut rng);
            let score = fitness(&individual);
            (individual, score)
        })
        .collect();
    population.sort_by(|a, b| b.1.total_cmp(&a.1));

    for generation in 0..config.max_evolutions {
        let best = population[0].1;
        if best >= config.acceptable_score {
            break;
        }
        debug!("generation {generation}: best fitness {best:.3}");

        let top_half = (population_size / 2).max(2).min(population_size);
        let pair_count = (population_size - elites).div_ceil(2);
        let base_salt = (generation as u64 + 1) * 1_000_003;

        let mut children: Vec<(T, f64)> = (0..pair_count)
            .into_par_iter()
            .map(|task| -> Result<[(T, f64); 2]> {
                let mut rng = worker_rng(seed, base_salt + task as u64);
                let (a_idx, b_idx) = distinct_pair(&mut rng, top_half);
                let (mut child_a, mut child_b) = crossover(&population[a_idx].0, &population[b_idx].0, &mut rng)?;
                if rng.random_bool(mutation_chance) {
                    child_a = mutate(child_a, &mut rng)?;
                }
                if rng.random_bool(mutation_chance) {
                    child_b = mutate(child_b, &mut rng)?;
                }
                let score_a = fitness(&child_a);
                let score_b = fitness(&child_b);
                Ok([(child_a, score_a), (child_b, score_b)])
            })
            .collect::<Result<Vec<[(T, f64); 2]>>>()?
            .into_iter()
            .flatten()
            .collect();

        let mut next_population: Vec<(T, f64)> = population[..elites].to_vec();
        next_population.append(&mut children);
        next_population.truncate(population_size);
        next_population.sort_by(|a, b| b.1.total_cmp(&a.1));
        population = next_population;
    }

    Ok(population.into_iter().next().expect("population_size is at least one").0)
}
