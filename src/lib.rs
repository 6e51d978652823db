//! # Block Scheduler: Genetic-Search Engine for Activity Scheduling and Mentor Grouping
//!
//! This crate schedules a block's activities into concrete, conflict-free
//! sessions and partitions a student population into mentor-led groups. Both
//! problems go through the same genetic search framework (see [`genetic`]):
//! a population of candidate solutions is scored by a fitness function,
//! evolved generation over generation through elitism, crossover, and
//! mutation, until either an acceptable score is reached or a generation cap
//! is hit.
//!
//! ## Scheduling a block
//!
//! ```no_run
//! use block_scheduler::{create_schedule, enrollment::Enroller};
//! use block_scheduler::model::{AttendanceRecord, Block, House};
//! use block_scheduler::random::worker_rng;
//!
//! # fn example(block: Block, house: House) -> block_scheduler::error::Result<()> {
//! let attendance = AttendanceRecord::new();
//! let mut rng = worker_rng(Some(42), 0);
//! let schedule = create_schedule(&block, &house, &attendance, Enroller::Random, &mut rng)?;
//! # let _ = schedule;
//! # Ok(())
//! # }
//! ```
//!
//! ## Evolving a schedule or a grouping
//!
//! [`Genetic::create_schedule`] and [`Genetic::create_grouping`] run the full
//! search rather than a single constructive pass, trading runtime for a
//! higher-scoring result.

pub mod balance;
pub mod enrollment;
pub mod error;
pub mod fitness;
pub mod genetic;
pub mod model;
pub mod random;
pub mod schedule_ops;
pub mod sessions;
pub mod stats;

pub use enrollment::Enroller;
pub use error::{Result, SchedulerError};
pub use genetic::GeneticConfig;
pub use model::{AttendanceRecord, Block, BlockSchedule, House};
pub use schedule_ops::{create_schedule, fill_schedule};

use model::Student;

/// Namespace for the evolved (genetic-search) variants of the core
/// operations, as opposed to the single-pass constructive ones exported at
/// the crate root.
pub struct Genetic;

impl Genetic {
    /// Evolves a population of schedules for `block` and returns the best
    /// one found, given `house` and `attendance` as fixed inputs.
    pub fn create_schedule(
        config: &GeneticConfig,
        seed: Option<u64>,
        block: &Block,
        house: &House,
        attendance: &AttendanceRecord,
        enroller: Enroller,
    ) -> Result<BlockSchedule> {
        genetic::schedule::create_schedule(config, seed, block, house, attendance, enroller)
    }

    /// Evolves a population of mentor groupings over `students` and returns
    /// the best one found.
    pub fn create_grouping(config: &GeneticConfig, seed: Option<u64>, mentors: &[String], students: &[Student]) -> House {
        genetic::grouping::create_grouping(config, seed, mentors, students)
    }
}
