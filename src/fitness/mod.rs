//! Fitness scoring for the two chromosome shapes the genetic framework
//! evolves: mentor groupings and block schedules.

pub mod grouping;
pub mod schedule;
