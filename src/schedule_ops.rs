//! Single-pass schedule construction and repair: the non-evolved public
//! operations, and the building blocks the genetic schedule operators reuse
//! for crossover and mutation repair.

use crate::enrollment::{mandatory::enroll_mandatory, ordered_enroller, ordered_session_enroller, overflow::enroll_overflow, random_enroller, Enroller};
use crate::error::Result;
use crate::model::{ActivityId, AttendanceRecord, Block, BlockSchedule, Enrollment, House, Session, SessionId};
use crate::sessions::{generate_sessions, SessionBands};
use rand::Rng;
use std::collections::HashMap;

/// Runs a single constructive enrollment pass over `block`, overriding its
/// house with `house`, and returns the resulting schedule.
pub fn create_schedule(block: &Block, house: &House, attendance: &AttendanceRecord, enroller: Enroller, rng: &mut impl Rng) -> Result<BlockSchedule> {
    let mut effective_block = block.clone();
    effective_block.house = house.clone();
    let bands = generate_sessions(&effective_block)?;
    assemble(effective_block, &bands, attendance, enroller, rng)
}

/// Repairs a partial schedule: regenerates the block's session grid,
/// preserves any enrollment already present on matching sessions, reruns
/// the chosen constructive enroller to top up unordered gaps, regenerates
/// every overflow session from scratch, and reasserts the mandatory band.
pub fn fill_schedule(house: &House, attendance: &AttendanceRecord, enroller: Enroller, block_schedule: BlockSchedule, rng: &mut impl Rng) -> Result<BlockSchedule> {
    let mut effective_block = block_schedule.block.clone();
    effective_block.house = house.clone();
    let bands = generate_sessions(&effective_block)?;

    let existing: HashMap<SessionId, Enrollment> =
        block_schedule.schedule.iter().flat_map(|a| a.sessions.iter().map(|s| (s.id, s.enrollment.clone()))).collect();
    let mandatory = merge_existing(&bands.mandatory, &existing);
    let unordered = merge_existing(&bands.unordered, &existing);
    let seeded = SessionBands { mandatory, unordered, overflow: bands.overflow };

    assemble(effective_block, &seeded, attendance, enroller, rng)
}

fn merge_existing(bands: &[crate::model::ActivitySessions], existing: &HashMap<SessionId, Enrollment>) -> Vec<crate::model::ActivitySessions> {
    bands
        .iter()
        .map(|activity_sessions| {
            let sessions = activity_sessions
                .sessions
                .iter()
                .map(|session| {
                    let mut session = session.clone();
                    if let Some(enrollment) = existing.get(&session.id) {
                        session.enrollment = enrollment.clone();
                    }
                    session
                })
                .collect();
            crate::model::ActivitySessions { activity: activity_sessions.activity, sessions }
        })
        .collect()
}

fn assemble(block: Block, bands: &SessionBands, attendance: &AttendanceRecord, enroller: Enroller, rng: &mut impl Rng) -> Result<BlockSchedule> {
    let mandatory = enroll_mandatory(&bands.mandatory, &block.house);
    let unordered = match enroller {
        Enroller::Random => random_enroller::enroll(&bands.unordered, &block, attendance, rng)?,
        Enroller::OrderedSession => ordered_session_enroller::enroll(&bands.unordered, &block, attendance, rng)?,
        Enroller::Ordered => ordered_enroller::enroll(&bands.unordered, &block, attendance, rng)?,
    };

    let all_so_far: Vec<(ActivityId, Session)> =
        mandatory.iter().chain(unordered.iter()).flat_map(|a| a.sessions.iter().map(move |s| (a.activity, s.clone()))).collect();
    let overflow = enroll_overflow(&bands.overflow, &block, &all_so_far);

    let mut schedule = Vec::with_capacity(mandatory.len() + unordered.len() + overflow.len());
    schedule.extend(mandatory);
    schedule.extend(unordered);
    schedule.extend(overflow);
    Ok(BlockSchedule { block, schedule })
}
