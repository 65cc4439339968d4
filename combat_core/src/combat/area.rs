//! Area resolution
//!
//! Secondary targets are found by walking the zone index in id order with a
//! cursor. The zone lock is held only while reading the next candidate and
//! is released around each engagement, which takes the candidate's own lock.
//! Resuming strictly after the cursor means an object is never visited twice
//! even if the zone changes while it is unlocked.

use super::engagement::Strike;
use super::{CombatAction, CombatEngine};
use crate::object::{Creature, ObjectHandle};
use crate::skill::AreaShape;
use crate::types::{ObjectId, Position};
use parking_lot::MutexGuard;
use std::sync::Arc;
use tracing::{debug, warn};

/// Signed angle in degrees between the attack direction (`origin` toward
/// `aim`) and the direction from `origin` to `candidate`, within -180..=180
pub fn cone_angle(origin: Position, aim: Position, candidate: Position) -> f32 {
    let direction = (aim.y - origin.y).atan2(aim.x - origin.x);
    let bearing = (candidate.y - origin.y).atan2(candidate.x - origin.x);

    let mut degrees = (bearing - direction).to_degrees();
    if degrees > 180.0 {
        degrees -= 360.0;
    } else if degrees < -180.0 {
        degrees += 360.0;
    }
    degrees
}

/// Whether `candidate` falls inside `shape` cast from `origin` toward `aim`
pub fn in_area(shape: AreaShape, origin: Position, aim: Position, candidate: Position) -> bool {
    let distance = origin.distance_to(&candidate);
    match shape {
        AreaShape::Radius { radius } => distance <= radius,
        AreaShape::Cone { range, angle } => {
            distance <= range && cone_angle(origin, aim, candidate).abs() <= angle / 2.0
        }
    }
}

struct Candidate {
    id: ObjectId,
    handle: ObjectHandle,
    position: Position,
    cell: Option<u64>,
    combatant: bool,
}

impl CombatEngine {
    /// Engage every eligible object around `actor` besides the primary target
    pub(super) fn resolve_area(
        &self,
        actor: &mut Creature,
        primary: ObjectId,
        strike: &Strike<'_>,
        msg: &mut CombatAction,
    ) {
        let Some(shape) = strike.attack.area else {
            return;
        };

        let mut index = self.zone.lock_index();
        let (origin, cell) = match index.get(actor.id) {
            Some(entry) => (entry.position, entry.cell),
            None => {
                warn!(actor = %actor.id, "area attack from an object not in the zone");
                return;
            }
        };
        let Some(aim) = index.get(primary).map(|entry| entry.position) else {
            debug!(actor = %actor.id, %primary, "primary target left the zone");
            return;
        };

        let mut cursor = None;
        loop {
            let next = index.next_after(cursor).map(|(id, entry)| Candidate {
                id,
                handle: Arc::clone(&entry.handle),
                position: entry.position,
                cell: entry.cell,
                combatant: entry.class.is_combatant(),
            });
            let Some(candidate) = next else {
                break;
            };
            cursor = Some(candidate.id);

            if !candidate.combatant || candidate.id == actor.id || candidate.id == primary {
                continue;
            }
            if candidate.cell != cell {
                debug!(actor = %actor.id, candidate = %candidate.id, "skipping candidate in another cell");
                continue;
            }
            if !in_area(shape, origin, aim, candidate.position) {
                continue;
            }

            let distance = origin.distance_to(&candidate.position);
            MutexGuard::unlocked(&mut index, || {
                self.apply_engagement(actor, &candidate.handle, strike, distance, msg);
            });
        }
    }
}
