//! Damage over time from weapon slots

use crate::env::CombatRng;
use crate::equipment::{Weapon, MAX_DOT_SLOTS};
use crate::object::{ActiveDot, Creature};

/// Roll each loaded DOT slot of `weapon` against `target`
///
/// A slot lands when a percentile roll is below its potency minus the
/// target's resistance to that kind. Every loaded slot spends one use on a
/// single-target hit, landed or not; area hits spend nothing. Returns how
/// many slots landed.
pub fn apply_damage_over_time(
    weapon: &mut Weapon,
    target: &mut Creature,
    area_hit: bool,
    now: u64,
    rng: &dyn CombatRng,
) -> usize {
    let mut landed = 0;
    let mut spent = false;

    for slot in weapon.dots.iter_mut().take(MAX_DOT_SLOTS) {
        if slot.uses == 0 {
            continue;
        }
        let resistance = target.skill_mod(slot.kind.resistance_mod());
        if rng.percentile() < slot.potency - resistance {
            target.status.apply_dot(ActiveDot {
                kind: slot.kind,
                strength: slot.strength,
                pool: slot.attribute,
                expires_at: now.saturating_add(slot.duration_ms),
            });
            landed += 1;
        }

        if !area_hit {
            slot.uses -= 1;
            spent |= slot.uses == 0;
        }
    }

    if spent {
        weapon.updated = true;
    }
    landed
}
