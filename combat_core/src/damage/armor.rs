//! Armor reduction
//!
//! Stage one compares weapon armor piercing to the armor resistance level
//! (`rating / 16`, or an autonomous creature's intrinsic armor):
//! - every level piercing exceeds resistance: damage x 1.25
//! - every level resistance exceeds piercing: damage x 0.5
//!
//! Stage two subtracts the resistance percentage for the weapon's damage type.
//!
//! Reduction = original - final. It is negative when piercing amplified the hit.

use crate::equipment::Weapon;
use crate::object::{Creature, CreatureKind};
use crate::types::{BodyLocation, DamageType};

pub const PIERCING_STEP: f32 = 1.25;
pub const RESISTANCE_STEP: f32 = 0.5;

/// Damage after the piercing-vs-resistance comparison
pub fn scale_for_piercing(damage: f32, armor_piercing: i32, armor_resistance: i32) -> f32 {
    if armor_piercing > armor_resistance {
        damage * PIERCING_STEP.powi(armor_piercing - armor_resistance)
    } else if armor_piercing < armor_resistance {
        damage * RESISTANCE_STEP.powi(armor_resistance - armor_piercing)
    } else {
        damage
    }
}

/// Amount of `damage` absorbed at `location`; may be negative
pub fn armor_reduction(
    weapon: Option<&Weapon>,
    unarmed_piercing: i32,
    target: &Creature,
    damage: i32,
    location: BodyLocation,
) -> i32 {
    let damage_type = weapon.map_or(DamageType::Kinetic, |w| w.damage_type);
    let armor_piercing = weapon.map_or(unarmed_piercing, |w| w.armor_piercing);

    let (resistance, resist) = match (target.armor.at(location), &target.kind) {
        (Some(armor), _) => (armor.armor_resistance(), armor.resists.against(damage_type)),
        (None, CreatureKind::Autonomous(npc)) => (npc.armor, npc.resists.against(damage_type)),
        (None, CreatureKind::Player(_)) => (0, 0.0),
    };

    let mut current = scale_for_piercing(damage as f32, armor_piercing, resistance);
    current -= current * resist / 100.0;

    damage - current as i32
}
