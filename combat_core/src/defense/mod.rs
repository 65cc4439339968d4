//! Defense resolution - whether an attack connects
//!
//! Two stages:
//! 1. Hit roll against [`hit_chance`], built from attacker accuracy, range
//!    band accuracy, posture and the target's defense skill mods
//! 2. Secondary defense: a block / dodge / counterattack contest that can
//!    still turn a hit aside

mod accuracy;
mod secondary;

pub use accuracy::{
    attacker_accuracy, hit_chance, posture_modifier, target_defense, weapon_range_accuracy,
    HitInputs, UNARMED_RANGES,
};
pub use secondary::{contest_chance, secondary_defense, SECONDARY_DEFENSE_CAP};
