//! Hit chance
//!
//! Formula:
//! `chance = base + (accuracy + range_accuracy + posture + bonus + stun_bonus
//!           - defense - blind_penalty) / 2`, clamped to `[0, 100]` and rounded.
//!
//! `stun_bonus` is 50 against a stunned target, `blind_penalty` is 50 for a
//! blinded attacker.

use crate::equipment::{RangeBands, Weapon};
use crate::object::{CombatState, Creature};
use crate::types::Posture;

/// Range bands used when fighting bare-handed
pub const UNARMED_RANGES: RangeBands = RangeBands {
    point_blank: 0.0,
    ideal: 2.0,
    max: 5.0,
    point_blank_accuracy: 7.0,
    ideal_accuracy: 7.0,
    max_accuracy: 7.0,
};

const STATE_BONUS: f32 = 50.0;

/// Accuracy modifier for attacking at `distance`
///
/// Linear between point-blank and ideal range, then between ideal and max
/// range. Past max range the last band is extrapolated.
pub fn weapon_range_accuracy(distance: f32, weapon: Option<&Weapon>) -> f32 {
    let bands = weapon.map_or(&UNARMED_RANGES, |w| &w.ranges);

    let (near, far, near_acc, far_acc) = if distance > bands.ideal {
        (bands.ideal, bands.max, bands.ideal_accuracy, bands.max_accuracy)
    } else {
        (
            bands.point_blank,
            bands.ideal,
            bands.point_blank_accuracy,
            bands.ideal_accuracy,
        )
    };

    let span = far - near;
    if span <= 0.0 {
        return far_acc;
    }
    near_acc + (distance - near) / span * (far_acc - near_acc)
}

/// Accuracy shift from both combatants' stances
///
/// Close-quarters weapons (melee, unarmed, sabers) gain against a low target
/// and lose when the attacker is low; ranged weapons the reverse.
pub fn posture_modifier(close_quarters: bool, attacker: Posture, target: Posture) -> i32 {
    let sign = if close_quarters { 1 } else { -1 };

    let target_mod = match target {
        Posture::Kneeled => 16,
        Posture::Prone => 25,
        _ => 0,
    };
    let attacker_mod = match attacker {
        Posture::Kneeled => -16,
        Posture::Prone => -50,
        _ => 0,
    };

    sign * (target_mod + attacker_mod)
}

/// Accuracy skill mod for the attacker's weapon type
pub fn attacker_accuracy(attacker: &Creature) -> i32 {
    attacker.skill_mod(attacker.weapon_type().accuracy_mod())
}

/// Effective defense of `target` against the attacker's weapon
///
/// Force attacks are defended by `force_defense`. Autonomous creatures
/// defend with their level, capped at 250. Players use `melee_defense` or
/// `ranged_defense`. The shock debuff always applies.
pub fn target_defense(weapon: Option<&Weapon>, target: &Creature, force_attack: bool) -> i32 {
    let defense = if force_attack {
        target.skill_mod("force_defense")
    } else if target.is_autonomous() {
        target.level.min(250)
    } else if weapon.is_some_and(|w| w.is_ranged()) {
        target.skill_mod("ranged_defense")
    } else {
        target.skill_mod("melee_defense")
    };
    target.shock_reduced(defense.max(0))
}

/// Every term of the hit-chance formula
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitInputs {
    pub attacker_accuracy: i32,
    pub range_accuracy: f32,
    pub posture: i32,
    pub accuracy_bonus: i32,
    pub target_defense: i32,
    pub target_stunned: bool,
    pub attacker_blinded: bool,
}

impl HitInputs {
    /// Gather the terms for `attacker` striking `target` from `distance`
    pub fn gather(
        attacker: &Creature,
        target: &Creature,
        distance: f32,
        accuracy_bonus: i32,
        force_attack: bool,
    ) -> Self {
        let weapon = attacker.weapon.as_ref();
        let close_quarters = weapon.map_or(true, Weapon::fights_up_close);
        HitInputs {
            attacker_accuracy: attacker_accuracy(attacker),
            range_accuracy: weapon_range_accuracy(distance, weapon),
            posture: posture_modifier(close_quarters, attacker.posture, target.posture),
            accuracy_bonus,
            target_defense: target_defense(weapon, target, force_attack),
            target_stunned: target.status.has(CombatState::Stunned),
            attacker_blinded: attacker.status.has(CombatState::Blinded),
        }
    }

    /// Range band accuracy plus posture, as used by the secondary contest
    pub fn weapon_accuracy(&self) -> f32 {
        self.range_accuracy + self.posture as f32
    }
}

/// Percent chance to hit, in `[0, 100]`
pub fn hit_chance(base_chance: f32, inputs: &HitInputs) -> i32 {
    let stun_bonus = if inputs.target_stunned { STATE_BONUS } else { 0.0 };
    let blind_penalty = if inputs.attacker_blinded { STATE_BONUS } else { 0.0 };

    let total = base_chance
        + (inputs.attacker_accuracy as f32
            + inputs.range_accuracy
            + inputs.posture as f32
            + inputs.accuracy_bonus as f32
            + stun_bonus
            - inputs.target_defense as f32
            - blind_penalty)
            / 2.0;

    (total.clamp(0.0, 100.0) + 0.5) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::WeaponType;
    use crate::object::{AutonomousData, PlayerData};
    use crate::types::{Faction, ObjectId};

    const EPSILON: f32 = 1e-4;

    fn rifle() -> Weapon {
        let mut rifle = Weapon::new("e11", WeaponType::Rifle, 50.0, 150.0);
        rifle.ranges = RangeBands {
            point_blank: 0.0,
            ideal: 40.0,
            max: 64.0,
            point_blank_accuracy: -10.0,
            ideal_accuracy: 30.0,
            max_accuracy: 0.0,
        };
        rifle
    }

    #[test]
    fn test_unarmed_range_accuracy_is_flat() {
        for d in [0.0, 1.0, 2.0, 4.0, 10.0] {
            assert!((weapon_range_accuracy(d, None) - 7.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_range_accuracy_interpolates() {
        let rifle = rifle();
        assert!((weapon_range_accuracy(0.0, Some(&rifle)) + 10.0).abs() < EPSILON);
        assert!((weapon_range_accuracy(20.0, Some(&rifle)) - 10.0).abs() < EPSILON);
        assert!((weapon_range_accuracy(40.0, Some(&rifle)) - 30.0).abs() < EPSILON);
        assert!((weapon_range_accuracy(52.0, Some(&rifle)) - 15.0).abs() < EPSILON);
    }

    #[test]
    fn test_degenerate_bands_do_not_divide_by_zero() {
        let mut knife = Weapon::new("knife", WeaponType::OneHanded, 5.0, 10.0);
        knife.ranges = RangeBands {
            point_blank: 3.0,
            ideal: 3.0,
            max: 3.0,
            point_blank_accuracy: 1.0,
            ideal_accuracy: 4.0,
            max_accuracy: 9.0,
        };
        let acc = weapon_range_accuracy(3.0, Some(&knife));
        assert!(acc.is_finite());
        assert!((acc - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_posture_modifier_signs() {
        assert_eq!(posture_modifier(true, Posture::Upright, Posture::Kneeled), 16);
        assert_eq!(posture_modifier(false, Posture::Upright, Posture::Kneeled), -16);
        assert_eq!(posture_modifier(true, Posture::Upright, Posture::Prone), 25);
        assert_eq!(posture_modifier(false, Posture::Prone, Posture::Upright), 50);
        assert_eq!(posture_modifier(true, Posture::Prone, Posture::Upright), -50);
        assert_eq!(posture_modifier(true, Posture::Kneeled, Posture::Kneeled), 0);
        assert_eq!(posture_modifier(true, Posture::Upright, Posture::KnockedDown), 0);
    }

    #[test]
    fn test_base_hit_chance() {
        assert_eq!(hit_chance(66.0, &HitInputs::default()), 66);
    }

    #[test]
    fn test_hit_chance_clamps() {
        let strong = HitInputs {
            attacker_accuracy: 500,
            ..Default::default()
        };
        assert_eq!(hit_chance(66.0, &strong), 100);

        let hopeless = HitInputs {
            target_defense: 500,
            attacker_blinded: true,
            ..Default::default()
        };
        assert_eq!(hit_chance(66.0, &hopeless), 0);
    }

    #[test]
    fn test_stun_and_blind_cancel() {
        let inputs = HitInputs {
            target_stunned: true,
            attacker_blinded: true,
            ..Default::default()
        };
        assert_eq!(hit_chance(66.0, &inputs), 66);

        let stunned = HitInputs {
            target_stunned: true,
            ..Default::default()
        };
        assert_eq!(hit_chance(66.0, &stunned), 91);
    }

    #[test]
    fn test_target_defense_sources() {
        let npc = Creature::autonomous(ObjectId(2), "krayt", AutonomousData::default())
            .with_level(400)
            .with_skill_mod("force_defense", 30);
        assert_eq!(target_defense(None, &npc, false), 250);
        assert_eq!(target_defense(None, &npc, true), 30);

        let mut player = Creature::player(ObjectId(1), "Leia", PlayerData::new(Faction::Rebel))
            .with_skill_mod("melee_defense", 40)
            .with_skill_mod("ranged_defense", 80);
        let rifle = rifle();
        assert_eq!(target_defense(None, &player, false), 40);
        assert_eq!(target_defense(Some(&rifle), &player, false), 80);

        player.shock_wounds = 750;
        assert_eq!(target_defense(Some(&rifle), &player, false), 40);
    }
}
