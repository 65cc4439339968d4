//! Secondary defense - block, dodge and counterattack
//!
//! Only a defender holding a weapon can contest, and the weapon type picks
//! the contest (see [`WeaponType::defense_contest`]). Scores:
//!
//! - defense: `(skill_mod * 6.5 + centered * 1.5) ^ 4.9`, reduced by the
//!   defender's shock debuff
//! - offense: `(accuracy * 1.2 + weapon_accuracy - blind * 50) ^ 6`, or 0
//!   when `accuracy + weapon_accuracy + blind` is negative
//!
//! The contest succeeds on a percentile roll below
//! `round(defense / (defense + offense) * 100)`.
//!
//! [`WeaponType::defense_contest`]: crate::equipment::WeaponType::defense_contest

use super::HitInputs;
use crate::env::{CombatRng, VisualEffect};
use crate::equipment::DefenseContest;
use crate::object::{CombatState, Creature};

/// Highest block / dodge / counterattack skill mod that counts
pub const SECONDARY_DEFENSE_CAP: i32 = 85;

impl From<DefenseContest> for VisualEffect {
    fn from(contest: DefenseContest) -> Self {
        match contest {
            DefenseContest::Block => VisualEffect::Block,
            DefenseContest::Dodge => VisualEffect::Dodge,
            DefenseContest::CounterAttack => VisualEffect::CounterAttack,
        }
    }
}

/// Percent chance for a defender with `skill_mod` to win the contest
pub fn contest_chance(
    skill_mod: i32,
    centered_bonus: i32,
    defender_bf_ratio: f32,
    attacker_accuracy: i32,
    weapon_accuracy: f32,
    attacker_blinded: bool,
) -> i32 {
    let skill_mod = skill_mod.min(SECONDARY_DEFENSE_CAP) as f64;
    let blind = if attacker_blinded { 1.0 } else { 0.0 };

    let mut defense = (skill_mod * 6.5 + centered_bonus as f64 * 1.5).max(0.0).powf(4.9);
    defense -= defense * defender_bf_ratio as f64;

    let accuracy = attacker_accuracy as f64;
    let weapon_accuracy = weapon_accuracy as f64;
    let offense = if accuracy + weapon_accuracy + blind >= 0.0 {
        (accuracy * 1.2 + weapon_accuracy - blind * 50.0).powi(6)
    } else {
        0.0
    };

    let total = defense + offense;
    if total <= 0.0 {
        return 0;
    }
    (defense / total * 100.0).round() as i32
}

/// Roll the defender's secondary defense, if it has one
///
/// `inputs` are the hit-roll terms already gathered for this attack.
pub fn secondary_defense(
    target: &Creature,
    inputs: &HitInputs,
    rng: &dyn CombatRng,
) -> Option<DefenseContest> {
    if target.status.has(CombatState::Intimidated) {
        return None;
    }
    let contest = target.weapon.as_ref()?.weapon_type.defense_contest()?;

    let skill_mod = target.skill_mod(contest.skill_mod());
    if skill_mod == 0 {
        return None;
    }

    let chance = contest_chance(
        skill_mod,
        target.skill_mod("centered_bonus"),
        target.bf_ratio(),
        inputs.attacker_accuracy,
        inputs.weapon_accuracy(),
        inputs.attacker_blinded,
    );

    if rng.percentile() < chance {
        Some(contest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::equipment::{Weapon, WeaponType};
    use crate::object::PlayerData;
    use crate::types::{Faction, ObjectId};

    fn defender(weapon_type: WeaponType, skill_mod: &str, value: i32) -> Creature {
        Creature::player(ObjectId(2), "Luke", PlayerData::new(Faction::Rebel))
            .with_weapon(Weapon::new("w", weapon_type, 10.0, 20.0))
            .with_skill_mod(skill_mod, value)
    }

    #[test]
    fn test_contest_chance_extremes() {
        // No offense at all: defender always wins
        assert_eq!(contest_chance(50, 0, 0.0, -100, 0.0, false), 100);
        // No defense skill: never wins
        assert_eq!(contest_chance(0, 0, 0.0, 50, 7.0, false), 0);
        // Full shock debuff wipes out defense
        assert_eq!(contest_chance(85, 0, 1.0, 50, 7.0, false), 0);
    }

    #[test]
    fn test_contest_cap() {
        assert_eq!(
            contest_chance(200, 0, 0.0, 100, 7.0, false),
            contest_chance(85, 0, 0.0, 100, 7.0, false)
        );
    }

    #[test]
    fn test_contest_selection_by_weapon() {
        let inputs = HitInputs {
            attacker_accuracy: -100,
            ..Default::default()
        };
        let rng = ScriptedRng::constant(0);

        let blocker = defender(WeaponType::Polearm, "block", 40);
        assert_eq!(
            secondary_defense(&blocker, &inputs, &rng),
            Some(DefenseContest::Block)
        );

        let dodger = defender(WeaponType::Pistol, "dodge", 40);
        assert_eq!(
            secondary_defense(&dodger, &inputs, &rng),
            Some(DefenseContest::Dodge)
        );

        let counter = defender(WeaponType::Carbine, "counterattack", 40);
        assert_eq!(
            secondary_defense(&counter, &inputs, &rng),
            Some(DefenseContest::CounterAttack)
        );

        // Wrong skill for the weapon
        let mismatched = defender(WeaponType::Rifle, "dodge", 40);
        assert_eq!(secondary_defense(&mismatched, &inputs, &rng), None);
    }

    #[test]
    fn test_no_contest_when_unarmed_or_intimidated() {
        let inputs = HitInputs {
            attacker_accuracy: -100,
            ..Default::default()
        };
        let rng = ScriptedRng::constant(0);

        let unarmed = Creature::player(ObjectId(3), "Chewie", PlayerData::new(Faction::Rebel))
            .with_skill_mod("block", 80);
        assert_eq!(secondary_defense(&unarmed, &inputs, &rng), None);

        let mut scared = defender(WeaponType::Polearm, "block", 80);
        scared.status.apply(CombatState::Intimidated, 0, 1000);
        assert_eq!(secondary_defense(&scared, &inputs, &rng), None);
        assert_eq!(rng.consumed(), 0);
    }
}
