//! Raw damage: base range, mitigation, multipliers and distribution

use crate::config::{DamageConstants, UnarmedConstants};
use crate::env::CombatRng;
use crate::equipment::WeaponCategory;
use crate::object::{CombatState, Creature};
use crate::skill::PoolChances;
use crate::types::{BodyLocation, HamPool, Posture};

/// Knocked-down targets take extra damage
pub const KNOCKDOWN_DAMAGE_FACTOR: f32 = 1.33;
/// Intimidated attackers deal less
pub const INTIMIDATED_DAMAGE_FACTOR: f32 = 0.8;

/// Damage range before mitigation
///
/// Weapons use their own range (halved when uncertified). Bare hands deal
/// `unarmed_damage` up to `unarmed_damage + spread`.
pub fn base_damage_range(attacker: &Creature, unarmed: &UnarmedConstants) -> (f32, f32) {
    match &attacker.weapon {
        Some(weapon) => weapon.damage_range(),
        None => {
            let min = attacker.skill_mod("unarmed_damage") as f32;
            (min, min + unarmed.damage_spread)
        }
    }
}

/// Highest mitigation tier the target holds against a weapon category
pub fn mitigation_percent(target: &Creature, category: WeaponCategory) -> i32 {
    let tiers: &[&str] = match category {
        WeaponCategory::Melee => &[
            "melee_damage_mitigation_3",
            "melee_damage_mitigation_2",
            "melee_damage_mitigation_1",
        ],
        WeaponCategory::Ranged => &[
            "ranged_damage_mitigation_3",
            "ranged_damage_mitigation_2",
            "ranged_damage_mitigation_1",
        ],
        WeaponCategory::Jedi => &[],
    };
    tiers
        .iter()
        .map(|name| target.skill_mod(name))
        .find(|m| *m != 0)
        .unwrap_or(0)
}

/// Pull `max` toward `min` by the mitigation percentage
pub fn mitigate(min: f32, max: f32, mitigation: i32) -> (f32, f32) {
    if mitigation == 0 {
        return (min, max);
    }
    let fraction = 1.0 - mitigation as f32 / 100.0;
    (min, min + (max - min) * fraction)
}

/// Uniform integer roll inside `[min, max]`
pub fn roll_in_range(min: f32, max: f32, rng: &dyn CombatRng) -> f32 {
    rng.between(min as i32, max as i32) as f32
}

/// Global multiplier for player attackers, split PvP / PvE
pub fn damage_multiplier(attacker_is_player: bool, target_is_player: bool, constants: &DamageConstants) -> f32 {
    if !attacker_is_player {
        return 1.0;
    }
    let split = if target_is_player {
        constants.pvp_multiplier
    } else {
        constants.pve_multiplier
    };
    constants.global_multiplier * split
}

/// State-based scaling of one damage portion
pub fn damage_reduction(target_posture: Posture, attacker: &Creature, damage: f32) -> f32 {
    let mut damage = damage;
    if target_posture == Posture::KnockedDown {
        damage *= KNOCKDOWN_DAMAGE_FACTOR;
    }
    if attacker.status.has(CombatState::Intimidated) {
        damage *= INTIMIDATED_DAMAGE_FACTOR;
    }
    damage
}

/// Pools a hit lands on
///
/// A random-pool hit rolls one pool by weight. Otherwise every pool with a
/// non-zero weight takes a share. With no weights at all, health takes it.
pub fn affected_pools(chances: &PoolChances, random_pool_hit: bool, rng: &dyn CombatRng) -> Vec<HamPool> {
    let total = chances.total();
    if total == 0 {
        return vec![HamPool::Health];
    }
    if random_pool_hit {
        return vec![chances.pool_for_roll(rng.below(total))];
    }
    let weights = [
        (HamPool::Health, chances.health),
        (HamPool::Action, chances.action),
        (HamPool::Mind, chances.mind),
    ];
    weights
        .iter()
        .filter(|(_, w)| *w > 0)
        .map(|(pool, _)| *pool)
        .collect()
}

/// Body location struck for a pool
///
/// Health hits land on the chest half the time, otherwise on hands or an
/// arm. Action hits land on legs or feet, mind hits on the head.
pub fn location_for(pool: HamPool, rng: &dyn CombatRng) -> BodyLocation {
    match pool {
        HamPool::Health => {
            if rng.coin_flip() {
                BodyLocation::Chest
            } else {
                match rng.below(3) {
                    0 => BodyLocation::Hands,
                    1 => BodyLocation::LeftArm,
                    _ => BodyLocation::RightArm,
                }
            }
        }
        HamPool::Action => {
            if rng.coin_flip() {
                BodyLocation::Legs
            } else {
                BodyLocation::Feet
            }
        }
        HamPool::Mind => BodyLocation::Head,
    }
}
