//! Action cost and attack speed
//!
//! Cost per pool: `multiplier * weapon_factor * (1 - attribute / 1500)`,
//! floored at 0. Strength discounts health, quickness action, focus mind.
//!
//! Speed: `(1 - speed_mod / 100) * speed_ratio * weapon_speed`, at least 1.

use crate::config::UnarmedConstants;
use crate::equipment::WeaponCosts;
use crate::object::Creature;
use crate::skill::{CostMultipliers, Skill};
use crate::types::HamPool;

const ATTRIBUTE_SCALE: f32 = 1500.0;
const MIN_ATTACK_SPEED: f32 = 1.0;

/// Resolved cost of one action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCost {
    pub health: i32,
    pub action: i32,
    pub mind: i32,
    pub force: i32,
}

fn weapon_costs(actor: &Creature, unarmed: &UnarmedConstants) -> WeaponCosts {
    match &actor.weapon {
        Some(weapon) => weapon.costs.clone(),
        None => WeaponCosts {
            health: unarmed.health_cost,
            action: unarmed.action_cost,
            mind: unarmed.mind_cost,
            force: 0.0,
        },
    }
}

/// What `multipliers` would cost `actor`, without deducting anything
pub fn action_cost(actor: &Creature, multipliers: &CostMultipliers, unarmed: &UnarmedConstants) -> ActionCost {
    let factors = weapon_costs(actor, unarmed);
    let pool_cost = |pool: HamPool, multiplier: f32, factor: f32| -> i32 {
        let discount = 1.0 - actor.attributes.for_pool(pool) as f32 / ATTRIBUTE_SCALE;
        ((multiplier * factor * discount) as i32).max(0)
    };

    ActionCost {
        health: pool_cost(HamPool::Health, multipliers.health, factors.health),
        action: pool_cost(HamPool::Action, multipliers.action, factors.action),
        mind: pool_cost(HamPool::Mind, multipliers.mind, factors.mind),
        force: ((multipliers.force * factors.force) as i32).max(0),
    }
}

/// Deduct the cost of an action if `actor` can pay it
///
/// Only players pay. HAM is deducted all-or-nothing; force is deducted
/// afterwards and may fail on its own, leaving the HAM spent.
pub fn afford_action(actor: &mut Creature, multipliers: &CostMultipliers, unarmed: &UnarmedConstants) -> bool {
    if !actor.is_player() {
        return true;
    }
    let cost = action_cost(actor, multipliers, unarmed);

    if !actor.ham.change_bars(cost.health, cost.action, cost.mind) {
        return false;
    }

    match actor.player_data_mut() {
        Some(player) => player.spend_force(cost.force),
        None => true,
    }
}

/// Seconds `skill` occupies `actor`
pub fn attack_speed(actor: &Creature, skill: &Skill, unarmed: &UnarmedConstants) -> f32 {
    let weapon_speed = actor
        .weapon
        .as_ref()
        .map_or(unarmed.attack_speed, |w| w.attack_speed);

    let speed_mod: i32 = if actor.is_player() {
        actor
            .weapon_type()
            .speed_mods()
            .iter()
            .map(|name| actor.skill_mod(name))
            .sum()
    } else {
        0
    };

    ((1.0 - speed_mod as f32 / 100.0) * skill.speed_ratio * weapon_speed).max(MIN_ATTACK_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::{Weapon, WeaponType};
    use crate::object::{Attributes, AutonomousData, Ham, PlayerData};
    use crate::types::{Faction, ObjectId};

    fn player() -> Creature {
        Creature::player(ObjectId(1), "Lando", PlayerData::new(Faction::Neutral))
    }

    fn action_only(action: f32) -> CostMultipliers {
        CostMultipliers {
            action,
            ..Default::default()
        }
    }

    #[test]
    fn test_unarmed_cost_with_attribute_discount() {
        let unarmed = UnarmedConstants::default();
        let actor = player().with_attributes(Attributes {
            strength: 0,
            quickness: 750,
            focus: 0,
        });
        let cost = action_cost(&actor, &action_only(2.0), &unarmed);
        // 2 * 25 * 0.5
        assert_eq!(cost.action, 25);
        assert_eq!(cost.health, 0);
        assert_eq!(cost.force, 0);
    }

    #[test]
    fn test_huge_attribute_floors_at_zero() {
        let unarmed = UnarmedConstants::default();
        let actor = player().with_attributes(Attributes {
            strength: 3000,
            quickness: 3000,
            focus: 3000,
        });
        let multipliers = CostMultipliers {
            health: 1.0,
            action: 1.0,
            mind: 1.0,
            force: 0.0,
        };
        assert_eq!(action_cost(&actor, &multipliers, &unarmed), ActionCost::default());
    }

    #[test]
    fn test_unaffordable_is_atomic() {
        let unarmed = UnarmedConstants::default();
        let mut actor = player().with_ham(Ham::new(100, 20, 100));
        let multipliers = CostMultipliers {
            health: 1.0,
            action: 1.0,
            mind: 1.0,
            force: 0.0,
        };
        assert!(!afford_action(&mut actor, &multipliers, &unarmed));
        assert_eq!(actor.ham, Ham::new(100, 20, 100));
    }

    #[test]
    fn test_autonomous_always_affords() {
        let unarmed = UnarmedConstants::default();
        let mut npc = Creature::autonomous(ObjectId(2), "stormtrooper", AutonomousData::default())
            .with_ham(Ham::uniform(1));
        assert!(afford_action(&mut npc, &action_only(100.0), &unarmed));
        assert_eq!(npc.ham, Ham::uniform(1));
    }

    #[test]
    fn test_force_shortfall_keeps_ham_spent() {
        let unarmed = UnarmedConstants::default();
        let mut saber = Weapon::new("saber", WeaponType::OneHandSaber, 100.0, 200.0);
        saber.costs.force = 10.0;
        let mut actor = player().with_weapon(saber);
        if let Some(p) = actor.player_data_mut() {
            p.force = 5;
        }
        let multipliers = CostMultipliers {
            action: 1.0,
            force: 1.0,
            ..Default::default()
        };
        assert!(!afford_action(&mut actor, &multipliers, &unarmed));
        assert_eq!(actor.ham.action.current, 975);
        assert_eq!(actor.player_data().unwrap().force, 5);
    }

    #[test]
    fn test_attack_speed() {
        let unarmed = UnarmedConstants::default();
        let skill = Skill::basic_attack();

        let brawler = player().with_skill_mod("unarmed_speed", 25);
        assert!((attack_speed(&brawler, &skill, &unarmed) - 1.5).abs() < 1e-5);

        let mut flamer = Weapon::new("flamer", WeaponType::FlameThrower, 1.0, 2.0);
        flamer.attack_speed = 4.0;
        let trooper = player()
            .with_weapon(flamer)
            .with_skill_mod("heavy_flame_thrower_speed", 10)
            .with_skill_mod("heavyweapon_speed", 15);
        assert!((attack_speed(&trooper, &skill, &unarmed) - 3.0).abs() < 1e-5);

        let fast = player().with_skill_mod("unarmed_speed", 90);
        assert!((attack_speed(&fast, &skill, &unarmed) - 1.0).abs() < 1e-5);

        // Autonomous creatures ignore speed mods
        let npc = Creature::autonomous(ObjectId(3), "npc", AutonomousData::default())
            .with_skill_mod("unarmed_speed", 50);
        assert!((attack_speed(&npc, &skill, &unarmed) - 2.0).abs() < 1e-5);
    }
}
