//! Damage resolution
//!
//! Order of operations for a creature target:
//! 1. Roll base damage (weapon or bare hands), mitigated by the target's
//!    highest mitigation tier, scaled by the skill's damage ratio and the
//!    player damage multipliers
//! 2. Hit roll, then secondary defense (block halves, dodge and
//!    counterattack miss)
//! 3. Split across the affected pools; each share is scaled by
//!    [`damage_reduction`] and applied to a body location through armor
//! 4. Weapon damage-over-time slots

mod application;
mod armor;
mod calculation;
mod dot;

pub use application::{apply_damage, ApplyContext};
pub use armor::{armor_reduction, scale_for_piercing, PIERCING_STEP, RESISTANCE_STEP};
pub use calculation::{
    affected_pools, base_damage_range, damage_multiplier, damage_reduction, location_for,
    mitigate, mitigation_percent, roll_in_range, INTIMIDATED_DAMAGE_FACTOR,
    KNOCKDOWN_DAMAGE_FACTOR,
};
pub use dot::apply_damage_over_time;

use crate::defense::{hit_chance, secondary_defense, HitInputs};
use crate::env::CombatEnv;
use crate::equipment::{DefenseContest, Weapon, WeaponCategory};
use crate::object::{Creature, Notice, ObjectState};
use crate::skill::AttackSkill;

/// Returned by [`compute_damage`] when the attack missed
pub const MISS: i32 = -1;

/// One attack's damage inputs
pub struct DamageContext<'a> {
    pub env: &'a CombatEnv,
    pub skill: &'a str,
    pub attack: &'a AttackSkill,
    /// Attacker-to-target distance
    pub distance: f32,
    /// Secondary target of an area skill
    pub area_hit: bool,
}

/// Resolve one attack against `target`
///
/// Returns [`MISS`] for a miss (the attacker has already been told), else
/// the damage dealt after armor. Destructible objects are not hit-rolled;
/// the returned amount is for the caller to apply to their condition.
pub fn compute_damage(ctx: &DamageContext<'_>, attacker: &mut Creature, target: &mut ObjectState) -> i32 {
    match target {
        ObjectState::Creature(creature) => damage_creature(ctx, attacker, creature),
        ObjectState::Destructible(_) => damage_object(ctx, attacker),
    }
}

fn rolled_damage(ctx: &DamageContext<'_>, attacker: &Creature, target: Option<&Creature>) -> f32 {
    let constants = &ctx.env.constants;
    let (min, max) = base_damage_range(attacker, &constants.unarmed);

    let (min, max) = match target {
        Some(target) => {
            let category = attacker
                .weapon
                .as_ref()
                .map_or(WeaponCategory::Melee, Weapon::category);
            mitigate(min, max, mitigation_percent(target, category))
        }
        None => (min, max),
    };

    let target_is_player = target.is_some_and(Creature::is_player);
    roll_in_range(min, max, ctx.env.rng.as_ref())
        * ctx.attack.damage_ratio
        * damage_multiplier(attacker.is_player(), target_is_player, &constants.damage)
}

fn damage_object(ctx: &DamageContext<'_>, attacker: &Creature) -> i32 {
    rolled_damage(ctx, attacker, None) as i32
}

fn record_miss(ctx: &DamageContext<'_>, attacker: &mut Creature, target: &mut Creature) {
    let spam = Notice::CombatSpam {
        attacker: attacker.id,
        defender: target.id,
        key: ctx.attack.combat_spam_miss.clone(),
        damage: 0,
    };
    attacker.notify(spam.clone());
    target.notify(spam);
    attacker.notify(Notice::FlyText {
        subject: target.id,
        file: "combat_effects",
        key: "miss".to_string(),
    });
}

fn damage_creature(ctx: &DamageContext<'_>, attacker: &mut Creature, target: &mut Creature) -> i32 {
    let env = ctx.env;
    let rng = env.rng.as_ref();

    let mut damage = rolled_damage(ctx, attacker, Some(&*target));

    let inputs = HitInputs::gather(
        attacker,
        target,
        ctx.distance,
        ctx.attack.accuracy_bonus,
        ctx.attack.force_attack,
    );
    if rng.percentile() >= hit_chance(env.constants.hit.base_chance, &inputs) {
        record_miss(ctx, attacker, target);
        return MISS;
    }

    if let Some(contest) = secondary_defense(target, &inputs, rng) {
        env.broadcaster
            .visual_effect(target.id, attacker.id, contest.into());
        match contest {
            DefenseContest::Block => damage /= 2.0,
            DefenseContest::Dodge | DefenseContest::CounterAttack => {
                record_miss(ctx, attacker, target);
                return MISS;
            }
        }
    }

    let pools = affected_pools(&ctx.attack.pool_chances, ctx.attack.random_pool_hit, rng);
    let share = damage / pools.len() as f32;
    let apply_ctx = ApplyContext {
        skill: ctx.skill,
        unarmed: &env.constants.unarmed,
        rng,
    };

    let mut total = 0;
    for pool in pools {
        let location = location_for(pool, rng);
        let portion = damage_reduction(target.posture, attacker, share) as i32;
        let reduction = apply_damage(&apply_ctx, attacker, target, portion, location);
        let dealt = (portion - reduction).max(0);
        total += dealt;

        if let Some(key) = &ctx.attack.combat_spam_hit {
            attacker.notify(Notice::CombatSpam {
                attacker: attacker.id,
                defender: target.id,
                key: key.clone(),
                damage: dealt,
            });
        }
    }

    if let Some(weapon) = attacker.weapon.as_mut() {
        apply_damage_over_time(weapon, target, ctx.area_hit, env.now_ms(), rng);
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConstants;
    use crate::env::{BroadcastLog, ScriptedRng, VisualEffect};
    use crate::equipment::WeaponType;
    use crate::object::{AutonomousData, Destructible, PlayerData};
    use crate::skill::{PoolChances, Skill};
    use crate::types::{Faction, HamPool, ObjectId, Posture};
    use std::sync::Arc;

    fn env_with(rolls: Vec<u32>) -> (CombatEnv, Arc<BroadcastLog>) {
        let log = Arc::new(BroadcastLog::new());
        let env = CombatEnv::new(CombatConstants::default())
            .with_rng(Arc::new(ScriptedRng::new(rolls)))
            .with_broadcaster(log.clone());
        (env, log)
    }

    fn health_attack() -> AttackSkill {
        let mut attack = Skill::basic_attack().attack().cloned().unwrap();
        attack.random_pool_hit = false;
        attack.pool_chances = PoolChances {
            health: 100,
            action: 0,
            mind: 0,
        };
        attack
    }

    fn brawler() -> Creature {
        Creature::autonomous(ObjectId(1), "brawler", AutonomousData::default())
            .with_skill_mod("unarmed_damage", 10)
    }

    fn dummy() -> ObjectState {
        Creature::autonomous(ObjectId(2), "dummy", AutonomousData::default())
            .with_level(0)
            .into()
    }

    #[test]
    fn test_unarmed_hit_lands_in_range() {
        // damage roll 15 -> 25, hit roll 0, chest, no wound
        let (env, _) = env_with(vec![15, 0, 0, 99]);
        let attack = health_attack();
        let ctx = DamageContext {
            env: &env,
            skill: "attack",
            attack: &attack,
            distance: 1.0,
            area_hit: false,
        };
        let mut attacker = brawler();
        let mut target = dummy();

        let dealt = compute_damage(&ctx, &mut attacker, &mut target);
        assert_eq!(dealt, 25);
        let creature = target.as_creature().unwrap();
        assert_eq!(creature.ham.current(HamPool::Health), 975);
    }

    #[test]
    fn test_miss_returns_sentinel() {
        // damage roll, then hit roll 99
        let (env, _) = env_with(vec![0, 99]);
        let attack = health_attack();
        let ctx = DamageContext {
            env: &env,
            skill: "attack",
            attack: &attack,
            distance: 1.0,
            area_hit: false,
        };
        let mut attacker = brawler();
        let mut target = dummy();
        assert_eq!(compute_damage(&ctx, &mut attacker, &mut target), MISS);
        assert_eq!(target.as_creature().unwrap().ham, crate::object::Ham::default());
    }

    #[test]
    fn test_knocked_down_target_takes_more() {
        let (env, _) = env_with(vec![0, 0, 0, 99]);
        let attack = health_attack();
        let ctx = DamageContext {
            env: &env,
            skill: "attack",
            attack: &attack,
            distance: 1.0,
            area_hit: false,
        };
        let mut attacker = brawler().with_skill_mod("unarmed_damage", 100);
        let mut target = dummy();
        if let Some(c) = target.as_creature_mut() {
            c.posture = Posture::KnockedDown;
        }
        // 100 * 1.33
        assert_eq!(compute_damage(&ctx, &mut attacker, &mut target), 133);
    }

    #[test]
    fn test_block_halves_and_dodge_misses() {
        let attack = health_attack();
        let blocker = |weapon_type, skill_mod: &str| -> ObjectState {
            Creature::player(ObjectId(2), "guard", PlayerData::new(Faction::Imperial))
                .with_weapon(Weapon::new("w", weapon_type, 1.0, 2.0))
                .with_skill_mod(skill_mod, 85)
                .into()
        };

        // damage roll 0 -> 100, hit 0, contest 0 wins, chest, no wound
        let (env, log) = env_with(vec![0, 0, 0, 0, 99]);
        let ctx = DamageContext {
            env: &env,
            skill: "attack",
            attack: &attack,
            distance: 1.0,
            area_hit: false,
        };
        let mut attacker = brawler()
            .with_skill_mod("unarmed_damage", 100)
            .with_skill_mod("unarmed_accuracy", -100);
        let mut target = blocker(WeaponType::Polearm, "block");
        assert_eq!(compute_damage(&ctx, &mut attacker, &mut target), 50);
        assert_eq!(log.effects(), vec![(ObjectId(2), ObjectId(1), VisualEffect::Block)]);

        let (env, log) = env_with(vec![90, 0, 0]);
        let ctx = DamageContext { env: &env, ..ctx };
        let mut target = blocker(WeaponType::Pistol, "dodge");
        assert_eq!(compute_damage(&ctx, &mut attacker, &mut target), MISS);
        assert_eq!(log.effects()[0].2, VisualEffect::Dodge);
    }

    #[test]
    fn test_destructible_skips_hit_roll() {
        let (env, _) = env_with(vec![5]);
        let attack = health_attack();
        let ctx = DamageContext {
            env: &env,
            skill: "attack",
            attack: &attack,
            distance: 1.0,
            area_hit: false,
        };
        let mut attacker = brawler();
        let mut turret: ObjectState = Destructible::new(ObjectId(9), "turret", 500).into();
        assert_eq!(compute_damage(&ctx, &mut attacker, &mut turret), 15);
    }
}
