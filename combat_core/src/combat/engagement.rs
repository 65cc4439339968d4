//! Single-target engagement
//!
//! A target skill resolves in two phases. The actor-side phase runs under
//! the actor's own lock only: immunity, range and cost checks, animation
//! choice. The engagement phase cross-locks the target on the actor's
//! behalf and applies everything that touches it. Area skills repeat the
//! engagement phase for every secondary target (see `area.rs`).

use super::{default_animation, CombatAction, CombatEngine, StateRoll};
use crate::cost::{afford_action, attack_speed};
use crate::damage::{compute_damage, DamageContext};
use crate::defense::UNARMED_RANGES;
use crate::duel::can_attack;
use crate::error::CombatError;
use crate::object::{Creature, Notice, ObjectState, WorldObject};
use crate::skill::{AttackSkill, HealSkill, Skill, SkillKind};
use crate::types::{HamPool, ObjectId};
use tracing::{debug, error, warn};

/// The skill-side inputs of one engagement
pub(super) struct Strike<'a> {
    pub skill: &'a Skill,
    pub attack: &'a AttackSkill,
    pub modifier: &'a str,
}

impl Strike<'_> {
    fn is_area(&self) -> bool {
        self.attack.area.is_some()
    }
}

impl CombatEngine {
    pub(super) fn engage_target(
        &self,
        actor: &mut Creature,
        target: Option<ObjectId>,
        skill: &Skill,
        modifier: &str,
    ) -> Result<f32, CombatError> {
        let Some(target) = target else {
            return Ok(0.0);
        };

        if target == actor.id {
            return match &skill.kind {
                SkillKind::Heal(heal) => Ok(self.heal_self(actor, skill, heal, modifier)),
                _ => Err(CombatError::InvalidTarget(target)),
            };
        }

        let handle = self.zone.require(target)?;
        if self.target_is_immune(actor, &handle)? {
            actor.notify(Notice::Info("You cannot attack an immune player.".to_string()));
            return Ok(0.0);
        }

        let attack = match &skill.kind {
            SkillKind::Heal(heal) => return self.heal_target(actor, &handle, skill, heal, modifier),
            SkillKind::Attack(attack) => attack,
            SkillKind::Posture(_) | SkillKind::Enhance(_) => {
                return Err(CombatError::UnknownSkill(skill.name.clone()))
            }
        };

        actor.stop_watching();
        actor.stop_listening();

        let Some(distance) = self.check_skill(actor, target, skill, attack)? else {
            return Ok(0.0);
        };

        let animation = match &skill.animation {
            Some(animation) => animation.clone(),
            None => default_animation(actor.weapon.as_ref(), self.env.rng.as_ref()).to_string(),
        };
        let mut msg = CombatAction::new(actor.id, animation);
        let strike = Strike {
            skill,
            attack,
            modifier,
        };

        if !self.apply_engagement(actor, &handle, &strike, distance, &mut msg) {
            return Ok(0.0);
        }
        if strike.is_area() {
            self.resolve_area(actor, target, &strike, &mut msg);
        }

        self.env.broadcaster.combat_action(&msg);
        debug!(action = %msg.summary(), "combat action");

        Ok(attack_speed(actor, skill, &self.env.constants.unarmed))
    }

    /// Brief look at the target to see whether it is a player under immunity
    fn target_is_immune(&self, actor: &Creature, handle: &WorldObject) -> Result<bool, CombatError> {
        let target = handle.cross_lock(actor.id, self.lock_wait())?;
        Ok(target.as_creature().is_some_and(|c| c.is_player() && c.is_immune()))
    }

    /// Range and cost gate. Returns the attacker-to-target distance, or `None`
    /// when the skill cannot be used right now.
    fn check_skill(
        &self,
        actor: &mut Creature,
        target: ObjectId,
        skill: &Skill,
        attack: &AttackSkill,
    ) -> Result<Option<f32>, CombatError> {
        let distance = self
            .zone
            .distance(actor.id, target)
            .ok_or(CombatError::NotDeployed(target))?;

        let max_range = attack
            .range
            .or_else(|| actor.weapon.as_ref().map(|w| w.ranges.max))
            .unwrap_or(UNARMED_RANGES.max);
        if distance > max_range {
            debug!(actor = %actor.id, %target, distance, max_range, "target out of range");
            return Ok(None);
        }

        if !afford_action(actor, &skill.cost, &self.env.constants.unarmed) {
            debug!(actor = %actor.id, skill = %skill.name, "cannot afford attack");
            return Ok(None);
        }
        Ok(Some(distance))
    }

    fn restore(creature: &mut Creature, heal: &HealSkill) {
        for (pool, amount) in [
            (HamPool::Health, heal.health),
            (HamPool::Action, heal.action),
            (HamPool::Mind, heal.mind),
        ] {
            if amount > 0 {
                creature.ham.heal(pool, amount);
            }
        }
    }

    fn heal_self(&self, actor: &mut Creature, skill: &Skill, heal: &HealSkill, modifier: &str) -> f32 {
        if !afford_action(actor, &skill.cost, &self.env.constants.unarmed) {
            return 0.0;
        }
        Self::restore(actor, heal);
        if let Some(effect) = self.effects.get(&skill.name) {
            effect.perform_effect(actor, None, modifier);
        }
        skill.speed
    }

    /// Heals skip combat validation: no defenders, no PvP check
    fn heal_target(
        &self,
        actor: &mut Creature,
        handle: &WorldObject,
        skill: &Skill,
        heal: &HealSkill,
        modifier: &str,
    ) -> Result<f32, CombatError> {
        if let Some(range) = heal.range {
            let distance = self
                .zone
                .distance(actor.id, handle.id())
                .ok_or(CombatError::NotDeployed(handle.id()))?;
            if distance > range {
                debug!(actor = %actor.id, target = %handle.id(), distance, "heal target out of range");
                return Ok(0.0);
            }
        }
        if !afford_action(actor, &skill.cost, &self.env.constants.unarmed) {
            return Ok(0.0);
        }

        let mut target = handle.cross_lock(actor.id, self.lock_wait())?;
        let creature = target
            .as_creature_mut()
            .ok_or(CombatError::InvalidTarget(handle.id()))?;
        Self::restore(creature, heal);

        if let Some(effect) = self.effects.get(&skill.name) {
            effect.perform_effect(actor, Some(&mut *target), modifier);
        }
        Ok(skill.speed)
    }

    /// Cross-lock `handle` and apply one engagement to it
    ///
    /// Returns false when the target is rejected or the lock cannot be taken.
    /// An error after mutation has begun leaves the applied changes in place.
    pub(super) fn apply_engagement(
        &self,
        actor: &mut Creature,
        handle: &WorldObject,
        strike: &Strike<'_>,
        distance: f32,
        msg: &mut CombatAction,
    ) -> bool {
        let mut target = match handle.cross_lock(actor.id, self.lock_wait()) {
            Ok(target) => target,
            Err(err) if err.is_resource_unavailable() => {
                warn!(actor = %actor.id, target = %handle.id(), error = %err, "engagement aborted");
                return false;
            }
            Err(err) => {
                error!(actor = %actor.id, target = %handle.id(), error = %err, "engagement lock misused");
                return false;
            }
        };

        match self.engage_locked(actor, &mut target, strike, distance, msg) {
            Ok(applied) => applied,
            Err(err) if err.is_rejection() => {
                debug!(actor = %actor.id, target = %handle.id(), error = %err, "engagement rejected");
                false
            }
            Err(err) if err.is_resource_unavailable() => {
                warn!(
                    actor = %actor.id,
                    target = %handle.id(),
                    error = %err,
                    "engagement aborted; changes already applied are kept"
                );
                false
            }
            Err(err) => {
                error!(
                    actor = %actor.id,
                    target = %handle.id(),
                    error = %err,
                    "engagement failed; changes already applied are kept"
                );
                false
            }
        }
    }

    fn engage_locked(
        &self,
        actor: &mut Creature,
        target: &mut ObjectState,
        strike: &Strike<'_>,
        distance: f32,
        msg: &mut CombatAction,
    ) -> Result<bool, CombatError> {
        let target_id = target.id();
        let area = strike.is_area();

        match target {
            ObjectState::Creature(creature) => {
                if creature.is_dead_or_incapacitated() {
                    return Ok(false);
                }

                if creature.is_player() {
                    if creature.is_immune() {
                        return Ok(false);
                    }
                    if actor.is_player() && !can_attack(actor, creature) {
                        return Ok(false);
                    }
                    if !creature.is_online() {
                        return Ok(false);
                    }
                }
                creature.stop_performing();
            }
            ObjectState::Destructible(object) => {
                if !object.attackable {
                    return Err(CombatError::InvalidTarget(target_id));
                }
            }
        }

        if area {
            actor.add_defender(target_id);
        } else {
            actor.set_defender(target_id);
        }
        target.add_defender(actor.id);
        actor.clear_peace();

        let ctx = DamageContext {
            env: &self.env,
            skill: &strike.skill.name,
            attack: strike.attack,
            distance,
            area_hit: area,
        };
        let damage = compute_damage(&ctx, actor, target);

        if let Some(effect) = self.effects.get(&strike.skill.name) {
            effect.perform_effect(actor, Some(&mut *target), strike.modifier);
        }

        match target {
            ObjectState::Creature(creature) => {
                msg.add_defender(target_id, damage >= 0);

                if creature.is_incapacitated() || creature.is_dead() {
                    let key = if creature.is_dead() {
                        "prose_target_dead"
                    } else {
                        "prose_target_incap"
                    };
                    actor.notify(Notice::system_about("base_player", key, target_id));
                    if !area {
                        actor.clear_combat_state();
                    }
                }

                let roll = StateRoll {
                    constants: &self.env.constants,
                    rng: self.env.rng.as_ref(),
                    now: self.env.now_ms(),
                };
                roll.apply(actor, creature, &strike.attack.states);

                if let Some(data) = creature.autonomous_data_mut() {
                    data.retaliate(actor.id, damage);
                }
                creature.action_recovery = true;
            }
            ObjectState::Destructible(object) => {
                if object.destroyed && !area {
                    actor.clear_combat_state();
                    return Ok(false);
                }
                if object.inflict(damage.max(0)) {
                    debug!(attacker = %actor.id, object = %target_id, "object destroyed");
                }
            }
        }

        Ok(true)
    }
}
