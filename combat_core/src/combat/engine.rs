//! Action dispatch
//!
//! [`CombatEngine::resolve_action`] is the single entry point the action
//! queues call. It returns the seconds the action occupies the actor; zero
//! means the action was rejected and the actor's clock must not advance.

use super::QueuedAction;
use crate::cost::afford_action;
use crate::duel::DuelCoordinator;
use crate::env::{CombatEnv, EventKind, ScheduledEvent};
use crate::error::CombatError;
use crate::object::{Creature, Notice};
use crate::skill::{EffectRegistry, Skill, SkillKind, SkillRegistry};
use crate::zone::Zone;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

#[derive(Debug, Clone)]
pub struct CombatEngine {
    pub(super) env: CombatEnv,
    pub(super) zone: Arc<Zone>,
    pub(super) skills: Arc<SkillRegistry>,
    pub(super) effects: EffectRegistry,
}

impl CombatEngine {
    pub fn new(env: CombatEnv, zone: Arc<Zone>, skills: Arc<SkillRegistry>) -> Self {
        CombatEngine {
            env,
            zone,
            skills,
            effects: EffectRegistry::new(),
        }
    }

    pub fn with_effects(mut self, effects: EffectRegistry) -> Self {
        self.effects = effects;
        self
    }

    pub fn env(&self) -> &CombatEnv {
        &self.env
    }

    pub fn zone(&self) -> &Arc<Zone> {
        &self.zone
    }

    pub fn skills(&self) -> &SkillRegistry {
        &self.skills
    }

    /// Longest wait for a counterparty's lock
    pub fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.env.constants.locking.wait_ms)
    }

    /// Duel commands against this engine's zone
    pub fn duels(&self) -> DuelCoordinator {
        DuelCoordinator::new(Arc::clone(&self.zone), self.lock_wait())
    }

    /// Lock the acting creature and resolve `action`
    ///
    /// For callers that do not already hold the actor's lock.
    pub fn execute(&self, action: &QueuedAction) -> f32 {
        let Some(handle) = self.zone.lookup(action.actor) else {
            warn!(actor = %action.actor, skill = %action.skill, "actor not deployed");
            return 0.0;
        };
        let mut guard = handle.lock();
        match guard.as_creature_mut() {
            Some(actor) => self.resolve_action(actor, action),
            None => {
                debug!(actor = %action.actor, "only creatures act");
                0.0
            }
        }
    }

    /// Resolve one queued action for `actor`, whose lock the caller holds
    pub fn resolve_action(&self, actor: &mut Creature, action: &QueuedAction) -> f32 {
        match self.dispatch(actor, action) {
            Ok(duration) => duration,
            Err(err) if err.is_rejection() => {
                debug!(actor = %actor.id, skill = %action.skill, error = %err, "action rejected");
                0.0
            }
            Err(err) if err.is_resource_unavailable() => {
                warn!(actor = %actor.id, skill = %action.skill, error = %err, "action aborted");
                0.0
            }
            Err(err) => {
                error!(actor = %actor.id, skill = %action.skill, error = %err, "action failed");
                0.0
            }
        }
    }

    fn dispatch(&self, actor: &mut Creature, action: &QueuedAction) -> Result<f32, CombatError> {
        if actor.is_immune() {
            actor.notify(Notice::Info("You cannot attack while Immune.".to_string()));
            return Ok(0.0);
        }

        let skill = self
            .skills
            .get(&action.skill)
            .ok_or_else(|| CombatError::UnknownSkill(action.skill.clone()))?;

        if skill.is_target_skill() {
            self.engage_target(actor, action.target, &skill, &action.modifier)
        } else {
            Ok(self.do_self_skill(actor, &skill, &action.modifier))
        }
    }

    fn self_skill_useful(actor: &Creature, skill: &Skill) -> bool {
        match &skill.kind {
            SkillKind::Posture(p) => actor.posture != p.posture,
            SkillKind::Enhance(_) => !actor.has_enhancement(&skill.name),
            SkillKind::Attack(_) | SkillKind::Heal(_) => false,
        }
    }

    fn do_self_skill(&self, actor: &mut Creature, skill: &Skill, modifier: &str) -> f32 {
        if !Self::self_skill_useful(actor, skill) {
            debug!(actor = %actor.id, skill = %skill.name, "self skill not useful");
            return 0.0;
        }
        if !afford_action(actor, &skill.cost, &self.env.constants.unarmed) {
            debug!(actor = %actor.id, skill = %skill.name, "cannot afford self skill");
            return 0.0;
        }

        match &skill.kind {
            SkillKind::Posture(p) => actor.posture = p.posture,
            SkillKind::Enhance(enhance) => {
                actor.apply_enhancement(&skill.name, &enhance.skill_mod, enhance.bonus);
                if enhance.duration_ms != 0 {
                    self.env.scheduler.schedule(ScheduledEvent {
                        due_ms: self.env.now_ms() + enhance.duration_ms,
                        kind: EventKind::EnhancementExpiry {
                            actor: actor.id,
                            skill: skill.name.clone(),
                            skill_mod: enhance.skill_mod.clone(),
                            bonus: enhance.bonus,
                        },
                    });
                }
            }
            SkillKind::Attack(_) | SkillKind::Heal(_) => {}
        }

        if let Some(effect) = self.effects.get(&skill.name) {
            effect.perform_effect(actor, None, modifier);
        }

        skill.speed
    }

    /// Revert the enhancement an expiry event refers to
    pub fn expire_enhancement(&self, actor: &mut Creature, event: &ScheduledEvent) -> bool {
        let EventKind::EnhancementExpiry { actor: id, skill, .. } = &event.kind;
        if *id != actor.id {
            return false;
        }
        let reverted = actor.revert_enhancement(skill);
        if reverted {
            debug!(actor = %actor.id, skill = %skill, "enhancement expired");
        }
        reverted
    }

    /// Look up the actor a due event refers to and apply it
    pub fn run_event(&self, event: &ScheduledEvent) -> bool {
        let EventKind::EnhancementExpiry { actor, .. } = &event.kind;
        let Some(handle) = self.zone.lookup(*actor) else {
            debug!(actor = %actor, "event for an object no longer deployed");
            return false;
        };
        let mut guard = handle.lock();
        guard
            .as_creature_mut()
            .is_some_and(|creature| self.expire_enhancement(creature, event))
    }
}
