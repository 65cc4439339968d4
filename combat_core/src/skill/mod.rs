//! Skill data - read-only parameters consumed by resolution

mod effect;

pub use effect::{EffectRegistry, SkillEffect};

use crate::types::{HamPool, Posture};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A combat skill as loaded from configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Unique skill name (also the command name queued by clients)
    pub name: String,
    /// Multiplier on weapon attack speed (target skills)
    #[serde(default = "default_speed_ratio")]
    pub speed_ratio: f32,
    /// Fixed duration in seconds (self skills)
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Cost multipliers applied to the weapon's cost factors
    #[serde(default)]
    pub cost: CostMultipliers,
    /// Animation played for the action; falls back to a weapon default
    #[serde(default)]
    pub animation: Option<String>,
    pub kind: SkillKind,
}

fn default_speed_ratio() -> f32 {
    1.0
}

fn default_speed() -> f32 {
    1.0
}

/// Per-pool cost multipliers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostMultipliers {
    pub health: f32,
    pub action: f32,
    pub mind: f32,
    pub force: f32,
}

/// What a skill does
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    /// Target skill dealing damage and rolling secondary states
    Attack(AttackSkill),
    /// Target skill restoring HAM; bypasses combat validation
    Heal(HealSkill),
    /// Self skill changing the actor's own posture
    Posture(PostureSkill),
    /// Self skill granting a temporary skill-mod bonus
    Enhance(EnhanceSkill),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackSkill {
    /// Multiplier on the rolled weapon damage
    #[serde(default = "default_damage_ratio")]
    pub damage_ratio: f32,
    #[serde(default)]
    pub accuracy_bonus: i32,
    /// Defended with `force_defense` instead of melee/ranged defense
    #[serde(default)]
    pub force_attack: bool,
    /// Hit a single random pool instead of every weighted pool
    #[serde(default)]
    pub random_pool_hit: bool,
    #[serde(default)]
    pub pool_chances: PoolChances,
    /// Maximum engagement distance; the weapon's max range when absent
    #[serde(default)]
    pub range: Option<f32>,
    #[serde(default)]
    pub area: Option<AreaShape>,
    #[serde(default)]
    pub states: StateChances,
    /// Combat-spam key sent to the attacker for every damaged pool
    #[serde(default)]
    pub combat_spam_hit: Option<String>,
    /// Combat-spam key sent to the attacker on a miss
    #[serde(default = "default_miss_spam")]
    pub combat_spam_miss: String,
}

fn default_damage_ratio() -> f32 {
    1.0
}

fn default_miss_spam() -> String {
    "miss".to_string()
}

/// Weights selecting which HAM pool each damage portion lands on
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolChances {
    pub health: u32,
    pub action: u32,
    pub mind: u32,
}

impl PoolChances {
    pub fn total(&self) -> u32 {
        self.health + self.action + self.mind
    }

    /// Number of pools with a non-zero weight
    pub fn pools_affected(&self) -> u32 {
        [self.health, self.action, self.mind]
            .iter()
            .filter(|w| **w > 0)
            .count() as u32
    }

    /// Pool selected by a roll in `[0, total)`
    pub fn pool_for_roll(&self, roll: u32) -> HamPool {
        if roll < self.health {
            HamPool::Health
        } else if roll < self.health + self.action {
            HamPool::Action
        } else {
            HamPool::Mind
        }
    }
}

/// Geometry of a multi-target skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaShape {
    /// Everything within `radius` of the attacker
    Radius { radius: f32 },
    /// Everything within `range` and inside an arc of `angle` degrees centred
    /// on the attacker-to-target direction
    Cone { range: f32, angle: f32 },
}

/// Percent chances of secondary combat states
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateChances {
    pub knockdown: i32,
    pub posture_down: i32,
    pub posture_up: i32,
    pub stun: i32,
    pub blind: i32,
    pub dizzy: i32,
    pub intimidate: i32,
}

impl StateChances {
    pub fn is_empty(&self) -> bool {
        *self == StateChances::default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealSkill {
    pub health: i32,
    pub action: i32,
    pub mind: i32,
    pub range: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostureSkill {
    pub posture: Posture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhanceSkill {
    pub skill_mod: String,
    pub bonus: i32,
    /// Zero means the bonus never expires on its own
    #[serde(default)]
    pub duration_ms: u64,
}

impl Skill {
    pub fn is_target_skill(&self) -> bool {
        matches!(self.kind, SkillKind::Attack(_) | SkillKind::Heal(_))
    }

    pub fn is_self_skill(&self) -> bool {
        matches!(self.kind, SkillKind::Posture(_) | SkillKind::Enhance(_))
    }

    pub fn is_heal(&self) -> bool {
        matches!(self.kind, SkillKind::Heal(_))
    }

    pub fn attack(&self) -> Option<&AttackSkill> {
        match &self.kind {
            SkillKind::Attack(attack) => Some(attack),
            _ => None,
        }
    }

    pub fn area(&self) -> Option<AreaShape> {
        self.attack().and_then(|a| a.area)
    }

    pub fn is_area(&self) -> bool {
        self.area().is_some()
    }

    /// A basic melee/ranged swing at one pool chosen at random
    pub fn basic_attack() -> Self {
        Skill {
            name: "attack".to_string(),
            speed_ratio: 1.0,
            speed: 1.0,
            cost: CostMultipliers {
                action: 1.0,
                ..Default::default()
            },
            animation: None,
            kind: SkillKind::Attack(AttackSkill {
                damage_ratio: 1.0,
                accuracy_bonus: 0,
                force_attack: false,
                random_pool_hit: true,
                pool_chances: PoolChances {
                    health: 50,
                    action: 30,
                    mind: 20,
                },
                range: None,
                area: None,
                states: StateChances::default(),
                combat_spam_hit: None,
                combat_spam_miss: default_miss_spam(),
            }),
        }
    }
}

/// Skills by name, shared read-only between worker threads
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: HashMap<String, Arc<Skill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, skill: Skill) {
        self.skills.insert(skill.name.clone(), Arc::new(skill));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Skill>> {
        self.skills.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Skill names in alphabetical order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.skills.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<Skill> for SkillRegistry {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        let mut registry = SkillRegistry::new();
        for skill in iter {
            registry.register(skill);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_for_roll() {
        let chances = PoolChances {
            health: 50,
            action: 30,
            mind: 20,
        };
        assert_eq!(chances.total(), 100);
        assert_eq!(chances.pools_affected(), 3);
        assert_eq!(chances.pool_for_roll(0), HamPool::Health);
        assert_eq!(chances.pool_for_roll(49), HamPool::Health);
        assert_eq!(chances.pool_for_roll(50), HamPool::Action);
        assert_eq!(chances.pool_for_roll(79), HamPool::Action);
        assert_eq!(chances.pool_for_roll(80), HamPool::Mind);
    }

    #[test]
    fn test_skill_classification() {
        let attack = Skill::basic_attack();
        assert!(attack.is_target_skill());
        assert!(!attack.is_self_skill());
        assert!(!attack.is_heal());
        assert!(!attack.is_area());

        let stand = Skill {
            name: "stand".to_string(),
            speed_ratio: 1.0,
            speed: 1.0,
            cost: CostMultipliers::default(),
            animation: None,
            kind: SkillKind::Posture(PostureSkill {
                posture: Posture::Upright,
            }),
        };
        assert!(stand.is_self_skill());
        assert!(stand.attack().is_none());
    }

    #[test]
    fn test_registry_names_sorted() {
        let registry: SkillRegistry = vec![
            Skill {
                name: "zeta".to_string(),
                ..Skill::basic_attack()
            },
            Skill::basic_attack(),
        ]
        .into_iter()
        .collect();
        assert_eq!(registry.names(), vec!["attack", "zeta"]);
        assert!(registry.get("attack").is_some());
        assert!(registry.get("missing").is_none());
    }
}
