//! Queued actions and the outcome message broadcast for them

use crate::env::CombatRng;
use crate::equipment::Weapon;
use crate::types::ObjectId;
use serde::{Deserialize, Serialize};

/// Action handed to the engine by an actor's command queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedAction {
    pub actor: ObjectId,
    #[serde(default)]
    pub target: Option<ObjectId>,
    pub skill: String,
    /// Free-form argument passed through to skill effects
    #[serde(default)]
    pub modifier: String,
}

impl QueuedAction {
    pub fn new(actor: ObjectId, skill: impl Into<String>) -> Self {
        QueuedAction {
            actor,
            target: None,
            skill: skill.into(),
            modifier: String::new(),
        }
    }

    pub fn at(mut self, target: ObjectId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = modifier.into();
        self
    }
}

/// One defender's line in a [`CombatAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenderResult {
    pub defender: ObjectId,
    pub hit: bool,
}

/// Outcome of one target action, built up while resolving and broadcast once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatAction {
    pub attacker: ObjectId,
    pub animation: String,
    pub defenders: Vec<DefenderResult>,
}

impl CombatAction {
    pub fn new(attacker: ObjectId, animation: impl Into<String>) -> Self {
        CombatAction {
            attacker,
            animation: animation.into(),
            defenders: Vec::new(),
        }
    }

    pub fn add_defender(&mut self, defender: ObjectId, hit: bool) {
        self.defenders.push(DefenderResult { defender, hit });
    }

    pub fn hits(&self) -> usize {
        self.defenders.iter().filter(|d| d.hit).count()
    }

    /// One-line description for logs
    pub fn summary(&self) -> String {
        let defenders: Vec<String> = self
            .defenders
            .iter()
            .map(|d| format!("{}:{}", d.defender, if d.hit { "hit" } else { "miss" }))
            .collect();
        format!(
            "{} [{}] -> {}",
            self.attacker,
            self.animation,
            defenders.join(", ")
        )
    }
}

/// Animation every ranged weapon uses by default
pub const DEFAULT_RANGED_ANIMATION: &str = "fire_1_single_medium";

/// Melee and bare-handed default animations, one picked at random
pub const DEFAULT_MELEE_ANIMATIONS: [&str; 9] = [
    "attack_high_left_light_0",
    "attack_high_center_light_0",
    "attack_high_right_light_0",
    "attack_mid_left_light_0",
    "attack_mid_center_light_0",
    "attack_mid_right_light_0",
    "attack_low_left_light_0",
    "attack_low_center_light_0",
    "attack_low_right_light_0",
];

/// Animation for a skill that declares none
pub fn default_animation(weapon: Option<&Weapon>, rng: &dyn CombatRng) -> &'static str {
    if weapon.is_some_and(Weapon::is_ranged) {
        DEFAULT_RANGED_ANIMATION
    } else {
        DEFAULT_MELEE_ANIMATIONS[rng.below(DEFAULT_MELEE_ANIMATIONS.len() as u32) as usize]
    }
}
