//! Tunable combat constants

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunable combat constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub hit: HitConstants,
    #[serde(default)]
    pub damage: DamageConstants,
    #[serde(default)]
    pub recovery: RecoveryConstants,
    #[serde(default)]
    pub states: StateDurations,
    #[serde(default)]
    pub unarmed: UnarmedConstants,
    #[serde(default)]
    pub locking: LockConstants,
}

impl CombatConstants {
    /// Reject values the formulas cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.hit.base_chance) {
            return Err(ConfigError::ValidationError(format!(
                "hit.base_chance must be within 0..=100, got {}",
                self.hit.base_chance
            )));
        }
        let multipliers = [
            ("damage.global_multiplier", self.damage.global_multiplier),
            ("damage.pve_multiplier", self.damage.pve_multiplier),
            ("damage.pvp_multiplier", self.damage.pvp_multiplier),
        ];
        for (name, value) in multipliers {
            if value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.unarmed.attack_speed <= 0.0 {
            return Err(ConfigError::ValidationError(
                "unarmed.attack_speed must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate constants from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let constants: CombatConstants = super::parse_toml(content)?;
        constants.validate()?;
        Ok(constants)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitConstants {
    /// Hit chance before any accuracy/defense adjustment
    #[serde(default = "default_base_chance")]
    pub base_chance: f32,
}

impl Default for HitConstants {
    fn default() -> Self {
        HitConstants {
            base_chance: default_base_chance(),
        }
    }
}

fn default_base_chance() -> f32 {
    66.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Applied to every player-dealt hit
    #[serde(default = "default_multiplier")]
    pub global_multiplier: f32,
    /// Extra factor when a player hits a non-player
    #[serde(default = "default_multiplier")]
    pub pve_multiplier: f32,
    /// Extra factor when a player hits a player
    #[serde(default = "default_pvp_multiplier")]
    pub pvp_multiplier: f32,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            global_multiplier: default_multiplier(),
            pve_multiplier: default_multiplier(),
            pvp_multiplier: default_pvp_multiplier(),
        }
    }
}

fn default_multiplier() -> f32 {
    1.0
}
fn default_pvp_multiplier() -> f32 {
    0.25
}

/// How long a creature is protected from the same posture effect again
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConstants {
    #[serde(default = "default_knockdown_recovery")]
    pub knockdown_ms: u64,
    #[serde(default = "default_posture_recovery")]
    pub posture_down_ms: u64,
    #[serde(default = "default_posture_recovery")]
    pub posture_up_ms: u64,
}

impl Default for RecoveryConstants {
    fn default() -> Self {
        RecoveryConstants {
            knockdown_ms: default_knockdown_recovery(),
            posture_down_ms: default_posture_recovery(),
            posture_up_ms: default_posture_recovery(),
        }
    }
}

fn default_knockdown_recovery() -> u64 {
    30_000
}
fn default_posture_recovery() -> u64 {
    15_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDurations {
    #[serde(default = "default_state_duration")]
    pub stun_ms: u64,
    #[serde(default = "default_state_duration")]
    pub blind_ms: u64,
    #[serde(default = "default_state_duration")]
    pub dizzy_ms: u64,
    #[serde(default = "default_intimidate_duration")]
    pub intimidate_ms: u64,
}

impl Default for StateDurations {
    fn default() -> Self {
        StateDurations {
            stun_ms: default_state_duration(),
            blind_ms: default_state_duration(),
            dizzy_ms: default_state_duration(),
            intimidate_ms: default_intimidate_duration(),
        }
    }
}

fn default_state_duration() -> u64 {
    10_000
}
fn default_intimidate_duration() -> u64 {
    15_000
}

/// Stand-ins for weapon data when a creature fights bare-handed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnarmedConstants {
    /// Max damage = unarmed_damage skill mod + spread
    #[serde(default = "default_damage_spread")]
    pub damage_spread: f32,
    #[serde(default = "default_health_cost")]
    pub health_cost: f32,
    #[serde(default = "default_action_cost")]
    pub action_cost: f32,
    #[serde(default = "default_mind_cost")]
    pub mind_cost: f32,
    #[serde(default = "default_attack_speed")]
    pub attack_speed: f32,
    #[serde(default = "default_wounds_ratio")]
    pub wounds_ratio: f32,
    #[serde(default = "default_armor_piercing")]
    pub armor_piercing: i32,
}

impl Default for UnarmedConstants {
    fn default() -> Self {
        UnarmedConstants {
            damage_spread: default_damage_spread(),
            health_cost: default_health_cost(),
            action_cost: default_action_cost(),
            mind_cost: default_mind_cost(),
            attack_speed: default_attack_speed(),
            wounds_ratio: default_wounds_ratio(),
            armor_piercing: default_armor_piercing(),
        }
    }
}

fn default_damage_spread() -> f32 {
    15.0
}
fn default_health_cost() -> f32 {
    10.0
}
fn default_action_cost() -> f32 {
    25.0
}
fn default_mind_cost() -> f32 {
    10.0
}
fn default_attack_speed() -> f32 {
    2.0
}
fn default_wounds_ratio() -> f32 {
    5.0
}
fn default_armor_piercing() -> i32 {
    0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConstants {
    /// Longest the engine waits for a counterparty's lock before aborting
    #[serde(default = "default_lock_wait")]
    pub wait_ms: u64,
}

impl Default for LockConstants {
    fn default() -> Self {
        LockConstants {
            wait_ms: default_lock_wait(),
        }
    }
}

fn default_lock_wait() -> u64 {
    50
}
