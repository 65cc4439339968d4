//! combat_core - Real-time combat resolution for a persistent world server
//!
//! This library provides:
//! - CombatEngine: dispatch of queued actions, single-target engagement and
//!   area resolution under per-object and zone locks
//! - Defense resolution: hit chance and block / dodge / counterattack contests
//! - Damage resolution: weapon rolls, armor, wounds and damage over time
//! - Secondary states: knockdown, posture changes, stun, blind, dizzy, intimidate
//! - Action cost and attack speed
//! - DuelCoordinator: consensual PvP between players

pub mod combat;
pub mod config;
pub mod cost;
pub mod damage;
pub mod defense;
pub mod duel;
pub mod env;
pub mod equipment;
pub mod error;
pub mod object;
pub mod prelude;
pub mod skill;
pub mod types;
pub mod zone;

// Re-export core types for convenience
pub use combat::{CombatAction, CombatEngine, QueuedAction};
pub use config::{default_skills, CombatConstants, ConfigError};
pub use duel::{can_attack, DuelCoordinator};
pub use env::CombatEnv;
pub use error::CombatError;
pub use object::{Creature, Destructible, ObjectHandle, ObjectState, WorldObject};
pub use skill::{Skill, SkillRegistry};
pub use types::{ObjectId, Position};
pub use zone::Zone;
