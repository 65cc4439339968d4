//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Engine
pub use crate::combat::{CombatAction, CombatEngine, QueuedAction};
pub use crate::duel::DuelCoordinator;
pub use crate::zone::Zone;

// Services
pub use crate::env::{
    BroadcastLog, Broadcaster, CombatEnv, CombatRng, EventQueue, ManualClock, ScriptedRng,
    SeededRng,
};

// Objects
pub use crate::equipment::{Armor, Weapon, WeaponType};
pub use crate::object::{
    AutonomousData, Creature, Destructible, Ham, Notice, ObjectHandle, ObjectState, PlayerData,
    WorldObject,
};

// Types
pub use crate::types::{BodyLocation, DamageType, Faction, HamPool, ObjectId, Position, Posture};

// Config
pub use crate::config::{default_skills, CombatConstants};
pub use crate::skill::{Skill, SkillRegistry};
