//! Core types shared by every combat component

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a world object (player, creature, destructible)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Sentinel used by by-identifier commands ("no target")
    pub const NONE: ObjectId = ObjectId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        ObjectId(id)
    }
}

/// World position on the zone plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The three HAM pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HamPool {
    Health,
    Action,
    Mind,
}

impl HamPool {
    pub fn all() -> &'static [HamPool] {
        &[HamPool::Health, HamPool::Action, HamPool::Mind]
    }
}

/// Creature stance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    #[default]
    Upright,
    Crouched,
    Prone,
    Kneeled,
    KnockedDown,
}

impl Posture {
    /// Whether the creature is on the ground (knocked down or prone)
    pub fn is_grounded(self) -> bool {
        matches!(self, Posture::KnockedDown | Posture::Prone)
    }
}

/// Body location struck by a single damage portion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyLocation {
    Chest,
    Hands,
    LeftArm,
    RightArm,
    Legs,
    Feet,
    Head,
}

impl BodyLocation {
    pub fn all() -> &'static [BodyLocation] {
        &[
            BodyLocation::Chest,
            BodyLocation::Hands,
            BodyLocation::LeftArm,
            BodyLocation::RightArm,
            BodyLocation::Legs,
            BodyLocation::Feet,
            BodyLocation::Head,
        ]
    }

    /// The HAM pool that absorbs damage landing on this location
    pub fn pool(self) -> HamPool {
        match self {
            BodyLocation::Chest
            | BodyLocation::Hands
            | BodyLocation::LeftArm
            | BodyLocation::RightArm => HamPool::Health,
            BodyLocation::Legs | BodyLocation::Feet => HamPool::Action,
            BodyLocation::Head => HamPool::Mind,
        }
    }
}

/// Weapon damage type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    #[default]
    Kinetic,
    Energy,
    Electricity,
    Stun,
    Blast,
    Heat,
    Cold,
    Acid,
    Lightsaber,
    Force,
}

impl DamageType {
    pub fn all() -> &'static [DamageType] {
        &[
            DamageType::Kinetic,
            DamageType::Energy,
            DamageType::Electricity,
            DamageType::Stun,
            DamageType::Blast,
            DamageType::Heat,
            DamageType::Cold,
            DamageType::Acid,
            DamageType::Lightsaber,
            DamageType::Force,
        ]
    }
}

/// Percent resistance per damage type (armor or intrinsic creature hide)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resistances {
    pub kinetic: f32,
    pub energy: f32,
    pub electricity: f32,
    pub stun: f32,
    pub blast: f32,
    pub heat: f32,
    pub cold: f32,
    pub acid: f32,
    pub lightsaber: f32,
}

impl Resistances {
    /// Resistance percentage against a damage type. Force damage is never resisted.
    pub fn against(&self, damage_type: DamageType) -> f32 {
        match damage_type {
            DamageType::Kinetic => self.kinetic,
            DamageType::Energy => self.energy,
            DamageType::Electricity => self.electricity,
            DamageType::Stun => self.stun,
            DamageType::Blast => self.blast,
            DamageType::Heat => self.heat,
            DamageType::Cold => self.cold,
            DamageType::Acid => self.acid,
            DamageType::Lightsaber => self.lightsaber,
            DamageType::Force => 0.0,
        }
    }
}

/// Faction alignment used by overt PvP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    #[default]
    Neutral,
    Imperial,
    Rebel,
}

impl Faction {
    /// Imperials and rebels are hostile to each other; neutrals hate nobody
    pub fn hates(self, other: Faction) -> bool {
        matches!(
            (self, other),
            (Faction::Imperial, Faction::Rebel) | (Faction::Rebel, Faction::Imperial)
        )
    }
}
