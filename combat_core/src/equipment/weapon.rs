//! Weapon data and the per-type skill-mod tables

use crate::types::{DamageType, HamPool};
use serde::{Deserialize, Serialize};

/// Weapons carry at most this many damage-over-time slots
pub const MAX_DOT_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    Unarmed,
    OneHanded,
    TwoHanded,
    Polearm,
    Pistol,
    Carbine,
    Rifle,
    HeavyWeapon,
    FlameThrower,
    LightningRifle,
    OneHandSaber,
    TwoHandSaber,
    PolearmSaber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    Melee,
    Ranged,
    Jedi,
}

/// Secondary-defense contest a defender's weapon allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseContest {
    Block,
    Dodge,
    CounterAttack,
}

impl DefenseContest {
    /// Skill mod the defender contests with
    pub fn skill_mod(self) -> &'static str {
        match self {
            DefenseContest::Block => "block",
            DefenseContest::Dodge => "dodge",
            DefenseContest::CounterAttack => "counterattack",
        }
    }
}

/// Weapon type -> speed skill mods (summed)
const SPEED_MODS: [(WeaponType, &[&str]); 13] = [
    (WeaponType::Unarmed, &["unarmed_speed"]),
    (WeaponType::OneHanded, &["onehandmelee_speed"]),
    (WeaponType::TwoHanded, &["twohandmelee_speed"]),
    (WeaponType::Polearm, &["polearm_speed"]),
    (WeaponType::Pistol, &["pistol_speed"]),
    (WeaponType::Carbine, &["carbine_speed"]),
    (WeaponType::Rifle, &["rifle_speed"]),
    (WeaponType::HeavyWeapon, &["heavyweapon_speed"]),
    (
        WeaponType::FlameThrower,
        &["heavy_flame_thrower_speed", "heavyweapon_speed"],
    ),
    (
        WeaponType::LightningRifle,
        &["heavy_rifle_lightning_speed", "heavyweapon_speed"],
    ),
    (WeaponType::OneHandSaber, &["onehandlightsaber_speed"]),
    (WeaponType::TwoHandSaber, &["twohandlightsaber_speed"]),
    (WeaponType::PolearmSaber, &["polearmlightsaber_speed"]),
];

/// Weapon type -> accuracy skill mod
const ACCURACY_MODS: [(WeaponType, &str); 13] = [
    (WeaponType::Unarmed, "unarmed_accuracy"),
    (WeaponType::OneHanded, "onehandmelee_accuracy"),
    (WeaponType::TwoHanded, "twohandmelee_accuracy"),
    (WeaponType::Polearm, "polearm_accuracy"),
    (WeaponType::Pistol, "pistol_accuracy"),
    (WeaponType::Carbine, "carbine_accuracy"),
    (WeaponType::Rifle, "rifle_accuracy"),
    (WeaponType::HeavyWeapon, "heavyweapon_accuracy"),
    (WeaponType::FlameThrower, "heavy_flame_thrower_accuracy"),
    (WeaponType::LightningRifle, "heavy_rifle_lightning_accuracy"),
    (WeaponType::OneHandSaber, "onehandlightsaber_accuracy"),
    (WeaponType::TwoHandSaber, "twohandlightsaber_accuracy"),
    (WeaponType::PolearmSaber, "polearmlightsaber_accuracy"),
];

impl WeaponType {
    pub fn category(self) -> WeaponCategory {
        match self {
            WeaponType::Unarmed
            | WeaponType::OneHanded
            | WeaponType::TwoHanded
            | WeaponType::Polearm => WeaponCategory::Melee,
            WeaponType::Pistol
            | WeaponType::Carbine
            | WeaponType::Rifle
            | WeaponType::HeavyWeapon
            | WeaponType::FlameThrower
            | WeaponType::LightningRifle => WeaponCategory::Ranged,
            WeaponType::OneHandSaber | WeaponType::TwoHandSaber | WeaponType::PolearmSaber => {
                WeaponCategory::Jedi
            }
        }
    }

    pub fn speed_mods(self) -> &'static [&'static str] {
        SPEED_MODS
            .iter()
            .find(|(t, _)| *t == self)
            .map(|(_, mods)| *mods)
            .unwrap_or(&[])
    }

    pub fn accuracy_mod(self) -> &'static str {
        ACCURACY_MODS
            .iter()
            .find(|(t, _)| *t == self)
            .map(|(_, m)| *m)
            .unwrap_or("unarmed_accuracy")
    }

    /// Contest available to a defender holding this weapon type
    pub fn defense_contest(self) -> Option<DefenseContest> {
        match self {
            WeaponType::Polearm | WeaponType::Rifle => Some(DefenseContest::Block),
            WeaponType::OneHanded | WeaponType::Pistol => Some(DefenseContest::Dodge),
            WeaponType::Carbine | WeaponType::TwoHanded => Some(DefenseContest::CounterAttack),
            _ => None,
        }
    }
}

/// Range bands and the accuracy modifier at each band edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeBands {
    pub point_blank: f32,
    pub ideal: f32,
    pub max: f32,
    pub point_blank_accuracy: f32,
    pub ideal_accuracy: f32,
    pub max_accuracy: f32,
}

impl Default for RangeBands {
    fn default() -> Self {
        RangeBands {
            point_blank: 0.0,
            ideal: 2.0,
            max: 5.0,
            point_blank_accuracy: 7.0,
            ideal_accuracy: 7.0,
            max_accuracy: 7.0,
        }
    }
}

/// Per-pool cost factors multiplied into a skill's cost multipliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponCosts {
    pub health: f32,
    pub action: f32,
    pub mind: f32,
    pub force: f32,
}

impl Default for WeaponCosts {
    fn default() -> Self {
        WeaponCosts {
            health: 10.0,
            action: 25.0,
            mind: 10.0,
            force: 0.0,
        }
    }
}

/// Damage-over-time family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotKind {
    Bleeding,
    Disease,
    Fire,
    Poison,
}

impl DotKind {
    /// Skill mod subtracted from a slot's potency
    pub fn resistance_mod(self) -> &'static str {
        match self {
            DotKind::Bleeding => "resistance_bleeding",
            DotKind::Disease => "resistance_disease",
            DotKind::Fire => "resistance_fire",
            DotKind::Poison => "resistance_poison",
        }
    }
}

/// One damage-over-time slot on a weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotSlot {
    pub kind: DotKind,
    pub potency: i32,
    pub strength: i32,
    pub attribute: HamPool,
    pub duration_ms: u64,
    /// Remaining applications; zero means spent
    pub uses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub weapon_type: WeaponType,
    #[serde(default)]
    pub damage_type: DamageType,
    pub min_damage: f32,
    pub max_damage: f32,
    /// Base seconds per attack
    #[serde(default = "default_attack_speed")]
    pub attack_speed: f32,
    #[serde(default = "default_armor_piercing")]
    pub armor_piercing: i32,
    #[serde(default = "default_wounds_ratio")]
    pub wounds_ratio: f32,
    /// Whether the wielder holds the certification for this weapon
    #[serde(default = "default_certified")]
    pub certified: bool,
    #[serde(default)]
    pub ranges: RangeBands,
    #[serde(default)]
    pub costs: WeaponCosts,
    #[serde(default)]
    pub dots: Vec<DotSlot>,
    #[serde(default)]
    pub condition_damage: u32,
    #[serde(default = "default_max_condition")]
    pub max_condition: u32,
    /// Set whenever resolution changes a persisted field
    #[serde(skip)]
    pub updated: bool,
}

fn default_attack_speed() -> f32 {
    2.0
}
fn default_armor_piercing() -> i32 {
    0
}
fn default_wounds_ratio() -> f32 {
    5.0
}
fn default_certified() -> bool {
    true
}
fn default_max_condition() -> u32 {
    1000
}

impl Weapon {
    pub fn new(name: impl Into<String>, weapon_type: WeaponType, min_damage: f32, max_damage: f32) -> Self {
        Weapon {
            name: name.into(),
            weapon_type,
            damage_type: DamageType::Kinetic,
            min_damage,
            max_damage,
            attack_speed: default_attack_speed(),
            armor_piercing: default_armor_piercing(),
            wounds_ratio: default_wounds_ratio(),
            certified: true,
            ranges: RangeBands::default(),
            costs: WeaponCosts::default(),
            dots: Vec::new(),
            condition_damage: 0,
            max_condition: default_max_condition(),
            updated: false,
        }
    }

    pub fn category(&self) -> WeaponCategory {
        self.weapon_type.category()
    }

    pub fn is_melee(&self) -> bool {
        self.category() == WeaponCategory::Melee
    }

    pub fn is_ranged(&self) -> bool {
        self.category() == WeaponCategory::Ranged
    }

    pub fn is_jedi(&self) -> bool {
        self.category() == WeaponCategory::Jedi
    }

    /// Melee, unarmed-class and saber weapons close the distance to strike
    pub fn fights_up_close(&self) -> bool {
        !self.is_ranged()
    }

    /// Record one point of wear
    pub fn degrade(&mut self) {
        self.condition_damage = (self.condition_damage + 1).min(self.max_condition);
        self.updated = true;
    }

    /// Damage range after certification; uncertified wielders deal half
    pub fn damage_range(&self) -> (f32, f32) {
        if self.certified {
            (self.min_damage, self.max_damage)
        } else {
            (self.min_damage / 2.0, self.max_damage / 2.0)
        }
    }
}
