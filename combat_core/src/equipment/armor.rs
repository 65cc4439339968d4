//! Armor worn per body location

use crate::types::{BodyLocation, Resistances};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    /// Raw armor rating; every 16 points is one step of armor resistance
    pub rating: i32,
    #[serde(default)]
    pub resists: Resistances,
    #[serde(default)]
    pub condition_damage: u32,
    #[serde(default = "default_max_condition")]
    pub max_condition: u32,
    /// Clothing can occupy an armor slot without protecting it
    #[serde(default = "default_is_armor")]
    pub is_armor: bool,
    #[serde(skip)]
    pub updated: bool,
}

fn default_max_condition() -> u32 {
    1000
}

fn default_is_armor() -> bool {
    true
}

impl Armor {
    pub fn new(name: impl Into<String>, rating: i32, resists: Resistances) -> Self {
        Armor {
            name: name.into(),
            rating,
            resists,
            condition_damage: 0,
            max_condition: default_max_condition(),
            is_armor: true,
            updated: false,
        }
    }

    /// Resistance level compared against a weapon's armor piercing
    pub fn armor_resistance(&self) -> i32 {
        self.rating / 16
    }

    pub fn degrade(&mut self) {
        self.condition_damage = (self.condition_damage + 1).min(self.max_condition);
        self.updated = true;
    }
}

/// Equipped armor by body location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArmorSet {
    pieces: HashMap<BodyLocation, Armor>,
}

impl ArmorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equip(&mut self, location: BodyLocation, armor: Armor) -> Option<Armor> {
        self.pieces.insert(location, armor)
    }

    pub fn unequip(&mut self, location: BodyLocation) -> Option<Armor> {
        self.pieces.remove(&location)
    }

    /// Protective armor at a location; non-armor items are ignored
    pub fn at(&self, location: BodyLocation) -> Option<&Armor> {
        self.pieces.get(&location).filter(|a| a.is_armor)
    }

    pub fn at_mut(&mut self, location: BodyLocation) -> Option<&mut Armor> {
        self.pieces.get_mut(&location).filter(|a| a.is_armor)
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armor_resistance_steps() {
        assert_eq!(Armor::new("padded", 15, Resistances::default()).armor_resistance(), 0);
        assert_eq!(Armor::new("composite", 16, Resistances::default()).armor_resistance(), 1);
        assert_eq!(Armor::new("bone", 40, Resistances::default()).armor_resistance(), 2);
    }

    #[test]
    fn test_non_armor_ignored() {
        let mut set = ArmorSet::new();
        let mut shirt = Armor::new("shirt", 0, Resistances::default());
        shirt.is_armor = false;
        set.equip(BodyLocation::Chest, shirt);
        set.equip(
            BodyLocation::Head,
            Armor::new("helmet", 32, Resistances::default()),
        );

        assert!(set.at(BodyLocation::Chest).is_none());
        assert!(set.at(BodyLocation::Head).is_some());
        assert!(set.at(BodyLocation::Feet).is_none());
    }
}
