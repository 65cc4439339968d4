//! Weapons and armor consumed by resolution

mod armor;
mod weapon;

pub use armor::{Armor, ArmorSet};
pub use weapon::{
    DefenseContest, DotKind, DotSlot, RangeBands, Weapon, WeaponCategory, WeaponCosts, WeaponType,
    MAX_DOT_SLOTS,
};
