//! Combat-capable creatures

use super::{AutonomousData, Ham, Notice, PlayerData, RecoveryTimers, StatusEffects};
use crate::equipment::{Armor, ArmorSet, Weapon, WeaponType};
use crate::types::{BodyLocation, HamPool, ObjectId, Posture};
use bitflags::bitflags;
use std::collections::{BTreeMap, HashMap};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CombatFlags: u8 {
        const PEACE = 1 << 0;
        const COMBAT = 1 << 1;
    }
}

/// Who drives the creature
#[derive(Debug, Clone)]
pub enum CreatureKind {
    Player(PlayerData),
    Autonomous(AutonomousData),
}

/// Attributes that discount action costs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Discounts health costs
    pub strength: i32,
    /// Discounts action costs
    pub quickness: i32,
    /// Discounts mind costs
    pub focus: i32,
}

impl Attributes {
    pub fn for_pool(&self, pool: HamPool) -> i32 {
        match pool {
            HamPool::Health => self.strength,
            HamPool::Action => self.quickness,
            HamPool::Mind => self.focus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceKind {
    Music,
    Dance,
}

/// Entertainment activity a creature is engaged in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Performance {
    pub performing: Option<PerformanceKind>,
    pub watching: Option<ObjectId>,
    pub listening: Option<ObjectId>,
}

/// Damage received, by source
#[derive(Debug, Clone, Default)]
pub struct DamageLedger {
    by_attacker: HashMap<ObjectId, i64>,
    by_skill: HashMap<String, i64>,
}

impl DamageLedger {
    pub fn record(&mut self, attacker: ObjectId, skill: &str, damage: i32) {
        let damage = i64::from(damage.max(0));
        *self.by_attacker.entry(attacker).or_insert(0) += damage;
        *self.by_skill.entry(skill.to_string()).or_insert(0) += damage;
    }

    pub fn from_attacker(&self, attacker: ObjectId) -> i64 {
        self.by_attacker.get(&attacker).copied().unwrap_or(0)
    }

    pub fn from_skill(&self, skill: &str) -> i64 {
        self.by_skill.get(skill).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.by_attacker.values().sum()
    }
}

#[derive(Debug, Clone)]
pub struct Creature {
    pub id: ObjectId,
    pub name: String,
    pub kind: CreatureKind,
    pub level: i32,
    pub ham: Ham,
    pub shock_wounds: i32,
    pub attributes: Attributes,
    pub posture: Posture,
    pub mounted: bool,
    pub dead: bool,
    pub status: StatusEffects,
    pub recovery: RecoveryTimers,
    pub weapon: Option<Weapon>,
    pub armor: ArmorSet,
    pub combat: CombatFlags,
    pub performance: Performance,
    pub ledger: DamageLedger,
    /// Set when an attack lands; the owning queue uses it to pace recovery
    pub action_recovery: bool,
    skill_mods: HashMap<String, i32>,
    /// Active enhancement skills: skill name -> (skill mod, bonus)
    enhancements: BTreeMap<String, (String, i32)>,
    defenders: Vec<ObjectId>,
    outbox: Vec<Notice>,
}

impl Creature {
    fn with_kind(id: ObjectId, name: impl Into<String>, kind: CreatureKind) -> Self {
        Creature {
            id,
            name: name.into(),
            kind,
            level: 1,
            ham: Ham::default(),
            shock_wounds: 0,
            attributes: Attributes::default(),
            posture: Posture::Upright,
            mounted: false,
            dead: false,
            status: StatusEffects::new(),
            recovery: RecoveryTimers::default(),
            weapon: None,
            armor: ArmorSet::new(),
            combat: CombatFlags::PEACE,
            performance: Performance::default(),
            ledger: DamageLedger::default(),
            action_recovery: false,
            skill_mods: HashMap::new(),
            enhancements: BTreeMap::new(),
            defenders: Vec::new(),
            outbox: Vec::new(),
        }
    }

    pub fn player(id: ObjectId, name: impl Into<String>, data: PlayerData) -> Self {
        Self::with_kind(id, name, CreatureKind::Player(data))
    }

    pub fn autonomous(id: ObjectId, name: impl Into<String>, data: AutonomousData) -> Self {
        Self::with_kind(id, name, CreatureKind::Autonomous(data))
    }

    pub fn with_ham(mut self, ham: Ham) -> Self {
        self.ham = ham;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_armor(mut self, location: BodyLocation, armor: Armor) -> Self {
        self.armor.equip(location, armor);
        self
    }

    pub fn with_skill_mod(mut self, name: impl Into<String>, value: i32) -> Self {
        self.set_skill_mod(name, value);
        self
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, CreatureKind::Player(_))
    }

    pub fn is_autonomous(&self) -> bool {
        matches!(self.kind, CreatureKind::Autonomous(_))
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        match &self.kind {
            CreatureKind::Player(p) => Some(p),
            CreatureKind::Autonomous(_) => None,
        }
    }

    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            CreatureKind::Player(p) => Some(p),
            CreatureKind::Autonomous(_) => None,
        }
    }

    pub fn autonomous_data_mut(&mut self) -> Option<&mut AutonomousData> {
        match &mut self.kind {
            CreatureKind::Autonomous(a) => Some(a),
            CreatureKind::Player(_) => None,
        }
    }

    pub fn is_immune(&self) -> bool {
        self.player_data().is_some_and(|p| p.immune)
    }

    /// Autonomous creatures are always "online"
    pub fn is_online(&self) -> bool {
        self.player_data().map_or(true, |p| p.online)
    }

    // -- skill mods --

    /// Named modifier including active enhancement bonuses; zero when absent
    pub fn skill_mod(&self, name: &str) -> i32 {
        self.skill_mods.get(name).copied().unwrap_or(0)
    }

    pub fn set_skill_mod(&mut self, name: impl Into<String>, value: i32) {
        self.skill_mods.insert(name.into(), value);
    }

    fn adjust_skill_mod(&mut self, name: &str, delta: i32) {
        *self.skill_mods.entry(name.to_string()).or_insert(0) += delta;
    }

    pub fn has_enhancement(&self, skill: &str) -> bool {
        self.enhancements.contains_key(skill)
    }

    /// Grant a temporary bonus; false if `skill` is already active
    pub fn apply_enhancement(&mut self, skill: &str, skill_mod: &str, bonus: i32) -> bool {
        if self.has_enhancement(skill) {
            return false;
        }
        self.enhancements
            .insert(skill.to_string(), (skill_mod.to_string(), bonus));
        self.adjust_skill_mod(skill_mod, bonus);
        true
    }

    /// Revert a granted bonus; false if `skill` was not active
    pub fn revert_enhancement(&mut self, skill: &str) -> bool {
        match self.enhancements.remove(skill) {
            Some((skill_mod, bonus)) => {
                self.adjust_skill_mod(&skill_mod, -bonus);
                true
            }
            None => false,
        }
    }

    // -- health --

    pub fn is_incapacitated(&self) -> bool {
        self.ham.is_incapacitated()
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_dead_or_incapacitated(&self) -> bool {
        self.dead || self.is_incapacitated()
    }

    /// Shock-driven debuff on defense and wound chance, in `[0, 1]`
    pub fn bf_ratio(&self) -> f32 {
        ((self.shock_wounds - 250).max(0) as f32 / 1000.0).min(1.0)
    }

    /// `value` less the shock debuff share
    pub fn shock_reduced(&self, value: i32) -> i32 {
        value - (value as f32 * self.bf_ratio()) as i32
    }

    pub fn weapon_type(&self) -> WeaponType {
        self.weapon
            .as_ref()
            .map_or(WeaponType::Unarmed, |w| w.weapon_type)
    }

    /// Holding no weapon
    pub fn is_unarmed(&self) -> bool {
        self.weapon.is_none()
    }

    // -- defenders & combat state --

    pub fn defenders(&self) -> &[ObjectId] {
        &self.defenders
    }

    pub fn has_defender(&self, id: ObjectId) -> bool {
        self.defenders.contains(&id)
    }

    /// Append `id` if not already engaged
    pub fn add_defender(&mut self, id: ObjectId) {
        if !self.has_defender(id) {
            self.defenders.push(id);
        }
    }

    /// Make `id` the primary defender, keeping the others behind it
    pub fn set_defender(&mut self, id: ObjectId) {
        self.defenders.retain(|d| *d != id);
        self.defenders.insert(0, id);
    }

    pub fn remove_defender(&mut self, id: ObjectId) {
        self.defenders.retain(|d| *d != id);
    }

    pub fn is_in_combat(&self) -> bool {
        self.combat.contains(CombatFlags::COMBAT)
    }

    pub fn clear_peace(&mut self) {
        self.combat.remove(CombatFlags::PEACE);
        self.combat.insert(CombatFlags::COMBAT);
    }

    /// Leave combat entirely
    pub fn clear_combat_state(&mut self) {
        self.combat = CombatFlags::PEACE;
        self.defenders.clear();
    }

    // -- performance --

    pub fn stop_performing(&mut self) {
        self.performance.performing = None;
    }

    pub fn stop_watching(&mut self) {
        self.performance.watching = None;
    }

    pub fn stop_listening(&mut self) {
        self.performance.listening = None;
    }

    // -- notices --

    /// Queue a notice for the client; autonomous creatures have none
    pub fn notify(&mut self, notice: Notice) {
        if self.is_player() {
            self.outbox.push(notice);
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.outbox
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.outbox)
    }

    /// Whether a system message with `key` is queued
    pub fn was_told(&self, key: &str) -> bool {
        self.outbox.iter().any(|n| n.system_key() == Some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Faction;

    fn player() -> Creature {
        Creature::player(ObjectId(1), "Han", PlayerData::new(Faction::Rebel))
    }

    #[test]
    fn test_bf_ratio() {
        let mut c = player();
        assert_eq!(c.bf_ratio(), 0.0);
        c.shock_wounds = 750;
        assert!((c.bf_ratio() - 0.5).abs() < f32::EPSILON);
        c.shock_wounds = 5000;
        assert!((c.bf_ratio() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_enhancement_round_trip() {
        let mut c = player().with_skill_mod("melee_accuracy", 10);
        assert!(c.apply_enhancement("berserk1", "melee_accuracy", 25));
        assert!(!c.apply_enhancement("berserk1", "melee_accuracy", 25));
        assert_eq!(c.skill_mod("melee_accuracy"), 35);
        assert!(c.revert_enhancement("berserk1"));
        assert_eq!(c.skill_mod("melee_accuracy"), 10);
        assert!(!c.revert_enhancement("berserk1"));
    }

    #[test]
    fn test_set_defender_moves_to_front() {
        let mut c = player();
        c.add_defender(ObjectId(5));
        c.add_defender(ObjectId(6));
        c.add_defender(ObjectId(5));
        assert_eq!(c.defenders(), &[ObjectId(5), ObjectId(6)]);
        c.set_defender(ObjectId(6));
        assert_eq!(c.defenders(), &[ObjectId(6), ObjectId(5)]);
    }

    #[test]
    fn test_autonomous_drops_notices() {
        let mut npc = Creature::autonomous(ObjectId(2), "rancor", AutonomousData::default());
        npc.notify(Notice::system("cbt_spam", "miss"));
        assert!(npc.notices().is_empty());

        let mut p = player();
        p.notify(Notice::system("cbt_spam", "miss"));
        assert!(p.was_told("miss"));
    }
}
