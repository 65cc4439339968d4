//! Scenario files: who stands where, what they carry, what they queue

use anyhow::{bail, Context, Result};
use combat_core::config::CombatConstants;
use combat_core::equipment::{Armor, Weapon};
use combat_core::object::{AutonomousData, Creature, Destructible, Ham, PlayerData};
use combat_core::types::{BodyLocation, Faction, ObjectId, Position, Resistances};
use combat_core::QueuedAction;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub constants: CombatConstants,
    #[serde(default, rename = "actor")]
    pub actors: Vec<ActorEntry>,
    #[serde(default, rename = "object")]
    pub objects: Vec<ObjectEntry>,
    #[serde(default, rename = "duel")]
    pub duels: Vec<DuelEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    #[default]
    Player,
    Autonomous,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActorEntry {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub kind: ActorKind,
    #[serde(default)]
    pub faction: Faction,
    #[serde(default)]
    pub overt: bool,
    pub position: Position,
    #[serde(default)]
    pub cell: Option<u64>,
    #[serde(default = "default_level")]
    pub level: i32,
    /// Health, action and mind maxima
    #[serde(default)]
    pub ham: Option<[i32; 3]>,
    #[serde(default)]
    pub skill_mods: HashMap<String, i32>,
    #[serde(default)]
    pub weapon: Option<Weapon>,
    #[serde(default)]
    pub armor: Vec<ArmorEntry>,
    /// Intrinsic armor level of an autonomous creature
    #[serde(default)]
    pub hide: i32,
    #[serde(default)]
    pub resists: Resistances,
    #[serde(default)]
    pub queue: Vec<ActionEntry>,
}

fn default_level() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArmorEntry {
    pub location: BodyLocation,
    #[serde(flatten)]
    pub armor: Armor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionEntry {
    pub skill: String,
    #[serde(default)]
    pub target: Option<u64>,
    #[serde(default)]
    pub modifier: String,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntry {
    pub id: u64,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub cell: Option<u64>,
    pub max_condition: i32,
    #[serde(default = "default_attackable")]
    pub attackable: bool,
}

fn default_attackable() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct DuelEntry {
    pub challenger: u64,
    pub target: u64,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("in scenario {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content).context("malformed scenario")?;
        scenario.constants.validate()?;
        scenario.check_ids()?;
        Ok(scenario)
    }

    /// Ids must be unique and nonzero, and every reference must resolve
    fn check_ids(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        let ids = self
            .actors
            .iter()
            .map(|a| a.id)
            .chain(self.objects.iter().map(|o| o.id));
        for id in ids {
            if ObjectId(id).is_none() {
                bail!("object id 0 is reserved");
            }
            if !seen.insert(id) {
                bail!("duplicate object id {id}");
            }
        }

        for actor in &self.actors {
            for action in &actor.queue {
                if let Some(target) = action.target {
                    if !seen.contains(&target) {
                        bail!("{} queues {} at unknown object {target}", actor.name, action.skill);
                    }
                }
            }
        }
        for duel in &self.duels {
            if !seen.contains(&duel.challenger) || !seen.contains(&duel.target) {
                bail!("duel between {} and {} names an unknown object", duel.challenger, duel.target);
            }
        }
        Ok(())
    }
}

impl ActorEntry {
    pub fn creature(&self) -> Creature {
        let id = ObjectId(self.id);
        let mut creature = match self.kind {
            ActorKind::Player => Creature::player(
                id,
                &self.name,
                PlayerData {
                    overt: self.overt,
                    ..PlayerData::new(self.faction)
                },
            ),
            ActorKind::Autonomous => Creature::autonomous(
                id,
                &self.name,
                AutonomousData {
                    armor: self.hide,
                    resists: self.resists.clone(),
                    ..Default::default()
                },
            ),
        }
        .with_level(self.level);

        if let Some([health, action, mind]) = self.ham {
            creature = creature.with_ham(Ham::new(health, action, mind));
        }
        if let Some(weapon) = &self.weapon {
            creature = creature.with_weapon(weapon.clone());
        }
        for piece in &self.armor {
            creature = creature.with_armor(piece.location, piece.armor.clone());
        }
        for (name, value) in &self.skill_mods {
            creature.set_skill_mod(name.clone(), *value);
        }
        creature
    }

    /// The queue with repeats expanded
    pub fn actions(&self) -> Vec<QueuedAction> {
        let id = ObjectId(self.id);
        self.queue
            .iter()
            .flat_map(|entry| {
                let mut action = QueuedAction::new(id, &entry.skill).with_modifier(&entry.modifier);
                action.target = entry.target.map(ObjectId);
                std::iter::repeat(action).take(entry.repeat as usize)
            })
            .collect()
    }
}

impl ObjectEntry {
    pub fn destructible(&self) -> Destructible {
        let mut object = Destructible::new(ObjectId(self.id), &self.name, self.max_condition);
        object.attackable = self.attackable;
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKIRMISH: &str = include_str!("../scenarios/skirmish.toml");

    #[test]
    fn test_bundled_scenario_parses() {
        let scenario = Scenario::parse(SKIRMISH).unwrap();
        assert!(!scenario.actors.is_empty());
        assert!(scenario.actors.iter().any(|a| !a.queue.is_empty()));
    }

    #[test]
    fn test_repeats_expand() {
        let scenario = Scenario::parse(
            r#"
            [[actor]]
            id = 1
            name = "Rook"
            position = { x = 0.0, y = 0.0 }
            queue = [{ skill = "attack", target = 2, repeat = 3 }, { skill = "kneel" }]

            [[actor]]
            id = 2
            name = "Dummy"
            kind = "autonomous"
            position = { x = 2.0, y = 0.0 }
            "#,
        )
        .unwrap();

        let actions = scenario.actors[0].actions();
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[2].target, Some(ObjectId(2)));
        assert_eq!(actions[3].skill, "kneel");
        assert!(scenario.actors[1].creature().is_autonomous());
    }

    #[test]
    fn test_rejects_unknown_target_and_duplicates() {
        let dangling = r#"
            [[actor]]
            id = 1
            name = "Rook"
            position = { x = 0.0, y = 0.0 }
            queue = [{ skill = "attack", target = 9 }]
        "#;
        assert!(Scenario::parse(dangling).is_err());

        let duplicate = r#"
            [[actor]]
            id = 1
            name = "Rook"
            position = { x = 0.0, y = 0.0 }

            [[object]]
            id = 1
            name = "Crate"
            position = { x = 1.0, y = 0.0 }
            max_condition = 100
        "#;
        assert!(Scenario::parse(duplicate).is_err());
    }

    #[test]
    fn test_player_fields_carry_over() {
        let scenario = Scenario::parse(
            r#"
            [[actor]]
            id = 4
            name = "Vex"
            faction = "imperial"
            overt = true
            position = { x = 0.0, y = 0.0 }
            ham = [800, 900, 700]
            skill_mods = { unarmed_damage = 10 }

            [[actor.armor]]
            location = "chest"
            name = "Padded vest"
            rating = 32
            "#,
        )
        .unwrap();

        let creature = scenario.actors[0].creature();
        assert_eq!(creature.ham.health.max, 800);
        assert_eq!(creature.skill_mod("unarmed_damage"), 10);
        assert!(creature.player_data().is_some_and(|p| p.overt && p.faction == Faction::Imperial));
        assert!(creature.armor.at(BodyLocation::Chest).is_some());
    }
}
