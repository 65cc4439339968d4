//! Data specific to player-controlled and autonomous creatures

use crate::types::{Faction, ObjectId, Resistances};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

bitflags! {
    /// PvP status bits a player presents to a viewer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PvpStatus: u32 {
        const ATTACKABLE = 1 << 0;
        const AGGRESSIVE = 1 << 1;
        const OVERT = 1 << 2;
        const TEF = 1 << 3;
        const PLAYER = 1 << 4;
        const ENEMY = 1 << 5;
    }
}

/// Duel edges held by one player
///
/// `requested` holds outgoing challenges. `partners` holds the players with
/// whom both directions exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuelRelations {
    requested: BTreeSet<ObjectId>,
    partners: BTreeSet<ObjectId>,
}

impl DuelRelations {
    pub fn has_requested(&self, other: ObjectId) -> bool {
        self.requested.contains(&other)
    }

    pub fn request(&mut self, other: ObjectId) -> bool {
        self.requested.insert(other)
    }

    pub fn withdraw(&mut self, other: ObjectId) -> bool {
        self.requested.remove(&other)
    }

    pub fn is_partner(&self, other: ObjectId) -> bool {
        self.partners.contains(&other)
    }

    pub fn promote(&mut self, other: ObjectId) {
        self.partners.insert(other);
    }

    pub fn demote(&mut self, other: ObjectId) -> bool {
        self.partners.remove(&other)
    }

    pub fn requests(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.requested.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.requested.is_empty() && self.partners.is_empty()
    }

    /// Every counterpart this player has an edge with, either direction
    pub fn counterparts(&self) -> BTreeSet<ObjectId> {
        self.requested.union(&self.partners).copied().collect()
    }
}

#[derive(Debug, Clone)]
pub struct PlayerData {
    pub faction: Faction,
    /// Declared for faction PvP
    pub overt: bool,
    pub immune: bool,
    pub online: bool,
    pub force: i32,
    pub max_force: i32,
    pub duels: DuelRelations,
}

impl Default for PlayerData {
    fn default() -> Self {
        PlayerData {
            faction: Faction::Neutral,
            overt: false,
            immune: false,
            online: true,
            force: 0,
            max_force: 0,
            duels: DuelRelations::default(),
        }
    }
}

impl PlayerData {
    pub fn new(faction: Faction) -> Self {
        PlayerData {
            faction,
            ..Default::default()
        }
    }

    /// Status bits this player shows to `viewer`
    pub fn pvp_status_for(&self, viewer: ObjectId) -> PvpStatus {
        let mut status = PvpStatus::PLAYER;
        if self.overt {
            status |= PvpStatus::OVERT;
        }
        if self.duels.is_partner(viewer) {
            status |= PvpStatus::ATTACKABLE | PvpStatus::AGGRESSIVE;
        }
        status
    }

    /// Remove force if the whole cost is available
    pub fn spend_force(&mut self, cost: i32) -> bool {
        if cost <= 0 {
            return true;
        }
        if self.force < cost {
            return false;
        }
        self.force -= cost;
        true
    }
}

/// Server-controlled creature: intrinsic armor plus a threat table
#[derive(Debug, Clone, Default)]
pub struct AutonomousData {
    /// Armor resistance level compared against weapon armor piercing
    pub armor: i32,
    pub resists: Resistances,
    pub threat: HashMap<ObjectId, i64>,
    pub target: Option<ObjectId>,
}

impl AutonomousData {
    /// Record `damage` of threat against `attacker` and adopt it as target
    /// when idle
    pub fn retaliate(&mut self, attacker: ObjectId, damage: i32) {
        *self.threat.entry(attacker).or_insert(0) += i64::from(damage.max(0));
        if self.target.is_none() {
            self.target = Some(attacker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pvp_status_tracks_partners() {
        let mut player = PlayerData::new(Faction::Rebel);
        let rival = ObjectId(9);
        assert!(!player.pvp_status_for(rival).contains(PvpStatus::ATTACKABLE));

        player.duels.promote(rival);
        let status = player.pvp_status_for(rival);
        assert!(status.contains(PvpStatus::ATTACKABLE | PvpStatus::AGGRESSIVE));
        assert!(!player.pvp_status_for(ObjectId(10)).contains(PvpStatus::ATTACKABLE));
    }

    #[test]
    fn test_spend_force() {
        let mut player = PlayerData {
            force: 30,
            ..Default::default()
        };
        assert!(player.spend_force(0));
        assert!(!player.spend_force(31));
        assert!(player.spend_force(30));
        assert_eq!(player.force, 0);
    }

    #[test]
    fn test_retaliation_keeps_first_target() {
        let mut npc = AutonomousData::default();
        npc.retaliate(ObjectId(1), 50);
        npc.retaliate(ObjectId(2), 80);
        npc.retaliate(ObjectId(1), 10);
        assert_eq!(npc.target, Some(ObjectId(1)));
        assert_eq!(npc.threat[&ObjectId(1)], 60);
    }
}
