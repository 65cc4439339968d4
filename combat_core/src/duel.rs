//! Duel protocol
//!
//! A duel between A and B is mutual exactly while A has challenged B and B
//! has challenged A. Each player keeps its own outgoing challenges plus the
//! set of mutual partners; both sides are promoted together when the second
//! challenge arrives and demoted together when either challenge goes away.
//!
//! Every operation runs with the initiating player's lock held by the caller
//! and cross-locks the counterpart for its duration.

use crate::error::CombatError;
use crate::object::{Creature, Notice, ObjectState, PlayerData, WorldObject};
use crate::types::ObjectId;
use crate::zone::Zone;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const DUEL: &str = "duel";

/// Whether player `attacker` may damage player `target`
///
/// True while the two are in a mutual duel, or when both are overt for
/// factions at war. Non-player pairs are always allowed.
pub fn can_attack(attacker: &Creature, target: &Creature) -> bool {
    match (attacker.player_data(), target.player_data()) {
        (Some(a), Some(t)) => {
            let dueling = a.duels.is_partner(target.id) && t.duels.is_partner(attacker.id);
            dueling || (a.overt && t.overt && a.faction.hates(t.faction))
        }
        _ => true,
    }
}

fn pvp(creature: &Creature) -> Result<&PlayerData, CombatError> {
    creature
        .player_data()
        .ok_or(CombatError::InvalidTarget(creature.id))
}

fn pvp_mut(creature: &mut Creature) -> Result<&mut PlayerData, CombatError> {
    let id = creature.id;
    creature
        .player_data_mut()
        .ok_or(CombatError::InvalidTarget(id))
}

fn opponent(state: &mut ObjectState) -> Result<&mut Creature, CombatError> {
    let id = state.id();
    match state.as_creature_mut() {
        Some(creature) if creature.is_player() => Ok(creature),
        _ => Err(CombatError::InvalidTarget(id)),
    }
}

/// Send each player the other's refreshed PvP status
fn exchange_status(player: &mut Creature, other: &mut Creature) {
    if let Some(status) = other.player_data().map(|p| p.pvp_status_for(player.id)) {
        player.notify(Notice::PvpStatusUpdate {
            subject: other.id,
            status,
        });
    }
    if let Some(status) = player.player_data().map(|p| p.pvp_status_for(other.id)) {
        other.notify(Notice::PvpStatusUpdate {
            subject: player.id,
            status,
        });
    }
}

/// Tear down a mutual duel on both sides, if there is one
fn dissolve(player: &mut Creature, other: &mut Creature) -> Result<bool, CombatError> {
    let (player_id, other_id) = (player.id, other.id);
    let was_partner = pvp_mut(player)?.duels.demote(other_id);
    let was_partner = pvp_mut(other)?.duels.demote(player_id) || was_partner;
    if was_partner {
        exchange_status(player, other);
    }
    Ok(was_partner)
}

fn stop_spectating(player: &mut Creature) {
    player.stop_watching();
    player.stop_listening();
}

#[derive(Debug, Clone)]
pub struct DuelCoordinator {
    zone: Arc<Zone>,
    lock_wait: Duration,
}

impl DuelCoordinator {
    pub fn new(zone: Arc<Zone>, lock_wait: Duration) -> Self {
        DuelCoordinator { zone, lock_wait }
    }

    fn settle(player: &Creature, command: &str, result: Result<bool, CombatError>) -> bool {
        match result {
            Ok(done) => done,
            Err(err) if err.is_rejection() => {
                debug!(player = %player.id, command, error = %err, "duel command rejected");
                false
            }
            Err(err) if err.is_resource_unavailable() => {
                warn!(player = %player.id, command, error = %err, "duel command aborted");
                false
            }
            Err(err) => {
                error!(player = %player.id, command, error = %err, "duel command failed");
                false
            }
        }
    }

    /// Challenge `target`, or accept its standing challenge
    ///
    /// Returns true when a challenge was recorded.
    pub fn request_duel(&self, player: &mut Creature, target: &WorldObject) -> bool {
        let result = self.try_request_duel(player, target);
        Self::settle(player, "request_duel", result)
    }

    fn try_request_duel(&self, player: &mut Creature, target: &WorldObject) -> Result<bool, CombatError> {
        stop_spectating(player);

        let mut guard = target.cross_lock(player.id, self.lock_wait)?;
        let other = opponent(&mut guard)?;
        if !other.is_online() {
            return Err(CombatError::InvalidTarget(other.id));
        }

        let (mine, theirs) = (pvp(player)?, pvp(other)?);
        if mine.overt && theirs.overt && mine.faction.hates(theirs.faction) {
            return Ok(false);
        }
        if mine.duels.has_requested(other.id) {
            player.notify(Notice::system_about(DUEL, "already_challenged", other.id));
            return Ok(false);
        }
        let accepted = theirs.duels.has_requested(player.id);

        info!(player = %player.id, target = %other.id, "requesting duel");
        pvp_mut(player)?.duels.request(other.id);

        if accepted {
            pvp_mut(player)?.duels.promote(other.id);
            pvp_mut(other)?.duels.promote(player.id);
            exchange_status(player, other);
            player.notify(Notice::system_about(DUEL, "accept_self", other.id));
            other.notify(Notice::system_about(DUEL, "accept_target", player.id));
        } else {
            player.notify(Notice::system_about(DUEL, "challenge_self", other.id));
            other.notify(Notice::system_about(DUEL, "challenge_target", player.id));
        }
        Ok(true)
    }

    /// Withdraw the challenge to `target`, ending the duel if it was mutual
    pub fn request_end_duel(&self, player: &mut Creature, target: &WorldObject) -> bool {
        let result = self.try_request_end_duel(player, target);
        Self::settle(player, "request_end_duel", result)
    }

    fn try_request_end_duel(&self, player: &mut Creature, target: &WorldObject) -> Result<bool, CombatError> {
        stop_spectating(player);

        let mut guard = target.cross_lock(player.id, self.lock_wait)?;
        let other = opponent(&mut guard)?;

        if !pvp(player)?.duels.has_requested(other.id) {
            player.notify(Notice::system_about(DUEL, "not_dueling", other.id));
            return Ok(false);
        }

        info!(player = %player.id, target = %other.id, "ending duel");
        pvp_mut(player)?.duels.withdraw(other.id);

        if pvp_mut(other)?.duels.withdraw(player.id) {
            dissolve(player, other)?;
            player.notify(Notice::system_about(DUEL, "end_self", other.id));
            other.notify(Notice::system_about(DUEL, "end_target", player.id));
        }
        Ok(true)
    }

    /// Refuse the challenge `target` sent to `player`
    pub fn decline_duel(&self, player: &mut Creature, target: &WorldObject) -> bool {
        let result = self.try_decline_duel(player, target);
        Self::settle(player, "decline_duel", result)
    }

    fn try_decline_duel(&self, player: &mut Creature, target: &WorldObject) -> Result<bool, CombatError> {
        stop_spectating(player);

        let mut guard = target.cross_lock(player.id, self.lock_wait)?;
        let other = opponent(&mut guard)?;
        pvp(player)?;

        if !pvp_mut(other)?.duels.withdraw(player.id) {
            return Ok(false);
        }
        dissolve(player, other)?;
        player.notify(Notice::system_about(DUEL, "cancel_self", other.id));
        other.notify(Notice::system_about(DUEL, "cancel_target", player.id));
        Ok(true)
    }

    /// Drop every duel edge `player` has, tearing down each mutual duel
    ///
    /// Counterparts that have left the zone are dropped from the list
    /// without being notified.
    pub fn free_duel_list(&self, player: &mut Creature) {
        let counterparts = match player.player_data() {
            Some(data) if !data.duels.is_empty() => data.duels.counterparts(),
            _ => return,
        };

        stop_spectating(player);
        info!(player = %player.id, count = counterparts.len(), "freeing duel list");

        for other_id in counterparts {
            match self.zone.lookup(other_id) {
                Some(handle) => {
                    let result = self.release_counterpart(player, &handle);
                    Self::settle(player, "free_duel_list", result);
                }
                None => warn!(player = %player.id, counterpart = %other_id, "duel partner no longer in zone"),
            }
            if let Some(data) = player.player_data_mut() {
                data.duels.withdraw(other_id);
                data.duels.demote(other_id);
            }
        }
    }

    fn release_counterpart(&self, player: &mut Creature, target: &WorldObject) -> Result<bool, CombatError> {
        let mut guard = target.cross_lock(player.id, self.lock_wait)?;
        let other = opponent(&mut guard)?;

        if !pvp_mut(other)?.duels.withdraw(player.id) {
            pvp_mut(player)?.duels.withdraw(other.id);
            return Ok(false);
        }
        pvp_mut(player)?.duels.withdraw(other.id);
        dissolve(player, other)?;
        player.notify(Notice::system_about(DUEL, "end_self", other.id));
        other.notify(Notice::system_about(DUEL, "end_target", player.id));
        Ok(true)
    }

    fn counterpart(&self, player: &Creature, target: ObjectId) -> Option<Arc<WorldObject>> {
        if target.is_none() || target == player.id {
            return None;
        }
        let handle = self.zone.lookup(target);
        if handle.is_none() {
            debug!(player = %player.id, %target, "duel counterpart not found");
        }
        handle
    }

    pub fn request_duel_by_id(&self, player: &mut Creature, target: ObjectId) -> bool {
        match self.counterpart(player, target) {
            Some(handle) => self.request_duel(player, &handle),
            None => false,
        }
    }

    /// Id 0 frees the whole duel list
    pub fn request_end_duel_by_id(&self, player: &mut Creature, target: ObjectId) -> bool {
        if target.is_none() {
            self.free_duel_list(player);
            return true;
        }
        match self.counterpart(player, target) {
            Some(handle) => self.request_end_duel(player, &handle),
            None => false,
        }
    }

    pub fn decline_duel_by_id(&self, player: &mut Creature, target: ObjectId) -> bool {
        match self.counterpart(player, target) {
            Some(handle) => self.decline_duel(player, &handle),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ObjectHandle, PvpStatus};
    use crate::types::{Faction, Position};

    fn player(id: u64, faction: Faction) -> ObjectHandle {
        WorldObject::new(Creature::player(
            ObjectId(id),
            format!("player{id}"),
            PlayerData::new(faction),
        ))
    }

    fn setup() -> (DuelCoordinator, ObjectHandle, ObjectHandle) {
        let zone = Arc::new(Zone::new());
        let a = player(1, Faction::Rebel);
        let b = player(2, Faction::Imperial);
        zone.insert(Arc::clone(&a), Position::new(0.0, 0.0), None);
        zone.insert(Arc::clone(&b), Position::new(1.0, 0.0), None);
        (DuelCoordinator::new(zone, Duration::from_millis(20)), a, b)
    }

    fn act<R>(handle: &ObjectHandle, f: impl FnOnce(&mut Creature) -> R) -> R {
        let mut guard = handle.lock();
        f(guard.as_creature_mut().unwrap())
    }

    fn last_status(creature: &Creature) -> Option<PvpStatus> {
        creature.notices().iter().rev().find_map(|n| match n {
            Notice::PvpStatusUpdate { status, .. } => Some(*status),
            _ => None,
        })
    }

    #[test]
    fn test_reciprocal_request_makes_duel_mutual() {
        let (duels, a, b) = setup();

        assert!(act(&a, |pa| duels.request_duel(pa, &b)));
        act(&a, |pa| assert!(pa.was_told("challenge_self")));
        act(&b, |pb| assert!(pb.was_told("challenge_target")));

        assert!(act(&b, |pb| duels.request_duel(pb, &a)));

        let flags = PvpStatus::ATTACKABLE | PvpStatus::AGGRESSIVE;
        act(&a, |pa| {
            assert!(pa.was_told("accept_target"));
            assert!(last_status(pa).unwrap().contains(flags));
            assert!(pa.player_data().unwrap().pvp_status_for(ObjectId(2)).contains(flags));
        });
        act(&b, |pb| {
            assert!(pb.was_told("accept_self"));
            assert!(!pb.was_told("challenge_self"));
            assert!(last_status(pb).unwrap().contains(flags));
        });

        let (ga, gb) = (a.lock(), b.lock());
        assert!(can_attack(ga.as_creature().unwrap(), gb.as_creature().unwrap()));
    }

    #[test]
    fn test_repeat_challenge_rejected() {
        let (duels, a, b) = setup();
        assert!(act(&a, |pa| duels.request_duel(pa, &b)));
        assert!(!act(&a, |pa| duels.request_duel(pa, &b)));
        act(&a, |pa| assert!(pa.was_told("already_challenged")));
    }

    #[test]
    fn test_overt_enemies_skip_dueling() {
        let (duels, a, b) = setup();
        for handle in [&a, &b] {
            act(handle, |p| p.player_data_mut().unwrap().overt = true);
        }
        assert!(!act(&a, |pa| duels.request_duel(pa, &b)));
        act(&a, |pa| assert!(pa.player_data().unwrap().duels.is_empty()));
    }

    #[test]
    fn test_end_duel_clears_both_sides() {
        let (duels, a, b) = setup();
        act(&a, |pa| duels.request_duel(pa, &b));
        act(&b, |pb| duels.request_duel(pb, &a));

        assert!(act(&b, |pb| duels.request_end_duel(pb, &a)));
        act(&a, |pa| {
            let data = pa.player_data().unwrap();
            assert!(data.duels.is_empty());
            assert!(!data.pvp_status_for(ObjectId(2)).contains(PvpStatus::ATTACKABLE));
            assert!(pa.was_told("end_target"));
            assert!(!last_status(pa).unwrap().contains(PvpStatus::ATTACKABLE));
        });
        act(&b, |pb| assert!(pb.player_data().unwrap().duels.is_empty()));
    }

    #[test]
    fn test_end_without_challenge_reports_not_dueling() {
        let (duels, a, b) = setup();
        assert!(!act(&a, |pa| duels.request_end_duel(pa, &b)));
        act(&a, |pa| assert!(pa.was_told("not_dueling")));
    }

    #[test]
    fn test_decline_removes_incoming_challenge() {
        let (duels, a, b) = setup();
        act(&a, |pa| duels.request_duel(pa, &b));
        assert!(act(&b, |pb| duels.decline_duel(pb, &a)));
        act(&a, |pa| {
            assert!(!pa.player_data().unwrap().duels.has_requested(ObjectId(2)));
            assert!(pa.was_told("cancel_target"));
        });
        assert!(!act(&b, |pb| duels.decline_duel(pb, &a)));
    }

    #[test]
    fn test_free_duel_list_tolerates_departed_partner() {
        let (duels, a, b) = setup();
        let c = player(3, Faction::Neutral);
        act(&a, |pa| duels.request_duel(pa, &b));
        act(&b, |pb| duels.request_duel(pb, &a));
        act(&a, |pa| duels.request_duel(pa, &c));

        // c was never deployed in the zone
        assert!(act(&a, |pa| duels.request_end_duel_by_id(pa, ObjectId::NONE)));
        act(&a, |pa| assert!(pa.player_data().unwrap().duels.is_empty()));
        act(&b, |pb| {
            assert!(pb.player_data().unwrap().duels.is_empty());
            assert!(pb.was_told("end_target"));
        });
    }

    #[test]
    fn test_by_id_rejects_self_and_unknown() {
        let (duels, a, _b) = setup();
        assert!(!act(&a, |pa| duels.request_duel_by_id(pa, ObjectId(1))));
        assert!(!act(&a, |pa| duels.request_duel_by_id(pa, ObjectId(42))));
        assert!(act(&a, |pa| duels.request_duel_by_id(pa, ObjectId(2))));
    }

    #[test]
    fn test_offline_target_rejected() {
        let (duels, a, b) = setup();
        act(&b, |pb| pb.player_data_mut().unwrap().online = false);
        assert!(!act(&a, |pa| duels.request_duel(pa, &b)));
    }
}
