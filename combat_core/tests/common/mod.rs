//! Shared setup for the integration tests

#![allow(dead_code)]

use combat_core::env::{BroadcastLog, CombatRng};
use combat_core::prelude::*;
use std::sync::Arc;

pub struct World {
    pub engine: CombatEngine,
    pub log: Arc<BroadcastLog>,
}

impl World {
    pub fn new(rng: Arc<dyn CombatRng>) -> Self {
        let log = Arc::new(BroadcastLog::new());
        let env = CombatEnv::new(CombatConstants::default())
            .with_rng(rng)
            .with_clock(Arc::new(ManualClock::starting_at(10_000)))
            .with_broadcaster(log.clone());
        let engine = CombatEngine::new(env, Arc::new(Zone::new()), Arc::new(default_skills()));
        World { engine, log }
    }

    /// Every roll comes up 0: defaults animations to the first choice, hits,
    /// and lands every state that is not resisted
    pub fn lowest_rolls() -> Self {
        Self::new(Arc::new(ScriptedRng::constant(0)))
    }

    pub fn deploy(&self, creature: impl Into<ObjectState>, x: f32, y: f32) -> ObjectHandle {
        self.deploy_in(creature, Position::new(x, y), None)
    }

    pub fn deploy_in(&self, state: impl Into<ObjectState>, at: Position, cell: Option<u64>) -> ObjectHandle {
        let handle = WorldObject::new(state);
        self.engine.zone().insert(Arc::clone(&handle), at, cell);
        handle
    }

    pub fn attack(&self, actor: u64, skill: &str, target: u64) -> f32 {
        self.engine
            .execute(&QueuedAction::new(ObjectId(actor), skill).at(ObjectId(target)))
    }
}

pub fn player(id: u64, faction: Faction) -> Creature {
    Creature::player(ObjectId(id), format!("player{id}"), PlayerData::new(faction))
}

pub fn npc(id: u64) -> Creature {
    Creature::autonomous(ObjectId(id), format!("npc{id}"), AutonomousData::default())
        .with_skill_mod("unarmed_damage", 10)
}

pub fn health(handle: &ObjectHandle) -> i32 {
    handle
        .lock()
        .as_creature()
        .map_or(0, |c| c.ham.current(HamPool::Health))
}

pub fn untouched(handle: &ObjectHandle) -> bool {
    let guard = handle.lock();
    match guard.as_creature() {
        Some(c) => c.ham == Ham::default() && c.defenders().is_empty(),
        None => guard.defenders().is_empty(),
    }
}
