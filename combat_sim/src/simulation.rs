//! Drains every actor's queue through one shared engine on worker threads

use crate::scenario::Scenario;
use anyhow::{anyhow, Result};
use combat_core::env::{BroadcastLog, CombatEnv, EventQueue, ManualClock, SeededRng};
use combat_core::object::WorldObject;
use combat_core::types::ObjectId;
use combat_core::{CombatEngine, QueuedAction, SkillRegistry, Zone};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Simulated epoch the clock starts from
const START_MS: u64 = 1_000_000;

/// One executed action
#[derive(Debug, Clone)]
pub struct ActionRecord {
    pub action: QueuedAction,
    pub worker: usize,
    /// Seconds the action occupied the actor; zero when rejected
    pub duration: f32,
}

impl ActionRecord {
    pub fn accepted(&self) -> bool {
        self.duration > 0.0
    }
}

pub struct Simulation {
    engine: CombatEngine,
    clock: Arc<ManualClock>,
    events: Arc<EventQueue>,
    broadcasts: Arc<BroadcastLog>,
    queues: Vec<Vec<QueuedAction>>,
    roster: Vec<ObjectId>,
}

impl Simulation {
    /// Deploy the scenario into a fresh zone and settle its duel requests
    pub fn build(scenario: &Scenario, skills: SkillRegistry, seed: u64) -> Self {
        let clock = Arc::new(ManualClock::starting_at(START_MS));
        let events = Arc::new(EventQueue::new());
        let broadcasts = Arc::new(BroadcastLog::new());
        let env = CombatEnv::new(scenario.constants.clone())
            .with_rng(Arc::new(SeededRng::new(seed)))
            .with_clock(clock.clone())
            .with_scheduler(events.clone())
            .with_broadcaster(broadcasts.clone());

        let zone = Arc::new(Zone::new());
        let mut roster = Vec::with_capacity(scenario.actors.len());
        let mut queues = Vec::with_capacity(scenario.actors.len());
        for actor in &scenario.actors {
            zone.insert(WorldObject::new(actor.creature()), actor.position, actor.cell);
            roster.push(ObjectId(actor.id));
            queues.push(actor.actions());
        }
        for object in &scenario.objects {
            zone.insert(WorldObject::new(object.destructible()), object.position, object.cell);
        }
        info!(objects = zone.len(), seed, "zone populated");

        let engine = CombatEngine::new(env, zone, Arc::new(skills));
        let simulation = Simulation {
            engine,
            clock,
            events,
            broadcasts,
            queues,
            roster,
        };
        for duel in &scenario.duels {
            simulation.request_duel(ObjectId(duel.challenger), ObjectId(duel.target));
        }
        simulation
    }

    fn request_duel(&self, challenger: ObjectId, target: ObjectId) {
        let Some(handle) = self.engine.zone().lookup(challenger) else {
            return;
        };
        let mut guard = handle.lock();
        let Some(player) = guard.as_creature_mut() else {
            warn!(%challenger, "only creatures can duel");
            return;
        };
        let accepted = self.engine.duels().request_duel_by_id(player, target);
        debug!(%challenger, %target, accepted, "duel request");
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn roster(&self) -> &[ObjectId] {
        &self.roster
    }

    pub fn broadcasts(&self) -> &BroadcastLog {
        &self.broadcasts
    }

    pub fn now_ms(&self) -> u64 {
        self.engine.env().now_ms()
    }

    /// Run every queue to completion, spreading actors over `threads` workers
    ///
    /// A worker steps its actors round-robin, one action each per round, so
    /// actors on the same worker interleave the way they would in a shared
    /// world loop. Records come back grouped by worker in execution order.
    pub fn run(&self, threads: usize) -> Result<Vec<ActionRecord>> {
        let threads = threads.clamp(1, self.queues.len().max(1));
        let mut shares: Vec<Vec<&[QueuedAction]>> = vec![Vec::new(); threads];
        for (i, queue) in self.queues.iter().enumerate() {
            shares[i % threads].push(queue.as_slice());
        }
        info!(threads, actors = self.queues.len(), "draining action queues");

        thread::scope(|scope| {
            let workers: Vec<_> = shares
                .into_iter()
                .enumerate()
                .map(|(worker, share)| scope.spawn(move || self.drain(worker, &share)))
                .collect();

            let mut records = Vec::new();
            for (worker, handle) in workers.into_iter().enumerate() {
                let drained = handle
                    .join()
                    .map_err(|_| anyhow!("worker {worker} panicked"))?;
                records.extend(drained);
            }
            Ok(records)
        })
    }

    fn drain(&self, worker: usize, share: &[&[QueuedAction]]) -> Vec<ActionRecord> {
        let rounds = share.iter().map(|q| q.len()).max().unwrap_or(0);
        let mut records = Vec::new();

        for round in 0..rounds {
            for queue in share {
                let Some(action) = queue.get(round) else {
                    continue;
                };
                let duration = self.engine.execute(action);
                if duration > 0.0 {
                    self.clock.advance((duration * 1000.0) as u64);
                }
                self.run_due_events();
                records.push(ActionRecord {
                    action: action.clone(),
                    worker,
                    duration,
                });
            }
        }
        debug!(worker, actions = records.len(), "worker finished");
        records
    }

    /// Apply whatever scheduled events have come due on the simulated clock
    pub fn run_due_events(&self) -> usize {
        let due = self.events.drain_due(self.now_ms());
        for event in &due {
            self.engine.run_event(event);
        }
        due.len()
    }

    /// Let the clock run past every pending event and apply them in order
    pub fn settle(&self) -> usize {
        let pending = self.events.drain_due(u64::MAX);
        for event in &pending {
            if event.due_ms > self.now_ms() {
                self.clock.set(event.due_ms);
            }
            self.engine.run_event(event);
        }
        pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::default_skills;

    fn brawl() -> Scenario {
        Scenario::parse(
            r#"
            [[actor]]
            id = 1
            name = "Rook"
            kind = "autonomous"
            position = { x = 0.0, y = 0.0 }
            skill_mods = { unarmed_damage = 10 }
            queue = [{ skill = "attack", target = 2, repeat = 5 }, { skill = "berserk1" }]

            [[actor]]
            id = 2
            name = "Brute"
            kind = "autonomous"
            position = { x = 3.0, y = 0.0 }
            skill_mods = { unarmed_damage = 10 }
            queue = [{ skill = "attack", target = 1, repeat = 5 }]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_every_queued_action_is_recorded() {
        let scenario = brawl();
        let simulation = Simulation::build(&scenario, default_skills(), 7);
        let records = simulation.run(2).unwrap();

        assert_eq!(records.len(), 11);
        assert!(records.iter().any(ActionRecord::accepted));
        assert!(simulation.now_ms() > START_MS);
    }

    #[test]
    fn test_locks_released_after_run() {
        let scenario = brawl();
        let simulation = Simulation::build(&scenario, default_skills(), 11);
        simulation.run(4).unwrap();

        for id in simulation.roster() {
            let handle = simulation.engine().zone().lookup(*id).unwrap();
            assert_eq!(handle.holder(), None);
        }
    }

    #[test]
    fn test_settle_expires_enhancements() {
        let scenario = brawl();
        let simulation = Simulation::build(&scenario, default_skills(), 3);
        simulation.run(1).unwrap();
        simulation.settle();

        let handle = simulation.engine().zone().lookup(ObjectId(1)).unwrap();
        let guard = handle.lock();
        let rook = guard.as_creature().unwrap();
        assert!(!rook.has_enhancement("berserk1"));
    }
}
