//! Services injected into the engine: randomness, time, broadcast, scheduling

mod broadcast;
mod clock;
mod rng;
mod scheduler;

pub use broadcast::{BroadcastLog, Broadcaster, NullBroadcaster, VisualEffect};
pub use clock::{Clock, ManualClock, SystemClock};
pub use rng::{CombatRng, ScriptedRng, SeededRng, ThreadRng};
pub use scheduler::{EventKind, EventQueue, EventScheduler, ScheduledEvent};

use crate::config::CombatConstants;
use std::sync::Arc;

/// Everything a resolution step needs besides the objects it mutates
#[derive(Clone)]
pub struct CombatEnv {
    pub constants: CombatConstants,
    pub rng: Arc<dyn CombatRng>,
    pub clock: Arc<dyn Clock>,
    pub broadcaster: Arc<dyn Broadcaster>,
    pub scheduler: Arc<dyn EventScheduler>,
}

impl CombatEnv {
    /// Production wiring: thread rng, system clock, no observers
    pub fn new(constants: CombatConstants) -> Self {
        CombatEnv {
            constants,
            rng: Arc::new(ThreadRng),
            clock: Arc::new(SystemClock),
            broadcaster: Arc::new(NullBroadcaster),
            scheduler: Arc::new(EventQueue::new()),
        }
    }

    pub fn with_rng(mut self, rng: Arc<dyn CombatRng>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn Broadcaster>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    pub fn with_scheduler(mut self, scheduler: Arc<dyn EventScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

impl std::fmt::Debug for CombatEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("constants", &self.constants)
            .finish_non_exhaustive()
    }
}
