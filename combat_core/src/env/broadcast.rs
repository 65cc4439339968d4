//! Outbound broadcast to nearby observers

use crate::combat::CombatAction;
use crate::types::ObjectId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Visual reaction shown on a defender that won a secondary-defense contest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualEffect {
    Block,
    Dodge,
    CounterAttack,
}

impl VisualEffect {
    /// Fly-text key under the `combat_effects` table
    pub fn fly_text(self) -> &'static str {
        match self {
            VisualEffect::Block => "block",
            VisualEffect::Dodge => "dodge",
            VisualEffect::CounterAttack => "counterattack",
        }
    }

    /// Every contest reuses the dodge animation
    pub fn animation(self) -> &'static str {
        "dodge"
    }
}

/// Receiver for everything the engine shows to observers around an object
pub trait Broadcaster: Send + Sync {
    /// Outcome of one combat action, sent once per action
    fn combat_action(&self, action: &CombatAction);

    /// `subject` plays `effect` facing `toward`
    fn visual_effect(&self, subject: ObjectId, toward: ObjectId, effect: VisualEffect);
}

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn combat_action(&self, _action: &CombatAction) {}

    fn visual_effect(&self, _subject: ObjectId, _toward: ObjectId, _effect: VisualEffect) {}
}

/// Keeps every broadcast in memory, in order
#[derive(Debug, Default)]
pub struct BroadcastLog {
    actions: Mutex<Vec<CombatAction>>,
    effects: Mutex<Vec<(ObjectId, ObjectId, VisualEffect)>>,
}

impl BroadcastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<CombatAction> {
        self.actions.lock().clone()
    }

    pub fn effects(&self) -> Vec<(ObjectId, ObjectId, VisualEffect)> {
        self.effects.lock().clone()
    }

    pub fn take_actions(&self) -> Vec<CombatAction> {
        std::mem::take(&mut *self.actions.lock())
    }
}

impl Broadcaster for BroadcastLog {
    fn combat_action(&self, action: &CombatAction) {
        self.actions.lock().push(action.clone());
    }

    fn visual_effect(&self, subject: ObjectId, toward: ObjectId, effect: VisualEffect) {
        self.effects.lock().push((subject, toward, effect));
    }
}
