//! Timed events handed to the external event scheduler

use crate::types::ObjectId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// What happens when a scheduled event comes due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Revert a temporary skill-mod bonus granted by an enhancement skill
    EnhancementExpiry {
        actor: ObjectId,
        skill: String,
        skill_mod: String,
        bonus: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub due_ms: u64,
    pub kind: EventKind,
}

/// Sink for timed events
pub trait EventScheduler: Send + Sync {
    fn schedule(&self, event: ScheduledEvent);
}

/// In-memory scheduler, polled by whoever owns the world loop
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Mutex<Vec<ScheduledEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Remove and return every event due at or before `now_ms`, earliest first
    pub fn drain_due(&self, now_ms: u64) -> Vec<ScheduledEvent> {
        let mut pending = self.pending.lock();
        let (mut due, rest): (Vec<_>, Vec<_>) =
            pending.drain(..).partition(|e| e.due_ms <= now_ms);
        *pending = rest;
        due.sort_by_key(|e| e.due_ms);
        due
    }
}

impl EventScheduler for EventQueue {
    fn schedule(&self, event: ScheduledEvent) {
        self.pending.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expiry(due_ms: u64) -> ScheduledEvent {
        ScheduledEvent {
            due_ms,
            kind: EventKind::EnhancementExpiry {
                actor: ObjectId(1),
                skill: "berserk1".to_string(),
                skill_mod: "melee_accuracy".to_string(),
                bonus: 10,
            },
        }
    }

    #[test]
    fn test_drain_due_orders_and_retains() {
        let queue = EventQueue::new();
        queue.schedule(expiry(300));
        queue.schedule(expiry(100));
        queue.schedule(expiry(900));

        let due = queue.drain_due(300);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].due_ms, 100);
        assert_eq!(due[1].due_ms, 300);
        assert_eq!(queue.len(), 1);
        assert!(queue.drain_due(500).is_empty());
    }

    #[test]
    fn test_event_wire_shape() {
        let json = serde_json::to_value(expiry(500)).unwrap();
        assert_eq!(json["due_ms"], 500);
        assert_eq!(json["kind"]["type"], "enhancement_expiry");
        assert_eq!(json["kind"]["actor"], 1);

        let back: ScheduledEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, expiry(500));
    }
}
