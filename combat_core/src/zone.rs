//! Zone index: object lookup, positions and the zone-wide lock
//!
//! Positions are kept in the index rather than in object state, so a scan
//! under the zone lock never needs to lock an object. Callers holding an
//! object lock may take the zone lock; the reverse order is never used.

use crate::error::CombatError;
use crate::object::{ObjectHandle, ObjectState};
use crate::types::{ObjectId, Position};
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Coarse classification used by area scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneClass {
    Player,
    Autonomous,
    /// Destructible that accepts attacks
    Attackable,
    /// Anything combat ignores
    Inert,
}

impl ZoneClass {
    fn of(state: &ObjectState) -> Self {
        match state {
            ObjectState::Creature(c) if c.is_player() => ZoneClass::Player,
            ObjectState::Creature(_) => ZoneClass::Autonomous,
            ObjectState::Destructible(d) if d.attackable => ZoneClass::Attackable,
            ObjectState::Destructible(_) => ZoneClass::Inert,
        }
    }

    pub fn is_combatant(self) -> bool {
        !matches!(self, ZoneClass::Inert)
    }
}

#[derive(Debug, Clone)]
pub struct ZoneEntry {
    pub handle: ObjectHandle,
    pub position: Position,
    /// Interior cell; `None` outdoors
    pub cell: Option<u64>,
    pub class: ZoneClass,
}

/// Contents of the zone, reachable only through the zone lock
#[derive(Debug, Default)]
pub struct ZoneIndex {
    entries: BTreeMap<ObjectId, ZoneEntry>,
}

impl ZoneIndex {
    pub fn get(&self, id: ObjectId) -> Option<&ZoneEntry> {
        self.entries.get(&id)
    }

    /// First entry with an id strictly greater than `cursor`
    pub fn next_after(&self, cursor: Option<ObjectId>) -> Option<(ObjectId, &ZoneEntry)> {
        let lower = cursor.map_or(Bound::Unbounded, Bound::Excluded);
        self.entries
            .range((lower, Bound::Unbounded))
            .next()
            .map(|(id, entry)| (*id, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Zone {
    index: Mutex<ZoneIndex>,
}

impl Zone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy an object. Takes the object's lock briefly to classify it, so
    /// it must not be called while holding that object's guard.
    pub fn insert(&self, handle: ObjectHandle, position: Position, cell: Option<u64>) {
        let class = ZoneClass::of(&handle.lock());
        let id = handle.id();
        self.index.lock().entries.insert(
            id,
            ZoneEntry {
                handle,
                position,
                cell,
                class,
            },
        );
    }

    pub fn remove(&self, id: ObjectId) -> Option<ObjectHandle> {
        self.index.lock().entries.remove(&id).map(|e| e.handle)
    }

    pub fn lookup(&self, id: ObjectId) -> Option<ObjectHandle> {
        self.index.lock().entries.get(&id).map(|e| e.handle.clone())
    }

    /// Like [`lookup`](Self::lookup) but reports a missing object as an error
    pub fn require(&self, id: ObjectId) -> Result<ObjectHandle, CombatError> {
        self.lookup(id).ok_or(CombatError::NotDeployed(id))
    }

    pub fn position(&self, id: ObjectId) -> Option<Position> {
        self.index.lock().entries.get(&id).map(|e| e.position)
    }

    pub fn set_position(&self, id: ObjectId, position: Position) -> bool {
        match self.index.lock().entries.get_mut(&id) {
            Some(entry) => {
                entry.position = position;
                true
            }
            None => false,
        }
    }

    pub fn distance(&self, a: ObjectId, b: ObjectId) -> Option<f32> {
        let index = self.index.lock();
        let pa = index.entries.get(&a)?.position;
        let pb = index.entries.get(&b)?.position;
        Some(pa.distance_to(&pb))
    }

    /// Take the zone-wide lock
    pub fn lock_index(&self) -> MutexGuard<'_, ZoneIndex> {
        self.index.lock()
    }

    pub fn len(&self) -> usize {
        self.index.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.lock().is_empty()
    }
}
