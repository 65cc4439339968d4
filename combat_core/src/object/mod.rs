//! World objects and their scoped locks
//!
//! Every object lives behind a [`WorldObject`]: a mutex over its state plus a
//! record of which object currently holds the lock. The acting creature's own
//! queue locks it with [`WorldObject::lock`]; the engine locks counterparties
//! on the actor's behalf with [`WorldObject::cross_lock`]. Guards release on
//! drop, so every exit path unlocks exactly once.

mod creature;
mod destructible;
mod ham;
mod notice;
mod player;
mod status;

pub use creature::{
    Attributes, CombatFlags, Creature, CreatureKind, DamageLedger, Performance, PerformanceKind,
};
pub use destructible::Destructible;
pub use ham::{Ham, HamBar};
pub use notice::Notice;
pub use player::{AutonomousData, DuelRelations, PlayerData, PvpStatus};
pub use status::{ActiveDot, CombatState, RecoveryTimers, StateFlags, StatusEffects};

use crate::error::CombatError;
use crate::types::ObjectId;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Closed set of object kinds the engine can act on
#[derive(Debug, Clone)]
pub enum ObjectState {
    Creature(Creature),
    Destructible(Destructible),
}

impl ObjectState {
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectState::Creature(c) => c.id,
            ObjectState::Destructible(d) => d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ObjectState::Creature(c) => &c.name,
            ObjectState::Destructible(d) => &d.name,
        }
    }

    pub fn as_creature(&self) -> Option<&Creature> {
        match self {
            ObjectState::Creature(c) => Some(c),
            ObjectState::Destructible(_) => None,
        }
    }

    pub fn as_creature_mut(&mut self) -> Option<&mut Creature> {
        match self {
            ObjectState::Creature(c) => Some(c),
            ObjectState::Destructible(_) => None,
        }
    }

    pub fn as_destructible(&self) -> Option<&Destructible> {
        match self {
            ObjectState::Destructible(d) => Some(d),
            ObjectState::Creature(_) => None,
        }
    }

    pub fn is_player(&self) -> bool {
        self.as_creature().is_some_and(Creature::is_player)
    }

    pub fn defenders(&self) -> &[ObjectId] {
        match self {
            ObjectState::Creature(c) => c.defenders(),
            ObjectState::Destructible(d) => d.defenders(),
        }
    }

    pub fn add_defender(&mut self, id: ObjectId) {
        match self {
            ObjectState::Creature(c) => c.add_defender(id),
            ObjectState::Destructible(d) => d.add_defender(id),
        }
    }

    /// Queue a client notice; a no-op for anything without a client
    pub fn notify(&mut self, notice: Notice) {
        if let ObjectState::Creature(c) = self {
            c.notify(notice);
        }
    }
}

impl From<Creature> for ObjectState {
    fn from(creature: Creature) -> Self {
        ObjectState::Creature(creature)
    }
}

impl From<Destructible> for ObjectState {
    fn from(destructible: Destructible) -> Self {
        ObjectState::Destructible(destructible)
    }
}

/// Shared handle to a world object
pub type ObjectHandle = Arc<WorldObject>;

#[derive(Debug)]
pub struct WorldObject {
    id: ObjectId,
    state: Mutex<ObjectState>,
    /// Id of the object whose action holds the lock; 0 when free
    holder: AtomicU64,
}

impl WorldObject {
    pub fn new(state: impl Into<ObjectState>) -> ObjectHandle {
        let state = state.into();
        Arc::new(WorldObject {
            id: state.id(),
            state: Mutex::new(state),
            holder: AtomicU64::new(0),
        })
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Current lock holder, if locked
    pub fn holder(&self) -> Option<ObjectId> {
        match self.holder.load(Ordering::Acquire) {
            0 => None,
            id => Some(ObjectId(id)),
        }
    }

    /// Lock on behalf of the object itself; blocks until available
    pub fn lock(&self) -> ObjectGuard<'_> {
        let guard = self.state.lock();
        self.holder.store(self.id.0, Ordering::Release);
        ObjectGuard {
            object: self,
            guard,
        }
    }

    /// Lock on behalf of `holder`, waiting at most `wait`
    pub fn cross_lock(&self, holder: ObjectId, wait: Duration) -> Result<ObjectGuard<'_>, CombatError> {
        if holder == self.id {
            return Err(CombatError::SelfCrossLock(holder));
        }
        let guard = self
            .state
            .try_lock_for(wait)
            .ok_or(CombatError::LockUnavailable {
                object: self.id,
                holder,
                wait_ms: wait.as_millis() as u64,
            })?;
        self.holder.store(holder.0, Ordering::Release);
        Ok(ObjectGuard {
            object: self,
            guard,
        })
    }
}

/// Exclusive access to an object's state; unlocks on drop
pub struct ObjectGuard<'a> {
    object: &'a WorldObject,
    guard: MutexGuard<'a, ObjectState>,
}

impl ObjectGuard<'_> {
    pub fn id(&self) -> ObjectId {
        self.object.id
    }

    pub fn holder(&self) -> Option<ObjectId> {
        self.object.holder()
    }
}

impl fmt::Debug for ObjectGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectGuard")
            .field("id", &self.object.id)
            .field("holder", &self.object.holder())
            .finish_non_exhaustive()
    }
}

impl Deref for ObjectGuard<'_> {
    type Target = ObjectState;

    fn deref(&self) -> &ObjectState {
        &self.guard
    }
}

impl DerefMut for ObjectGuard<'_> {
    fn deref_mut(&mut self) -> &mut ObjectState {
        &mut self.guard
    }
}

impl Drop for ObjectGuard<'_> {
    fn drop(&mut self) {
        self.object.holder.store(0, Ordering::Release);
    }
}
