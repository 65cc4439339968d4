//! Health / action / mind pools

use crate::types::HamPool;
use serde::{Deserialize, Serialize};

/// One pool: current value, maximum and accumulated wounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HamBar {
    pub current: i32,
    pub max: i32,
    /// Wounds lower the ceiling the pool can be healed back to
    pub wounds: i32,
}

impl HamBar {
    pub fn full(max: i32) -> Self {
        HamBar {
            current: max,
            max,
            wounds: 0,
        }
    }

    /// Highest value healing can restore
    pub fn ceiling(&self) -> i32 {
        (self.max - self.wounds).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ham {
    pub health: HamBar,
    pub action: HamBar,
    pub mind: HamBar,
}

impl Default for Ham {
    fn default() -> Self {
        Ham::uniform(1000)
    }
}

impl Ham {
    pub fn new(health: i32, action: i32, mind: i32) -> Self {
        Ham {
            health: HamBar::full(health),
            action: HamBar::full(action),
            mind: HamBar::full(mind),
        }
    }

    pub fn uniform(max: i32) -> Self {
        Ham::new(max, max, max)
    }

    pub fn bar(&self, pool: HamPool) -> &HamBar {
        match pool {
            HamPool::Health => &self.health,
            HamPool::Action => &self.action,
            HamPool::Mind => &self.mind,
        }
    }

    pub fn bar_mut(&mut self, pool: HamPool) -> &mut HamBar {
        match pool {
            HamPool::Health => &mut self.health,
            HamPool::Action => &mut self.action,
            HamPool::Mind => &mut self.mind,
        }
    }

    pub fn current(&self, pool: HamPool) -> i32 {
        self.bar(pool).current
    }

    /// Remove up to `amount` from a pool; returns what was actually removed
    pub fn inflict(&mut self, pool: HamPool, amount: i32) -> i32 {
        let bar = self.bar_mut(pool);
        let applied = amount.clamp(0, bar.current);
        bar.current -= applied;
        applied
    }

    /// Restore up to `amount`, never past the wounded ceiling; returns what was restored
    pub fn heal(&mut self, pool: HamPool, amount: i32) -> i32 {
        let bar = self.bar_mut(pool);
        let room = (bar.ceiling() - bar.current).max(0);
        let applied = amount.clamp(0, room);
        bar.current += applied;
        applied
    }

    pub fn add_wounds(&mut self, pool: HamPool, wounds: i32) {
        let bar = self.bar_mut(pool);
        bar.wounds = (bar.wounds + wounds).clamp(0, bar.max - 1);
        bar.current = bar.current.min(bar.ceiling());
    }

    /// Deduct all three costs, or nothing at all when any pool cannot cover
    /// its cost. A pool may be drained to exactly zero.
    pub fn change_bars(&mut self, health: i32, action: i32, mind: i32) -> bool {
        let costs = [health.max(0), action.max(0), mind.max(0)];
        let affordable = HamPool::all()
            .iter()
            .zip(costs)
            .all(|(pool, cost)| self.current(*pool) >= cost);
        if !affordable {
            return false;
        }
        for (pool, cost) in HamPool::all().iter().zip(costs) {
            self.bar_mut(*pool).current -= cost;
        }
        true
    }

    /// Any pool at zero
    pub fn is_incapacitated(&self) -> bool {
        HamPool::all().iter().any(|p| self.current(*p) <= 0)
    }
}
