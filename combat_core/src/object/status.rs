//! Timed combat states, damage-over-time and recovery timers

use crate::equipment::DotKind;
use crate::types::HamPool;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

bitflags! {
    /// Visible state bits, recomputed by [`StatusEffects::update`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StateFlags: u32 {
        const STUNNED = 1 << 0;
        const BLINDED = 1 << 1;
        const DIZZY = 1 << 2;
        const INTIMIDATED = 1 << 3;
        const ON_FIRE = 1 << 4;
        const POISONED = 1 << 5;
        const DISEASED = 1 << 6;
        const BLEEDING = 1 << 7;
    }
}

/// Timed states rolled by attack skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatState {
    Stunned,
    Blinded,
    Dizzied,
    Intimidated,
}

impl CombatState {
    pub fn flag(self) -> StateFlags {
        match self {
            CombatState::Stunned => StateFlags::STUNNED,
            CombatState::Blinded => StateFlags::BLINDED,
            CombatState::Dizzied => StateFlags::DIZZY,
            CombatState::Intimidated => StateFlags::INTIMIDATED,
        }
    }
}

fn dot_flag(kind: DotKind) -> StateFlags {
    match kind {
        DotKind::Bleeding => StateFlags::BLEEDING,
        DotKind::Disease => StateFlags::DISEASED,
        DotKind::Fire => StateFlags::ON_FIRE,
        DotKind::Poison => StateFlags::POISONED,
    }
}

/// An active damage-over-time effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDot {
    pub kind: DotKind,
    pub strength: i32,
    pub pool: HamPool,
    pub expires_at: u64,
}

#[derive(Debug, Clone, Default)]
pub struct StatusEffects {
    timed: HashMap<CombatState, u64>,
    dots: Vec<ActiveDot>,
    flags: StateFlags,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply (or refresh) a timed state until `now + duration`
    pub fn apply(&mut self, state: CombatState, now: u64, duration_ms: u64) {
        let expires = now.saturating_add(duration_ms);
        let entry = self.timed.entry(state).or_insert(expires);
        *entry = (*entry).max(expires);
        self.flags |= state.flag();
    }

    pub fn has(&self, state: CombatState) -> bool {
        self.flags.contains(state.flag())
    }

    /// Apply a damage-over-time effect; a stronger or later one of the same
    /// kind replaces the existing entry.
    pub fn apply_dot(&mut self, dot: ActiveDot) {
        self.flags |= dot_flag(dot.kind);
        if let Some(existing) = self.dots.iter_mut().find(|d| d.kind == dot.kind) {
            existing.strength = existing.strength.max(dot.strength);
            existing.expires_at = existing.expires_at.max(dot.expires_at);
            existing.pool = dot.pool;
        } else {
            self.dots.push(dot);
        }
    }

    pub fn has_dot(&self, kind: DotKind) -> bool {
        self.flags.contains(dot_flag(kind))
    }

    pub fn dots(&self) -> &[ActiveDot] {
        &self.dots
    }

    pub fn flags(&self) -> StateFlags {
        self.flags
    }

    /// Drop expired entries and recompute the visible flags
    pub fn update(&mut self, now: u64) -> StateFlags {
        self.timed.retain(|_, expires| *expires > now);
        self.dots.retain(|d| d.expires_at > now);

        let mut flags = StateFlags::empty();
        for state in self.timed.keys() {
            flags |= state.flag();
        }
        for dot in &self.dots {
            flags |= dot_flag(dot.kind);
        }
        self.flags = flags;
        flags
    }
}

/// Earliest time each posture effect may land again
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryTimers {
    pub knockdown_ready_at: u64,
    pub posture_down_ready_at: u64,
    pub posture_up_ready_at: u64,
}

impl RecoveryTimers {
    pub fn knockdown_ready(&self, now: u64) -> bool {
        now >= self.knockdown_ready_at
    }

    pub fn posture_down_ready(&self, now: u64) -> bool {
        now >= self.posture_down_ready_at
    }

    pub fn posture_up_ready(&self, now: u64) -> bool {
        now >= self.posture_up_ready_at
    }
}
