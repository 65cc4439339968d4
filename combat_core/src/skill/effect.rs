//! Skill-specific mechanics hook
//!
//! The engine resolves the generic contract of every skill (cost, hit, damage,
//! states). Anything a particular skill does beyond that is plugged in here.

use crate::object::{Creature, ObjectState};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Extra behaviour of one skill, run after the generic resolution
pub trait SkillEffect: Send + Sync {
    /// `target` is `None` for self skills and for heals the actor casts on itself.
    fn perform_effect(&self, actor: &mut Creature, target: Option<&mut ObjectState>, modifier: &str);
}

/// Skill effects by skill name
#[derive(Clone, Default)]
pub struct EffectRegistry {
    effects: HashMap<String, Arc<dyn SkillEffect>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, skill: impl Into<String>, effect: Arc<dyn SkillEffect>) {
        self.effects.insert(skill.into(), effect);
    }

    pub fn get(&self, skill: &str) -> Option<&Arc<dyn SkillEffect>> {
        self.effects.get(skill)
    }
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.effects.keys().collect();
        names.sort();
        f.debug_struct("EffectRegistry").field("skills", &names).finish()
    }
}
