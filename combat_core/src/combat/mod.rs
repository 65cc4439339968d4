//! Combat resolution: dispatch, engagement, area effects and states

mod action;
mod area;
mod engagement;
mod engine;
mod states;

pub use action::{
    default_animation, CombatAction, DefenderResult, QueuedAction, DEFAULT_MELEE_ANIMATIONS,
    DEFAULT_RANGED_ANIMATION,
};
pub use area::{cone_angle, in_area};
pub use engine::CombatEngine;
pub use states::StateRoll;
