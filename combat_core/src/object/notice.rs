//! Messages delivered to a player's client

use super::PvpStatus;
use crate::types::ObjectId;

/// Notice queued on a creature for its client
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Localized message `@file:key`, optionally naming another object
    System {
        file: &'static str,
        key: String,
        target: Option<ObjectId>,
    },
    /// Plain, already-formatted text
    Info(String),
    /// Combat log line
    CombatSpam {
        attacker: ObjectId,
        defender: ObjectId,
        key: String,
        damage: i32,
    },
    /// Floating text above `subject`
    FlyText {
        subject: ObjectId,
        file: &'static str,
        key: String,
    },
    /// Refreshed PvP status bits of `subject`
    PvpStatusUpdate { subject: ObjectId, status: PvpStatus },
}

impl Notice {
    pub fn system(file: &'static str, key: impl Into<String>) -> Self {
        Notice::System {
            file,
            key: key.into(),
            target: None,
        }
    }

    pub fn system_about(file: &'static str, key: impl Into<String>, target: ObjectId) -> Self {
        Notice::System {
            file,
            key: key.into(),
            target: Some(target),
        }
    }

    /// Key of a system message, if this is one
    pub fn system_key(&self) -> Option<&str> {
        match self {
            Notice::System { key, .. } => Some(key.as_str()),
            _ => None,
        }
    }
}
