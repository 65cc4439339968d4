//! Engine error types
//!
//! None of these ever reach the caller of the engine entry points: they are
//! logged and turned into a rejected action (zero duration or `false`).
//! Rejections log at `debug`, unavailable resources at `warn`, anything
//! else at `error`.

use crate::types::ObjectId;
use thiserror::Error;

/// Failure raised inside a resolution step
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombatError {
    #[error("lock on {object} not acquired by {holder} within {wait_ms}ms")]
    LockUnavailable {
        object: ObjectId,
        holder: ObjectId,
        wait_ms: u64,
    },
    #[error("{0} attempted to cross-lock itself")]
    SelfCrossLock(ObjectId),
    #[error("object {0} is not deployed in the zone")]
    NotDeployed(ObjectId),
    #[error("object {0} is not a valid target for this action")]
    InvalidTarget(ObjectId),
    #[error("unknown skill: {0}")]
    UnknownSkill(String),
}

impl CombatError {
    /// Resource-unavailable conditions (vs. state inconsistencies)
    pub fn is_resource_unavailable(&self) -> bool {
        matches!(
            self,
            CombatError::LockUnavailable { .. } | CombatError::NotDeployed(_)
        )
    }

    /// Plain validation failures, as opposed to aborts worth a warning
    pub fn is_rejection(&self) -> bool {
        matches!(self, CombatError::InvalidTarget(_) | CombatError::UnknownSkill(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CombatError::LockUnavailable {
            object: ObjectId(7),
            holder: ObjectId(3),
            wait_ms: 50,
        };
        assert_eq!(err.to_string(), "lock on #7 not acquired by #3 within 50ms");
        assert!(err.is_resource_unavailable());
        assert!(!CombatError::SelfCrossLock(ObjectId(1)).is_resource_unavailable());
        assert!(!CombatError::SelfCrossLock(ObjectId(1)).is_rejection());
        assert!(CombatError::UnknownSkill("dance".to_string()).is_rejection());
    }

    #[test]
    fn test_each_error_has_one_class() {
        let errors = [
            CombatError::LockUnavailable {
                object: ObjectId(2),
                holder: ObjectId(1),
                wait_ms: 50,
            },
            CombatError::NotDeployed(ObjectId(9)),
            CombatError::SelfCrossLock(ObjectId(1)),
            CombatError::InvalidTarget(ObjectId(2)),
            CombatError::UnknownSkill("moonwalk".to_string()),
        ];
        let unavailable: Vec<bool> = errors.iter().map(CombatError::is_resource_unavailable).collect();
        let rejected: Vec<bool> = errors.iter().map(CombatError::is_rejection).collect();

        assert_eq!(unavailable, [true, true, false, false, false]);
        assert_eq!(rejected, [false, false, false, true, true]);
    }
}
