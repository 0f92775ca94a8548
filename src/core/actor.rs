//! Verified caller identity supplied by the authentication collaborator.

use super::errors::{EngineError, EngineResult};
use super::ids::PlayerId;

/// A caller whose identity the auth layer has already verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub player_id: PlayerId,
    pub elevated: bool,
}

impl Actor {
    pub fn player(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            elevated: false,
        }
    }

    pub fn elevated(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            elevated: true,
        }
    }

    pub fn require_elevated(&self) -> EngineResult<()> {
        if self.elevated {
            Ok(())
        } else {
            Err(EngineError::PermissionDenied(
                "operation requires an elevated role".into(),
            ))
        }
    }

    /// Allows a player to act on their own record, or anyone with an
    /// elevated role to act on any record.
    pub fn require_self_or_elevated(&self, target: &PlayerId) -> EngineResult<()> {
        if self.elevated || &self.player_id == target {
            Ok(())
        } else {
            Err(EngineError::PermissionDenied(
                "cross-player operation requires an elevated role".into(),
            ))
        }
    }
}

/// Rejects calls that arrive without a verified actor.
pub fn require_actor(actor: Option<&Actor>) -> EngineResult<&Actor> {
    actor.ok_or(EngineError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_actor_is_unauthenticated() {
        let err = require_actor(None).unwrap_err();
        assert_eq!(err.kind(), "UNAUTHENTICATED");
    }

    #[test]
    fn test_plain_actor_cannot_elevate() {
        let actor = Actor::player("s1");
        assert!(actor.require_elevated().is_err());
        assert!(Actor::elevated("t1").require_elevated().is_ok());
    }

    #[test]
    fn test_self_or_elevated() {
        let actor = Actor::player("s1");
        assert!(actor.require_self_or_elevated(&"s1".to_string()).is_ok());
        assert!(actor.require_self_or_elevated(&"s2".to_string()).is_err());

        let admin = Actor::elevated("t1");
        assert!(admin.require_self_or_elevated(&"s2".to_string()).is_ok());
    }
}
