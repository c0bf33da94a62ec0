//! Administrator gate.

use ballot_types::Identity;

use crate::error::{BallotError, Denial};

/// Holds the fixed administrator identity of a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessControl {
    owner: Identity,
}

impl AccessControl {
    pub fn new(owner: Identity) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Identity {
        self.owner
    }

    pub fn is_admin(&self, caller: &Identity) -> bool {
        *caller == self.owner
    }

    /// Fail with `PermissionDenied(NotOwner)` unless `caller` is the owner.
    pub fn require_admin(&self, caller: &Identity) -> Result<(), BallotError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(BallotError::PermissionDenied(Denial::NotOwner))
        }
    }
}
