//! Reveal interaction state machine.
//!
//! ```text
//! Idle -> Requested -> Confirmed -> Idle
//!                   \-> Failed   -> Idle
//! ```

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Requested,
    Confirmed,
    Failed,
}

impl RevealPhase {
    pub fn can_transition_to(&self, next: RevealPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Requested)
                | (Self::Requested, Self::Confirmed)
                | (Self::Requested, Self::Failed)
                | (Self::Confirmed, Self::Idle)
                | (Self::Failed, Self::Idle)
        )
    }

    pub fn transition(self, next: RevealPhase) -> Result<RevealPhase, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::invalid_state_transition(format!(
                "{} -> {}",
                self, next
            )))
        }
    }
}

impl std::fmt::Display for RevealPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Requested => write!(f, "Requested"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}
