use crate::domain::models::reservation::ReservationState;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Confirm,
    Complete,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied(ReservationState),
    /// Already in the target state; nothing to write.
    Unchanged,
}

impl Transition {
    pub fn target(self) -> ReservationState {
        match self {
            Transition::Confirm => ReservationState::Confirmed,
            Transition::Complete => ReservationState::Completed,
            Transition::Cancel => ReservationState::Cancelled,
        }
    }

    /// Maps a requested state onto the transition that reaches it. Moving back
    /// to pending is only a no-op for reservations that are still pending.
    pub fn towards(current: ReservationState, requested: ReservationState) -> Result<Option<Self>, AppError> {
        match requested {
            ReservationState::Pending if current == ReservationState::Pending => Ok(None),
            ReservationState::Pending => Err(AppError::State(format!(
                "A {} reservation cannot return to pending",
                current
            ))),
            ReservationState::Confirmed => Ok(Some(Transition::Confirm)),
            ReservationState::Completed => Ok(Some(Transition::Complete)),
            ReservationState::Cancelled => Ok(Some(Transition::Cancel)),
        }
    }
}

/// Reservation state machine. Completed is terminal; cancelling twice is a no-op.
pub fn apply(current: ReservationState, transition: Transition) -> Result<Outcome, AppError> {
    use ReservationState::*;

    match (current, transition) {
        (Pending, Transition::Confirm) => Ok(Outcome::Applied(Confirmed)),
        (Confirmed, Transition::Confirm) => Ok(Outcome::Unchanged),
        (Pending | Confirmed, Transition::Complete) => Ok(Outcome::Applied(Completed)),
        (Pending | Confirmed, Transition::Cancel) => Ok(Outcome::Applied(Cancelled)),
        (Cancelled, Transition::Cancel) => Ok(Outcome::Unchanged),
        (Cancelled, _) => Err(AppError::State(format!(
            "A cancelled reservation cannot be moved to {}",
            transition.target()
        ))),
        (Completed, _) => Err(AppError::State(format!(
            "A completed reservation cannot be moved to {}",
            transition.target()
        ))),
    }
}
