use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::domain::models::agenda::Agenda;
use crate::domain::models::reservation::Reservation;
use crate::domain::models::time::TimeInterval;

use super::availability::is_free;

/// Why a prospective reservation was turned down. Checks run in declaration
/// order and stop at the first failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRejection {
    #[error("The agenda is not available")]
    AgendaUnavailable,
    #[error("The reservation date is outside the agenda's date range")]
    DateOutOfRange,
    #[error("The selected day is not active in the agenda")]
    DayNotActive,
    #[error("The requested time is outside working hours")]
    OutsideWorkingHours,
    #[error("The requested time overlaps the break period")]
    OverlapsBreak,
    #[error("A reservation already exists in this time range")]
    SlotTaken,
}

impl BookingRejection {
    pub fn code(&self) -> &'static str {
        match self {
            BookingRejection::AgendaUnavailable => "agenda_unavailable",
            BookingRejection::DateOutOfRange => "date_out_of_range",
            BookingRejection::DayNotActive => "day_not_active",
            BookingRejection::OutsideWorkingHours => "outside_working_hours",
            BookingRejection::OverlapsBreak => "overlaps_break",
            BookingRejection::SlotTaken => "slot_taken",
        }
    }
}

/// A reservation being placed or moved.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Set when rescheduling, so the reservation does not collide with itself.
    pub exclude_id: Option<&'a str>,
}

impl Candidate<'_> {
    pub fn window(&self) -> TimeInterval {
        TimeInterval::from_times(self.start, self.end)
    }
}

/// Any intersection with the break is refused: the start falls inside it, the
/// end falls inside it (inclusive at the right edge), or the candidate
/// straddles it entirely.
pub fn intrudes_on_break(candidate: TimeInterval, rest: TimeInterval) -> bool {
    let (s, e) = (candidate.start, candidate.end);
    (s >= rest.start && s < rest.end)
        || (e > rest.start && e <= rest.end)
        || (s < rest.start && e > rest.end)
}

/// Agenda-level gate: everything except sibling reservations.
pub fn check_against_agenda(agenda: Option<&Agenda>, candidate: &Candidate<'_>) -> Result<(), BookingRejection> {
    let agenda = agenda
        .filter(|a| a.active)
        .ok_or(BookingRejection::AgendaUnavailable)?;

    if !agenda.covers_date(candidate.date) {
        return Err(BookingRejection::DateOutOfRange);
    }

    if !agenda.is_open_on(candidate.date) {
        return Err(BookingRejection::DayNotActive);
    }

    if candidate.start < agenda.work_start || candidate.end > agenda.work_end {
        return Err(BookingRejection::OutsideWorkingHours);
    }

    if let Some(rest) = agenda.break_window()
        && intrudes_on_break(candidate.window(), rest)
    {
        return Err(BookingRejection::OverlapsBreak);
    }

    Ok(())
}

/// Sibling gate: no other slot-holding reservation of the same agenda and day
/// may overlap the candidate.
pub fn check_against_siblings(siblings: &[Reservation], candidate: &Candidate<'_>) -> Result<(), BookingRejection> {
    let others: Vec<&Reservation> = siblings
        .iter()
        .filter(|r| Some(r.id.as_str()) != candidate.exclude_id && r.date_reserved == candidate.date)
        .collect();

    if is_free(candidate.window(), others) {
        Ok(())
    } else {
        Err(BookingRejection::SlotTaken)
    }
}

/// Full gate, in order.
pub fn check_reservation(
    agenda: Option<&Agenda>,
    siblings: &[Reservation],
    candidate: &Candidate<'_>,
) -> Result<(), BookingRejection> {
    check_against_agenda(agenda, candidate)?;
    check_against_siblings(siblings, candidate)
}
