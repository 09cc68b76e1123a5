use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::models::agenda::Agenda;
use crate::domain::models::reservation::Reservation;
use crate::domain::models::time::TimeInterval;

use super::slots::{generate_slots, Slot, SlotTemplate};

pub const MSG_AGENDA_INACTIVE: &str = "The agenda is not active";
pub const MSG_OUT_OF_RANGE: &str = "The selected date is outside the agenda's date range";
pub const MSG_DAY_NOT_ACTIVE: &str = "The selected day is not active for this agenda";

/// True when no slot-holding reservation strictly overlaps `candidate`.
/// Cancelled reservations never block.
pub fn is_free<'a, I>(candidate: TimeInterval, reservations: I) -> bool
where
    I: IntoIterator<Item = &'a Reservation>,
{
    !reservations
        .into_iter()
        .filter(|r| r.holds_slot())
        .any(|r| r.window().overlaps(&candidate))
}

/// Slot listing for one agenda and date. `message` explains an empty list
/// when the date is not bookable at all.
#[derive(Debug, Clone, Serialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
    pub message: Option<String>,
}

/// `same_day` is every reservation of the agenda on `date`, fetched once.
pub fn day_slots(agenda: &Agenda, date: NaiveDate, same_day: &[Reservation]) -> DaySlots {
    let message = if !agenda.active {
        Some(MSG_AGENDA_INACTIVE)
    } else if !agenda.covers_date(date) {
        Some(MSG_OUT_OF_RANGE)
    } else if !agenda.is_open_on(date) {
        Some(MSG_DAY_NOT_ACTIVE)
    } else {
        None
    };

    if let Some(message) = message {
        return DaySlots { date, slots: Vec::new(), message: Some(message.to_string()) };
    }

    let template = SlotTemplate::from_agenda(agenda);
    let on_date: Vec<&Reservation> = same_day.iter().filter(|r| r.date_reserved == date).collect();
    let slots = generate_slots(&template, |slot| is_free(slot, on_date.iter().copied()));

    DaySlots { date, slots, message: None }
}
