use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::models::{agenda::Agenda, reservation::ReservationState, user::User};
use crate::domain::services::{availability::DaySlots, slots::Slot};

/// Success envelope shared by every endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self { status: "success", message: None, data: Some(data), total: None }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self { status: "success", message: Some(message.into()), data: Some(data), total: None }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let total = items.len();
        Self { status: "success", message: None, data: Some(items), total: Some(total) }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { status: "success", message: Some(message.into()), data: None, total: None }
    }
}

/// An agenda with its weekday names and the slot listing for one day.
#[derive(Serialize)]
pub struct AgendaView {
    #[serde(flatten)]
    pub agenda: Agenda,
    pub weekday_names: Vec<&'static str>,
    pub slot_date: NaiveDate,
    pub slots: Vec<Slot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_message: Option<String>,
}

impl AgendaView {
    pub fn new(agenda: Agenda, day: DaySlots) -> Self {
        Self {
            weekday_names: agenda.weekdays().names(),
            agenda,
            slot_date: day.date,
            slots: day.slots,
            slot_message: day.message,
        }
    }
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: User,
    pub reservation_counts: BTreeMap<&'static str, i64>,
}

impl UserView {
    pub fn new(user: User, counts: &[(ReservationState, i64)]) -> Self {
        let mut reservation_counts: BTreeMap<&'static str, i64> =
            ReservationState::ALL.iter().map(|s| (s.as_str(), 0)).collect();
        for (state, n) in counts {
            reservation_counts.insert(state.as_str(), *n);
        }
        Self { user, reservation_counts }
    }
}
