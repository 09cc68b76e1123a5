use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::time::TimeInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "reservation_state", rename_all = "lowercase")]
pub enum ReservationState {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationState {
    pub const ALL: [ReservationState; 4] = [
        ReservationState::Pending,
        ReservationState::Confirmed,
        ReservationState::Cancelled,
        ReservationState::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationState::Pending => "pending",
            ReservationState::Confirmed => "confirmed",
            ReservationState::Cancelled => "cancelled",
            ReservationState::Completed => "completed",
        }
    }

    /// Pending and confirmed reservations hold their slot.
    pub fn is_open(self) -> bool {
        matches!(self, ReservationState::Pending | ReservationState::Confirmed)
    }
}

impl fmt::Display for ReservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReservationState::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("state must be one of pending, confirmed, cancelled, completed; got '{}'", s))
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub service_id: String,
    pub agenda_id: String,
    pub date_reserved: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub state: ReservationState,
    pub notes: Option<String>,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewReservationParams {
    pub user_id: String,
    pub service_id: String,
    pub agenda_id: String,
    pub date_reserved: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub state: Option<ReservationState>,
    pub notes: Option<String>,
    pub total_price: f64,
}

impl Reservation {
    pub fn new(params: NewReservationParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            service_id: params.service_id,
            agenda_id: params.agenda_id,
            date_reserved: params.date_reserved,
            time_start: params.time_start,
            time_end: params.time_end,
            state: params.state.unwrap_or(ReservationState::Pending),
            notes: params.notes,
            total_price: params.total_price,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn window(&self) -> TimeInterval {
        TimeInterval::from_times(self.time_start, self.time_end)
    }

    pub fn holds_slot(&self) -> bool {
        self.state != ReservationState::Cancelled
    }
}

#[derive(Debug, Default, Clone)]
pub struct ReservationFilter {
    pub user_id: Option<String>,
    pub service_id: Option<String>,
    pub agenda_id: Option<String>,
    pub state: Option<ReservationState>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}
