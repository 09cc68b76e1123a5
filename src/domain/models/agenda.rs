use serde::Serialize;
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

use super::time::{TimeInterval, WeekdaySet};

/// Recurring weekly availability template for one service, valid over the
/// inclusive range `[date_start, date_end]`.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct Agenda {
    pub id: String,
    pub service_id: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub interval_minutes: i32,
    pub active_weekdays: Json<WeekdaySet>,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub active: bool,
    pub auto_generate_slots: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewAgendaParams {
    pub service_id: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub interval_minutes: i32,
    pub active_weekdays: WeekdaySet,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub active: bool,
    pub auto_generate_slots: bool,
    pub notes: Option<String>,
}

impl Agenda {
    pub fn new(params: NewAgendaParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            service_id: params.service_id,
            date_start: params.date_start,
            date_end: params.date_end,
            work_start: params.work_start,
            work_end: params.work_end,
            interval_minutes: params.interval_minutes,
            active_weekdays: Json(params.active_weekdays),
            break_start: params.break_start,
            break_end: params.break_end,
            active: params.active,
            auto_generate_slots: params.auto_generate_slots,
            notes: params.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn working_hours(&self) -> TimeInterval {
        TimeInterval::from_times(self.work_start, self.work_end)
    }

    /// The daily break, only when both ends are configured.
    pub fn break_window(&self) -> Option<TimeInterval> {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) => Some(TimeInterval::from_times(start, end)),
            _ => None,
        }
    }

    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.date_start <= date && date <= self.date_end
    }

    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.active_weekdays.0.includes_date(date)
    }

    pub fn weekdays(&self) -> &WeekdaySet {
        &self.active_weekdays.0
    }
}

#[derive(Debug, Default, Clone)]
pub struct AgendaFilter {
    pub service_id: Option<String>,
    pub active: Option<bool>,
    /// Agendas starting on or after this date.
    pub starts_from: Option<NaiveDate>,
    /// Agendas ending on or before this date.
    pub ends_by: Option<NaiveDate>,
}
