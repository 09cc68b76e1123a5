use chrono::NaiveDate;

use crate::domain::models::agenda::Agenda;
use crate::domain::models::time::TimeInterval;
use crate::error::{AppError, FieldErrors};

use super::overlap::range_overlaps;

/// True when another active agenda of `service_id` has a date range that
/// overlaps `[date_start, date_end]` under the closed three-clause test.
pub fn has_conflict<'a, I>(
    agendas: I,
    service_id: &str,
    date_start: NaiveDate,
    date_end: NaiveDate,
    exclude_id: Option<&str>,
) -> bool
where
    I: IntoIterator<Item = &'a Agenda>,
{
    agendas
        .into_iter()
        .filter(|a| a.active && a.service_id == service_id)
        .filter(|a| Some(a.id.as_str()) != exclude_id)
        .any(|a| range_overlaps(&a.date_start, &a.date_end, &date_start, &date_end))
}

/// Structural checks on an agenda template before it is stored.
pub fn validate_agenda(agenda: &Agenda) -> Result<(), AppError> {
    let mut fields = FieldErrors::new();

    if agenda.date_start > agenda.date_end {
        fields.insert("date_end".into(), "must be on or after date_start".into());
    }

    if agenda.work_start >= agenda.work_end {
        fields.insert("work_end".into(), "must be after work_start".into());
    }

    if agenda.interval_minutes < 1 {
        fields.insert("interval_minutes".into(), "must be at least 1".into());
    }

    if agenda.weekdays().is_empty() {
        fields.insert("active_weekdays".into(), "at least one weekday is required".into());
    }

    match (agenda.break_start, agenda.break_end) {
        (Some(_), None) => {
            fields.insert("break_end".into(), "required when break_start is set".into());
        }
        (None, Some(_)) => {
            fields.insert("break_start".into(), "required when break_end is set".into());
        }
        (Some(start), Some(end)) => {
            let rest = TimeInterval::from_times(start, end);
            let work = agenda.working_hours();
            if rest.is_empty() {
                fields.insert("break_end".into(), "must be after break_start".into());
            } else if rest.start < work.start || rest.end > work.end {
                fields.insert("break_start".into(), "break must lie within working hours".into());
            }
        }
        (None, None) => {}
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation("Invalid agenda definition", fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use crate::domain::models::agenda::NewAgendaParams;
    use crate::domain::models::time::{Weekday, WeekdaySet};

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn agenda(service: &str, from: NaiveDate, to: NaiveDate) -> Agenda {
        Agenda::new(NewAgendaParams {
            service_id: service.into(),
            date_start: from,
            date_end: to,
            work_start: t(9, 0),
            work_end: t(17, 0),
            interval_minutes: 30,
            active_weekdays: [Weekday::Monday].into_iter().collect(),
            break_start: None,
            break_end: None,
            active: true,
            auto_generate_slots: false,
            notes: None,
        })
    }

    #[test]
    fn touching_ranges_conflict() {
        let existing = agenda("svc", d(11, 1), d(11, 15));
        assert!(has_conflict([&existing], "svc", d(11, 15), d(11, 30), None));
        assert!(!has_conflict([&existing], "svc", d(11, 16), d(11, 30), None));
    }

    #[test]
    fn containment_conflicts_both_ways() {
        let existing = agenda("svc", d(11, 10), d(11, 12));
        assert!(has_conflict([&existing], "svc", d(11, 1), d(11, 30), None));
        let wide = agenda("svc", d(11, 1), d(11, 30));
        assert!(has_conflict([&wide], "svc", d(11, 10), d(11, 12), None));
    }

    #[test]
    fn ignores_inactive_other_services_and_self() {
        let mut inactive = agenda("svc", d(11, 1), d(11, 30));
        inactive.active = false;
        let other = agenda("other", d(11, 1), d(11, 30));
        let me = agenda("svc", d(11, 1), d(11, 30));

        assert!(!has_conflict([&inactive, &other], "svc", d(11, 5), d(11, 6), None));
        assert!(!has_conflict([&me], "svc", d(11, 5), d(11, 6), Some(&me.id)));
    }

    #[test]
    fn validate_accepts_well_formed_agenda() {
        let mut a = agenda("svc", d(11, 1), d(11, 30));
        a.break_start = Some(t(12, 0));
        a.break_end = Some(t(13, 0));
        assert!(validate_agenda(&a).is_ok());
    }

    #[test]
    fn validate_collects_every_field_error() {
        let mut a = agenda("svc", d(11, 30), d(11, 1));
        a.work_start = t(18, 0);
        a.interval_minutes = 0;
        a.active_weekdays = sqlx::types::Json(WeekdaySet::default());
        a.break_start = Some(t(12, 0));

        match validate_agenda(&a) {
            Err(AppError::Validation { fields, .. }) => {
                for key in ["date_end", "work_end", "interval_minutes", "active_weekdays", "break_end"] {
                    assert!(fields.contains_key(key), "missing {key}");
                }
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_break_outside_working_hours() {
        let mut a = agenda("svc", d(11, 1), d(11, 30));
        a.break_start = Some(t(8, 0));
        a.break_end = Some(t(9, 30));
        assert!(matches!(validate_agenda(&a), Err(AppError::Validation { .. })));
    }
}
