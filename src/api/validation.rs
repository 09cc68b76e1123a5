use chrono::{NaiveDate, NaiveTime};

use crate::error::{AppError, FieldErrors};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Collects field-level problems while a request body is parsed, so the
/// client sees every bad field at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn reject(&mut self, field: &str, reason: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| reason.into());
    }

    pub fn check(&mut self, ok: bool, field: &str, reason: &str) {
        if !ok {
            self.reject(field, reason);
        }
    }

    /// Present and not blank.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.reject(field, "is required");
                None
            }
        }
    }

    pub fn required_value<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.reject(field, "is required");
        }
        value
    }

    pub fn date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        let raw = self.required(field, value)?;
        self.parse_date(field, raw)
    }

    /// Absent is fine; present must parse.
    pub fn optional_date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
        self.parse_date(field, raw)
    }

    pub fn time(&mut self, field: &str, value: Option<&str>) -> Option<NaiveTime> {
        let raw = self.required(field, value)?;
        self.parse_time(field, raw)
    }

    pub fn optional_time(&mut self, field: &str, value: Option<&str>) -> Option<NaiveTime> {
        let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
        self.parse_time(field, raw)
    }

    fn parse_date(&mut self, field: &str, raw: &str) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(d) => Some(d),
            Err(_) => {
                self.reject(field, "must be a date in YYYY-MM-DD format");
                None
            }
        }
    }

    fn parse_time(&mut self, field: &str, raw: &str) -> Option<NaiveTime> {
        match parse_wall_time(raw) {
            Some(t) => Some(t),
            None => {
                self.reject(field, "must be a time in HH:MM format");
                None
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self, message: &str) -> AppError {
        AppError::validation(message, self.errors)
    }

    pub fn finish(self, message: &str) -> Result<(), AppError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.into_error(message))
        }
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_wall_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_all_bad_fields() {
        let mut v = Validator::default();
        assert!(v.required("name", Some("  ")).is_none());
        assert!(v.date("date_start", Some("03/11/2025")).is_none());
        assert!(v.time("time_start", None).is_none());
        assert_eq!(v.optional_date("date_end", None), None);

        match v.into_error("bad") {
            AppError::Validation { fields, .. } => {
                assert_eq!(fields.len(), 3);
                assert_eq!(fields["time_start"], "is required");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn accepts_both_time_shapes() {
        assert_eq!(parse_wall_time("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_wall_time("09:30:15"), NaiveTime::from_hms_opt(9, 30, 15));
        assert_eq!(parse_wall_time("25:00"), None);
    }

    #[test]
    fn first_reason_per_field_wins() {
        let mut v = Validator::default();
        v.reject("price", "is required");
        v.reject("price", "must not be negative");
        assert!(!v.is_valid());
        match v.into_error("bad") {
            AppError::Validation { fields, .. } => assert_eq!(fields["price"], "is required"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
