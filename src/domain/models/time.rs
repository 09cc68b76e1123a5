use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::services::overlap::strict_overlaps;

/// Seconds since local midnight. All scheduling math is naive wall-clock.
pub type DaySeconds = u32;

pub const SECONDS_PER_DAY: DaySeconds = 86_400;

pub fn day_seconds(t: NaiveTime) -> DaySeconds {
    t.num_seconds_from_midnight()
}

pub fn time_from_day_seconds(secs: DaySeconds) -> Option<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
}

/// Half-open wall-clock interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    pub start: DaySeconds,
    pub end: DaySeconds,
}

impl TimeInterval {
    pub fn new(start: DaySeconds, end: DaySeconds) -> Self {
        Self { start, end }
    }

    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(day_seconds(start), day_seconds(end))
    }

    pub fn duration_secs(&self) -> DaySeconds {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, point: DaySeconds) -> bool {
        self.start <= point && point < self.end
    }

    /// Strict half-open overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        strict_overlaps(&self.start, &self.end, &other.start, &other.end)
    }

    pub fn is_before(&self, other: &TimeInterval) -> bool {
        self.end <= other.start
    }

    pub fn clamp_end(&self, limit: DaySeconds) -> Self {
        Self::new(self.start, self.end.min(limit))
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        time_from_day_seconds(self.start)
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        time_from_day_seconds(self.end)
    }
}

/// ISO weekday, Monday = 1 through Sunday = 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWeekday(pub i64);

impl fmt::Display for InvalidWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weekday must be between 1 (Monday) and 7 (Sunday), got {}", self.0)
    }
}

impl TryFrom<i64> for Weekday {
    type Error = InvalidWeekday;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Weekday::ALL
            .into_iter()
            .find(|d| i64::from(d.number()) == n)
            .ok_or(InvalidWeekday(n))
    }
}

impl TryFrom<u8> for Weekday {
    type Error = InvalidWeekday;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Weekday::try_from(i64::from(n))
    }
}

impl From<Weekday> for u8 {
    fn from(d: Weekday) -> u8 {
        d.number()
    }
}

/// Set of active weekdays, serialized as an ascending list of day numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekdaySet(BTreeSet<Weekday>);

impl WeekdaySet {
    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn includes_date(&self, date: NaiveDate) -> bool {
        self.contains(Weekday::of(date))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Weekday::name).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Renders a wall-clock time as `HH:MM`.
pub fn serialize_hhmm<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&t.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> DaySeconds {
        h * 3600 + m * 60
    }

    #[test]
    fn contains_is_half_open() {
        let iv = TimeInterval::new(t(9, 0), t(9, 30));
        assert!(iv.contains(t(9, 0)));
        assert!(iv.contains(t(9, 29)));
        assert!(!iv.contains(t(9, 30)));
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        let a = TimeInterval::new(t(9, 0), t(9, 30));
        let b = TimeInterval::new(t(9, 30), t(10, 0));
        let c = TimeInterval::new(t(9, 15), t(9, 45));
        assert!(!a.overlaps(&b));
        assert!(a.is_before(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn clamp_end_only_shrinks() {
        let iv = TimeInterval::new(t(9, 0), t(10, 0));
        assert_eq!(iv.clamp_end(t(9, 40)).end, t(9, 40));
        assert_eq!(iv.clamp_end(t(11, 0)).end, t(10, 0));
    }

    #[test]
    fn weekday_numbering_starts_monday() {
        // 2025-11-03 is a Monday
        let monday = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        assert_eq!(Weekday::of(monday), Weekday::Monday);
        assert_eq!(Weekday::of(monday + chrono::Duration::days(6)).number(), 7);
        assert!(Weekday::try_from(0u8).is_err());
        assert!(Weekday::try_from(8i64).is_err());
    }

    #[test]
    fn weekday_set_round_trips_as_sorted_numbers() {
        let set: WeekdaySet = serde_json::from_str("[5, 1, 3, 1]").unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,3,5]");
        assert_eq!(set.names(), vec!["Monday", "Wednesday", "Friday"]);
        assert!(serde_json::from_str::<WeekdaySet>("[9]").is_err());
    }
}
