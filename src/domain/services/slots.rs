use chrono::NaiveTime;
use serde::Serialize;
use tracing::warn;

use crate::domain::models::agenda::Agenda;
use crate::domain::models::time::{serialize_hhmm, TimeInterval, SECONDS_PER_DAY};

/// One bookable interval of a day, annotated with availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    #[serde(serialize_with = "serialize_hhmm")]
    pub start: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm")]
    pub end: NaiveTime,
    pub available: bool,
}

/// Inputs of the slot walk for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTemplate {
    pub work: TimeInterval,
    pub interval_minutes: i32,
    pub rest: Option<TimeInterval>,
}

impl SlotTemplate {
    pub fn from_agenda(agenda: &Agenda) -> Self {
        Self {
            work: agenda.working_hours(),
            interval_minutes: agenda.interval_minutes,
            rest: agenda.break_window(),
        }
    }

    fn is_consistent(&self) -> bool {
        self.interval_minutes >= 1
            && !self.work.is_empty()
            && self.work.end <= SECONDS_PER_DAY
            && self.rest.is_none_or(|r| !r.is_empty())
    }
}

/// Walks the working window in `interval_minutes` steps and emits slots,
/// earliest first.
///
/// A cursor inside the break jumps to the break end. A slot that would run
/// into the break is shortened to end at the break start and the cursor then
/// resumes at the break end. No partial slot is emitted past `work.end`.
///
/// `is_free` is consulted once per emitted slot. An inconsistent template
/// yields no slots; callers must read an empty result as "nothing bookable".
pub fn generate_slots<F>(template: &SlotTemplate, mut is_free: F) -> Vec<Slot>
where
    F: FnMut(TimeInterval) -> bool,
{
    if !template.is_consistent() {
        warn!(?template, "inconsistent slot template, no slots generated");
        return Vec::new();
    }

    let step = (template.interval_minutes as u32).saturating_mul(60);
    let work = template.work;
    let mut slots = Vec::new();
    let mut cursor = work.start;

    while cursor < work.end {
        if let Some(rest) = template.rest
            && rest.contains(cursor)
        {
            cursor = rest.end;
            continue;
        }

        let tentative_end = cursor.saturating_add(step);
        if tentative_end > work.end {
            break;
        }

        let truncated_at = template
            .rest
            .filter(|rest| tentative_end > rest.start && cursor < rest.start);

        let candidate = match truncated_at {
            Some(rest) => TimeInterval::new(cursor, tentative_end).clamp_end(rest.start),
            None => TimeInterval::new(cursor, tentative_end),
        };

        if !candidate.is_empty() {
            let (Some(start), Some(end)) = (candidate.start_time(), candidate.end_time()) else {
                warn!(?candidate, "slot bounds not representable as wall-clock time");
                return Vec::new();
            };
            slots.push(Slot {
                start,
                end,
                available: is_free(candidate),
            });
        }

        cursor = match truncated_at {
            Some(rest) => rest.end,
            None => candidate.end,
        };
    }

    slots
}
