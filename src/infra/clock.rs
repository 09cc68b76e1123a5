use chrono::{DateTime, Local, NaiveDateTime, Utc};

use crate::domain::ports::Clock;

/// Wall clock of the host, in local time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, read as UTC for timestamps.
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.0.and_utc()
    }
}
