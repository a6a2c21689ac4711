//! crates/shift_scheduler_core/src/week.rs
//!
//! Week boundaries for schedule generation.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Seven consecutive calendar days, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    /// The week that begins on `start`.
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// The week containing `date`, where weeks begin on `week_starts_on`.
    pub fn containing(date: NaiveDate, week_starts_on: Weekday) -> Self {
        let offset = (date.weekday().num_days_from_sunday() + 7
            - week_starts_on.num_days_from_sunday())
            % 7;
        Self::starting(date - Duration::days(offset as i64))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The seven dates of the week in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..7).map(move |offset| start + Duration::days(offset))
    }
}
