//! crates/shift_scheduler_core/src/domain.rs
//!
//! Defines the pure, core data structures for the scheduler.
//! These structs are independent of any database or serialization format.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use std::fmt;
use uuid::Uuid;

/// Day index used by requirements and availability: 0 = Sunday .. 6 = Saturday.
pub type DayOfWeek = u8;

/// Returns the day index of a calendar date, counted from Sunday.
pub fn day_of_week(date: NaiveDate) -> DayOfWeek {
    date.weekday().num_days_from_sunday() as DayOfWeek
}

/// A recurring coverage need, created by managers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRequirement {
    pub id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required_count: u32,
}

impl ShiftRequirement {
    /// Length of the shift in whole hours. Only the hour components count.
    pub fn duration_hours(&self) -> i32 {
        self.end_time.hour() as i32 - self.start_time.hour() as i32
    }
}

/// An active employee eligible for scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub full_name: String,
    pub weekly_hour_limit: i32,
}

/// A recurring window in which an employee can work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub employee_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    /// True when this window fully contains the requirement's time span on the
    /// same weekday. Overlapping is not enough.
    pub fn covers(&self, requirement: &ShiftRequirement) -> bool {
        self.day_of_week == requirement.day_of_week
            && self.start_time <= requirement.start_time
            && self.end_time >= requirement.end_time
    }
}

/// One employee placed on one requirement for a concrete date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub shift_requirement_id: Uuid,
    pub date: NaiveDate,
}

/// An unfilled seat of a requirement on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub shift_requirement_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unable to fill shift on {} at {}",
            self.date.format("%Y-%m-%d"),
            self.start_time.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn requirement(start: NaiveTime, end: NaiveTime) -> ShiftRequirement {
        ShiftRequirement {
            id: Uuid::new_v4(),
            day_of_week: 1,
            start_time: start,
            end_time: end,
            required_count: 1,
        }
    }

    #[test]
    fn duration_ignores_minutes() {
        assert_eq!(requirement(time(9, 30), time(17, 15)).duration_hours(), 8);
        assert_eq!(requirement(time(9, 0), time(9, 45)).duration_hours(), 0);
        assert_eq!(requirement(time(8, 59), time(12, 0)).duration_hours(), 4);
    }

    #[test]
    fn window_must_contain_the_whole_shift() {
        let req = requirement(time(9, 0), time(17, 0));
        let window = |start, end| AvailabilityWindow {
            employee_id: Uuid::new_v4(),
            day_of_week: 1,
            start_time: start,
            end_time: end,
        };

        assert!(window(time(8, 0), time(18, 0)).covers(&req));
        assert!(window(time(9, 0), time(17, 0)).covers(&req));
        assert!(!window(time(9, 30), time(17, 0)).covers(&req));
        assert!(!window(time(8, 0), time(16, 59)).covers(&req));

        let mut other_day = window(time(8, 0), time(18, 0));
        other_day.day_of_week = 2;
        assert!(!other_day.covers(&req));
    }

    #[test]
    fn conflict_message_uses_iso_date_and_short_time() {
        let conflict = Conflict {
            shift_requirement_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            start_time: time(22, 0),
        };
        assert_eq!(
            conflict.to_string(),
            "Unable to fill shift on 2024-01-09 at 22:00"
        );
    }

    #[test]
    fn day_index_counts_from_sunday() {
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()), 0);
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()), 1);
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2024, 1, 13).unwrap()), 6);
    }
}
