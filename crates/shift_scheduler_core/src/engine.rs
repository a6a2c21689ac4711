//! crates/shift_scheduler_core/src/engine.rs
//!
//! The assignment engine: a single-pass greedy scheduler over one week.
//!
//! For each date of the week, the requirements falling on that weekday are
//! staffed in start-time order. Each requirement gets a candidate pool of
//! employees whose availability covers it and who pass the hour-limit check;
//! seats are handed out to the least-loaded candidate, earliest pool position
//! on ties. Seats that cannot be filled become [`Conflict`]s.
//!
//! The engine performs no I/O. Loading inputs and persisting the outcome is the
//! job of [`crate::service::ScheduleService`].

use crate::domain::{
    day_of_week, Assignment, AvailabilityWindow, Conflict, Employee, ShiftRequirement,
};
use crate::week::WeekRange;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// Options
//=========================================================================================

/// How long accumulated hours are remembered while walking the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourWindow {
    /// Hours are forgotten at the start of every day, so the weekly limit is
    /// effectively applied per day.
    #[default]
    PerDay,
    /// Hours accumulate across all seven days.
    PerWeek,
}

impl FromStr for HourWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per_day" | "day" => Ok(HourWindow::PerDay),
            "per_week" | "week" => Ok(HourWindow::PerWeek),
            _ => Err(format!("Invalid hour window: {}", s)),
        }
    }
}

/// The test applied to an employee's accumulated hours when building a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitCheck {
    /// `hours + shift duration <= limit`: taking the shift must not push the
    /// employee past the limit.
    #[default]
    Projected,
    /// `hours <= limit`: only hours already assigned are compared.
    PreAssignment,
}

impl LimitCheck {
    fn allows(self, hours: i32, duration: i32, limit: i32) -> bool {
        match self {
            LimitCheck::Projected => hours + duration <= limit,
            LimitCheck::PreAssignment => hours <= limit,
        }
    }
}

impl FromStr for LimitCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "projected" => Ok(LimitCheck::Projected),
            "pre_assignment" => Ok(LimitCheck::PreAssignment),
            _ => Err(format!("Invalid limit check: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineOptions {
    pub hour_window: HourWindow,
    pub limit_check: LimitCheck,
}

//=========================================================================================
// Outcome
//=========================================================================================

/// The assignments and conflicts produced for one week, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub assignments: Vec<Assignment>,
    pub conflicts: Vec<Conflict>,
}

//=========================================================================================
// Entry Points
//=========================================================================================

/// Generates a schedule for `week`, giving each assignment a fresh v4 id.
pub fn generate(
    week: WeekRange,
    requirements: &[ShiftRequirement],
    employees: &[Employee],
    availability: &[AvailabilityWindow],
    options: EngineOptions,
) -> ScheduleOutcome {
    generate_with_ids(week, requirements, employees, availability, options, Uuid::new_v4)
}

/// Same as [`generate`], with assignment ids drawn from `next_id`.
pub fn generate_with_ids<F>(
    week: WeekRange,
    requirements: &[ShiftRequirement],
    employees: &[Employee],
    availability: &[AvailabilityWindow],
    options: EngineOptions,
    next_id: F,
) -> ScheduleOutcome
where
    F: FnMut() -> Uuid,
{
    let mut planner = Planner {
        employees,
        availability,
        limit_check: options.limit_check,
        hours: HashMap::new(),
        next_id,
        outcome: ScheduleOutcome::default(),
    };

    for date in week.days() {
        if options.hour_window == HourWindow::PerDay {
            planner.hours.clear();
        }

        let day = day_of_week(date);
        let mut todays: Vec<&ShiftRequirement> = requirements
            .iter()
            .filter(|r| r.day_of_week == day)
            .collect();
        // Stable: requirements sharing a start time keep their input order.
        todays.sort_by_key(|r| r.start_time);

        for requirement in todays {
            planner.staff(requirement, date);
        }
    }

    debug!(
        week_start = %week.start,
        assignments = planner.outcome.assignments.len(),
        conflicts = planner.outcome.conflicts.len(),
        "Schedule computed"
    );
    planner.outcome
}

//=========================================================================================
// Planner State
//=========================================================================================

struct Planner<'a, F> {
    employees: &'a [Employee],
    availability: &'a [AvailabilityWindow],
    limit_check: LimitCheck,
    hours: HashMap<Uuid, i32>,
    next_id: F,
    outcome: ScheduleOutcome,
}

impl<'a, F> Planner<'a, F>
where
    F: FnMut() -> Uuid,
{
    fn hours_of(&self, employee_id: Uuid) -> i32 {
        self.hours.get(&employee_id).copied().unwrap_or(0)
    }

    fn is_available(&self, employee_id: Uuid, requirement: &ShiftRequirement) -> bool {
        self.availability
            .iter()
            .any(|w| w.employee_id == employee_id && w.covers(requirement))
    }

    /// Fills every seat of `requirement` on `date`, one conflict per seat left empty.
    fn staff(&mut self, requirement: &ShiftRequirement, date: NaiveDate) {
        let duration = requirement.duration_hours();

        let employees = self.employees;
        let mut pool: Vec<&'a Employee> = employees
            .iter()
            .filter(|e| {
                self.is_available(e.id, requirement)
                    && self
                        .limit_check
                        .allows(self.hours_of(e.id), duration, e.weekly_hour_limit)
            })
            .collect();

        for _ in 0..requirement.required_count {
            let Some(index) = self.least_loaded(&pool) else {
                self.outcome.conflicts.push(Conflict {
                    shift_requirement_id: requirement.id,
                    date,
                    start_time: requirement.start_time,
                });
                continue;
            };

            // Order-preserving removal keeps the tie-break stable for later seats.
            let employee = pool.remove(index);
            self.outcome.assignments.push(Assignment {
                id: (self.next_id)(),
                employee_id: employee.id,
                shift_requirement_id: requirement.id,
                date,
            });
            *self.hours.entry(employee.id).or_insert(0) += duration;
        }
    }

    /// Position of the candidate with the fewest hours; the first one wins ties.
    fn least_loaded(&self, pool: &[&Employee]) -> Option<usize> {
        pool.iter()
            .enumerate()
            .min_by_key(|(_, e)| self.hours_of(e.id))
            .map(|(index, _)| index)
    }
}
