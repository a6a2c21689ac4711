//! crates/shift_scheduler_core/src/service.rs
//!
//! Orchestrates one generation run: load inputs, compute the schedule, persist it.

use chrono::{NaiveDate, Weekday};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::{Assignment, Conflict};
use crate::engine::{self, EngineOptions};
use crate::ports::{AssignmentStore, PortError, ScheduleInputLoader};
use crate::week::WeekRange;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Requirements, employees or availability could not be read. Nothing was written.
    #[error("Failed to load scheduling data: {0}")]
    Load(PortError),

    /// The previous week could not be cleared or the new assignments could not be stored.
    #[error("Failed to save assignments: {0}")]
    Persist(PortError),
}

/// Result of a successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub week: WeekRange,
    pub assignments_count: usize,
    pub conflicts: Vec<Conflict>,
    /// Assignments removed from the week before the new ones were stored.
    pub deleted: u64,
}

#[derive(Clone)]
pub struct ScheduleService {
    loader: Arc<dyn ScheduleInputLoader>,
    store: Arc<dyn AssignmentStore>,
    options: EngineOptions,
    week_starts_on: Weekday,
}

impl ScheduleService {
    /// Weeks start on Sunday and the engine runs with its default options.
    pub fn new(loader: Arc<dyn ScheduleInputLoader>, store: Arc<dyn AssignmentStore>) -> Self {
        Self {
            loader,
            store,
            options: EngineOptions::default(),
            week_starts_on: Weekday::Sun,
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_week_start(mut self, week_starts_on: Weekday) -> Self {
        self.week_starts_on = week_starts_on;
        self
    }

    pub fn week_of(&self, date: NaiveDate) -> WeekRange {
        WeekRange::containing(date, self.week_starts_on)
    }

    /// Builds and stores the schedule for the week containing `start_date`,
    /// replacing whatever that week held before.
    pub async fn generate_week(
        &self,
        start_date: NaiveDate,
    ) -> Result<GenerationReport, ScheduleError> {
        let week = self.week_of(start_date);
        info!("Generating schedule for week {} to {}", week.start, week.end);

        let load = async {
            let requirements = self.loader.list_shift_requirements().await?;
            let employees = self.loader.list_active_employees().await?;
            let employee_ids: Vec<_> = employees.iter().map(|e| e.id).collect();
            let availability = self.loader.list_availability(&employee_ids).await?;
            Ok::<_, PortError>((requirements, employees, availability))
        };
        let (requirements, employees, availability) = load.await.map_err(|e| {
            error!("Failed to load scheduling data: {:?}", e);
            ScheduleError::Load(e)
        })?;

        let outcome = engine::generate(
            week,
            &requirements,
            &employees,
            &availability,
            self.options,
        );

        let summary = self
            .store
            .replace_week(week, &outcome.assignments)
            .await
            .map_err(|e| {
                error!("Failed to save assignments for week {}: {:?}", week.start, e);
                ScheduleError::Persist(e)
            })?;

        if !outcome.conflicts.is_empty() {
            warn!(
                "{} shift seat(s) left unfilled for week {}",
                outcome.conflicts.len(),
                week.start
            );
        }
        info!(
            "Stored {} assignments for week {} (replaced {})",
            summary.inserted, week.start, summary.deleted
        );

        Ok(GenerationReport {
            week,
            assignments_count: outcome.assignments.len(),
            conflicts: outcome.conflicts,
            deleted: summary.deleted,
        })
    }

    /// The stored assignments for the week containing `date`.
    pub async fn week_assignments(
        &self,
        date: NaiveDate,
    ) -> Result<(WeekRange, Vec<Assignment>), ScheduleError> {
        let week = self.week_of(date);
        let assignments = self
            .store
            .list_assignments(week)
            .await
            .map_err(ScheduleError::Load)?;
        Ok((week, assignments))
    }
}
