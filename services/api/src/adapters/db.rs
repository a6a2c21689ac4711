//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ScheduleInputLoader` and `AssignmentStore` ports from the `core` crate.
//! It handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use shift_scheduler_core::domain::{
    Assignment, AvailabilityWindow, DayOfWeek, Employee, ShiftRequirement,
};
use shift_scheduler_core::ports::{
    AssignmentStore, PortError, PortResult, ReplaceSummary, ScheduleInputLoader,
};
use shift_scheduler_core::WeekRange;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements both scheduling ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn day_from_column(value: i16) -> PortResult<DayOfWeek> {
    DayOfWeek::try_from(value)
        .ok()
        .filter(|day| *day <= 6)
        .ok_or_else(|| PortError::Unexpected(format!("Invalid day_of_week {}", value)))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ShiftRequirementRecord {
    id: Uuid,
    day_of_week: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
    required_count: i32,
}
impl ShiftRequirementRecord {
    fn to_domain(self) -> PortResult<ShiftRequirement> {
        Ok(ShiftRequirement {
            id: self.id,
            day_of_week: day_from_column(self.day_of_week)?,
            start_time: self.start_time,
            end_time: self.end_time,
            required_count: self.required_count.max(0) as u32,
        })
    }
}

#[derive(FromRow)]
struct EmployeeRecord {
    id: Uuid,
    full_name: String,
    weekly_hour_limit: i32,
}
impl EmployeeRecord {
    fn to_domain(self) -> Employee {
        Employee {
            id: self.id,
            full_name: self.full_name,
            weekly_hour_limit: self.weekly_hour_limit,
        }
    }
}

#[derive(FromRow)]
struct AvailabilityRecord {
    employee_id: Uuid,
    day_of_week: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
}
impl AvailabilityRecord {
    fn to_domain(self) -> PortResult<AvailabilityWindow> {
        Ok(AvailabilityWindow {
            employee_id: self.employee_id,
            day_of_week: day_from_column(self.day_of_week)?,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

#[derive(FromRow)]
struct AssignmentRecord {
    id: Uuid,
    employee_id: Uuid,
    shift_requirement_id: Uuid,
    date: NaiveDate,
}
impl AssignmentRecord {
    fn to_domain(self) -> Assignment {
        Assignment {
            id: self.id,
            employee_id: self.employee_id,
            shift_requirement_id: self.shift_requirement_id,
            date: self.date,
        }
    }
}

//=========================================================================================
// `ScheduleInputLoader` Trait Implementation
//=========================================================================================

#[async_trait]
impl ScheduleInputLoader for DbAdapter {
    async fn list_shift_requirements(&self) -> PortResult<Vec<ShiftRequirement>> {
        let records = sqlx::query_as::<_, ShiftRequirementRecord>(
            "SELECT id, day_of_week, start_time, end_time, required_count \
             FROM shift_requirements ORDER BY day_of_week, start_time, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn list_active_employees(&self) -> PortResult<Vec<Employee>> {
        let records = sqlx::query_as::<_, EmployeeRecord>(
            "SELECT id, full_name, weekly_hour_limit FROM employees \
             WHERE is_active = TRUE ORDER BY full_name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_availability(
        &self,
        employee_ids: &[Uuid],
    ) -> PortResult<Vec<AvailabilityWindow>> {
        if employee_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, AvailabilityRecord>(
            "SELECT employee_id, day_of_week, start_time, end_time FROM availability \
             WHERE employee_id = ANY($1) ORDER BY employee_id, day_of_week, start_time",
        )
        .bind(employee_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }
}

//=========================================================================================
// `AssignmentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AssignmentStore for DbAdapter {
    async fn replace_week(
        &self,
        week: WeekRange,
        assignments: &[Assignment],
    ) -> PortResult<ReplaceSummary> {
        // Delete and insert commit together; a failed insert restores the old week.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let deleted = sqlx::query("DELETE FROM shift_assignments WHERE date >= $1 AND date <= $2")
            .bind(week.start)
            .bind(week.end)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to clear week: {}", e)))?
            .rows_affected();

        let ids: Vec<Uuid> = assignments.iter().map(|a| a.id).collect();
        let employee_ids: Vec<Uuid> = assignments.iter().map(|a| a.employee_id).collect();
        let requirement_ids: Vec<Uuid> =
            assignments.iter().map(|a| a.shift_requirement_id).collect();
        let dates: Vec<NaiveDate> = assignments.iter().map(|a| a.date).collect();

        let inserted = sqlx::query(
            "INSERT INTO shift_assignments (id, employee_id, shift_requirement_id, date) \
             SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::uuid[], $4::date[])",
        )
        .bind(ids)
        .bind(employee_ids)
        .bind(requirement_ids)
        .bind(dates)
        .execute(&mut *tx)
        .await
        .map_err(|e| PortError::Unexpected(format!("Failed to insert assignments: {}", e)))?
        .rows_affected();

        tx.commit().await.map_err(unexpected)?;
        debug!(deleted, inserted, "Replaced assignments for week {}", week.start);

        Ok(ReplaceSummary { deleted, inserted })
    }

    async fn list_assignments(&self, week: WeekRange) -> PortResult<Vec<Assignment>> {
        let records = sqlx::query_as::<_, AssignmentRecord>(
            "SELECT id, employee_id, shift_requirement_id, date FROM shift_assignments \
             WHERE date >= $1 AND date <= $2 \
             ORDER BY date, shift_requirement_id, employee_id",
        )
        .bind(week.start)
        .bind(week.end)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
