//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the scheduling ports. Used by the HTTP
//! tests and handy for running the service without a database.

use async_trait::async_trait;
use shift_scheduler_core::domain::{Assignment, AvailabilityWindow, Employee, ShiftRequirement};
use shift_scheduler_core::ports::{
    AssignmentStore, PortError, PortResult, ReplaceSummary, ScheduleInputLoader,
};
use shift_scheduler_core::WeekRange;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    requirements: Vec<ShiftRequirement>,
    employees: Vec<(Employee, bool)>,
    availability: Vec<AvailabilityWindow>,
    assignments: Vec<Assignment>,
}

/// Stores everything in memory behind a single lock.
#[derive(Default)]
pub struct MemoryAdapter {
    tables: RwLock<Tables>,
    fail_loads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_requirement(&self, requirement: ShiftRequirement) {
        self.tables.write().await.requirements.push(requirement);
    }

    pub async fn add_employee(&self, employee: Employee, is_active: bool) {
        self.tables.write().await.employees.push((employee, is_active));
    }

    pub async fn add_availability(&self, window: AvailabilityWindow) {
        self.tables.write().await.availability.push(window);
    }

    pub async fn add_assignment(&self, assignment: Assignment) {
        self.tables.write().await.assignments.push(assignment);
    }

    pub async fn assignments(&self) -> Vec<Assignment> {
        self.tables.read().await.assignments.clone()
    }

    /// Makes every subsequent load fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail, leaving stored rows untouched.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_loads(&self) -> PortResult<()> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("in-memory load failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleInputLoader for MemoryAdapter {
    async fn list_shift_requirements(&self) -> PortResult<Vec<ShiftRequirement>> {
        self.check_loads()?;
        Ok(self.tables.read().await.requirements.clone())
    }

    async fn list_active_employees(&self) -> PortResult<Vec<Employee>> {
        self.check_loads()?;
        Ok(self
            .tables
            .read()
            .await
            .employees
            .iter()
            .filter(|(_, active)| *active)
            .map(|(e, _)| e.clone())
            .collect())
    }

    async fn list_availability(
        &self,
        employee_ids: &[Uuid],
    ) -> PortResult<Vec<AvailabilityWindow>> {
        self.check_loads()?;
        Ok(self
            .tables
            .read()
            .await
            .availability
            .iter()
            .filter(|w| employee_ids.contains(&w.employee_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AssignmentStore for MemoryAdapter {
    async fn replace_week(
        &self,
        week: WeekRange,
        assignments: &[Assignment],
    ) -> PortResult<ReplaceSummary> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("in-memory write failure".to_string()));
        }

        let mut tables = self.tables.write().await;
        let before = tables.assignments.len();
        tables.assignments.retain(|a| !week.contains(a.date));
        let deleted = (before - tables.assignments.len()) as u64;
        tables.assignments.extend_from_slice(assignments);

        Ok(ReplaceSummary {
            deleted,
            inserted: assignments.len() as u64,
        })
    }

    async fn list_assignments(&self, week: WeekRange) -> PortResult<Vec<Assignment>> {
        self.check_loads()?;
        let mut rows: Vec<Assignment> = self
            .tables
            .read()
            .await
            .assignments
            .iter()
            .filter(|a| week.contains(a.date))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.date, a.shift_requirement_id, a.employee_id));
        Ok(rows)
    }
}
