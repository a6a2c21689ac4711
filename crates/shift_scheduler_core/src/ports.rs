//! crates/shift_scheduler_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the scheduler's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the storage layer that feeds it and keeps its results.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Assignment, AvailabilityWindow, Employee, ShiftRequirement};
use crate::week::WeekRange;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Supplies the recurring templates a generation run works from.
#[async_trait]
pub trait ScheduleInputLoader: Send + Sync {
    async fn list_shift_requirements(&self) -> PortResult<Vec<ShiftRequirement>>;

    /// Only employees flagged active.
    async fn list_active_employees(&self) -> PortResult<Vec<Employee>>;

    async fn list_availability(&self, employee_ids: &[Uuid])
        -> PortResult<Vec<AvailabilityWindow>>;
}

/// Row counts reported by [`AssignmentStore::replace_week`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceSummary {
    pub deleted: u64,
    pub inserted: u64,
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Removes every assignment dated inside `week` and stores `assignments` in
    /// their place. Implementations should apply both steps atomically.
    async fn replace_week(
        &self,
        week: WeekRange,
        assignments: &[Assignment],
    ) -> PortResult<ReplaceSummary>;

    async fn list_assignments(&self, week: WeekRange) -> PortResult<Vec<Assignment>>;
}
