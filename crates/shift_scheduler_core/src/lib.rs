pub mod domain;
pub mod engine;
pub mod ports;
pub mod service;
pub mod week;

pub use domain::{Assignment, AvailabilityWindow, Conflict, Employee, ShiftRequirement};
pub use engine::{EngineOptions, HourWindow, LimitCheck, ScheduleOutcome};
pub use ports::{AssignmentStore, PortError, PortResult, ReplaceSummary, ScheduleInputLoader};
pub use service::{GenerationReport, ScheduleError, ScheduleService};
pub use week::WeekRange;
