//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use shift_scheduler_core::ports::{AssignmentStore, ScheduleInputLoader};
use shift_scheduler_core::ScheduleService;
use std::sync::Arc;

use crate::config::Config;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: ScheduleService,
}

impl AppState {
    /// Wires the storage handles into a scheduler configured from `config`.
    pub fn new(
        config: &Config,
        loader: Arc<dyn ScheduleInputLoader>,
        store: Arc<dyn AssignmentStore>,
    ) -> Self {
        Self::with_scheduler(
            ScheduleService::new(loader, store)
                .with_options(config.engine)
                .with_week_start(config.week_starts_on),
        )
    }

    pub fn with_scheduler(scheduler: ScheduleService) -> Self {
        Self { scheduler }
    }

    /// Default scheduler settings over the given storage handles.
    pub fn with_defaults(
        loader: Arc<dyn ScheduleInputLoader>,
        store: Arc<dyn AssignmentStore>,
    ) -> Self {
        Self::with_scheduler(ScheduleService::new(loader, store))
    }
}
