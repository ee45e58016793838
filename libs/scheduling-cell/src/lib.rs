pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use shared_config::AppConfig;

use services::slots::SlotStore;

// Re-export the scheduling types consumed by other cells and the API crate
pub use models::{
    AppointmentSlot, GeneratedSlotRequest, RecurrenceEnds, RecurrenceSpec, SlotType,
    TimeSlotTemplate,
};
pub use services::{InMemorySlotStore, RecurrenceService};

/// Shared state for the scheduling routes: configuration plus the injected
/// slot store.
pub struct SchedulingState {
    pub config: AppConfig,
    pub slots: Arc<dyn SlotStore>,
}

impl SchedulingState {
    pub fn new(config: AppConfig, slots: Arc<dyn SlotStore>) -> Self {
        Self { config, slots }
    }

    /// State backed by the in-memory store, used by the API binary and tests.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Arc::new(InMemorySlotStore::new()))
    }
}
