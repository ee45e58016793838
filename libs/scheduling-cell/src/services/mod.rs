pub mod recurrence;
pub mod slots;

pub use recurrence::RecurrenceService;
pub use slots::{InMemorySlotStore, SlotStore};
