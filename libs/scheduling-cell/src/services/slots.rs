use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{AppointmentSlot, GeneratedSlotRequest, SchedulingError};

/// Persistence capability for appointment slots. Injected into handlers so
/// the storage backend can be swapped without touching the request path.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn create(&self, request: GeneratedSlotRequest)
        -> Result<AppointmentSlot, SchedulingError>;

    async fn list(
        &self,
        doctor_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AppointmentSlot>, SchedulingError>;

    async fn delete(&self, slot_id: Uuid) -> Result<(), SchedulingError>;
}

/// In-memory `SlotStore` backed by an async `RwLock`.
#[derive(Default)]
pub struct InMemorySlotStore {
    slots: RwLock<Vec<AppointmentSlot>>,
}

impl InMemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for InMemorySlotStore {
    async fn create(
        &self,
        request: GeneratedSlotRequest,
    ) -> Result<AppointmentSlot, SchedulingError> {
        let slot = AppointmentSlot::from_request(request);
        debug!("Creating slot {} on {}", slot.id, slot.slot_date);

        let mut slots = self.slots.write().await;
        slots.push(slot.clone());

        Ok(slot)
    }

    async fn list(
        &self,
        doctor_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AppointmentSlot>, SchedulingError> {
        let slots = self.slots.read().await;

        let mut matched: Vec<AppointmentSlot> = slots
            .iter()
            .filter(|slot| slot.doctor_id == doctor_id)
            .filter(|slot| from.is_none_or(|from| slot.slot_date >= from))
            .filter(|slot| to.is_none_or(|to| slot.slot_date <= to))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            a.slot_date
                .cmp(&b.slot_date)
                .then(a.start_time.cmp(&b.start_time))
        });

        Ok(matched)
    }

    async fn delete(&self, slot_id: Uuid) -> Result<(), SchedulingError> {
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|slot| slot.id != slot_id);

        if slots.len() == before {
            return Err(SchedulingError::SlotNotFound);
        }

        debug!("Deleted slot {}", slot_id);
        Ok(())
    }
}
