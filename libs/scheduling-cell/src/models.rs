use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of an appointment slot as offered to patients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotType {
    Regular,
    Consultation,
    FollowUp,
    Emergency,
}

/// Termination condition for a recurrence: either a hard calendar date or a
/// target number of matched dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum RecurrenceEnds {
    Date {
        #[serde(default)]
        end_date: Option<NaiveDate>,
    },
    Count {
        #[serde(default)]
        count: Option<i32>,
    },
}

/// A weekly recurrence pattern as submitted by the scheduling form.
///
/// `working_days` uses 0 = Sunday .. 6 = Saturday. Week alignment is counted
/// in units of 7 days from `start_date`, not from calendar week boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceSpec {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub working_days: Vec<i32>,
    pub repeat_every_weeks: i32,
    pub ends: RecurrenceEnds,
    #[serde(default)]
    pub excluded_dates: Vec<NaiveDate>,
}

/// Time-of-day window applied to every generated date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotTemplate {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_type: SlotType,
}

/// One concrete slot to create. Field names are the bulk submission
/// endpoint's wire contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSlotRequest {
    pub doctor_id: Uuid,
    pub facility_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub slot_type: SlotType,
}

/// A persisted appointment slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub facility_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub slot_type: SlotType,
    pub created_at: DateTime<Utc>,
}

impl AppointmentSlot {
    pub fn from_request(request: GeneratedSlotRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            facility_id: request.facility_id,
            slot_date: request.slot_date,
            start_time: request.start_time,
            end_time: request.end_time,
            is_available: request.is_available,
            slot_type: request.slot_type,
            created_at: Utc::now(),
        }
    }
}

// ==============================================================================
// REQUEST / RESPONSE TYPES
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPreviewRequest {
    pub recurrence: RecurrenceSpec,
    #[serde(default)]
    pub templates: Vec<TimeSlotTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPreviewResponse {
    pub dates: Vec<NaiveDate>,
    pub total_slots: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecurringSlotsRequest {
    pub facility_id: Uuid,
    pub recurrence: RecurrenceSpec,
    pub templates: Vec<TimeSlotTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSlotCreateResponse {
    pub created: usize,
    pub slots: Vec<AppointmentSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("Slot not found")]
    SlotNotFound,

    #[error("Bulk request of {requested} slots exceeds the limit of {limit}")]
    BulkLimitExceeded { requested: usize, limit: usize },

    #[error("Validation error: {0}")]
    ValidationError(String),
}
