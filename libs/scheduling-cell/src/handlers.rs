use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    BulkSlotCreateResponse, CreateRecurringSlotsRequest, GeneratedSlotRequest, SchedulingError,
    SlotListQuery, SlotPreviewRequest, SlotPreviewResponse,
};
use crate::services::recurrence::RecurrenceService;
use crate::SchedulingState;

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::SlotNotFound => AppError::NotFound(err.to_string()),
            SchedulingError::BulkLimitExceeded { .. } => AppError::BadRequest(err.to_string()),
            SchedulingError::ValidationError(msg) => AppError::ValidationError(msg),
        }
    }
}

/// Live preview of a recurrence pattern. Tolerates partially-filled specs
/// (no working days, zero interval) by returning an empty preview rather
/// than a validation error, so the form can call it on every change.
#[axum::debug_handler]
pub async fn preview_slots(
    State(_state): State<Arc<SchedulingState>>,
    Json(request): Json<SlotPreviewRequest>,
) -> Json<SlotPreviewResponse> {
    let recurrence_service = RecurrenceService::new();

    let dates = recurrence_service.generate_working_dates(&request.recurrence);
    let total_slots = dates.len() * request.templates.len();

    Json(SlotPreviewResponse { dates, total_slots })
}

/// Expand a recurrence pattern for one doctor and persist every resulting
/// slot through the store.
#[axum::debug_handler]
pub async fn create_recurring_slots(
    State(state): State<Arc<SchedulingState>>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<CreateRecurringSlotsRequest>,
) -> Result<(StatusCode, Json<BulkSlotCreateResponse>), AppError> {
    let recurrence_service = RecurrenceService::new();

    recurrence_service.validate_spec(&request.recurrence)?;
    recurrence_service.validate_templates(&request.templates)?;

    let slot_requests = recurrence_service.build_slot_requests(
        &request.recurrence,
        &request.templates,
        doctor_id,
        request.facility_id,
    );

    let created = persist_slots(&state, slot_requests).await?;

    tracing::info!(
        "Created {} recurring slots for doctor {}",
        created.created,
        doctor_id
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Bulk submission endpoint: an ordered list of slot requests, one record
/// created per entry, in input order.
#[axum::debug_handler]
pub async fn create_slots_bulk(
    State(state): State<Arc<SchedulingState>>,
    Json(requests): Json<Vec<GeneratedSlotRequest>>,
) -> Result<(StatusCode, Json<BulkSlotCreateResponse>), AppError> {
    let created = persist_slots(&state, requests).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn list_doctor_slots(
    State(state): State<Arc<SchedulingState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotListQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = state.slots.list(doctor_id, query.from, query.to).await?;

    Ok(Json(json!({
        "slots": slots,
        "total": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<SchedulingState>>,
    Path(slot_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.slots.delete(slot_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn persist_slots(
    state: &SchedulingState,
    requests: Vec<GeneratedSlotRequest>,
) -> Result<BulkSlotCreateResponse, AppError> {
    let limit = state.config.max_bulk_slots;
    if requests.len() > limit {
        return Err(SchedulingError::BulkLimitExceeded {
            requested: requests.len(),
            limit,
        }
        .into());
    }

    let mut slots = Vec::with_capacity(requests.len());
    for request in requests {
        slots.push(state.slots.create(request).await?);
    }

    Ok(BulkSlotCreateResponse {
        created: slots.len(),
        slots,
    })
}
