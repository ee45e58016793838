use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers;
use crate::SchedulingState;

pub fn scheduling_routes(state: Arc<SchedulingState>) -> Router {
    Router::new()
        // Recurrence preview and expansion
        .route("/slots/preview", post(handlers::preview_slots))
        .route(
            "/doctors/{doctor_id}/slots/recurring",
            post(handlers::create_recurring_slots),
        )
        // Slot persistence
        .route("/slots/bulk", post(handlers::create_slots_bulk))
        .route("/doctors/{doctor_id}/slots", get(handlers::list_doctor_slots))
        .route("/slots/{slot_id}", delete(handlers::delete_slot))
        .with_state(state)
}
