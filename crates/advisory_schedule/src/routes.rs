// --- File: crates/advisory_schedule/src/routes.rs ---

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    clear_handler, close_session_handler, get_booked_handler, get_session_handler,
    get_slots_handler, navigate_handler, open_session_handler, select_date_handler,
    select_time_handler, submit_handler, update_contact_handler, ScheduleState,
};

/// Creates a router containing all routes of the booking widget.
pub fn routes(state: Arc<ScheduleState>) -> Router {
    Router::new()
        .route("/schedule/slots", get(get_slots_handler))
        .route("/schedule/booked", get(get_booked_handler))
        .route("/schedule/sessions", post(open_session_handler))
        .route(
            "/schedule/sessions/{id}",
            get(get_session_handler).delete(close_session_handler),
        )
        .route("/schedule/sessions/{id}/date", put(select_date_handler))
        .route("/schedule/sessions/{id}/page/{nav}", post(navigate_handler))
        .route("/schedule/sessions/{id}/time", put(select_time_handler))
        .route("/schedule/sessions/{id}/contact", put(update_contact_handler))
        .route("/schedule/sessions/{id}/clear", post(clear_handler))
        .route("/schedule/sessions/{id}/submit", post(submit_handler))
        .with_state(state)
}
