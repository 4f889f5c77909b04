use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::handlers::AppointmentCellState;
use appointment_cell::router::appointment_routes;

pub fn create_router(state: Arc<AppointmentCellState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinica Wenka API is running!" }))
        .nest("/api/appointments", appointment_routes(state))
}
