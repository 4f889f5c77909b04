// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, AppointmentCellState};

pub fn appointment_routes(state: Arc<AppointmentCellState>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/patients/{patient_id}", get(handlers::get_patient_appointments))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    // The detail view and both confirmation transports are deliberately
    // unauthenticated: the opaque appointment id acts as the capability.
    let public_routes = Router::new()
        .route("/{appointment_id}/detail", get(handlers::get_appointment_detail))
        .route(
            "/{appointment_id}/confirm",
            get(handlers::confirm_appointment_link).post(handlers::confirm_appointment),
        );

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .with_state(state)
}
