// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest};
use crate::services::booking::AppointmentBookingService;

/// Shared state of the appointment routes.
pub struct AppointmentCellState {
    pub config: Arc<AppConfig>,
    pub booking: AppointmentBookingService,
}

fn map_booking_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::Validation(msg) => AppError::BadRequest(msg),
        AppointmentError::ServiceNotFound(_)
        | AppointmentError::PastDate
        | AppointmentError::SlotUnavailable
        | AppointmentError::InvalidStatusTransition(_) => AppError::BadRequest(e.to_string()),
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::Storage(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    info!("User {} booking an appointment", user.id);

    let appointment = state
        .booking
        .book(request)
        .await
        .map_err(map_booking_error)?;

    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppointmentCellState>>,
    Path(patient_id): Path<i64>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    info!("User {} listing appointments of patient {}", user.id, patient_id);

    let appointments = state
        .booking
        .list_for_patient(patient_id)
        .await
        .map_err(map_booking_error)?;

    // Always an array, never null
    Ok(Json(json!(appointments)))
}

/// Public joined view: the numeric id is the capability the specialist
/// confirmation flow holds, so no session check happens here.
#[axum::debug_handler]
pub async fn get_appointment_detail(
    State(state): State<Arc<AppointmentCellState>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let detail = state
        .booking
        .get_detail(appointment_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(detail)))
}

/// Machine transport for confirmation: JSON status payload.
#[axum::debug_handler]
pub async fn confirm_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .booking
        .confirm(appointment_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment confirmed"
    })))
}

/// Link transport for confirmation: arrives from the one-click email action
/// and always answers with an external redirect, encoding failure as a
/// query parameter.
#[axum::debug_handler]
pub async fn confirm_appointment_link(
    State(state): State<Arc<AppointmentCellState>>,
    Path(appointment_id): Path<i64>,
) -> Redirect {
    let destination = match state.booking.confirm(appointment_id).await {
        Ok(()) => format!(
            "{}/confirm-appointment/confirm/{}",
            state.config.frontend_url, appointment_id
        ),
        Err(e) => {
            warn!(
                "Email-link confirmation failed for appointment {}: {}",
                appointment_id, e
            );
            format!(
                "{}/confirm-appointment/confirm/{}?error=true",
                state.config.frontend_url, appointment_id
            )
        }
    };

    Redirect::to(&destination)
}

/// Requires an authenticated requester. Ownership of the appointment is not
/// verified here (see DESIGN.md).
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Path(appointment_id): Path<i64>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    info!("User {} cancelling appointment {}", user.id, appointment_id);

    state
        .booking
        .cancel(appointment_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled"
    })))
}
