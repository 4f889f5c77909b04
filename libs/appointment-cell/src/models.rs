// libs/appointment-cell/src/models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use patient_cell::models::PatientError;
use shared_models::records::AppointmentStatus;
use shared_store::StoreError;
use specialist_cell::models::ResolveError;

/// Wire formats for the date/time fields exchanged with clients.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    #[serde(rename = "nombre_paciente")]
    pub patient_name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "servicio")]
    pub service: String,
    /// YYYY-MM-DD
    #[serde(rename = "fecha_cita")]
    pub date: String,
    /// HH:MM, 24-hour clock
    #[serde(rename = "hora_cita")]
    pub time: String,
    #[serde(rename = "mensaje", default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: i64,
    #[serde(rename = "nombre_paciente")]
    pub patient_name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "servicio")]
    pub service: String,
    #[serde(rename = "fecha_cita")]
    pub date: String,
    #[serde(rename = "hora_cita")]
    pub time: String,
    #[serde(rename = "estado")]
    pub status: AppointmentStatus,
    #[serde(rename = "mensaje")]
    pub message: String,
    pub created_at: NaiveDateTime,
}

/// Fully joined view of one appointment. Served without patient-session
/// authentication: the opaque numeric id is the capability the specialist
/// confirmation flow holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDetail {
    pub id: i64,
    #[serde(rename = "nombre_paciente")]
    pub patient_name: String,
    #[serde(rename = "email_paciente")]
    pub patient_email: String,
    #[serde(rename = "telefono_paciente")]
    pub patient_phone: String,
    #[serde(rename = "nombre_especialista")]
    pub specialist_name: String,
    #[serde(rename = "email_especialista")]
    pub specialist_email: String,
    #[serde(rename = "especialidad")]
    pub specialty: String,
    #[serde(rename = "tratamiento")]
    pub treatment: String,
    #[serde(rename = "fecha_hora")]
    pub start: NaiveDateTime,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "estado")]
    pub status: AppointmentStatus,
    pub created_at: NaiveDateTime,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("{0}")]
    Validation(String),

    #[error("no specialist found for service: {0}")]
    ServiceNotFound(String),

    #[error("appointments cannot be scheduled in the past")]
    PastDate,

    #[error("the selected time slot is not available, please choose another")]
    SlotUnavailable,

    #[error("appointment not found")]
    NotFound,

    #[error("appointment cannot change state from {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for AppointmentError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppointmentError::NotFound,
            other => AppointmentError::Storage(other.to_string()),
        }
    }
}

impl From<PatientError> for AppointmentError {
    fn from(e: PatientError) -> Self {
        match e {
            PatientError::IncompleteName => AppointmentError::Validation(e.to_string()),
            PatientError::Store(store) => store.into(),
        }
    }
}

impl From<ResolveError> for AppointmentError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::ServiceNotFound(name) => AppointmentError::ServiceNotFound(name),
            ResolveError::Store(store) => store.into(),
        }
    }
}
