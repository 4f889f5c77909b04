// Storage seams for the clinic backend.
//
// The relational store itself is an external collaborator; the cells talk to
// it through these traits. `memory::MemoryStore` is the in-process engine
// used by the API binary and the test suites.
use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use shared_models::records::{
    Appointment, AppointmentStatus, Patient, Specialist, Specialty, Treatment,
};

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Patient fields known at booking time; identity is the email.
#[derive(Debug, Clone)]
pub struct PatientDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub specialist_id: i64,
    pub treatment_id: i64,
    pub start: NaiveDateTime,
    pub duration_minutes: i32,
    pub reason: String,
}

/// Read access to the patient/specialist/treatment catalog, plus the one
/// write the booking flow performs: patient upsert keyed by email.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn upsert_patient_by_email(&self, draft: PatientDraft) -> Result<Patient, StoreError>;

    async fn patient(&self, id: i64) -> Result<Option<Patient>, StoreError>;

    async fn patient_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError>;

    async fn specialist(&self, id: i64) -> Result<Option<Specialist>, StoreError>;

    async fn specialty(&self, id: i64) -> Result<Option<Specialty>, StoreError>;

    async fn treatment(&self, id: i64) -> Result<Option<Treatment>, StoreError>;

    async fn active_treatment_by_name(&self, name: &str)
        -> Result<Option<Treatment>, StoreError>;

    async fn specialty_by_name(&self, name: &str) -> Result<Option<Specialty>, StoreError>;

    /// Active treatments under a specialty, ordered by ascending id.
    async fn active_treatments_in_specialty(
        &self,
        specialty_id: i64,
    ) -> Result<Vec<Treatment>, StoreError>;

    /// Active specialists in a specialty, ordered by ascending id.
    async fn active_specialists_in_specialty(
        &self,
        specialty_id: i64,
    ) -> Result<Vec<Specialist>, StoreError>;
}

/// Appointment persistence. Rows are never deleted; cancellation is a
/// status write.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError>;

    async fn appointment(&self, id: i64) -> Result<Option<Appointment>, StoreError>;

    async fn appointments_for_specialist(
        &self,
        specialist_id: i64,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// All appointments of a patient, ordered by start time descending.
    async fn appointments_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError>;
}
