use std::sync::Arc;

use tracing::debug;

use shared_models::records::Patient;
use shared_store::{DirectoryStore, PatientDraft};

use crate::models::PatientError;

/// Splits a submitted full name into a first name and the remainder as the
/// surname. Fails when fewer than two tokens are present.
pub fn split_full_name(full_name: &str) -> Result<(String, String), PatientError> {
    let mut parts = full_name.split_whitespace();
    let first = match parts.next() {
        Some(first) => first.to_string(),
        None => return Err(PatientError::IncompleteName),
    };
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        return Err(PatientError::IncompleteName);
    }
    Ok((first, rest.join(" ")))
}

pub struct PatientService {
    store: Arc<dyn DirectoryStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Creates the patient on first contact, or refreshes name and phone on
    /// a repeat booking with the same email. One row per email, always.
    pub async fn upsert_from_booking(
        &self,
        full_name: &str,
        email: &str,
        phone: &str,
    ) -> Result<Patient, PatientError> {
        let (first_name, last_name) = split_full_name(full_name)?;

        debug!("Upserting patient by email: {}", email);
        let patient = self
            .store
            .upsert_patient_by_email(PatientDraft {
                first_name,
                last_name,
                email: email.to_string(),
                phone: phone.to_string(),
            })
            .await?;

        Ok(patient)
    }
}
