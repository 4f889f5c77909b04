use async_trait::async_trait;
use chrono::Local;
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::records::{
    Appointment, AppointmentStatus, Patient, Specialist, Specialty, Treatment,
};

use crate::{AppointmentStore, DirectoryStore, NewAppointment, PatientDraft, StoreError};

#[derive(Default)]
struct Tables {
    patients: Vec<Patient>,
    specialists: Vec<Specialist>,
    specialties: Vec<Specialty>,
    treatments: Vec<Treatment>,
    appointments: Vec<Appointment>,
    next_patient_id: i64,
    next_appointment_id: i64,
    next_catalog_id: i64,
}

/// In-process store engine backing both storage traits.
///
/// Rows keep insertion order, so "ordered by ascending id" queries fall out
/// of a linear scan. Catalog rows are seeded by an administrative process
/// outside the booking core; `seed_*` is that surface.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_patient_id: 1,
                next_appointment_id: 1,
                next_catalog_id: 1,
                ..Tables::default()
            }),
        }
    }

    pub async fn seed_specialty(&self, name: &str) -> Specialty {
        let mut tables = self.tables.write().await;
        let specialty = Specialty {
            id: tables.next_catalog_id,
            name: name.to_string(),
        };
        tables.next_catalog_id += 1;
        tables.specialties.push(specialty.clone());
        specialty
    }

    pub async fn seed_specialist(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        specialty_id: i64,
        active: bool,
    ) -> Specialist {
        let mut tables = self.tables.write().await;
        let specialist = Specialist {
            id: tables.next_catalog_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            specialty_id,
            active,
        };
        tables.next_catalog_id += 1;
        tables.specialists.push(specialist.clone());
        specialist
    }

    pub async fn seed_treatment(
        &self,
        name: &str,
        specialty_id: i64,
        estimated_duration_minutes: i32,
        active: bool,
    ) -> Treatment {
        let mut tables = self.tables.write().await;
        let treatment = Treatment {
            id: tables.next_catalog_id,
            name: name.to_string(),
            specialty_id,
            estimated_duration_minutes,
            active,
        };
        tables.next_catalog_id += 1;
        tables.treatments.push(treatment.clone());
        treatment
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn upsert_patient_by_email(&self, draft: PatientDraft) -> Result<Patient, StoreError> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .patients
            .iter_mut()
            .find(|p| p.email == draft.email)
        {
            existing.first_name = draft.first_name;
            existing.last_name = draft.last_name;
            existing.phone = draft.phone;
            debug!("updated existing patient {} by email", existing.id);
            return Ok(existing.clone());
        }

        let patient = Patient {
            id: tables.next_patient_id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            registered_at: Local::now().naive_local(),
        };
        tables.next_patient_id += 1;
        tables.patients.push(patient.clone());
        debug!("created patient {}", patient.id);
        Ok(patient)
    }

    async fn patient(&self, id: i64) -> Result<Option<Patient>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.patients.iter().find(|p| p.id == id).cloned())
    }

    async fn patient_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.patients.iter().find(|p| p.email == email).cloned())
    }

    async fn specialist(&self, id: i64) -> Result<Option<Specialist>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.specialists.iter().find(|s| s.id == id).cloned())
    }

    async fn specialty(&self, id: i64) -> Result<Option<Specialty>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.specialties.iter().find(|s| s.id == id).cloned())
    }

    async fn treatment(&self, id: i64) -> Result<Option<Treatment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.treatments.iter().find(|t| t.id == id).cloned())
    }

    async fn active_treatment_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Treatment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .treatments
            .iter()
            .find(|t| t.active && t.name == name)
            .cloned())
    }

    async fn specialty_by_name(&self, name: &str) -> Result<Option<Specialty>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.specialties.iter().find(|s| s.name == name).cloned())
    }

    async fn active_treatments_in_specialty(
        &self,
        specialty_id: i64,
    ) -> Result<Vec<Treatment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .treatments
            .iter()
            .filter(|t| t.active && t.specialty_id == specialty_id)
            .cloned()
            .collect())
    }

    async fn active_specialists_in_specialty(
        &self,
        specialty_id: i64,
    ) -> Result<Vec<Specialist>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .specialists
            .iter()
            .filter(|s| s.active && s.specialty_id == specialty_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn insert_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;
        let appointment = Appointment {
            id: tables.next_appointment_id,
            patient_id: new.patient_id,
            specialist_id: new.specialist_id,
            treatment_id: new.treatment_id,
            start: new.start,
            duration_minutes: new.duration_minutes,
            reason: new.reason,
            status: AppointmentStatus::Scheduled,
            notes: String::new(),
            created_at: Local::now().naive_local(),
        };
        tables.next_appointment_id += 1;
        tables.appointments.push(appointment.clone());
        debug!("inserted appointment {}", appointment.id);
        Ok(appointment)
    }

    async fn appointment(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn appointments_for_specialist(
        &self,
        specialist_id: i64,
    ) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .iter()
            .filter(|a| a.specialist_id == specialist_id)
            .cloned()
            .collect())
    }

    async fn appointments_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(appointments)
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;
        let appointment = tables
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;
        appointment.status = status;
        Ok(appointment.clone())
    }
}
