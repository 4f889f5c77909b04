// libs/appointment-cell/src/services/booking.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use notification_cell::models::BookingEmailContext;
use notification_cell::services::dispatch::dispatch_booking_emails;
use notification_cell::services::mailer::Notifier;
use patient_cell::services::patient::PatientService;
use shared_config::AppConfig;
use shared_models::records::{Appointment, AppointmentStatus};
use shared_store::{AppointmentStore, DirectoryStore, NewAppointment};
use specialist_cell::services::resolver::SpecialistResolver;

use crate::models::{
    AppointmentDetail, AppointmentError, AppointmentResponse, BookAppointmentRequest,
    DATE_FORMAT, TIME_FORMAT,
};
use crate::services::conflict::AvailabilityService;
use crate::services::lifecycle::AppointmentLifecycleService;

/// One async lock per specialist id. Booking holds the specialist's lock
/// across the availability check and the insert, so two concurrent requests
/// for the same specialist cannot both pass the check. Requests for
/// different specialists never wait on each other.
struct SpecialistLocks {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl SpecialistLocks {
    fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, specialist_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(specialist_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

pub struct AppointmentBookingService {
    directory: Arc<dyn DirectoryStore>,
    appointments: Arc<dyn AppointmentStore>,
    patients: PatientService,
    resolver: SpecialistResolver,
    availability: AvailabilityService,
    lifecycle: AppointmentLifecycleService,
    notifier: Arc<dyn Notifier>,
    config: Arc<AppConfig>,
    locks: SpecialistLocks,
}

impl AppointmentBookingService {
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        appointments: Arc<dyn AppointmentStore>,
        notifier: Arc<dyn Notifier>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            patients: PatientService::new(directory.clone()),
            resolver: SpecialistResolver::new(directory.clone()),
            availability: AvailabilityService::new(appointments.clone()),
            lifecycle: AppointmentLifecycleService::new(),
            directory,
            appointments,
            notifier,
            config,
            locks: SpecialistLocks::new(),
        }
    }

    /// Book a new appointment: validate, upsert the patient, resolve the
    /// specialist, check the slot and persist under the specialist's lock,
    /// then hand off to the notification dispatcher without waiting for it.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<AppointmentResponse, AppointmentError> {
        let start = validate_request(&request)?;

        info!(
            "Booking appointment for {} ({}) at {}",
            request.patient_name, request.service, start
        );

        let patient = self
            .patients
            .upsert_from_booking(&request.patient_name, &request.email, &request.phone)
            .await?;

        let matched = self.resolver.resolve(&request.service).await?;
        let duration_minutes = matched.default_duration_minutes();

        self.lifecycle
            .validate_start_in_future(start, Local::now().naive_local())?;

        // Critical section: the availability check and the insert must not
        // interleave with another booking for the same specialist.
        let lock = self.locks.lock_for(matched.specialist.id).await;
        let guard = lock.lock().await;

        let available = self
            .availability
            .is_available(matched.specialist.id, start, duration_minutes)
            .await?;
        if !available {
            drop(guard);
            warn!(
                "Slot [{} +{}min] for specialist {} already taken",
                start, duration_minutes, matched.specialist.id
            );
            return Err(AppointmentError::SlotUnavailable);
        }

        let appointment = self
            .appointments
            .insert_appointment(NewAppointment {
                patient_id: patient.id,
                specialist_id: matched.specialist.id,
                treatment_id: matched.treatment.id,
                start,
                duration_minutes,
                reason: request.message.clone(),
            })
            .await?;
        drop(guard);

        info!(
            "Appointment {} booked with specialist {}",
            appointment.id, matched.specialist.id
        );

        self.spawn_booking_notifications(&appointment, &request, &matched);

        Ok(AppointmentResponse {
            id: appointment.id,
            patient_name: request.patient_name,
            phone: request.phone,
            email: request.email,
            service: request.service,
            date: request.date,
            time: request.time,
            status: appointment.status,
            message: request.message,
            created_at: appointment.created_at,
        })
    }

    /// Confirm an appointment (specialist action, reached from the email
    /// link). Re-confirming is an idempotent success; confirming a cancelled
    /// or completed appointment is rejected.
    pub async fn confirm(&self, appointment_id: i64) -> Result<(), AppointmentError> {
        let appointment = self.load(appointment_id).await?;

        if appointment.status == AppointmentStatus::Confirmed {
            debug!("Appointment {} already confirmed", appointment_id);
            return Ok(());
        }

        self.lifecycle
            .validate_status_transition(&appointment.status, &AppointmentStatus::Confirmed)?;
        self.appointments
            .update_appointment_status(appointment_id, AppointmentStatus::Confirmed)
            .await?;

        info!("Appointment {} confirmed", appointment_id);
        Ok(())
    }

    /// Cancel an appointment. The row is kept; cancellation is a status
    /// write. Re-cancelling is an idempotent success.
    pub async fn cancel(&self, appointment_id: i64) -> Result<(), AppointmentError> {
        let appointment = self.load(appointment_id).await?;

        if appointment.status == AppointmentStatus::Cancelled {
            debug!("Appointment {} already cancelled", appointment_id);
            return Ok(());
        }

        self.lifecycle
            .validate_status_transition(&appointment.status, &AppointmentStatus::Cancelled)?;
        self.appointments
            .update_appointment_status(appointment_id, AppointmentStatus::Cancelled)
            .await?;

        info!("Appointment {} cancelled", appointment_id);
        Ok(())
    }

    /// All appointments of a patient as display rows, newest start first.
    /// A patient with no appointments gets an empty list, never an error.
    pub async fn list_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<AppointmentResponse>, AppointmentError> {
        let appointments = self.appointments.appointments_for_patient(patient_id).await?;
        if appointments.is_empty() {
            return Ok(Vec::new());
        }

        let patient = self
            .directory
            .patient(patient_id)
            .await?
            .ok_or_else(|| AppointmentError::Storage("patient row missing".to_string()))?;

        let mut rows = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            let treatment = self
                .directory
                .treatment(appointment.treatment_id)
                .await?
                .ok_or_else(|| AppointmentError::Storage("treatment row missing".to_string()))?;

            rows.push(AppointmentResponse {
                id: appointment.id,
                patient_name: patient.full_name(),
                phone: patient.phone.clone(),
                email: patient.email.clone(),
                service: treatment.name,
                date: appointment.start.format(DATE_FORMAT).to_string(),
                time: appointment.start.format(TIME_FORMAT).to_string(),
                status: appointment.status,
                message: appointment.reason.clone(),
                created_at: appointment.created_at,
            });
        }

        Ok(rows)
    }

    /// Full joined view of one appointment.
    pub async fn get_detail(
        &self,
        appointment_id: i64,
    ) -> Result<AppointmentDetail, AppointmentError> {
        let appointment = self.load(appointment_id).await?;

        let patient = self
            .directory
            .patient(appointment.patient_id)
            .await?
            .ok_or_else(|| AppointmentError::Storage("patient row missing".to_string()))?;
        let specialist = self
            .directory
            .specialist(appointment.specialist_id)
            .await?
            .ok_or_else(|| AppointmentError::Storage("specialist row missing".to_string()))?;
        let specialty = self
            .directory
            .specialty(specialist.specialty_id)
            .await?
            .ok_or_else(|| AppointmentError::Storage("specialty row missing".to_string()))?;
        let treatment = self
            .directory
            .treatment(appointment.treatment_id)
            .await?
            .ok_or_else(|| AppointmentError::Storage("treatment row missing".to_string()))?;

        Ok(AppointmentDetail {
            id: appointment.id,
            patient_name: patient.full_name(),
            patient_email: patient.email,
            patient_phone: patient.phone,
            specialist_name: specialist.full_name(),
            specialist_email: specialist.email,
            specialty: specialty.name,
            treatment: treatment.name,
            start: appointment.start,
            reason: appointment.reason,
            status: appointment.status,
            created_at: appointment.created_at,
        })
    }

    async fn load(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.appointments
            .appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Detached post-booking notification: runs after the booking has
    /// committed, holds no lock, and reports nothing back to the caller.
    fn spawn_booking_notifications(
        &self,
        appointment: &Appointment,
        request: &BookAppointmentRequest,
        matched: &specialist_cell::models::ServiceMatch,
    ) {
        let ctx = BookingEmailContext {
            appointment_id: appointment.id,
            patient_name: request.patient_name.clone(),
            patient_email: request.email.clone(),
            patient_phone: request.phone.clone(),
            specialist_name: matched.specialist.full_name(),
            specialist_email: matched.specialist.email.clone(),
            treatment: matched.treatment.name.clone(),
            date: appointment.start.format("%d/%m/%Y").to_string(),
            time: appointment.start.format(TIME_FORMAT).to_string(),
            status: appointment.status,
            reason: appointment.reason.clone(),
        };
        let confirm_url = format!(
            "{}/api/appointments/{}/confirm",
            self.config.backend_url, appointment.id
        );
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            dispatch_booking_emails(notifier.as_ref(), &ctx, &confirm_url).await;
        });
    }
}

/// Field presence and format checks; returns the combined start timestamp.
fn validate_request(request: &BookAppointmentRequest) -> Result<NaiveDateTime, AppointmentError> {
    let required = [
        (&request.patient_name, "patient name is required"),
        (&request.email, "email is required"),
        (&request.phone, "phone number is required"),
        (&request.service, "service is required"),
        (&request.date, "appointment date is required"),
        (&request.time, "appointment time is required"),
    ];
    for (value, message) in required {
        if value.trim().is_empty() {
            return Err(AppointmentError::Validation(message.to_string()));
        }
    }

    let date = NaiveDate::parse_from_str(&request.date, DATE_FORMAT)
        .map_err(|_| AppointmentError::Validation("invalid date format, use YYYY-MM-DD".to_string()))?;
    let time = NaiveTime::parse_from_str(&request.time, TIME_FORMAT)
        .map_err(|_| AppointmentError::Validation("invalid time format, use HH:MM".to_string()))?;

    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request() -> BookAppointmentRequest {
        BookAppointmentRequest {
            patient_name: "Ana Gómez".to_string(),
            phone: "555-0001".to_string(),
            email: "ana@example.com".to_string(),
            service: "Extracción Dental".to_string(),
            date: "2026-09-01".to_string(),
            time: "10:30".to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn well_formed_request_combines_date_and_time() {
        let start = validate_request(&request()).unwrap();
        assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2026-09-01 10:30");
    }

    #[test]
    fn missing_fields_are_reported_individually() {
        let mut r = request();
        r.email = "  ".to_string();
        assert_matches!(
            validate_request(&r),
            Err(AppointmentError::Validation(msg)) if msg.contains("email")
        );
    }

    #[test]
    fn malformed_date_and_time_are_rejected() {
        let mut r = request();
        r.date = "01/09/2026".to_string();
        assert_matches!(validate_request(&r), Err(AppointmentError::Validation(_)));

        let mut r = request();
        r.time = "25:99".to_string();
        assert_matches!(validate_request(&r), Err(AppointmentError::Validation(_)));
    }
}
