// libs/appointment-cell/src/services/lifecycle.rs
use chrono::NaiveDateTime;
use tracing::{debug, warn};

use shared_models::records::AppointmentStatus;

use crate::models::AppointmentError;

/// Appointment state machine. The booking core only ever drives the confirm
/// and cancel transitions; Completed appears in the table because an
/// administrative process outside this core closes out past appointments.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed.
    pub fn validate_status_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!(
            "Validating status transition from {} to {}",
            current_status, new_status
        );

        if !self.valid_transitions(current_status).contains(new_status) {
            warn!(
                "Invalid status transition attempted: {} -> {}",
                current_status, new_status
            );
            return Err(AppointmentError::InvalidStatusTransition(*current_status));
        }

        Ok(())
    }

    /// All valid next statuses for a given current status.
    pub fn valid_transitions(&self, current_status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::Completed,
            ],
            AppointmentStatus::Confirmed => vec![
                AppointmentStatus::Cancelled,
                AppointmentStatus::Completed,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Cancelled => vec![],
            AppointmentStatus::Completed => vec![],
        }
    }

    /// Booking-time constraint: the start must be strictly in the future.
    pub fn validate_start_in_future(
        &self,
        start: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<(), AppointmentError> {
        if start <= now {
            return Err(AppointmentError::PastDate);
        }
        Ok(())
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
