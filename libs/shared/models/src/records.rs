// Persistent record types shared by the storage layer and the domain cells.
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub registered_at: NaiveDateTime,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialist {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialty_id: i64,
    pub active: bool,
}

impl Specialist {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: i64,
    pub name: String,
    pub specialty_id: i64,
    pub estimated_duration_minutes: i32,
    pub active: bool,
}

/// Closed set of appointment states. The wire representation keeps the
/// literal Spanish strings the rest of the system exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "programada")]
    Scheduled,
    #[serde(rename = "confirmada")]
    Confirmed,
    #[serde(rename = "cancelada")]
    Cancelled,
    #[serde(rename = "completada")]
    Completed,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
    }

    /// Whether an appointment in this state holds its specialist's time slot.
    pub fn occupies_slot(&self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "programada"),
            AppointmentStatus::Confirmed => write!(f, "confirmada"),
            AppointmentStatus::Cancelled => write!(f, "cancelada"),
            AppointmentStatus::Completed => write!(f, "completada"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub specialist_id: i64,
    pub treatment_id: i64,
    pub start: NaiveDateTime,
    pub duration_minutes: i32,
    pub reason: String,
    pub status: AppointmentStatus,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

impl Appointment {
    /// Exclusive end of the occupied interval `[start, start + duration)`.
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(self.duration_minutes as i64)
    }
}
