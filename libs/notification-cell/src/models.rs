use shared_models::records::AppointmentStatus;

/// Everything the booking emails need, already joined and formatted by the
/// caller. Keeps this cell independent of the appointment DTOs.
#[derive(Debug, Clone)]
pub struct BookingEmailContext {
    pub appointment_id: i64,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub specialist_name: String,
    pub specialist_email: String,
    pub treatment: String,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub reason: String,
}
