use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use shared_store::AppointmentStore;

use crate::models::AppointmentError;

pub struct AvailabilityService {
    store: Arc<dyn AppointmentStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    /// Whether the specialist is free for `[start, start + duration)`.
    ///
    /// Only appointments that still hold the slot (programada/confirmada)
    /// count; cancelled and completed ones release it. Must run inside the
    /// same per-specialist critical section as the subsequent insert.
    pub async fn is_available(
        &self,
        specialist_id: i64,
        start: NaiveDateTime,
        duration_minutes: i32,
    ) -> Result<bool, AppointmentError> {
        let end = start + Duration::minutes(duration_minutes as i64);

        let existing = self.store.appointments_for_specialist(specialist_id).await?;

        let conflict = existing
            .iter()
            .filter(|a| a.status.occupies_slot())
            .any(|a| conflicts_with(a.start, a.end(), start, end));

        if conflict {
            debug!(
                "Specialist {} has a conflicting appointment in [{}, {})",
                specialist_id, start, end
            );
        }

        Ok(!conflict)
    }
}

/// Strict intersection of two half-open intervals. Touching boundaries
/// (`end1 == start2`) do not intersect, so back-to-back slots coexist.
fn intervals_overlap(
    start1: NaiveDateTime,
    end1: NaiveDateTime,
    start2: NaiveDateTime,
    end2: NaiveDateTime,
) -> bool {
    start1 < end2 && start2 < end1
}

/// Conflict test for a booked interval against a requested one. The second
/// clause restates the first for degenerate zero-length booked intervals,
/// which strict intersection alone would let through.
fn conflicts_with(
    existing_start: NaiveDateTime,
    existing_end: NaiveDateTime,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> bool {
    intervals_overlap(existing_start, existing_end, start, end)
        || (existing_start >= start && existing_start < end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn overlapping_intervals_conflict() {
        assert!(conflicts_with(at(10, 0), at(10, 30), at(10, 15), at(10, 45)));
        assert!(conflicts_with(at(10, 15), at(10, 45), at(10, 0), at(10, 30)));
        // Containment in either direction
        assert!(conflicts_with(at(10, 0), at(11, 0), at(10, 15), at(10, 30)));
        assert!(conflicts_with(at(10, 15), at(10, 30), at(10, 0), at(11, 0)));
    }

    #[test]
    fn touching_intervals_do_not_conflict() {
        assert!(!conflicts_with(at(10, 0), at(10, 30), at(10, 30), at(11, 0)));
        assert!(!conflicts_with(at(10, 30), at(11, 0), at(10, 0), at(10, 30)));
    }

    #[test]
    fn disjoint_intervals_do_not_conflict() {
        assert!(!conflicts_with(at(9, 0), at(9, 30), at(14, 0), at(14, 30)));
    }

    #[test]
    fn zero_length_booked_interval_inside_request_conflicts() {
        // A row with unknown duration still blocks the slot its start sits in.
        assert!(conflicts_with(at(10, 15), at(10, 15), at(10, 0), at(10, 30)));
        assert!(!conflicts_with(at(10, 30), at(10, 30), at(10, 0), at(10, 30)));
    }
}
