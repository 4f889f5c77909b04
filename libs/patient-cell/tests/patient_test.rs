use std::sync::Arc;

use assert_matches::assert_matches;

use patient_cell::models::PatientError;
use patient_cell::services::patient::{split_full_name, PatientService};
use shared_store::memory::MemoryStore;

#[test]
fn full_name_splits_into_first_and_remainder() {
    let (first, last) = split_full_name("Ana Gómez Ruiz").unwrap();
    assert_eq!(first, "Ana");
    assert_eq!(last, "Gómez Ruiz");
}

#[test]
fn single_token_name_is_rejected() {
    assert_matches!(split_full_name("Ana"), Err(PatientError::IncompleteName));
    assert_matches!(split_full_name("   "), Err(PatientError::IncompleteName));
}

#[tokio::test]
async fn repeat_booking_updates_the_existing_row() {
    let store = Arc::new(MemoryStore::new());
    let service = PatientService::new(store.clone());

    let created = service
        .upsert_from_booking("Ana Gómez", "ana@example.com", "555-0001")
        .await
        .unwrap();
    let updated = service
        .upsert_from_booking("Ana Gómez Ruiz", "ana@example.com", "555-0002")
        .await
        .unwrap();

    assert_eq!(created.id, updated.id);
    assert_eq!(updated.last_name, "Gómez Ruiz");
    assert_eq!(updated.phone, "555-0002");
}
