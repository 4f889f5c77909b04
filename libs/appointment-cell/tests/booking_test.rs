use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Result;
use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{Duration, Local};
use tokio::sync::Mutex;

use appointment_cell::models::{AppointmentError, BookAppointmentRequest};
use appointment_cell::services::booking::AppointmentBookingService;
use notification_cell::services::mailer::Notifier;
use shared_config::AppConfig;
use shared_models::records::AppointmentStatus;
use shared_store::memory::MemoryStore;
use shared_store::DirectoryStore;

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        self.sent
            .lock()
            .await
            .push((to.to_string(), subject.to_string(), html_body.to_string()));
        Ok(())
    }
}

struct TestSetup {
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
    booking: Arc<AppointmentBookingService>,
}

impl TestSetup {
    async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());

        let dental = store.seed_specialty("Odontología").await;
        store
            .seed_specialist("María", "Torres", "maria@clinicawenka.com", dental.id, true)
            .await;
        store.seed_treatment("Extracción Dental", dental.id, 30, true).await;

        let notifier = Arc::new(RecordingNotifier::default());
        let config = Arc::new(AppConfig {
            port: 0,
            jwt_secret: "test-secret".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            backend_url: "http://localhost:8080".to_string(),
            mail_api_url: String::new(),
            mail_api_key: String::new(),
            mail_from: "noreply@clinicawenka.com".to_string(),
        });

        let booking = Arc::new(AppointmentBookingService::new(
            store.clone(),
            store.clone(),
            notifier.clone(),
            config,
        ));

        Self {
            store,
            notifier,
            booking,
        }
    }

    fn request(&self, email: &str, date: &str, time: &str) -> BookAppointmentRequest {
        BookAppointmentRequest {
            patient_name: "Ana Gómez Ruiz".to_string(),
            phone: "555-0001".to_string(),
            email: email.to_string(),
            service: "Extracción Dental".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            message: "Dolor de muela".to_string(),
        }
    }

    async fn sent_emails(&self) -> Vec<(String, String, String)> {
        self.notifier.sent.lock().await.clone()
    }
}

// ==============================================================================
// BOOKING TESTS
// ==============================================================================

#[tokio::test]
async fn booking_persists_a_scheduled_appointment() {
    let setup = TestSetup::new().await;

    let response = setup
        .booking
        .book(setup.request("ana@example.com", "2027-03-10", "10:00"))
        .await
        .unwrap();

    assert_eq!(response.status, AppointmentStatus::Scheduled);
    assert_eq!(response.date, "2027-03-10");
    assert_eq!(response.time, "10:00");

    let detail = setup.booking.get_detail(response.id).await.unwrap();
    assert_eq!(detail.treatment, "Extracción Dental");
    assert_eq!(detail.specialist_name, "María Torres");
    assert_eq!(detail.specialty, "Odontología");
    assert_eq!(detail.reason, "Dolor de muela");
}

#[tokio::test]
async fn overlapping_slot_is_rejected() {
    let setup = TestSetup::new().await;

    setup
        .booking
        .book(setup.request("ana@example.com", "2027-03-10", "10:00"))
        .await
        .unwrap();

    // Treatment lasts 30 minutes; 10:15 lands inside the occupied interval.
    let result = setup
        .booking
        .book(setup.request("otro@example.com", "2027-03-10", "10:15"))
        .await;

    assert_matches!(result, Err(AppointmentError::SlotUnavailable));
}

#[tokio::test]
async fn back_to_back_slots_are_both_bookable() {
    let setup = TestSetup::new().await;

    setup
        .booking
        .book(setup.request("ana@example.com", "2027-03-10", "10:00"))
        .await
        .unwrap();
    let second = setup
        .booking
        .book(setup.request("otro@example.com", "2027-03-10", "10:30"))
        .await;

    assert!(second.is_ok());
}

#[tokio::test]
async fn past_start_is_rejected_and_near_future_accepted() {
    let setup = TestSetup::new().await;

    let yesterday = Local::now().naive_local() - Duration::days(1);
    let result = setup
        .booking
        .book(setup.request(
            "ana@example.com",
            &yesterday.format("%Y-%m-%d").to_string(),
            &yesterday.format("%H:%M").to_string(),
        ))
        .await;
    assert_matches!(result, Err(AppointmentError::PastDate));

    // Two minutes ahead survives the HH:MM truncation and is still future.
    let soon = Local::now().naive_local() + Duration::minutes(2);
    let result = setup
        .booking
        .book(setup.request(
            "ana@example.com",
            &soon.format("%Y-%m-%d").to_string(),
            &soon.format("%H:%M").to_string(),
        ))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn unknown_service_is_rejected() {
    let setup = TestSetup::new().await;

    let mut request = setup.request("ana@example.com", "2027-03-10", "10:00");
    request.service = "Cirugía Cardíaca".to_string();

    let result = setup.booking.book(request).await;
    assert_matches!(
        result,
        Err(AppointmentError::ServiceNotFound(name)) if name == "Cirugía Cardíaca"
    );
}

#[tokio::test]
async fn repeat_booking_upserts_the_patient_row() {
    let setup = TestSetup::new().await;

    setup
        .booking
        .book(setup.request("ana@example.com", "2027-03-10", "09:00"))
        .await
        .unwrap();

    let mut second = setup.request("ana@example.com", "2027-03-11", "09:00");
    second.phone = "555-0099".to_string();
    setup.booking.book(second).await.unwrap();

    let patient = setup
        .store
        .patient_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patient.phone, "555-0099");
    assert_eq!(patient.id, 1); // still the row created by the first booking
}

#[tokio::test]
async fn listing_a_patient_without_appointments_yields_an_empty_vec() {
    let setup = TestSetup::new().await;

    let rows = setup.booking.list_for_patient(42).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn listing_returns_joined_rows_newest_first() {
    let setup = TestSetup::new().await;

    setup
        .booking
        .book(setup.request("ana@example.com", "2027-03-10", "09:00"))
        .await
        .unwrap();
    setup
        .booking
        .book(setup.request("ana@example.com", "2027-03-12", "09:00"))
        .await
        .unwrap();

    let patient = setup
        .store
        .patient_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    let rows = setup.booking.list_for_patient(patient.id).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2027-03-12");
    assert_eq!(rows[1].date, "2027-03-10");
    assert_eq!(rows[0].service, "Extracción Dental");
    assert_eq!(rows[0].patient_name, "Ana Gómez Ruiz");
}

#[tokio::test]
async fn validation_failures_never_reach_the_store() {
    let setup = TestSetup::new().await;

    let mut request = setup.request("ana@example.com", "2027-03-10", "10:00");
    request.patient_name = "Ana".to_string(); // surname missing

    let result = setup.booking.book(request).await;
    assert_matches!(result, Err(AppointmentError::Validation(_)));

    let patient = setup.store.patient_by_email("ana@example.com").await.unwrap();
    assert!(patient.is_none());
}

// ==============================================================================
// CONCURRENCY AND NOTIFICATION TESTS
// ==============================================================================

#[tokio::test]
async fn concurrent_bookings_for_the_same_slot_admit_exactly_one() {
    let setup = TestSetup::new().await;

    let first = {
        let booking = setup.booking.clone();
        let request = setup.request("uno@example.com", "2027-03-10", "10:00");
        tokio::spawn(async move { booking.book(request).await })
    };
    let second = {
        let booking = setup.booking.clone();
        let request = setup.request("dos@example.com", "2027-03-10", "10:00");
        tokio::spawn(async move { booking.book(request).await })
    };

    let results = vec![first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppointmentError::SlotUnavailable)))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);
}

#[tokio::test]
async fn booking_dispatches_both_emails_without_blocking() {
    let setup = TestSetup::new().await;

    let response = setup
        .booking
        .book(setup.request("ana@example.com", "2027-03-10", "10:00"))
        .await
        .unwrap();

    // Dispatch is detached; poll briefly for it to land.
    let mut sent = Vec::new();
    for _ in 0..50 {
        sent = setup.sent_emails().await;
        if sent.len() == 2 {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(20)).await;
    }

    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, "ana@example.com");
    assert_eq!(sent[1].0, "maria@clinicawenka.com");
    let confirm_url = format!(
        "http://localhost:8080/api/appointments/{}/confirm",
        response.id
    );
    assert!(sent[1].2.contains(&confirm_url));
}
