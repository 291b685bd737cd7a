//! Integration tests for tracking-code generation and redemption

use glucotel::adapters::delivery::TracingDelivery;
use glucotel::adapters::store::{Filter, MemoryStore, ResourceStore};
use glucotel::core::auth::ManualClock;
use glucotel::core::linking::TrackingCodeLinker;
use glucotel::domain::tracking_code::DeliveryChannel;
use glucotel::domain::{DoctorId, GlucotelError, LinkError, PatientId};
use serde_json::json;
use std::sync::Arc;

fn linker_with_store() -> (TrackingCodeLinker, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let linker = TrackingCodeLinker::new(
        store.clone(),
        Arc::new(TracingDelivery::new()),
        Arc::new(ManualClock::starting_now()),
    );
    (linker, store)
}

fn link_error(err: GlucotelError) -> LinkError {
    match err {
        GlucotelError::Link(link) => link,
        other => panic!("expected link error, got {other}"),
    }
}

#[tokio::test]
async fn test_generate_creates_active_record() {
    let (linker, store) = linker_with_store();
    let doctor = DoctorId::new("dr-1").unwrap();

    let code = linker
        .generate(&doctor, "patient@example.com", DeliveryChannel::Email)
        .await
        .unwrap();

    assert!(code.is_active);
    assert_eq!(code.code.len(), 8);
    assert!(code.consumed_by_patient_id.is_none());

    let stored = store.get("trackingCodes", &code.id).await.unwrap();
    assert_eq!(stored["isActive"], true);
    assert_eq!(stored["doctorId"], "dr-1");
    assert_eq!(stored["sentVia"], "email");
}

#[tokio::test]
async fn test_generated_codes_are_unique_per_doctor() {
    let (linker, _) = linker_with_store();
    let doctor = DoctorId::new("dr-1").unwrap();

    let mut codes = std::collections::HashSet::new();
    for _ in 0..10 {
        let code = linker
            .generate(&doctor, "patient@example.com", DeliveryChannel::Sms)
            .await
            .unwrap();
        assert!(codes.insert(code.code), "duplicate code generated");
    }
}

#[tokio::test]
async fn test_redeem_links_patient_and_deactivates_code() {
    let (linker, store) = linker_with_store();
    let doctor = DoctorId::new("dr-1").unwrap();
    let patient = PatientId::new("patient-1").unwrap();

    let code = linker
        .generate(&doctor, "patient@example.com", DeliveryChannel::Email)
        .await
        .unwrap();

    let linked_doctor = linker.redeem(&code.code, &patient).await.unwrap();
    assert_eq!(linked_doctor, doctor);

    let stored = store.get("trackingCodes", &code.id).await.unwrap();
    assert_eq!(stored["isActive"], false);
    assert_eq!(stored["consumedByPatientId"], "patient-1");
}

#[tokio::test]
async fn test_redeem_unknown_code_fails_not_found() {
    let (linker, _) = linker_with_store();
    let patient = PatientId::new("patient-1").unwrap();

    let err = link_error(linker.redeem("NOPE1234", &patient).await.unwrap_err());
    assert_eq!(err, LinkError::NotFound);
}

#[tokio::test]
async fn test_redeem_twice_fails_already_consumed() {
    let (linker, _) = linker_with_store();
    let doctor = DoctorId::new("dr-1").unwrap();
    let first = PatientId::new("patient-1").unwrap();
    let second = PatientId::new("patient-2").unwrap();

    let code = linker
        .generate(&doctor, "patient@example.com", DeliveryChannel::Email)
        .await
        .unwrap();

    linker.redeem(&code.code, &first).await.unwrap();
    let err = link_error(linker.redeem(&code.code, &second).await.unwrap_err());
    assert_eq!(err, LinkError::AlreadyConsumed);
}

#[tokio::test]
async fn test_concurrent_redemption_has_exactly_one_winner() {
    let store = Arc::new(MemoryStore::new());
    store
        .create(
            "trackingCodes",
            json!({
                "id": "tc-1",
                "code": "RACE1234",
                "doctorId": "dr-1",
                "createdAt": "2025-03-14T08:00:00Z",
                "sentTo": "patient@example.com",
                "sentVia": "email",
                "isActive": true,
            }),
        )
        .await
        .unwrap();

    let linker = Arc::new(TrackingCodeLinker::new(
        store.clone(),
        Arc::new(TracingDelivery::new()),
        Arc::new(ManualClock::starting_now()),
    ));

    let patient_a = linker.clone();
    let task_a = tokio::spawn(async move {
        patient_a
            .redeem("RACE1234", &PatientId::new("patient-a").unwrap())
            .await
    });
    let patient_b = linker.clone();
    let task_b = tokio::spawn(async move {
        patient_b
            .redeem("RACE1234", &PatientId::new("patient-b").unwrap())
            .await
    });

    let results = [task_a.await.unwrap(), task_b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let consumed_failures = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(GlucotelError::Link(LinkError::AlreadyConsumed))
            )
        })
        .count();

    assert_eq!(successes, 1);
    assert_eq!(consumed_failures, 1);

    // Exactly one patient is recorded as the consumer
    let stored = store.get("trackingCodes", "tc-1").await.unwrap();
    assert_eq!(stored["isActive"], false);
    let consumer = stored["consumedByPatientId"].as_str().unwrap();
    assert!(consumer == "patient-a" || consumer == "patient-b");
}

#[tokio::test]
async fn test_codes_for_different_doctors_are_independent() {
    let (linker, store) = linker_with_store();
    let dr_one = DoctorId::new("dr-1").unwrap();
    let dr_two = DoctorId::new("dr-2").unwrap();
    let patient = PatientId::new("patient-1").unwrap();

    linker
        .generate(&dr_one, "a@example.com", DeliveryChannel::Email)
        .await
        .unwrap();
    let code_two = linker
        .generate(&dr_two, "b@example.com", DeliveryChannel::Sms)
        .await
        .unwrap();

    let linked = linker.redeem(&code_two.code, &patient).await.unwrap();
    assert_eq!(linked, dr_two);

    // The other doctor's code is untouched
    let filter = Filter::new().eq("doctorId", json!("dr-1"));
    let remaining = store.list("trackingCodes", &filter).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["isActive"], true);
}
