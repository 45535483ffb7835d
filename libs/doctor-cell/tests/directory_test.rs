use std::sync::Arc;

use assert_matches::assert_matches;
use futures::future::join_all;
use uuid::Uuid;

use doctor_cell::models::{Address, Doctor, DoctorListQuery, SlotClaim, SlotKey, SlotRelease, SlotsBooked};
use doctor_cell::services::{DoctorDirectory, InMemoryDoctorDirectory};

fn doctor(speciality: &str) -> Doctor {
    Doctor {
        id: Uuid::new_v4(),
        name: "Dr. Emily Larson".to_string(),
        email: "emily@example.com".to_string(),
        image: None,
        speciality: speciality.to_string(),
        degree: "MBBS".to_string(),
        experience: "3 Years".to_string(),
        about: String::new(),
        available: true,
        fees: 600.0,
        address: Address::default(),
        slots_booked: SlotsBooked::new(),
    }
}

#[tokio::test]
async fn test_concurrent_claims_on_one_slot_have_single_winner() {
    let doc = doctor("Gynecologist");
    let doc_id = doc.id;
    let directory = Arc::new(InMemoryDoctorDirectory::with_doctors(vec![doc]));

    let attempts = (0..32).map(|_| {
        let directory = Arc::clone(&directory);
        tokio::spawn(async move {
            directory
                .claim_slot(&SlotKey::new(doc_id, "2024-05-01", "10:00"))
                .await
                .unwrap()
        })
    });

    let outcomes: Vec<SlotClaim> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(outcomes.iter().filter(|o| **o == SlotClaim::Claimed).count(), 1);
    assert_eq!(outcomes.iter().filter(|o| **o == SlotClaim::Taken).count(), 31);

    let stored = directory.find_by_id(doc_id).await.unwrap().unwrap();
    assert_eq!(stored.slots_booked.times("2024-05-01"), ["10:00"]);
}

#[tokio::test]
async fn test_concurrent_claims_on_different_times_are_all_kept() {
    let doc = doctor("Neurologist");
    let doc_id = doc.id;
    let directory = Arc::new(InMemoryDoctorDirectory::with_doctors(vec![doc]));

    let attempts = (0..12).map(|i| {
        let directory = Arc::clone(&directory);
        tokio::spawn(async move {
            let time = format!("{:02}:00", 8 + i);
            directory
                .claim_slot(&SlotKey::new(doc_id, "2024-05-01", time))
                .await
                .unwrap()
        })
    });

    for joined in join_all(attempts).await {
        assert_eq!(joined.unwrap(), SlotClaim::Claimed);
    }

    let stored = directory.find_by_id(doc_id).await.unwrap().unwrap();
    assert_eq!(stored.slots_booked.times("2024-05-01").len(), 12);
}

#[tokio::test]
async fn test_release_and_missing_doctor_outcomes() {
    let doc = doctor("Dermatologist");
    let doc_id = doc.id;
    let directory = InMemoryDoctorDirectory::with_doctors(vec![doc]);
    let key = SlotKey::new(doc_id, "2024-05-01", "10:00");

    assert_eq!(directory.claim_slot(&key).await.unwrap(), SlotClaim::Claimed);
    assert_eq!(directory.release_slot(&key).await.unwrap(), SlotRelease::Released);
    assert_eq!(directory.release_slot(&key).await.unwrap(), SlotRelease::NotHeld);

    directory.remove(doc_id).await;
    assert_matches!(directory.claim_slot(&key).await, Ok(SlotClaim::DoctorMissing));
    assert_matches!(directory.release_slot(&key).await, Ok(SlotRelease::DoctorMissing));
}

#[tokio::test]
async fn test_list_filters_by_speciality() {
    let directory = InMemoryDoctorDirectory::new();
    directory.insert(doctor("Pediatricians")).await;
    directory.insert(doctor("Neurologist")).await;

    let all = directory.list(&DoctorListQuery::default()).await.unwrap();
    let filtered = directory
        .list(&DoctorListQuery { speciality: Some("neurologist".to_string()) })
        .await
        .unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].speciality, "Neurologist");
}
