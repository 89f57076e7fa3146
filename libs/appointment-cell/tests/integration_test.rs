// libs/appointment-cell/tests/integration_test.rs
//
// End-to-end booking scenarios against the default clinic seed.

use assert_matches::assert_matches;

use appointment_cell::models::AppointmentError;
use appointment_cell::services::BookingLedger;
use patient_cell::models::{RegisterPatientRequest, ValidationError};
use shared_config::{ClinicConfig, DoctorSeed};
use shared_models::{ErrorKind, SequentialId};

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

fn default_ledger() -> BookingLedger {
    BookingLedger::new(&ClinicConfig::default()).unwrap()
}

fn request(name: &str, age: &str, issue: &str) -> RegisterPatientRequest {
    RegisterPatientRequest::new(name, age, "555-0000", issue)
}

// ==============================================================================
// BOOKING FLOW
// ==============================================================================

#[test]
fn test_end_to_end_alice() {
    let mut ledger = default_ledger();

    let confirmation = ledger
        .register_and_book(&RegisterPatientRequest::new("Alice", "34", "555-1111", "chest pain"))
        .unwrap();

    assert_eq!(confirmation.patient_id, "P001");
    assert_eq!(confirmation.appointment_id, "APT001");
    assert_eq!(confirmation.doctor_id, "D001");
    assert_eq!(confirmation.doctor_name, "Dr. Smith");
    assert_eq!(confirmation.specialization, "Cardiology");
    assert_eq!(confirmation.time_slot, "9:00");

    let patient = ledger.patient("P001").unwrap();
    assert_eq!(patient.name, "Alice");
    assert_eq!(patient.age, 34);
    assert_eq!(patient.phone, "555-1111");
    assert_eq!(patient.medical_issue, "chest pain");

    let appointment = ledger.appointment("APT001").unwrap();
    assert_eq!(appointment.patient_id, "P001");
    assert_eq!(appointment.doctor_id, "D001");
    assert_eq!(appointment.medical_issue, "chest pain");
}

#[test]
fn test_ids_strictly_increasing_and_padded() {
    let mut ledger = default_ledger();
    let patient_seq = SequentialId::new("P");
    let appointment_seq = SequentialId::new("APT");

    let issues = ["fever", "rash", "bone", "baby", "heart", "cold", "skin"];
    let mut last = (0, 0);
    for (i, issue) in issues.iter().enumerate() {
        let confirmation = ledger
            .register_and_book(&request(&format!("Patient {}", i), "40", issue))
            .unwrap();

        assert_eq!(confirmation.patient_id.len(), 4);
        assert_eq!(confirmation.appointment_id.len(), 6);

        let p = patient_seq.parse(&confirmation.patient_id).unwrap();
        let a = appointment_seq.parse(&confirmation.appointment_id).unwrap();
        assert!(p > last.0 && a > last.1);
        last = (p, a);
    }

    assert_eq!(last, (7, 7));
}

#[test]
fn test_age_validation() {
    let mut ledger = default_ledger();

    for age in ["0", "150", "abc", "", "-5"] {
        let result = ledger.register_and_book(&request("Alice", age, "fever"));
        assert_matches!(
            result,
            Err(AppointmentError::Validation(ValidationError::InvalidAge(_))),
            "age {:?}", age
        );
    }
    assert!(ledger.patients().is_empty());

    assert!(ledger.register_and_book(&request("Young", "1", "fever")).is_ok());
    assert!(ledger.register_and_book(&request("Old", "149", "fever")).is_ok());
}

#[test]
fn test_missing_name_and_issue() {
    let mut ledger = default_ledger();

    assert_matches!(
        ledger.register_and_book(&request("   ", "30", "fever")),
        Err(AppointmentError::Validation(ValidationError::EmptyName))
    );
    assert_matches!(
        ledger.register_and_book(&request("Bob", "30", "")),
        Err(AppointmentError::Validation(ValidationError::MissingIssue))
    );

    let err = ledger.register_and_book(&request("Bob", "30", "")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_unmapped_issue_goes_to_general_medicine() {
    let mut ledger = default_ledger();

    let confirmation = ledger.register_and_book(&request("Wanda", "50", "wizardry")).unwrap();

    assert_eq!(confirmation.specialization, "General Medicine");
    assert_eq!(confirmation.doctor_name, "Dr. Brown");
    // The patient keeps the complaint as typed.
    assert_eq!(ledger.patient(&confirmation.patient_id).unwrap().medical_issue, "wizardry");
}

#[test]
fn test_multi_word_complaint_is_not_substring_matched() {
    let mut ledger = default_ledger();

    // "bad rash" does not hit the "rash" keyword; it falls through.
    let confirmation = ledger.register_and_book(&request("Rory", "22", "bad rash")).unwrap();
    assert_eq!(confirmation.specialization, "General Medicine");
}

#[test]
fn test_slots_advance_per_doctor() {
    let mut ledger = default_ledger();

    let first = ledger.register_and_book(&request("A", "30", "heart")).unwrap();
    let second = ledger.register_and_book(&request("B", "30", "cardiac")).unwrap();
    let other = ledger.register_and_book(&request("C", "30", "kids")).unwrap();
    let third = ledger.register_and_book(&request("D", "30", "Chest Pain")).unwrap();

    assert_eq!(first.time_slot, "9:00");
    assert_eq!(second.time_slot, "9:30");
    assert_eq!(other.time_slot, "9:00");
    assert_eq!(third.time_slot, "10:00");
}

// ==============================================================================
// CAPACITY
// ==============================================================================

#[test]
fn test_full_day_yields_no_capacity() {
    let mut ledger = default_ledger();

    let mut labels = Vec::new();
    for i in 0..12 {
        let confirmation = ledger
            .register_and_book(&request(&format!("Heart {}", i), "60", "heart"))
            .unwrap();
        labels.push(confirmation.time_slot);
    }
    assert_eq!(labels, ledger.catalog().schedule().labels());

    let result = ledger.register_and_book(&request("Late", "60", "heart"));
    assert_matches!(
        result,
        Err(AppointmentError::NoCapacity { ref patient_id, ref doctor_id, .. })
            if patient_id == "P013" && doctor_id == "D001"
    );
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NoCapacity);

    // Other doctors are unaffected.
    assert!(ledger.register_and_book(&request("Skin", "30", "acne")).is_ok());
}

// NOTE: a failed booking leaves the patient registered with no appointment.
// This mirrors existing behaviour and may not be intended; kept visible here
// rather than silently rolled back.
#[test]
fn test_no_capacity_keeps_patient_record() {
    let mut ledger = default_ledger();
    for i in 0..12 {
        ledger.register_and_book(&request(&format!("P{}", i), "30", "fever")).unwrap();
    }

    let err = ledger.register_and_book(&request("Stranded", "30", "cold")).unwrap_err();

    assert_eq!(err.stranded_patient_id(), Some("P013"));
    assert!(ledger.patient("P013").is_some());
    assert_eq!(ledger.appointments().len(), 12);

    let results = ledger.search_patients("stranded");
    assert_eq!(results.len(), 1);
    assert!(results[0].appointments.is_empty());

    // The stranded id is not reused, and the appointment counter did not move.
    let next = ledger.register_and_book(&request("Next", "30", "heart")).unwrap();
    assert_eq!(next.patient_id, "P014");
    assert_eq!(next.appointment_id, "APT013");
}

#[test]
fn test_no_doctor_available_when_default_unstaffed() {
    let mut config = ClinicConfig::default();
    config.doctors = vec![DoctorSeed::new("D001", "Dr. Smith", "Cardiology")];
    let mut ledger = BookingLedger::new(&config).unwrap();

    let err = ledger.register_and_book(&request("Fred", "30", "fever")).unwrap_err();

    assert_matches!(
        &err,
        AppointmentError::NoDoctorAvailable { patient_id, specialization }
            if patient_id == "P001" && specialization == "General Medicine"
    );
    assert_eq!(err.kind(), ErrorKind::NoDoctorAvailable);
    assert!(ledger.patient("P001").is_some());

    let ok = ledger.register_and_book(&request("Hal", "30", "heart")).unwrap();
    assert_eq!(ok.patient_id, "P002");
    assert_eq!(ok.appointment_id, "APT001");
}

#[test]
fn test_no_duplicate_bookings_across_day() {
    let mut ledger = default_ledger();
    let issues = ["heart", "fever", "rash", "bone", "baby"];

    for round in 0..14 {
        for issue in issues {
            let _ = ledger.register_and_book(&request(&format!("{} {}", issue, round), "30", issue));
        }
    }

    assert_eq!(ledger.appointments().len(), 60);
    for doctor in ledger.catalog().doctors() {
        assert_eq!(doctor.booked_slots().len(), 12);
        let booked: Vec<_> = ledger
            .appointments()
            .iter()
            .filter(|a| a.doctor_id == doctor.doctor_id)
            .map(|a| a.slot)
            .collect();
        let unique: std::collections::BTreeSet<_> = booked.iter().copied().collect();
        assert_eq!(unique.len(), booked.len());
        assert_eq!(&unique, doctor.booked_slots());
    }
}

// ==============================================================================
// READ MODELS
// ==============================================================================

#[test]
fn test_search_patients() {
    let mut ledger = default_ledger();
    ledger.register_and_book(&request("Alice", "34", "chest pain")).unwrap();
    ledger.register_and_book(&request("Alan", "41", "fracture")).unwrap();
    ledger.register_and_book(&request("Bob", "29", "fever")).unwrap();

    let results = ledger.search_patients("al");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].patient_name, "Alice");
    assert_eq!(results[0].patient_id, "P001");
    assert_eq!(results[0].appointments.len(), 1);
    assert_eq!(results[0].appointments[0].time_slot, "9:00");
    assert_eq!(results[0].appointments[0].doctor_name, "Dr. Smith");
    assert_eq!(results[1].patient_name, "Alan");
    assert_eq!(results[1].appointments[0].doctor_name, "Dr. Davis");

    assert!(ledger.search_patients("zzz").is_empty());
    assert_eq!(ledger.search_patients("ALICE").len(), 1);
}

#[test]
fn test_todays_schedule() {
    let mut ledger = default_ledger();
    for (name, issue) in [("A", "heart"), ("B", "heart"), ("C", "fever"), ("D", "heart")] {
        ledger.register_and_book(&request(name, "30", issue)).unwrap();
    }

    let schedule = ledger.list_todays_schedule();
    let rows: Vec<(&str, &str, &str)> = schedule
        .iter()
        .map(|e| (e.time_slot.as_str(), e.patient_name.as_str(), e.doctor_name.as_str()))
        .collect();

    assert_eq!(rows, vec![
        ("10:00", "D", "Dr. Smith"),
        ("9:00", "A", "Dr. Smith"),
        ("9:00", "C", "Dr. Brown"),
        ("9:30", "B", "Dr. Smith"),
    ]);
    assert_eq!(schedule[2].medical_issue, "fever");
}

#[test]
fn test_schedule_orders_labels_as_text() {
    let mut ledger = default_ledger();
    for i in 0..8 {
        ledger.register_and_book(&request(&format!("N{}", i), "30", "joint")).unwrap();
    }

    let labels: Vec<String> = ledger.list_todays_schedule().into_iter().map(|e| e.time_slot).collect();
    // Label text order, not the order of the day.
    assert_eq!(labels, vec!["10:00", "10:30", "11:00", "11:30", "2:00", "2:30", "9:00", "9:30"]);

    let mut by_day: Vec<_> = ledger.appointments().iter().collect();
    by_day.sort_by_key(|a| a.slot);
    let day_order: Vec<&str> = by_day.iter().map(|a| a.time_slot.as_str()).collect();
    assert_eq!(day_order, vec!["9:00", "9:30", "10:00", "10:30", "11:00", "11:30", "2:00", "2:30"]);
}

#[test]
fn test_schedule_ties_keep_booking_order() {
    let mut ledger = default_ledger();
    for (name, issue) in [("Zed", "skin"), ("Amy", "bone"), ("Max", "kids")] {
        ledger.register_and_book(&request(name, "30", issue)).unwrap();
    }

    let schedule = ledger.list_todays_schedule();
    let ids: Vec<&str> = schedule.iter().map(|e| e.appointment_id.as_str()).collect();
    assert_eq!(ids, vec!["APT001", "APT002", "APT003"]);
    assert!(schedule.iter().all(|e| e.time_slot == "9:00"));
}

#[test]
fn test_list_specializations_and_known_issues() {
    let ledger = default_ledger();

    let specializations = ledger.list_specializations();
    assert_eq!(specializations.len(), 5);
    assert_eq!(specializations[2].specialization, "General Medicine");
    assert_eq!(specializations[2].doctors, vec!["Dr. Brown"]);

    let issues = ledger.known_issues();
    assert_eq!(issues.len(), 15);
    assert!(issues.contains(&"chest pain".to_string()));
}
