// libs/appointment-cell/src/services/booking.rs
use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use doctor_cell::models::{DoctorError, SpecializationSummary, TimeSlot};
use doctor_cell::services::{Catalog, DoctorSelector, IssueResolver, SlotAllocator};
use patient_cell::models::{Patient, RegisterPatientRequest};
use patient_cell::services::PatientRegistry;
use shared_config::{ClinicConfig, ConfigError};
use shared_models::SequentialId;

use crate::models::{
    Appointment, AppointmentError, BookingConfirmation, LedgerSnapshot,
    PatientAppointment, PatientSearchResult, ScheduleEntry,
};

pub const APPOINTMENT_ID_PREFIX: &str = "APT";

/// Sole owner of patients, doctors and appointments for one operating day.
///
/// Collaborators (resolver, selector, allocator) only ever borrow the piece
/// of state they need for a single call. All mutation goes through
/// `&mut self`, so one booking attempt always finishes before the next
/// starts; see `SharedLedger` for concurrent callers.
#[derive(Debug, Clone)]
pub struct BookingLedger {
    catalog: Catalog,
    resolver: IssueResolver,
    selector: DoctorSelector,
    allocator: SlotAllocator,
    patients: PatientRegistry,
    appointments: Vec<Appointment>,
    appointment_ids: SequentialId,
}

impl BookingLedger {
    pub fn new(config: &ClinicConfig) -> Result<Self, ConfigError> {
        let catalog = Catalog::from_config(config)?;
        if !config.is_configured() {
            warn!("Default specialization {} has no doctor; unmatched issues will fail",
                  config.default_specialization);
        }

        Ok(Self {
            catalog,
            resolver: IssueResolver::new(config),
            selector: DoctorSelector::new(config),
            allocator: SlotAllocator::new(),
            patients: PatientRegistry::new(),
            appointments: Vec::new(),
            appointment_ids: SequentialId::new(APPOINTMENT_ID_PREFIX),
        })
    }

    /// Validates the request, registers the patient and books the earliest
    /// free slot with the routed doctor.
    ///
    /// The patient record is kept even when no doctor or slot can be found;
    /// the error carries the stranded patient id.
    #[instrument(skip(self, request), fields(issue = %request.medical_issue))]
    pub fn register_and_book(
        &mut self,
        request: &RegisterPatientRequest,
    ) -> Result<BookingConfirmation, AppointmentError> {
        let details = request.validate()?;

        let (patient_id, patient_name, medical_issue) = {
            let patient = self.patients.register(details);
            (patient.patient_id.clone(), patient.name.clone(), patient.medical_issue.clone())
        };

        let specialization = self.resolver.resolve(&medical_issue);
        let doctor = match self.selector.select(&self.catalog, specialization) {
            Ok(doctor) => doctor,
            Err(DoctorError::NoDoctorAvailable { specialization }) => {
                warn!("Patient {} registered but no doctor available for {}", patient_id, specialization);
                return Err(AppointmentError::NoDoctorAvailable { patient_id, specialization });
            }
            Err(e) => return Err(e.into()),
        };

        let Some(slot) = self.allocator.next_available(self.catalog.schedule(), doctor) else {
            warn!("Patient {} registered but {} has no slots left today", patient_id, doctor.doctor_id);
            return Err(AppointmentError::NoCapacity {
                patient_id,
                doctor_id: doctor.doctor_id.clone(),
                doctor_name: doctor.name.clone(),
            });
        };

        let doctor_id = doctor.doctor_id.clone();
        let doctor_name = doctor.name.clone();
        let doctor_specialization = doctor.specialization.clone();

        let appointment_id = self.record_booking(&patient_id, &doctor_id, slot.clone(), medical_issue)?;

        info!("Appointment {} booked: patient {} with {} at {}",
              appointment_id, patient_id, doctor_name, slot.label);

        Ok(BookingConfirmation {
            patient_id,
            patient_name,
            appointment_id,
            doctor_id,
            doctor_name,
            specialization: doctor_specialization,
            time_slot: slot.label,
        })
    }

    /// Reserves the slot, then issues the id and stores the appointment.
    /// Only the reservation can fail, and it fails before anything changes.
    fn record_booking(
        &mut self,
        patient_id: &str,
        doctor_id: &str,
        slot: TimeSlot,
        medical_issue: String,
    ) -> Result<String, AppointmentError> {
        self.catalog.reserve_slot(doctor_id, slot.id)?;

        let appointment_id = self.appointment_ids.next_id();
        self.appointments.push(Appointment {
            appointment_id: appointment_id.clone(),
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            time_slot: slot.label,
            slot: slot.id,
            medical_issue,
            booked_at: Utc::now(),
        });

        Ok(appointment_id)
    }

    // ==========================================================================
    // READ OPERATIONS
    // ==========================================================================

    pub fn list_specializations(&self) -> Vec<SpecializationSummary> {
        self.catalog.specializations()
    }

    /// Today's appointments ordered by the slot label as text, ties in
    /// booking order.
    ///
    /// Labels carry no am/pm, so "10:00" sorts before "9:00" and "2:00" after
    /// "11:30". Callers wanting the daily order can sort on `Appointment::slot`.
    pub fn list_todays_schedule(&self) -> Vec<ScheduleEntry> {
        let mut ordered: Vec<&Appointment> = self.appointments.iter().collect();
        ordered.sort_by(|a, b| a.time_slot.cmp(&b.time_slot));

        ordered
            .into_iter()
            .filter_map(|appointment| {
                let patient = self.patients.get(&appointment.patient_id)?;
                let doctor = self.catalog.doctor(&appointment.doctor_id)?;
                Some(ScheduleEntry {
                    appointment_id: appointment.appointment_id.clone(),
                    time_slot: appointment.time_slot.clone(),
                    patient_name: patient.name.clone(),
                    doctor_name: doctor.name.clone(),
                    medical_issue: appointment.medical_issue.clone(),
                })
            })
            .collect()
    }

    pub fn search_patients(&self, query: &str) -> Vec<PatientSearchResult> {
        self.patients
            .search_by_name(query)
            .into_iter()
            .map(|patient| PatientSearchResult {
                patient_name: patient.name.clone(),
                patient_id: patient.patient_id.clone(),
                appointments: self
                    .appointments_for(&patient.patient_id)
                    .map(|appointment| PatientAppointment {
                        appointment_id: appointment.appointment_id.clone(),
                        time_slot: appointment.time_slot.clone(),
                        doctor_name: self
                            .catalog
                            .doctor(&appointment.doctor_id)
                            .map(|d| d.name.clone())
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect()
    }

    fn appointments_for<'a>(&'a self, patient_id: &'a str) -> impl Iterator<Item = &'a Appointment> + 'a {
        self.appointments.iter().filter(move |a| a.patient_id == patient_id)
    }

    pub fn known_issues(&self) -> &[String] {
        self.resolver.known_issues()
    }

    pub fn free_slots(&self, doctor_id: &str) -> Option<Vec<TimeSlot>> {
        let doctor = self.catalog.doctor(doctor_id)?;
        Some(self.allocator.free_slots(self.catalog.schedule(), doctor))
    }

    pub fn remaining_capacity(&self, doctor_id: &str) -> Option<usize> {
        let doctor = self.catalog.doctor(doctor_id)?;
        Some(self.allocator.remaining_capacity(self.catalog.schedule(), doctor))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn patient(&self, patient_id: &str) -> Option<&Patient> {
        self.patients.get(patient_id)
    }

    pub fn patients(&self) -> &[Patient] {
        self.patients.all()
    }

    pub fn appointment(&self, appointment_id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.appointment_id == appointment_id)
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    // ==========================================================================
    // SNAPSHOTS
    // ==========================================================================

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            patients: self.patients.all().to_vec(),
            appointments: self.appointments.clone(),
            next_patient_id: self.patients.next_id(),
            next_appointment_id: self.appointment_ids.peek(),
        }
    }

    /// Rebuilds a ledger from a snapshot against `config`, re-deriving every
    /// doctor's booked slots from the stored appointments.
    pub fn restore(config: &ClinicConfig, snapshot: LedgerSnapshot) -> Result<Self, AppointmentError> {
        let mut ledger = Self::new(config)?;

        let patient_ids = ledger.patients.id_sequence().clone();
        let mut seen_patients = HashSet::new();
        for patient in &snapshot.patients {
            let number = patient_ids.parse(&patient.patient_id).ok_or_else(|| {
                AppointmentError::InconsistentSnapshot(format!("malformed patient id {}", patient.patient_id))
            })?;
            if number >= snapshot.next_patient_id {
                return Err(AppointmentError::InconsistentSnapshot(format!(
                    "patient {} is not below the next patient id {}",
                    patient.patient_id, snapshot.next_patient_id
                )));
            }
            if !seen_patients.insert(patient.patient_id.as_str()) {
                return Err(AppointmentError::InconsistentSnapshot(format!(
                    "duplicate patient {}", patient.patient_id
                )));
            }
            patient.validate().map_err(|e| {
                AppointmentError::InconsistentSnapshot(format!("patient {}: {}", patient.patient_id, e))
            })?;
        }

        let mut seen_appointments = HashSet::new();
        let mut appointments = Vec::with_capacity(snapshot.appointments.len());
        for mut appointment in snapshot.appointments {
            let number = ledger.appointment_ids.parse(&appointment.appointment_id).ok_or_else(|| {
                AppointmentError::InconsistentSnapshot(format!(
                    "malformed appointment id {}", appointment.appointment_id
                ))
            })?;
            if number >= snapshot.next_appointment_id
                || !seen_appointments.insert(appointment.appointment_id.clone())
            {
                return Err(AppointmentError::InconsistentSnapshot(format!(
                    "appointment id {} is duplicated or ahead of the counter",
                    appointment.appointment_id
                )));
            }
            if !seen_patients.contains(appointment.patient_id.as_str()) {
                return Err(AppointmentError::InconsistentSnapshot(format!(
                    "appointment {} references unknown patient {}",
                    appointment.appointment_id, appointment.patient_id
                )));
            }

            let slot = ledger.catalog.schedule().position(&appointment.time_slot).ok_or_else(|| {
                AppointmentError::InconsistentSnapshot(format!(
                    "appointment {} uses unknown slot {}",
                    appointment.appointment_id, appointment.time_slot
                ))
            })?;
            ledger.catalog.reserve_slot(&appointment.doctor_id, slot).map_err(|e| {
                AppointmentError::InconsistentSnapshot(format!(
                    "appointment {}: {}", appointment.appointment_id, e
                ))
            })?;

            appointment.slot = slot;
            appointments.push(appointment);
        }

        debug!("Restored {} patients and {} appointments",
               snapshot.patients.len(), appointments.len());

        ledger.patients = PatientRegistry::restore(snapshot.patients, snapshot.next_patient_id);
        ledger.appointments = appointments;
        ledger.appointment_ids = SequentialId::resume(APPOINTMENT_ID_PREFIX, snapshot.next_appointment_id);

        Ok(ledger)
    }

    pub fn to_json(&self) -> Result<String, AppointmentError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn from_json(config: &ClinicConfig, json: &str) -> Result<Self, AppointmentError> {
        let snapshot: LedgerSnapshot = serde_json::from_str(json)?;
        Self::restore(config, snapshot)
    }
}
