// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use doctor_cell::models::{DoctorError, SlotId};
use patient_cell::models::{Patient, ValidationError};
use shared_config::ConfigError;
use shared_models::{AppError, ErrorKind, ErrorResponse};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub time_slot: String,
    /// Position of `time_slot` in the daily schedule. Not persisted; rebuilt
    /// from the label when a snapshot is restored.
    #[serde(skip)]
    pub slot: SlotId,
    pub medical_issue: String,
    pub booked_at: DateTime<Utc>,
}

// ==============================================================================
// READ MODELS
// ==============================================================================

/// Everything the caller needs to tell the patient where and when to go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub patient_id: String,
    pub patient_name: String,
    pub appointment_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub specialization: String,
    pub time_slot: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub appointment_id: String,
    pub time_slot: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub medical_issue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientAppointment {
    pub appointment_id: String,
    pub time_slot: String,
    pub doctor_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSearchResult {
    pub patient_name: String,
    pub patient_id: String,
    pub appointments: Vec<PatientAppointment>,
}

// ==============================================================================
// SNAPSHOT MODELS
// ==============================================================================

/// Serializable state of a ledger. Doctors' booked slots and each
/// appointment's slot position are not stored; they are rebuilt from the
/// appointment labels on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub next_patient_id: u64,
    pub next_appointment_id: u64,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("No available time slots today for {doctor_name}")]
    NoCapacity {
        patient_id: String,
        doctor_id: String,
        doctor_name: String,
    },

    #[error("No doctor available for {specialization}")]
    NoDoctorAvailable {
        patient_id: String,
        specialization: String,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] DoctorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Inconsistent snapshot: {0}")]
    InconsistentSnapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppointmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppointmentError::Validation(_) => ErrorKind::Validation,
            AppointmentError::NoCapacity { .. } => ErrorKind::NoCapacity,
            AppointmentError::NoDoctorAvailable { .. } => ErrorKind::NoDoctorAvailable,
            _ => ErrorKind::Internal,
        }
    }

    /// Patient record left behind by a failed booking attempt, if any.
    pub fn stranded_patient_id(&self) -> Option<&str> {
        match self {
            AppointmentError::NoCapacity { patient_id, .. }
            | AppointmentError::NoDoctorAvailable { patient_id, .. } => Some(patient_id),
            _ => None,
        }
    }

    pub fn into_response(self) -> ErrorResponse {
        AppError::from(self).into_response()
    }
}

impl From<AppointmentError> for AppError {
    fn from(error: AppointmentError) -> Self {
        let message = error.to_string();
        match error.kind() {
            ErrorKind::Validation => AppError::ValidationError(message),
            ErrorKind::NoCapacity => AppError::NoCapacity(message),
            ErrorKind::NoDoctorAvailable => AppError::NoDoctorAvailable(message),
            ErrorKind::Internal => AppError::Internal(message),
        }
    }
}
