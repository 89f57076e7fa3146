use chrono::Utc;
use tracing::debug;

use shared_models::SequentialId;

use crate::models::{Patient, PatientDetails};

pub const PATIENT_ID_PREFIX: &str = "P";

/// In-memory patient store. Ids come from a monotonic sequence, so a
/// patient id is never handed out twice.
#[derive(Debug, Clone)]
pub struct PatientRegistry {
    patients: Vec<Patient>,
    ids: SequentialId,
}

impl Default for PatientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self {
            patients: Vec::new(),
            ids: SequentialId::new(PATIENT_ID_PREFIX),
        }
    }

    /// Rebuilds a registry from stored records; the next id continues after
    /// `next_id - 1`.
    pub fn restore(patients: Vec<Patient>, next_id: u64) -> Self {
        Self {
            patients,
            ids: SequentialId::resume(PATIENT_ID_PREFIX, next_id),
        }
    }

    pub fn register(&mut self, details: PatientDetails) -> &Patient {
        let patient = Patient {
            patient_id: self.ids.next_id(),
            name: details.name,
            age: details.age,
            phone: details.phone,
            medical_issue: details.medical_issue,
            registered_at: Utc::now(),
        };
        debug!("Registered patient {} ({})", patient.patient_id, patient.name);

        let index = self.patients.len();
        self.patients.push(patient);
        &self.patients[index]
    }

    pub fn get(&self, patient_id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.patient_id == patient_id)
    }

    pub fn all(&self) -> &[Patient] {
        &self.patients
    }

    pub fn next_id(&self) -> u64 {
        self.ids.peek()
    }

    pub fn id_sequence(&self) -> &SequentialId {
        &self.ids
    }

    /// Case-insensitive substring match on the name, in registration order.
    /// A blank query matches nothing.
    pub fn search_by_name(&self, query: &str) -> Vec<&Patient> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let matches: Vec<&Patient> = self
            .patients
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect();

        debug!("Patient search '{}' matched {} record(s)", needle, matches.len());
        matches
    }
}
