use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ==============================================================================
// SLOT MODELS
// ==============================================================================

/// Position of a slot in the daily schedule. Ordering follows the schedule,
/// not the label text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub usize);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub label: String,
}

/// The fixed, ordered list of bookable labels shared by every doctor for the
/// single modelled day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSchedule {
    labels: Vec<String>,
}

impl SlotSchedule {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        id.0 < self.labels.len()
    }

    pub fn position(&self, label: &str) -> Option<SlotId> {
        let label = label.trim();
        self.labels.iter().position(|l| l == label).map(SlotId)
    }

    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        self.labels.iter().enumerate().map(|(i, label)| TimeSlot {
            id: SlotId(i),
            label: label.clone(),
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

// ==============================================================================
// DOCTOR MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: String,
    pub name: String,
    pub specialization: String,
    booked_slots: BTreeSet<SlotId>,
}

impl Doctor {
    pub fn new(doctor_id: &str, name: &str, specialization: &str) -> Self {
        Self {
            doctor_id: doctor_id.to_string(),
            name: name.to_string(),
            specialization: specialization.to_string(),
            booked_slots: BTreeSet::new(),
        }
    }

    pub fn booked_slots(&self) -> &BTreeSet<SlotId> {
        &self.booked_slots
    }

    pub fn is_booked(&self, slot: SlotId) -> bool {
        self.booked_slots.contains(&slot)
    }

    /// Grows the booked set. Returns false when the slot was already taken.
    pub(crate) fn reserve(&mut self, slot: SlotId) -> bool {
        self.booked_slots.insert(slot)
    }
}

/// A specialization together with its doctors' names, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecializationSummary {
    pub specialization: String,
    pub doctors: Vec<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DoctorError {
    #[error("No doctor available for {specialization}")]
    NoDoctorAvailable { specialization: String },

    #[error("Doctor not found: {0}")]
    DoctorNotFound(String),

    #[error("Slot {slot} is not part of the daily schedule")]
    UnknownSlot { slot: SlotId },

    #[error("Slot {slot} already booked for doctor {doctor_id}")]
    SlotAlreadyBooked { doctor_id: String, slot: SlotId },
}
