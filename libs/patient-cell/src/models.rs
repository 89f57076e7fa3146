use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 149;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub age: u8,
    pub phone: String,
    pub medical_issue: String,
    pub registered_at: DateTime<Utc>,
}

impl Patient {
    /// Re-checks a stored record against the registration rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ValidationError::InvalidAge(self.age.to_string()));
        }
        if self.medical_issue.trim().is_empty() {
            return Err(ValidationError::MissingIssue);
        }
        Ok(())
    }
}

/// Raw registration input as typed by the user; age is still text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterPatientRequest {
    pub name: String,
    pub age: String,
    pub phone: String,
    pub medical_issue: String,
}

/// Registration input that passed validation, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDetails {
    pub name: String,
    pub age: u8,
    pub phone: String,
    pub medical_issue: String,
}

impl RegisterPatientRequest {
    pub fn new(name: &str, age: &str, phone: &str, medical_issue: &str) -> Self {
        Self {
            name: name.to_string(),
            age: age.to_string(),
            phone: phone.to_string(),
            medical_issue: medical_issue.to_string(),
        }
    }

    /// Checks name, then age, then issue, stopping at the first problem.
    /// The issue is not checked against the keyword table.
    pub fn validate(&self) -> Result<PatientDetails, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let age = parse_age(&self.age)?;

        let medical_issue = self.medical_issue.trim();
        if medical_issue.is_empty() {
            return Err(ValidationError::MissingIssue);
        }

        Ok(PatientDetails {
            name: name.to_string(),
            age,
            phone: self.phone.trim().to_string(),
            medical_issue: medical_issue.to_string(),
        })
    }
}

/// Digits only (no sign), inclusive 1..=149.
pub fn parse_age(raw: &str) -> Result<u8, ValidationError> {
    let trimmed = raw.trim();
    let invalid = || ValidationError::InvalidAge(trimmed.to_string());

    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let age: u32 = trimmed.parse().map_err(|_| invalid())?;
    if !(u32::from(MIN_AGE)..=u32::from(MAX_AGE)).contains(&age) {
        return Err(invalid());
    }

    u8::try_from(age).map_err(|_| invalid())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a name")]
    EmptyName,

    #[error("Please enter a valid age (1-149), got '{0}'")]
    InvalidAge(String),

    #[error("Please select a medical issue")]
    MissingIssue,
}
