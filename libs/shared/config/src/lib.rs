use std::collections::HashSet;
use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const CATALOG_FILE_ENV: &str = "CLINIC_CATALOG_FILE";
pub const DEFAULT_SPECIALIZATION_ENV: &str = "CLINIC_DEFAULT_SPECIALIZATION";

/// One entry of the doctor seed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSeed {
    pub doctor_id: String,
    pub name: String,
    pub specialization: String,
}

impl DoctorSeed {
    pub fn new(doctor_id: &str, name: &str, specialization: &str) -> Self {
        Self {
            doctor_id: doctor_id.to_string(),
            name: name.to_string(),
            specialization: specialization.to_string(),
        }
    }
}

/// Keyword to specialization mapping used to route a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueKeyword {
    pub keyword: String,
    pub specialization: String,
}

impl IssueKeyword {
    pub fn new(keyword: &str, specialization: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            specialization: specialization.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Daily schedule must contain at least one slot")]
    EmptySchedule,

    #[error("Blank time slot label at position {0}")]
    BlankSlot(usize),

    #[error("Duplicate time slot label: {0}")]
    DuplicateSlot(String),

    #[error("Duplicate doctor id: {0}")]
    DuplicateDoctor(String),

    #[error("Doctor {0} has a blank name or specialization")]
    IncompleteDoctor(String),

    #[error("Blank issue keyword or specialization for entry {0}")]
    BlankIssueKeyword(usize),

    #[error("Default specialization must not be blank")]
    BlankDefaultSpecialization,
}

/// Startup configuration of the clinic: doctors, issue routing table, daily
/// slots and the specialization used when routing falls through.
///
/// Fixed once the ledger is built; nothing mutates it at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicConfig {
    pub doctors: Vec<DoctorSeed>,
    pub issue_keywords: Vec<IssueKeyword>,
    pub daily_slots: Vec<String>,
    pub default_specialization: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            doctors: vec![
                DoctorSeed::new("D001", "Dr. Smith", "Cardiology"),
                DoctorSeed::new("D002", "Dr. Johnson", "Pediatrics"),
                DoctorSeed::new("D003", "Dr. Brown", "General Medicine"),
                DoctorSeed::new("D004", "Dr. Davis", "Orthopedics"),
                DoctorSeed::new("D005", "Dr. Wilson", "Dermatology"),
            ],
            issue_keywords: vec![
                IssueKeyword::new("heart", "Cardiology"),
                IssueKeyword::new("chest pain", "Cardiology"),
                IssueKeyword::new("cardiac", "Cardiology"),
                IssueKeyword::new("child", "Pediatrics"),
                IssueKeyword::new("baby", "Pediatrics"),
                IssueKeyword::new("kids", "Pediatrics"),
                IssueKeyword::new("fever", "General Medicine"),
                IssueKeyword::new("cold", "General Medicine"),
                IssueKeyword::new("headache", "General Medicine"),
                IssueKeyword::new("bone", "Orthopedics"),
                IssueKeyword::new("fracture", "Orthopedics"),
                IssueKeyword::new("joint", "Orthopedics"),
                IssueKeyword::new("skin", "Dermatology"),
                IssueKeyword::new("rash", "Dermatology"),
                IssueKeyword::new("acne", "Dermatology"),
            ],
            daily_slots: [
                "9:00", "9:30", "10:00", "10:30", "11:00", "11:30",
                "2:00", "2:30", "3:00", "3:30", "4:00", "4:30",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            default_specialization: "General Medicine".to_string(),
        }
    }
}

impl ClinicConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source, starting
    /// from the built-in seed and applying overrides on top.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CATALOG_FILE_ENV) {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    warn!("{} could not be loaded ({:#}), using built-in catalog", CATALOG_FILE_ENV, e);
                    Self::default()
                }
            },
            None => {
                debug!("{} not set, using built-in catalog", CATALOG_FILE_ENV);
                Self::default()
            }
        };

        if let Some(specialization) = lookup(DEFAULT_SPECIALIZATION_ENV) {
            let specialization = specialization.trim();
            if specialization.is_empty() {
                warn!("{} is blank, keeping {}", DEFAULT_SPECIALIZATION_ENV, config.default_specialization);
            } else {
                config.default_specialization = specialization.to_string();
            }
        }

        if !config.is_configured() {
            warn!("Clinic not fully configured - default specialization {} has no doctor",
                  config.default_specialization);
        }

        config
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading clinic catalog {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing clinic catalog {}", path.display()))?;
        config.validate()
            .with_context(|| format!("validating clinic catalog {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.daily_slots.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }

        let mut labels = HashSet::new();
        for (position, label) in self.daily_slots.iter().enumerate() {
            let label = label.trim();
            if label.is_empty() {
                return Err(ConfigError::BlankSlot(position));
            }
            if !labels.insert(label) {
                return Err(ConfigError::DuplicateSlot(label.to_string()));
            }
        }

        let mut doctor_ids = HashSet::new();
        for doctor in &self.doctors {
            if !doctor_ids.insert(doctor.doctor_id.as_str()) {
                return Err(ConfigError::DuplicateDoctor(doctor.doctor_id.clone()));
            }
            if doctor.name.trim().is_empty() || doctor.specialization.trim().is_empty() {
                return Err(ConfigError::IncompleteDoctor(doctor.doctor_id.clone()));
            }
        }

        for (position, entry) in self.issue_keywords.iter().enumerate() {
            if entry.keyword.trim().is_empty() || entry.specialization.trim().is_empty() {
                return Err(ConfigError::BlankIssueKeyword(position));
            }
        }

        if self.default_specialization.trim().is_empty() {
            return Err(ConfigError::BlankDefaultSpecialization);
        }

        Ok(())
    }

    /// True when the fallback specialization is staffed by at least one doctor.
    pub fn is_configured(&self) -> bool {
        self.doctors
            .iter()
            .any(|d| d.specialization == self.default_specialization)
    }
}
