// libs/doctor-cell/src/services/matching.rs
use std::collections::HashMap;

use tracing::{debug, warn};

use shared_config::ClinicConfig;

use crate::models::{Doctor, DoctorError};
use crate::services::catalog::Catalog;

/// Maps a patient's complaint to a specialization via exact keyword lookup.
///
/// Matching is whole-input only: "bad headache" does not hit the "headache"
/// keyword. Unmatched complaints come back as `None`; choosing a fallback is
/// the selector's job.
#[derive(Debug, Clone)]
pub struct IssueResolver {
    keywords: HashMap<String, String>,
    known_issues: Vec<String>,
}

impl IssueResolver {
    pub fn new(config: &ClinicConfig) -> Self {
        let mut keywords = HashMap::new();
        for entry in &config.issue_keywords {
            keywords
                .entry(Self::normalize(&entry.keyword))
                .or_insert_with(|| entry.specialization.clone());
        }

        let mut known_issues: Vec<String> = keywords.keys().cloned().collect();
        known_issues.sort();

        Self { keywords, known_issues }
    }

    fn normalize(issue: &str) -> String {
        issue.trim().to_lowercase()
    }

    pub fn resolve(&self, issue: &str) -> Option<&str> {
        let normalized = Self::normalize(issue);
        let specialization = self.keywords.get(&normalized).map(String::as_str);

        match specialization {
            Some(spec) => debug!("Issue '{}' resolved to {}", normalized, spec),
            None => debug!("Issue '{}' did not match any keyword", normalized),
        }

        specialization
    }

    /// Sorted, de-duplicated keywords a caller can offer as issue choices.
    pub fn known_issues(&self) -> &[String] {
        &self.known_issues
    }
}

/// First-match doctor selection with a fallback specialization.
#[derive(Debug, Clone)]
pub struct DoctorSelector {
    default_specialization: String,
}

impl DoctorSelector {
    pub fn new(config: &ClinicConfig) -> Self {
        Self {
            default_specialization: config.default_specialization.clone(),
        }
    }

    pub fn select<'a>(
        &self,
        catalog: &'a Catalog,
        specialization: Option<&str>,
    ) -> Result<&'a Doctor, DoctorError> {
        if let Some(spec) = specialization {
            if let Some(doctor) = Self::first_with(catalog, spec) {
                debug!("Selected {} ({}) for {}", doctor.doctor_id, doctor.name, spec);
                return Ok(doctor);
            }
            warn!("No doctor for {}, falling back to {}", spec, self.default_specialization);
        }

        Self::first_with(catalog, &self.default_specialization).ok_or_else(|| {
            warn!("No doctor for default specialization {}", self.default_specialization);
            DoctorError::NoDoctorAvailable {
                specialization: self.default_specialization.clone(),
            }
        })
    }

    fn first_with<'a>(catalog: &'a Catalog, specialization: &str) -> Option<&'a Doctor> {
        catalog
            .doctors()
            .iter()
            .find(|d| d.specialization == specialization)
    }
}
