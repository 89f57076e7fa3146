// libs/doctor-cell/src/services/catalog.rs
use tracing::{debug, info};

use shared_config::{ClinicConfig, ConfigError};

use crate::models::{Doctor, DoctorError, SlotId, SlotSchedule, SpecializationSummary};

/// Doctors and the daily slot schedule, seeded once at startup.
///
/// Doctors keep their seed order; every "first match" rule elsewhere depends
/// on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    doctors: Vec<Doctor>,
    schedule: SlotSchedule,
}

impl Catalog {
    pub fn from_config(config: &ClinicConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let doctors = config
            .doctors
            .iter()
            .map(|seed| Doctor::new(&seed.doctor_id, &seed.name, &seed.specialization))
            .collect::<Vec<_>>();
        let schedule = SlotSchedule::new(
            config.daily_slots.iter().map(|s| s.trim().to_string()).collect(),
        );

        info!("Catalog seeded with {} doctors and {} daily slots", doctors.len(), schedule.labels().len());

        Ok(Self { doctors, schedule })
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn doctor(&self, doctor_id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.doctor_id == doctor_id)
    }

    pub fn schedule(&self) -> &SlotSchedule {
        &self.schedule
    }

    /// Groups doctor names by specialization, ordered by first appearance.
    pub fn specializations(&self) -> Vec<SpecializationSummary> {
        let mut summaries: Vec<SpecializationSummary> = Vec::new();

        for doctor in &self.doctors {
            match summaries.iter_mut().find(|s| s.specialization == doctor.specialization) {
                Some(summary) => summary.doctors.push(doctor.name.clone()),
                None => summaries.push(SpecializationSummary {
                    specialization: doctor.specialization.clone(),
                    doctors: vec![doctor.name.clone()],
                }),
            }
        }

        summaries
    }

    /// Marks `slot` as taken for the doctor. Fails without touching state if
    /// the slot is unknown or already booked.
    ///
    /// Public only so the booking ledger in appointment-cell can reach it. The
    /// ledger owns the sole `&mut Catalog` and hands out `&Catalog` only, so
    /// outside code never reserves slots directly.
    pub fn reserve_slot(&mut self, doctor_id: &str, slot: SlotId) -> Result<(), DoctorError> {
        if !self.schedule.contains(slot) {
            return Err(DoctorError::UnknownSlot { slot });
        }

        let doctor = self
            .doctors
            .iter_mut()
            .find(|d| d.doctor_id == doctor_id)
            .ok_or_else(|| DoctorError::DoctorNotFound(doctor_id.to_string()))?;

        if !doctor.reserve(slot) {
            return Err(DoctorError::SlotAlreadyBooked {
                doctor_id: doctor_id.to_string(),
                slot,
            });
        }

        debug!("Reserved slot {} for doctor {}", slot, doctor_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn catalog() -> Catalog {
        Catalog::from_config(&ClinicConfig::default()).unwrap()
    }

    #[test]
    fn test_seeded_in_order() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.doctors().iter().map(|d| d.doctor_id.as_str()).collect();

        assert_eq!(ids, vec!["D001", "D002", "D003", "D004", "D005"]);
        assert_eq!(catalog.schedule().labels().len(), 12);
        assert!(catalog.doctors().iter().all(|d| d.booked_slots().is_empty()));
    }

    #[test]
    fn test_specializations_group_by_first_appearance() {
        let mut config = ClinicConfig::default();
        config.doctors.push(shared_config::DoctorSeed::new("D006", "Dr. Taylor", "Cardiology"));
        let catalog = Catalog::from_config(&config).unwrap();

        let summaries = catalog.specializations();

        assert_eq!(summaries.len(), 5);
        assert_eq!(summaries[0].specialization, "Cardiology");
        assert_eq!(summaries[0].doctors, vec!["Dr. Smith", "Dr. Taylor"]);
        assert_eq!(summaries[4].specialization, "Dermatology");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ClinicConfig::default();
        config.daily_slots.clear();

        assert_eq!(Catalog::from_config(&config), Err(ConfigError::EmptySchedule));
    }

    #[test]
    fn test_reserve_slot_rejects_double_booking() {
        let mut catalog = catalog();

        assert!(catalog.reserve_slot("D001", SlotId(0)).is_ok());
        assert_matches!(
            catalog.reserve_slot("D001", SlotId(0)),
            Err(DoctorError::SlotAlreadyBooked { .. })
        );
        assert_eq!(catalog.doctor("D001").unwrap().booked_slots().len(), 1);
    }

    #[test]
    fn test_reserve_slot_rejects_unknown_inputs() {
        let mut catalog = catalog();

        assert_matches!(catalog.reserve_slot("D001", SlotId(12)), Err(DoctorError::UnknownSlot { .. }));
        assert_matches!(catalog.reserve_slot("D999", SlotId(0)), Err(DoctorError::DoctorNotFound(_)));
    }
}
