// libs/doctor-cell/src/services/availability.rs
use tracing::debug;

use crate::models::{Doctor, SlotSchedule, TimeSlot};

/// Earliest-free-slot allocation against the fixed daily schedule.
///
/// Read-only: reserving the returned slot is up to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotAllocator;

impl SlotAllocator {
    pub fn new() -> Self {
        Self
    }

    /// First slot in schedule order that the doctor has not booked, or `None`
    /// once the day is full.
    pub fn next_available(&self, schedule: &SlotSchedule, doctor: &Doctor) -> Option<TimeSlot> {
        let slot = schedule.slots().find(|slot| !doctor.is_booked(slot.id));

        match &slot {
            Some(slot) => debug!("Next slot for {} is {}", doctor.doctor_id, slot.label),
            None => debug!("No free slot left for {}", doctor.doctor_id),
        }

        slot
    }

    pub fn free_slots(&self, schedule: &SlotSchedule, doctor: &Doctor) -> Vec<TimeSlot> {
        schedule
            .slots()
            .filter(|slot| !doctor.is_booked(slot.id))
            .collect()
    }

    pub fn remaining_capacity(&self, schedule: &SlotSchedule, doctor: &Doctor) -> usize {
        schedule
            .slots()
            .filter(|slot| !doctor.is_booked(slot.id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::Catalog;
    use shared_config::ClinicConfig;

    fn catalog() -> Catalog {
        Catalog::from_config(&ClinicConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_day_starts_at_first_slot() {
        let catalog = catalog();
        let doctor = catalog.doctor("D001").unwrap();

        let slot = SlotAllocator::new().next_available(catalog.schedule(), doctor).unwrap();
        assert_eq!(slot.label, "9:00");
    }

    #[test]
    fn test_skips_booked_slots() {
        let mut catalog = catalog();
        let nine = catalog.schedule().position("9:00").unwrap();
        let nine_thirty = catalog.schedule().position("9:30").unwrap();
        catalog.reserve_slot("D001", nine).unwrap();
        catalog.reserve_slot("D001", nine_thirty).unwrap();

        let doctor = catalog.doctor("D001").unwrap();
        let slot = SlotAllocator::new().next_available(catalog.schedule(), doctor).unwrap();

        assert_eq!(slot.label, "10:00");
    }

    #[test]
    fn test_fills_gaps_before_later_slots() {
        let mut catalog = catalog();
        let ten = catalog.schedule().position("10:00").unwrap();
        catalog.reserve_slot("D002", ten).unwrap();

        let allocator = SlotAllocator::new();
        let doctor = catalog.doctor("D002").unwrap();

        assert_eq!(allocator.next_available(catalog.schedule(), doctor).unwrap().label, "9:00");
        assert_eq!(allocator.remaining_capacity(catalog.schedule(), doctor), 11);
    }

    #[test]
    fn test_full_day_has_no_slot() {
        let mut catalog = catalog();
        let ids: Vec<_> = catalog.schedule().slots().map(|s| s.id).collect();
        for id in ids {
            catalog.reserve_slot("D003", id).unwrap();
        }

        let allocator = SlotAllocator::new();
        let doctor = catalog.doctor("D003").unwrap();

        assert!(allocator.next_available(catalog.schedule(), doctor).is_none());
        assert!(allocator.free_slots(catalog.schedule(), doctor).is_empty());
        assert_eq!(allocator.remaining_capacity(catalog.schedule(), doctor), 0);
    }

    #[test]
    fn test_does_not_mutate_doctor() {
        let catalog = catalog();
        let doctor = catalog.doctor("D004").unwrap();
        let allocator = SlotAllocator::new();

        let first = allocator.next_available(catalog.schedule(), doctor);
        let second = allocator.next_available(catalog.schedule(), doctor);

        assert_eq!(first, second);
        assert!(doctor.booked_slots().is_empty());
    }
}
