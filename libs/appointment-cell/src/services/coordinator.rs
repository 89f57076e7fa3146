// libs/appointment-cell/src/services/coordinator.rs
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use doctor_cell::models::SpecializationSummary;
use patient_cell::models::RegisterPatientRequest;
use shared_config::{ClinicConfig, ConfigError};

use crate::models::{
    AppointmentError, BookingConfirmation, LedgerSnapshot, PatientSearchResult, ScheduleEntry,
};
use crate::services::booking::BookingLedger;

/// Cloneable handle that serializes every ledger operation through one lock.
///
/// A booking attempt holds the lock from validation to the recorded
/// appointment, so concurrent callers can never double-book a slot.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<BookingLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: BookingLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn from_config(config: &ClinicConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(BookingLedger::new(config)?))
    }

    pub async fn register_and_book(
        &self,
        request: RegisterPatientRequest,
    ) -> Result<BookingConfirmation, AppointmentError> {
        let mut ledger = self.inner.lock().await;
        debug!("Booking lock acquired");
        ledger.register_and_book(&request)
    }

    pub async fn list_specializations(&self) -> Vec<SpecializationSummary> {
        self.inner.lock().await.list_specializations()
    }

    pub async fn list_todays_schedule(&self) -> Vec<ScheduleEntry> {
        self.inner.lock().await.list_todays_schedule()
    }

    pub async fn search_patients(&self, query: &str) -> Vec<PatientSearchResult> {
        self.inner.lock().await.search_patients(query)
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// Runs a read-only closure against the ledger under the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&BookingLedger) -> R) -> R {
        let ledger = self.inner.lock().await;
        f(&*ledger)
    }
}
