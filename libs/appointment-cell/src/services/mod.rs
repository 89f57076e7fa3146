pub mod booking;
pub mod coordinator;

pub use booking::BookingLedger;
pub use coordinator::SharedLedger;
