pub mod catalog;
pub mod matching;
pub mod availability;

pub use catalog::Catalog;
pub use matching::{DoctorSelector, IssueResolver};
pub use availability::SlotAllocator;
