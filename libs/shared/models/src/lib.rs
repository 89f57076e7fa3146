pub mod error;
pub mod ids;

pub use error::{AppError, ErrorKind, ErrorResponse};
pub use ids::SequentialId;
