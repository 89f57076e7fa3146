use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification handed to whatever presents booking failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NoCapacity,
    NoDoctorAvailable,
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No capacity: {0}")]
    NoCapacity(String),

    #[error("No doctor available: {0}")]
    NoDoctorAvailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// `failure{kind, message}` as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_) => ErrorKind::Validation,
            AppError::NoCapacity(_) => ErrorKind::NoCapacity,
            AppError::NoDoctorAvailable(_) => ErrorKind::NoDoctorAvailable,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn into_response(self) -> ErrorResponse {
        let kind = self.kind();
        let message = match self {
            AppError::ValidationError(msg) => msg,
            AppError::NoCapacity(msg) => msg,
            AppError::NoDoctorAvailable(msg) => msg,
            AppError::Internal(msg) => msg,
        };

        if kind == ErrorKind::Internal || kind == ErrorKind::NoDoctorAvailable {
            tracing::error!("Error: {:?}: {}", kind, message);
        } else {
            tracing::debug!("Error: {:?}: {}", kind, message);
        }

        ErrorResponse { kind, message }
    }
}
