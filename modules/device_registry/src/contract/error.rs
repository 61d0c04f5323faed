use thiserror::Error;

/// Stable classification of a failure, independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Validation,
    Failed,
    Internal,
}

/// Errors that are safe to expose to other crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceRegistryError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    AlreadyExists { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{message}")]
    Failed { message: String },

    #[error("Internal error")]
    Internal,
}

impl DeviceRegistryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Failed { .. } => ErrorKind::Failed,
            Self::Internal => ErrorKind::Internal,
        }
    }
}

impl From<crate::domain::error::DomainError> for DeviceRegistryError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        let message = domain_error.to_string();
        match domain_error {
            PassportNotFound { .. }
            | NoPassportForSerial { .. }
            | DeviceNotFound { .. }
            | DeviceNotRegistered { .. } => Self::not_found(message),
            SerialRangeTaken { .. } | DeviceAlreadyRegistered { .. } => {
                Self::already_exists(message)
            }
            PassportInUse { .. } | DeviceHasRenovations { .. } => Self::failed(message),
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            Database { .. } => Self::internal(),
        }
    }
}
