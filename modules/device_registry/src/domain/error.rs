use thiserror::Error;

use crate::contract::error::ErrorKind;
use crate::contract::model::PassportId;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Passport not found")]
    PassportNotFound { id: PassportId },

    #[error("Passport not found for serial number: {serial}")]
    NoPassportForSerial { serial: String },

    #[error("Serial number already exists")]
    SerialRangeTaken { prefix: String, from: i64, to: i64 },

    #[error("Device already registered")]
    DeviceAlreadyRegistered { serial: String },

    #[error("Device not found")]
    DeviceNotFound { serial: String },

    #[error("Device not registered")]
    DeviceNotRegistered { serial: String },

    #[error("Can't delete passport")]
    PassportInUse { id: PassportId },

    #[error("Cannot delete device: renovations exist")]
    DeviceHasRenovations { serial: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn passport_not_found(id: PassportId) -> Self {
        Self::PassportNotFound { id }
    }

    pub fn no_passport_for_serial(serial: impl Into<String>) -> Self {
        Self::NoPassportForSerial {
            serial: serial.into(),
        }
    }

    pub fn serial_range_taken(prefix: impl Into<String>, from: i64, to: i64) -> Self {
        Self::SerialRangeTaken {
            prefix: prefix.into(),
            from,
            to,
        }
    }

    pub fn device_already_registered(serial: impl Into<String>) -> Self {
        Self::DeviceAlreadyRegistered {
            serial: serial.into(),
        }
    }

    pub fn device_not_found(serial: impl Into<String>) -> Self {
        Self::DeviceNotFound {
            serial: serial.into(),
        }
    }

    pub fn device_not_registered(serial: impl Into<String>) -> Self {
        Self::DeviceNotRegistered {
            serial: serial.into(),
        }
    }

    pub fn passport_in_use(id: PassportId) -> Self {
        Self::PassportInUse { id }
    }

    pub fn device_has_renovations(serial: impl Into<String>) -> Self {
        Self::DeviceHasRenovations {
            serial: serial.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PassportNotFound { .. }
            | Self::NoPassportForSerial { .. }
            | Self::DeviceNotFound { .. }
            | Self::DeviceNotRegistered { .. } => ErrorKind::NotFound,
            Self::SerialRangeTaken { .. } | Self::DeviceAlreadyRegistered { .. } => {
                ErrorKind::AlreadyExists
            }
            Self::PassportInUse { .. } | Self::DeviceHasRenovations { .. } => ErrorKind::Failed,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Database { .. } => ErrorKind::Internal,
        }
    }
}
