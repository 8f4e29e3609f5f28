//! Error types for medbook.
//!
//! This module defines all error types used throughout the medbook crate.
//! Variants are split into failures that abort the requested operation
//! (storage, schema, configuration) and failures the user can recover from
//! by re-submitting a form (missing fields, taken slots).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for medbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// A data file could not be opened, read, or written.
    #[error("storage unavailable at {path}: {source}")]
    StorageUnavailable {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The appointments file header is not the expected one.
    #[error("schema mismatch in {path}: {message}")]
    SchemaMismatch {
        /// Path to the data file.
        path: PathBuf,
        /// Description of the mismatch.
        message: String,
    },

    // === Booking Errors ===
    /// A required patient field was empty.
    #[error("missing required field: {field}")]
    MissingRequiredField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The doctor/time/day slot already has an appointment.
    #[error("an appointment is already booked with Dr. {doctor_name} at {time} on {day}")]
    SlotAlreadyBooked {
        /// Name of the booked doctor.
        doctor_name: String,
        /// Time label of the slot.
        time: String,
        /// Day label of the slot.
        day: String,
    },

    /// No doctor matched the requested selection.
    #[error("no doctor with id '{id}' for {specialty} on {day}")]
    DoctorNotFound {
        /// Requested doctor id.
        id: String,
        /// Requested specialty.
        specialty: String,
        /// Requested day.
        day: String,
    },

    /// Several doctors matched and no time was given to pick one.
    #[error("doctor '{id}' has {count} slots on {day}; pass a time to choose one")]
    AmbiguousDoctor {
        /// Requested doctor id.
        id: String,
        /// Requested day.
        day: String,
        /// Number of matching slots.
        count: usize,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Terminal or other non-storage I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for medbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a storage error for the given path.
    #[must_use]
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a schema mismatch error for the given path.
    #[must_use]
    pub fn schema_mismatch(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Map a CSV error raised while touching `path`.
    ///
    /// I/O failures become [`Error::StorageUnavailable`]; anything else is an
    /// encoding bug and becomes [`Error::Internal`].
    #[must_use]
    pub fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let path = path.into();
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(source) => Self::storage(path, source),
                other => Self::internal(format!("{}: {other:?}", path.display())),
            }
        } else {
            Self::internal(format!("{}: {err}", path.display()))
        }
    }

    /// Check if the user can recover by correcting input and re-submitting.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. }
                | Self::SlotAlreadyBooked { .. }
                | Self::DoctorNotFound { .. }
                | Self::AmbiguousDoctor { .. }
        )
    }

    /// Check if this error came from the data files.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { .. } | Self::SchemaMismatch { .. }
        )
    }
}
