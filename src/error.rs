//! Error types for the PAYE Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while fetching inputs, resolving
//! tax details and running the payroll calculation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An upstream service the engine depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    /// Supplies the employee's salary components, month, year and age.
    UserInput,
    /// Supplies tax brackets and the rebate value.
    TaxTable,
    /// Receives calculation feedback. Currently a no-op.
    Feedback,
}

impl Collaborator {
    /// Returns the human-readable service name used in messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collaborator::UserInput => "User Input Service",
            Collaborator::TaxTable => "Tax Table Service",
            Collaborator::Feedback => "Feedback Service",
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The main error type for the PAYE Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use paye_engine::error::{Collaborator, EngineError};
///
/// let error = EngineError::InputIncomplete {
///     origin: Collaborator::UserInput,
///     missing: vec!["month".to_string(), "year".to_string()],
/// };
/// assert_eq!(
///     error.to_string(),
///     "Incomplete data from User Input Service. Missing fields: month, year"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was present but unusable.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// The configuration key or environment variable.
        key: String,
        /// A description of the problem.
        message: String,
    },

    /// One or more required fields were absent from a payload.
    #[error("Incomplete data from {origin}. Missing fields: {}", .missing.join(", "))]
    InputIncomplete {
        /// The service whose payload was incomplete.
        origin: Collaborator,
        /// Every required field that was missing.
        missing: Vec<String>,
    },

    /// A field had the wrong type or an out-of-range value.
    #[error("Invalid value for '{field}' from {origin}: {message}")]
    InputInvalid {
        /// The service whose payload carried the value.
        origin: Collaborator,
        /// The offending field.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// An intermediate amount exceeded the range of `Decimal`.
    #[error("Amount out of range while computing '{quantity}'")]
    AmountOutOfRange {
        /// The quantity being computed.
        quantity: String,
    },

    /// An upstream service could not be reached or answered with garbage.
    #[error("{service} is unavailable: {message}")]
    CollaboratorUnavailable {
        /// The failing service.
        service: Collaborator,
        /// A description of the failure.
        message: String,
    },

    /// An upstream service answered well-formed but had nothing to offer.
    #[error("{service} has no data available: {message}")]
    CollaboratorDataAbsent {
        /// The service that had no data.
        service: Collaborator,
        /// The reason reported by the service.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InputInvalid`].
    pub fn invalid(
        origin: Collaborator,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        EngineError::InputInvalid {
            origin,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
