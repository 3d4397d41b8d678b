//! Error types for the booking studio.
//!
//! Only [`ConfigError`] and [`CatalogError`] ever reach `main`. Everything the
//! wizard can hit is a [`BookingError`] stored in state, and failures of the
//! outside world (text generation, the relay) are absorbed where they happen.

use crate::types::{BarberId, ClockTime, ServiceId};
use crate::wizard::BookingStep;
use chrono::NaiveDate;
use thiserror::Error;

/// Field-level validation problems on the client details step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Name is empty after trimming
    #[error("Name is required.")]
    NameRequired,
    /// Contact is empty after trimming
    #[error("Contact number is required.")]
    ContactRequired,
    /// Contact does not look like a phone number
    #[error("Invalid contact number. Use 10 to 20 digits, spaces, hyphens or parentheses.")]
    ContactMalformed,
}

/// Recoverable wizard errors, surfaced to the user and never propagated
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BookingError {
    /// The chosen slot was taken before the booking was committed
    #[error("The {time} slot on {date} is no longer available. Please choose another time or date.")]
    SlotUnavailable {
        /// Requested day
        date: NaiveDate,
        /// Requested time
        time: ClockTime,
    },

    /// Confirmation attempted with a selection missing
    #[error("Please complete the service, barber, date and time selection.")]
    IncompleteSelection,

    /// Client details are missing or invalid
    #[error("Please fix the errors in your details before continuing.")]
    InvalidDetails,

    /// Confirmation attempted without a payment method
    #[error("Please select a payment method.")]
    PaymentMethodRequired,

    /// A confirmation for this session is already running
    #[error("A booking confirmation is already in progress.")]
    ConfirmationInProgress,

    /// Service id not in the catalog
    #[error("Unknown service '{0}'.")]
    UnknownService(ServiceId),

    /// Barber id not in the catalog
    #[error("Unknown barber '{0}'.")]
    UnknownBarber(BarberId),

    /// Date is before today in shop time
    #[error("{0} is in the past. Please pick today or a later date.")]
    DateInPast(NaiveDate),

    /// Action does not apply to the current step
    #[error("That action is not available at the {0} step.")]
    NotAtStep(BookingStep),
}

/// Ledger commit failures
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A fresh availability check rejected the slot
    #[error("slot {time} on {date} is not available")]
    SlotUnavailable {
        /// Requested day
        date: NaiveDate,
        /// Requested time
        time: ClockTime,
    },

    /// The concrete barber is not in the catalog
    #[error("unknown barber '{0}'")]
    UnknownBarber(BarberId),
}

/// Catalog loading and validation failures
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid catalog JSON
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog content is inconsistent
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Configuration failures at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Variable present but unparseable
    #[error("invalid value '{value}' for {name}")]
    InvalidValue {
        /// Environment variable
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// Catalog file problem
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
