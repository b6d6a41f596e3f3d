//! Validation Error Types

use thiserror::Error;

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value outside an open coordinate interval
    #[error("{} must be within the expected range for NYC: between {min} and {max}.", field_label(.field))]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Integer outside its inclusive range
    #[error("Passenger count must be between {min} and {max}.")]
    PassengerCount { value: i64, min: i64, max: i64 },

    #[error("Vendor ID must be either 1 or 2.")]
    UnknownVendor(i64),

    #[error("Value must be 'Y' or 'N' (case-insensitive).")]
    InvalidFlag(String),

    /// String does not match the expected layout
    #[error("{} must follow the format {expected}.", field_label(.field))]
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Well-formed date that does not exist on the calendar
    #[error("{} {value} is not a valid calendar date.", field_label(.field))]
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the request field this error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. } => field,
            ValidationError::PassengerCount { .. } => "passenger_count",
            ValidationError::UnknownVendor(_) => "vendor_id",
            ValidationError::InvalidFlag(_) => "store_and_fwd_flag",
            ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::InvalidDate { field, .. } => field,
        }
    }
}

/// `pickup_longitude` -> `Pickup longitude`
fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
