//! Trip Request Validation
//!
//! Range, format and categorical checks that turn an unchecked
//! [`trip_types::TripInput`] into a [`trip_types::TripRecord`].

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, ValidationReport, Validator};
