//! Trip Record Types
//!
//! Shared types for a single taxi trip, in both its unchecked wire form
//! ([`TripInput`]) and its validated form ([`TripRecord`]).

mod record;

pub use record::{GeoPoint, StoreAndFwdFlag, TripInput, TripRecord, VendorId};

use thiserror::Error;

/// Errors converting raw values into trip types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripTypeError {
    #[error("Unknown vendor id: {0}")]
    UnknownVendor(i64),
    #[error("Unknown store and forward flag: {0:?}")]
    UnknownFlag(String),
}
