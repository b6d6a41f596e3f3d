//! Feature Error Types

use thiserror::Error;

/// Errors while assembling a feature row
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// A computed value is NaN or infinite
    #[error("Feature {column} is not finite: {value}")]
    NonFinite { column: &'static str, value: f64 },

    /// Value count does not match the schema width
    #[error("Feature row has {actual} values, schema {schema} expects {expected}")]
    LengthMismatch {
        schema: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Column name not known to any schema
    #[error("Unknown feature column: {0}")]
    UnknownColumn(String),

    #[error("Unknown feature schema: {0}")]
    UnknownSchema(String),
}
