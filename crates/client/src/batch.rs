//! Batch input loading
//!
//! A batch argument is either the path of a JSON file or the JSON text
//! itself. An existing file always wins.

use crate::error::{ClientError, Result};
use std::fs;
use std::path::Path;
use trip_types::TripInput;

/// Read a batch from a file path or a raw JSON string
pub fn load_batch(input: &str) -> Result<Vec<TripInput>> {
    let path = Path::new(input);
    if path.is_file() {
        let text = fs::read_to_string(path).map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        return parse_batch(&text);
    }
    parse_batch(input)
}

/// Parse a JSON array of trips
pub fn parse_batch(text: &str) -> Result<Vec<TripInput>> {
    let value: serde_json::Value = serde_json::from_str(text.trim())?;
    if !value.is_array() {
        return Err(ClientError::InvalidBatch(format!(
            "expected an array, found {}",
            kind(&value)
        )));
    }
    let trips: Vec<TripInput> = serde_json::from_value(value)?;
    if trips.is_empty() {
        return Err(ClientError::InvalidBatch("the array is empty".to_string()));
    }
    Ok(trips)
}

fn kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
