use thiserror::Error;

/// Custom error type for decoding, allow us to differentiate between errors.
///
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No states field in answer")]
    MissingStates,
    #[error("Row {row}: bad length {len}, expected 16 to 18 fields")]
    BadRow { row: usize, len: usize },
    #[error("Row {row}: bad value for {field}: {source}")]
    BadField {
        row: usize,
        field: &'static str,
        source: serde_json::Error,
    },
}
