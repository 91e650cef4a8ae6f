use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use flightmap_formats::FormatError;

/// Everything that can go wrong while talking to the feed.  The fetcher does not make any
/// difference between them, they all end up as an error message and an empty table.
///
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No answer after {0:?}")]
    Timeout(Duration),
    #[error("HTTP Error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Error({0}) from {1}")]
    Status(StatusCode, String),
    #[error("Bad answer: {0}")]
    Format(#[from] FormatError),
}
