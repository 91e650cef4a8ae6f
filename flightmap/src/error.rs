//! Error module
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Status {
    #[error("Bad listen address {0}")]
    BadListen(String),
    #[error("Can not write to {0}")]
    BadOutput(String, #[source] std::io::Error),
    #[error("Server stopped: {0}")]
    ServerStopped(String),
}
