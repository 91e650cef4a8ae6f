//! Definition of the data formats
//!
//! This module makes the link between what the OpenSky network sends us (`StateList` made of
//! `StateVector`) and what the map wants to display (`FlightTable` made of `Flight`).
//!
//! The `Transformer` is the only bridge between the two.
//!

// Re-export for convenience
//
pub use error::*;
pub use flight::*;
pub use opensky::*;
pub use transform::*;

mod error;
mod flight;
mod opensky;
mod transform;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
