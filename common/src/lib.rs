//! This library is there to share some common code amongst all flightmap modules.
//!

pub use config::*;
pub use logging::*;

mod config;
mod logging;

/// Simple macro to generate PathBuf from a series of entries
///
#[macro_export]
macro_rules! makepath {
    ($($item:expr),+) => {
        [
        $(std::path::PathBuf::from($item),)+
        ]
        .iter()
        .collect::<std::path::PathBuf>()
    };
}

/// Configuration files carry a `version` field so that we can refuse files written for another
/// layout instead of silently misreading them.
///
pub trait Versioned {
    /// Version this code understands.
    const VERSION: usize;

    /// Version found in the loaded data.
    fn version(&self) -> usize;
}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
