//! Module to deal with the sources we can connect to to fetch live flight states.
//!
//! The different submodules deal with:
//!
//! - fetching data from a given site (`access`)
//! - keeping the last answer around for a while (`cache`)
//! - the fetcher itself, which never fails but tells the user when something went wrong
//!   (`fetcher`).
//!

use std::fmt::{Debug, Display, Formatter};

use serde::Serialize;

use flightmap_formats::StateList;

// Re-export these modules for a shorter import path.
//
pub use access::*;
pub use cache::*;
pub use error::*;
pub use fetcher::*;

#[macro_use]
mod macros;

mod access;
mod cache;
mod error;
mod fetcher;

/// This trait enables us to manage different ways of connecting and fetching data under
/// a single interface.
///
pub trait Fetchable: Debug {
    /// Return site's name
    fn name(&self) -> String;
    /// Fetch the current states, one network round-trip at most
    fn fetch(&self) -> Result<StateList, FetchError>;
}

/// Statistics gathering struct, kept by the fetcher for the whole session
///
#[derive(Clone, Debug, Default, Serialize)]
pub struct Stats {
    /// Calls to the remote site
    pub fetches: u32,
    /// State vectors received
    pub pkts: u64,
    pub hits: u32,
    pub miss: u32,
    /// Answers without any state
    pub empty: u32,
    pub err: u32,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fetches={} pkts={} hits={} miss={} empty={} errors={}",
            self.fetches, self.pkts, self.hits, self.miss, self.empty, self.err
        )
    }
}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
