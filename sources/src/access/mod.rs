//! All the sites we know how to fetch from.
//!

pub use opensky::*;

mod opensky;
