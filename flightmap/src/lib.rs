//! Library part of the `flightmap` utility.
//!
//! A render cycle fetches the current states from the feed (or the cache), turns them into
//! flights and hands them to a map described by `Deck`.  The different commands only differ in
//! what they do with the result of the cycle.
//!
//! The raw and display records are in the `flightmap-formats` crate and the feed itself in the
//! `flightmap-sources` crate.
//!

// Re-export
//
pub use cli::*;
pub use cmds::*;
pub use config::*;
pub use error::*;
pub use map::*;
pub use page::*;
pub use pipeline::*;

mod cli;
mod cmds;
mod config;
mod error;
mod map;
mod page;
mod pipeline;
mod template;
