//! Module describing all possible commands and sub-commands to the `flightmap` main driver
//!
//! We have three main commands:
//!
//! - `fetch`
//! - `render`
//! - `serve`
//!
//! `fetch` runs one cycle and displays the flights in the terminal, as a table or as JSON.
//!
//! `render` runs one cycle and generates the map page, a self-contained HTML file.
//!
//! `serve` is a small HTTP server doing a cycle every time the page is loaded.  The cache is
//! shared by all requests so reloading within the TTL does not hit the feed again.
//!
//! `completion` is here just to configure the various shells completion system.
//!

use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser};
use clap_complete::shells::Shell;

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// debug mode (hierarchical traces).
    #[clap(short = 'D', long = "debug")]
    pub debug: bool,
    /// Also log into hourly files in this directory.
    #[clap(long)]
    pub log_dir: Option<PathBuf>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `completion SHELL`
/// `fetch [--json] [--limit N]`
/// `render [-o FILE]`
/// `serve [--listen ADDR]`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// Fetch the current flights and display them
    Fetch(FetchOpts),
    /// Generate the map page
    Render(RenderOpts),
    /// Serve the live map over HTTP
    Serve(ServeOpts),
    /// List all package versions
    Version,
}

// ------

/// Options for a single cycle in the terminal.
///
#[derive(Debug, Parser)]
pub struct FetchOpts {
    /// Output JSON instead of a table.
    #[clap(long)]
    pub json: bool,
    /// Display at most this many flights.
    #[clap(short = 'l', long)]
    pub limit: Option<usize>,
}

// ------

#[derive(Debug, Parser)]
pub struct RenderOpts {
    /// Output file, default is stdout.
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,
}

// ------

#[derive(Debug, Parser)]
pub struct ServeOpts {
    /// Address to listen on, overrides the configuration.
    #[clap(short = 'l', long)]
    pub listen: Option<String>,
}

// ------

/// Options to generate completion files at runtime
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}
