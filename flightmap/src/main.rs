use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::Result;
use tracing::{info, trace};

use flightmap::{fetch_flights, render_page, serve_flights, Config, Opts, SubCommand};
use flightmap_common::{init_logging, ConfigFile};

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging.
    //
    init_logging(NAME, opts.debug, opts.log_dir.as_deref())?;

    // Config has the feed, transform and map parameters, all optional.
    //
    let cfg = ConfigFile::<Config>::load(NAME, opts.config.as_deref())?.into_inner();

    // Banner
    //
    banner()?;

    handle_subcmd(&cfg, &opts.subcmd)
}

pub fn handle_subcmd(cfg: &Config, subcmd: &SubCommand) -> Result<()> {
    match subcmd {
        // Handle `fetch`
        //
        SubCommand::Fetch(fopts) => {
            trace!("fetch");

            let mut pipeline = cfg.pipeline()?;
            let out = fetch_flights(&mut pipeline, fopts)?;
            println!("{}", out);
        }

        // Handle `render`
        //
        SubCommand::Render(ropts) => {
            trace!("render");

            let mut pipeline = cfg.pipeline()?;
            render_page(&mut pipeline, &cfg.map, ropts)?;
        }

        // Handle `serve`
        //
        SubCommand::Serve(sopts) => {
            trace!("serve");

            let listen = sopts.listen.as_deref().unwrap_or(&cfg.server.listen);
            info!("Serving {} on {}", cfg.feed.url, listen);

            serve_flights(cfg.pipeline()?, cfg.map.clone(), listen)?;
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.  Not worth
        //       trying to limit depending on the OS.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", version());
            eprintln!("\t{}", flightmap_common::version());
            eprintln!("\t{}", flightmap_formats::version());
            eprintln!("\t{}", flightmap_sources::version());
        }
    }
    Ok(())
}

/// Return our version number
///
#[inline]
pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
