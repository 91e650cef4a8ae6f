//! This is the module handling the `render` sub-command.
//!

use std::fs;
use std::io::{self, Write};

use eyre::Result;
use tracing::{info, trace};

use flightmap_sources::{Clock, Fetchable};

use crate::{MapConfig, Page, Pipeline, RenderOpts, Status};

/// Run one cycle and write the page into a file or stdout.
///
#[tracing::instrument(skip(pipeline, map))]
pub fn render_page<F: Fetchable, C: Clock>(
    pipeline: &mut Pipeline<F, C>,
    map: &MapConfig,
    ropts: &RenderOpts,
) -> Result<()> {
    trace!("render_page");

    let view = pipeline.run(false);
    let html = Page::new(map, &view).render()?;

    match &ropts.output {
        Some(fname) => {
            info!("Writing {} flights into {:?}", view.count, fname);
            fs::write(fname, &html)
                .map_err(|e| Status::BadOutput(fname.to_string_lossy().to_string(), e))?;
        }
        None => io::stdout().write_all(html.as_bytes())?,
    }
    Ok(())
}
