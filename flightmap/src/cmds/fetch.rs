//! This is the module handling the `fetch` sub-command.
//!

use eyre::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{info, trace};

use flightmap_formats::FlightTable;
use flightmap_sources::{Clock, Fetchable};

use crate::{FetchOpts, Pipeline, Tooltip, View};

/// Run one cycle and format the result for the terminal.
///
#[tracing::instrument(skip(pipeline))]
pub fn fetch_flights<F: Fetchable, C: Clock>(
    pipeline: &mut Pipeline<F, C>,
    fopts: &FetchOpts,
) -> Result<String> {
    trace!("fetch_flights");

    let view = pipeline.run(false);
    info!("{} flights from {}", view.count, view.origin);

    let view = match fopts.limit {
        Some(limit) => View {
            flights: FlightTable::new(view.flights.iter().take(limit).cloned().collect()),
            ..view
        },
        None => view,
    };

    if fopts.json {
        Ok(serde_json::to_string_pretty(&view)?)
    } else {
        Ok(view_to_text(&view))
    }
}

/// Error first, then the count and the table.  Nothing to show means neither of them.
///
fn view_to_text(view: &View) -> String {
    let mut out = vec![];

    if let Some(msg) = &view.error {
        out.push(msg.clone());
    }

    if !view.flights.is_empty() {
        out.push(format!("Active flights tracked: {}", view.count));

        let tooltip = Tooltip::default();
        let mut builder = Builder::default();
        builder.push_record(["ICAO24", "Position", "Angle", "Details"]);

        view.flights.iter().for_each(|f| {
            let [lon, lat] = f.position();
            builder.push_record([
                f.icao24.clone(),
                format!("{lon:.4}, {lat:.4}"),
                format!("{:.1}", f.angle),
                tooltip.render(f),
            ]);
        });

        out.push(builder.build().with(Style::modern()).to_string());
    }
    out.join("\n")
}
